//! Government infrastructure projects (dykes, wetlands, ...)

use serde::{Deserialize, Serialize};

use crate::adaptation::status::{ImplementationStatus, Transition};
use crate::core::config::{InfrastructureSpec, OrganisationStructure};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureOption {
    pub name: String,
    pub cost: f64,
    /// Steps until the project protects; adjusted once for government structure
    pub completion_time: u32,
    /// Fraction of the floodplain population covered once implemented
    pub protection_level: f64,
    status: ImplementationStatus,
    planning_adjusted: bool,
}

impl InfrastructureOption {
    pub fn new(name: impl Into<String>, cost: f64, completion_time: u32, protection_level: f64) -> Self {
        Self {
            name: name.into(),
            cost,
            completion_time,
            protection_level,
            status: ImplementationStatus::NotImplemented,
            planning_adjusted: false,
        }
    }

    pub fn from_spec(spec: &InfrastructureSpec) -> Self {
        Self::new(spec.name.clone(), spec.cost, spec.completion_time, spec.protection_level)
    }

    /// Government procedures stretch or shorten the planning horizon.
    ///
    /// Applied at most once; completion time never drops below one step.
    pub fn impact_planning(
        &mut self,
        structure: OrganisationStructure,
        centralised_delay: u32,
        decentralised_speedup: u32,
    ) -> u32 {
        if !self.planning_adjusted {
            self.completion_time = match structure {
                OrganisationStructure::Centralised => self.completion_time + centralised_delay,
                OrganisationStructure::Decentralised => {
                    self.completion_time.saturating_sub(decentralised_speedup).max(1)
                }
            };
            self.planning_adjusted = true;
        }
        self.completion_time
    }

    /// Advance the project one step towards completion
    pub fn change_status(&mut self) -> Transition {
        let transition = self.status.advance(self.completion_time);
        tracing::debug!(
            option = %self.name,
            status = ?self.status,
            counter = self.implementation_counter(),
            "Infrastructure status changed"
        );
        transition
    }

    pub fn status(&self) -> ImplementationStatus {
        self.status
    }

    /// Steps of work done so far
    pub fn implementation_counter(&self) -> u32 {
        match self.status {
            ImplementationStatus::NotImplemented => 0,
            ImplementationStatus::Implementing { progress } => progress,
            ImplementationStatus::Implemented => self.completion_time,
        }
    }

    pub fn is_implemented(&self) -> bool {
        self.status.is_implemented()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completion_after_exactly_completion_time_calls() {
        let mut dyke = InfrastructureOption::new("Dyke", 8.0, 5, 0.5);
        for _ in 0..4 {
            dyke.change_status();
            assert!(!dyke.is_implemented());
        }
        assert_eq!(dyke.change_status(), Transition::Completed);
        assert!(dyke.is_implemented());
        assert_eq!(dyke.implementation_counter(), 5);
    }

    #[test]
    fn test_status_never_reverts() {
        let mut wetland = InfrastructureOption::new("Wetland", 5.0, 2, 0.5);
        for _ in 0..10 {
            wetland.change_status();
        }
        assert!(wetland.is_implemented());
    }

    #[test]
    fn test_centralised_lengthens_once() {
        let mut dyke = InfrastructureOption::new("Dyke", 8.0, 5, 0.5);
        assert_eq!(dyke.impact_planning(OrganisationStructure::Centralised, 4, 4), 9);
        assert_eq!(dyke.impact_planning(OrganisationStructure::Centralised, 4, 4), 9);
    }

    #[test]
    fn test_decentralised_shortens_but_not_below_one() {
        let mut wetland = InfrastructureOption::new("Wetland", 5.0, 2, 0.5);
        assert_eq!(wetland.impact_planning(OrganisationStructure::Decentralised, 4, 4), 1);

        let mut dyke = InfrastructureOption::new("Dyke", 8.0, 10, 0.5);
        assert_eq!(dyke.impact_planning(OrganisationStructure::Decentralised, 4, 4), 6);
    }
}
