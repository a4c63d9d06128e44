//! Per-step metrics handed to an external sink

use serde::{Deserialize, Serialize};

use crate::agents::{Government, Household, PolicyPhase};
use crate::core::types::{HouseholdId, Step};

/// Model-level and per-agent values observed at the end of a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    pub step: Step,
    /// Households that started a measure this step
    pub adapted_households: u32,
    /// Households that have ever started a measure
    pub total_adapted_households: u32,
    pub protected_households: u32,
    pub avg_flood_damage: f64,
    pub avg_public_concern: f64,
    pub avg_motivation: f64,
    pub infrastructure_active: bool,
    pub flood_occurred: bool,
    pub households: Vec<HouseholdRecord>,
    pub government: GovernmentRecord,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdRecord {
    pub id: HouseholdId,
    pub flood_damage_actual: f64,
    pub is_adapted: bool,
    /// Measures currently in place and protecting
    pub implemented_measures: u32,
    pub motivation: f64,
    pub financial_loss: f64,
    pub budget: f64,
}

impl From<&Household> for HouseholdRecord {
    fn from(h: &Household) -> Self {
        Self {
            id: h.id,
            flood_damage_actual: h.flood_damage_actual,
            is_adapted: h.is_adapted,
            implemented_measures: h.measures.implemented_count() as u32,
            motivation: h.motivation,
            financial_loss: h.financial_loss,
            budget: h.budget,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GovernmentRecord {
    pub agenda: bool,
    pub decision: Option<String>,
    pub phase: PolicyPhase,
    pub flood_risk: f64,
    pub public_concern: f64,
}

impl From<&Government> for GovernmentRecord {
    fn from(g: &Government) -> Self {
        Self {
            agenda: g.policy.agenda,
            decision: g.decision().map(|o| o.name.clone()),
            phase: g.phase(),
            flood_risk: g.last_risk,
            public_concern: g.last_concern,
        }
    }
}

/// Model-level columns only, one row per step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModelRow {
    pub step: Step,
    pub adapted_households: u32,
    pub total_adapted_households: u32,
    pub avg_flood_damage: f64,
    pub avg_public_concern: f64,
    pub avg_motivation: f64,
    pub infrastructure_active: bool,
    pub flood_occurred: bool,
}

impl From<&StepRecord> for ModelRow {
    fn from(r: &StepRecord) -> Self {
        Self {
            step: r.step,
            adapted_households: r.adapted_households,
            total_adapted_households: r.total_adapted_households,
            avg_flood_damage: r.avg_flood_damage,
            avg_public_concern: r.avg_public_concern,
            avg_motivation: r.avg_motivation,
            infrastructure_active: r.infrastructure_active,
            flood_occurred: r.flood_occurred,
        }
    }
}

/// Receives the metrics of every completed step
pub trait MetricsSink {
    fn record(&mut self, record: &StepRecord);
}

/// Keeps every record in memory
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsLog {
    pub records: Vec<StepRecord>,
}

impl MetricsLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&StepRecord> {
        self.records.last()
    }

    pub fn model_series(&self) -> Vec<ModelRow> {
        self.records.iter().map(ModelRow::from).collect()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl MetricsSink for MetricsLog {
    fn record(&mut self, record: &StepRecord) {
        self.records.push(record.clone());
    }
}

/// Discards everything; for runs where only the final state matters
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl MetricsSink for NullSink {
    fn record(&mut self, _record: &StepRecord) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adaptation::motivation::MotivationFactors;
    use crate::adaptation::status::ImplementationStatus;
    use crate::core::types::{HousingType, Location};

    #[test]
    fn test_household_record_counts_only_finished_measures() {
        let factors = MotivationFactors {
            background: 0.5,
            threat_appraisal: 0.5,
            coping_appraisal: 0.5,
            climate_related_beliefs: 0.5,
            preceding_flood_engagement: 0.5,
            external_influence: 0.5,
        };
        let mut h = Household::new(
            HouseholdId(3),
            Location::default(),
            true,
            HousingType::Detached,
            2000.0,
            factors,
            1.0,
        );
        h.measures.elevation = ImplementationStatus::Implemented;
        h.measures.dry_proofing = ImplementationStatus::Implemented;
        h.measures.wet_proofing = ImplementationStatus::Implementing { progress: 1 };

        let record = HouseholdRecord::from(&h);
        assert_eq!(record.id, HouseholdId(3));
        assert_eq!(record.implemented_measures, 2);
        assert_eq!(record.budget, 2000.0);
    }
}
