//! Structural household measures and the motivation tiers that unlock them

use serde::{Deserialize, Serialize};

use crate::adaptation::status::ImplementationStatus;
use crate::core::config::{MeasureSpec, MeasuresConfig, MotivationConfig};
use crate::core::types::HousingType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeasureKind {
    Elevation,
    WetProofing,
    DryProofing,
}

impl MeasureKind {
    pub const ALL: [MeasureKind; 3] = [Self::Elevation, Self::WetProofing, Self::DryProofing];

    pub fn spec<'a>(&self, measures: &'a MeasuresConfig) -> &'a MeasureSpec {
        match self {
            Self::Elevation => &measures.elevation,
            Self::WetProofing => &measures.wet_proofing,
            Self::DryProofing => &measures.dry_proofing,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Elevation => "elevation",
            Self::WetProofing => "wet_proofing",
            Self::DryProofing => "dry_proofing",
        }
    }
}

/// Independent status track for each of the three measures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureSet {
    pub elevation: ImplementationStatus,
    pub wet_proofing: ImplementationStatus,
    pub dry_proofing: ImplementationStatus,
}

impl MeasureSet {
    pub fn get(&self, kind: MeasureKind) -> ImplementationStatus {
        match kind {
            MeasureKind::Elevation => self.elevation,
            MeasureKind::WetProofing => self.wet_proofing,
            MeasureKind::DryProofing => self.dry_proofing,
        }
    }

    pub fn get_mut(&mut self, kind: MeasureKind) -> &mut ImplementationStatus {
        match kind {
            MeasureKind::Elevation => &mut self.elevation,
            MeasureKind::WetProofing => &mut self.wet_proofing,
            MeasureKind::DryProofing => &mut self.dry_proofing,
        }
    }

    pub fn all_not_implemented(&self) -> bool {
        MeasureKind::ALL.iter().all(|&k| self.get(k).is_not_implemented())
    }

    pub fn implemented_count(&self) -> usize {
        MeasureKind::ALL
            .iter()
            .filter(|&&k| self.get(k).is_implemented())
            .count()
    }
}

/// Measures a household may attempt at its current motivation.
///
/// Each tier is a superset of the one below. Elevation also needs a detached house.
pub fn unlocked_measures(
    motivation: f64,
    thresholds: &MotivationConfig,
    housing: HousingType,
) -> Vec<MeasureKind> {
    if motivation >= thresholds.high_threshold {
        let mut set = Vec::with_capacity(3);
        if housing.can_elevate() {
            set.push(MeasureKind::Elevation);
        }
        set.push(MeasureKind::WetProofing);
        set.push(MeasureKind::DryProofing);
        set
    } else if motivation >= thresholds.medium_threshold {
        vec![MeasureKind::WetProofing, MeasureKind::DryProofing]
    } else if motivation >= thresholds.low_threshold {
        vec![MeasureKind::DryProofing]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tiers_are_supersets() {
        let thresholds = MotivationConfig::default();
        let housing = HousingType::Detached;

        assert!(unlocked_measures(0.5, &thresholds, housing).is_empty());
        assert_eq!(
            unlocked_measures(0.65, &thresholds, housing),
            vec![MeasureKind::DryProofing]
        );
        assert_eq!(
            unlocked_measures(0.75, &thresholds, housing),
            vec![MeasureKind::WetProofing, MeasureKind::DryProofing]
        );
        assert_eq!(unlocked_measures(0.9, &thresholds, housing).len(), 3);
    }

    #[test]
    fn test_attached_houses_cannot_elevate() {
        let thresholds = MotivationConfig::default();
        let set = unlocked_measures(1.0, &thresholds, HousingType::Attached);
        assert!(!set.contains(&MeasureKind::Elevation));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_measure_set_tracks_are_independent() {
        let mut set = MeasureSet::default();
        assert!(set.all_not_implemented());

        set.get_mut(MeasureKind::WetProofing).advance(2);
        assert!(set.wet_proofing.is_implementing());
        assert!(set.elevation.is_not_implemented());
        assert!(set.dry_proofing.is_not_implemented());
        assert!(!set.all_not_implemented());
    }

    #[test]
    fn test_spec_lookup() {
        let measures = MeasuresConfig::default();
        assert_eq!(MeasureKind::Elevation.spec(&measures).cost, 5000.0);
        assert_eq!(MeasureKind::DryProofing.spec(&measures).implementation_time, 1);
    }
}
