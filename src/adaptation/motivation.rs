//! Adaptation motivation and the rules that move its sub-factors
//!
//! Motivation is the plain mean of six sub-factors, each nominally in [0, 1].
//! The update rules here are pure; the household supplies the random draws.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::core::config::BudgetConfig;

/// Number of past steps remembered for preceding-flood engagement
pub const ADOPTION_HISTORY_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotivationFactors {
    /// Fixed at creation
    pub background: f64,
    pub threat_appraisal: f64,
    pub coping_appraisal: f64,
    pub climate_related_beliefs: f64,
    pub preceding_flood_engagement: f64,
    pub external_influence: f64,
}

impl MotivationFactors {
    /// Mean of the six sub-factors, clamped into [0, 1]
    pub fn motivation(&self) -> f64 {
        let sum = self.background
            + self.threat_appraisal
            + self.coping_appraisal
            + self.climate_related_beliefs
            + self.preceding_flood_engagement
            + self.external_influence;
        let mean = sum / 6.0;
        if mean.is_nan() {
            0.0
        } else {
            mean.clamp(0.0, 1.0)
        }
    }
}

/// Threat appraisal range after a flood, keyed by the depth the household saw
pub fn threat_band(actual_depth: f64) -> (f64, f64) {
    if actual_depth < 0.5 {
        (0.3, 0.5)
    } else if actual_depth < 1.5 {
        (0.5, 0.75)
    } else {
        (0.75, 1.0)
    }
}

/// Coping appraisal grows with a comfortable budget and shrinks with a tight one
pub fn coping_multiplier(budget: f64, thresholds: &BudgetConfig) -> f64 {
    if budget >= thresholds.upper_threshold {
        1.1
    } else if budget <= thresholds.lower_threshold {
        0.9
    } else {
        1.0
    }
}

/// Engagement with past adaptation and a recent flood both reinforce engagement
pub fn engagement_multiplier(engaged: bool, recent_flood: bool) -> f64 {
    match (engaged, recent_flood) {
        (true, true) => 1.1,
        (true, false) => 1.05,
        (false, true) => 1.05,
        (false, false) => 0.9,
    }
}

/// Households lagging their neighbours feel pressure to catch up
pub fn influence_multiplier(own: f64, neighbour_mean: f64) -> f64 {
    if own < neighbour_mean {
        1.1
    } else {
        0.9
    }
}

/// Rolling record of whether the household adopted a measure in each recent step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdoptionHistory {
    events: VecDeque<u8>,
}

impl Default for AdoptionHistory {
    fn default() -> Self {
        Self {
            events: VecDeque::from(vec![0; ADOPTION_HISTORY_LEN]),
        }
    }
}

impl AdoptionHistory {
    /// Append this step's event, dropping the oldest
    pub fn push(&mut self, adopted: bool) {
        if self.events.len() == ADOPTION_HISTORY_LEN {
            self.events.pop_front();
        }
        self.events.push_back(adopted as u8);
    }

    pub fn mean(&self) -> f64 {
        let total: u32 = self.events.iter().map(|&e| e as u32).sum();
        total as f64 / ADOPTION_HISTORY_LEN as f64
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn factors(values: [f64; 6]) -> MotivationFactors {
        MotivationFactors {
            background: values[0],
            threat_appraisal: values[1],
            coping_appraisal: values[2],
            climate_related_beliefs: values[3],
            preceding_flood_engagement: values[4],
            external_influence: values[5],
        }
    }

    #[test]
    fn test_motivation_is_mean() {
        let f = factors([0.0, 0.2, 0.4, 0.6, 0.8, 1.0]);
        assert!((f.motivation() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_motivation_clamps_out_of_range_factors() {
        assert_eq!(factors([2.0; 6]).motivation(), 1.0);
        assert_eq!(factors([-1.0; 6]).motivation(), 0.0);
    }

    #[test]
    fn test_threat_bands_are_disjoint_and_ordered() {
        let low = threat_band(0.1);
        let mid = threat_band(1.0);
        let high = threat_band(3.0);
        assert!(low.1 <= mid.0);
        assert!(mid.1 <= high.0);
    }

    #[test]
    fn test_engagement_multipliers() {
        assert_eq!(engagement_multiplier(true, true), 1.1);
        assert_eq!(engagement_multiplier(true, false), 1.05);
        assert_eq!(engagement_multiplier(false, true), 1.05);
        assert_eq!(engagement_multiplier(false, false), 0.9);
    }

    #[test]
    fn test_coping_multiplier_bands() {
        let thresholds = BudgetConfig::default();
        assert_eq!(coping_multiplier(8000.0, &thresholds), 1.1);
        assert_eq!(coping_multiplier(5000.0, &thresholds), 1.0);
        assert_eq!(coping_multiplier(3000.0, &thresholds), 0.9);
    }

    #[test]
    fn test_influence_pushes_laggards_up() {
        assert_eq!(influence_multiplier(0.3, 0.6), 1.1);
        assert_eq!(influence_multiplier(0.6, 0.6), 0.9);
    }

    #[test]
    fn test_history_is_fixed_length() {
        let mut history = AdoptionHistory::default();
        assert_eq!(history.len(), ADOPTION_HISTORY_LEN);
        assert_eq!(history.mean(), 0.0);

        for _ in 0..3 {
            history.push(true);
        }
        assert_eq!(history.len(), ADOPTION_HISTORY_LEN);
        assert!((history.mean() - 3.0 / 8.0).abs() < 1e-12);

        for _ in 0..ADOPTION_HISTORY_LEN {
            history.push(false);
        }
        assert_eq!(history.mean(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_motivation_always_in_unit_interval(values in prop::array::uniform6(-5.0f64..5.0)) {
            let m = factors(values).motivation();
            prop_assert!((0.0..=1.0).contains(&m));
        }
    }
}
