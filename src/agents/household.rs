//! Household agent
//!
//! Each step a household refreshes its adaptation motivation, keeps building
//! any measure already under way, may start new measures unlocked by its
//! motivation tier, and then revises its motivation sub-factors from what it
//! experienced. Flood damage is applied from outside by the model.

use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::adaptation::measures::{unlocked_measures, MeasureKind, MeasureSet};
use crate::adaptation::motivation::{
    coping_multiplier, engagement_multiplier, influence_multiplier, threat_band,
    AdoptionHistory, MotivationFactors,
};
use crate::adaptation::status::Transition;
use crate::agents::{SimulationAgent, StepContext};
use crate::core::config::{MeasuresConfig, ModelConfig};
use crate::core::types::{HouseholdId, HousingType, Location, Step};
use crate::environment::damage::basic_flood_damage;
use crate::environment::flood_map::FloodDataProvider;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Household {
    pub id: HouseholdId,
    pub location: Location,
    pub in_floodplain: bool,
    pub housing: HousingType,
    pub budget: f64,
    pub factors: MotivationFactors,
    /// Derived from `factors`; always in [0, 1]
    pub motivation: f64,
    pub measures: MeasureSet,
    pub history: AdoptionHistory,
    /// Cumulative monetary flood losses
    pub financial_loss: f64,
    pub flood_depth_estimated: f64,
    pub flood_damage_estimated: f64,
    pub flood_depth_actual: f64,
    pub flood_damage_actual: f64,
    /// A measure entered implementation this step
    pub is_adapted: bool,
    /// Has adapted and still holds at least one measure
    pub has_adapted: bool,
    /// First step a measure was started; never cleared
    pub first_adapted_at: Option<Step>,
    /// Covered by government infrastructure this step
    pub is_protected: bool,
}

impl Household {
    pub fn new(
        id: HouseholdId,
        location: Location,
        in_floodplain: bool,
        housing: HousingType,
        budget: f64,
        factors: MotivationFactors,
        estimated_depth: f64,
    ) -> Self {
        let flood_depth_estimated = estimated_depth.max(0.0);
        let mut household = Self {
            id,
            location,
            in_floodplain,
            housing,
            budget: budget.max(0.0),
            factors,
            motivation: 0.0,
            measures: MeasureSet::default(),
            history: AdoptionHistory::default(),
            financial_loss: 0.0,
            flood_depth_estimated,
            flood_damage_estimated: basic_flood_damage(flood_depth_estimated),
            flood_depth_actual: 0.0,
            flood_damage_actual: 0.0,
            is_adapted: false,
            has_adapted: false,
            first_adapted_at: None,
            is_protected: false,
        };
        household.determine_motivation();
        household
    }

    /// Draw a fresh household at a random location on the map
    pub fn spawn(
        id: HouseholdId,
        provider: &dyn FloodDataProvider,
        config: &ModelConfig,
        rng: &mut ChaCha8Rng,
    ) -> Self {
        let factors = MotivationFactors {
            background: rng.gen(),
            threat_appraisal: rng.gen(),
            coping_appraisal: rng.gen(),
            climate_related_beliefs: rng.gen(),
            preceding_flood_engagement: rng.gen(),
            external_influence: rng.gen(),
        };
        let budget = rng.gen_range(config.households.min_budget..=config.households.max_budget) as f64;
        let housing = if rng.gen_bool(0.5) {
            HousingType::Detached
        } else {
            HousingType::Attached
        };
        let location = provider.random_location(rng);

        Self::new(
            id,
            location,
            provider.in_floodplain(location),
            housing,
            budget,
            factors,
            provider.estimated_depth(location),
        )
    }

    pub fn determine_motivation(&mut self) -> f64 {
        self.motivation = self.factors.motivation();
        self.motivation
    }

    /// Keep building measures that were already under way when the step began
    pub fn progress_measures(&mut self, measures: &MeasuresConfig) {
        for kind in MeasureKind::ALL {
            let status = self.measures.get_mut(kind);
            if !status.is_implementing() {
                continue;
            }
            let duration = kind.spec(measures).implementation_time;
            if status.advance(duration) == Transition::Completed {
                tracing::debug!(household = self.id.0, measure = kind.name(), "Measure implemented");
            }
        }
    }

    /// Try the measures unlocked by the current motivation, in random order.
    ///
    /// Budget is spent between attempts, so the order decides which measures a
    /// tight budget can cover. Returns how many measures were started.
    pub fn choose_measure(&mut self, config: &ModelConfig, step: Step, rng: &mut ChaCha8Rng) -> usize {
        let mut candidates = unlocked_measures(self.motivation, &config.motivation, self.housing);
        candidates.shuffle(rng);

        let mut started = 0;
        for kind in candidates {
            if self.attempt_measure(kind, &config.measures, rng) {
                started += 1;
            }
        }

        if started > 0 {
            self.has_adapted = true;
            self.first_adapted_at.get_or_insert(step);
        }
        started
    }

    /// Start a measure if it is idle, affordable, and the intention turns into action
    pub fn attempt_measure(&mut self, kind: MeasureKind, measures: &MeasuresConfig, rng: &mut ChaCha8Rng) -> bool {
        let spec = kind.spec(measures);
        if !self.measures.get(kind).is_not_implemented() || self.budget < spec.cost {
            return false;
        }

        let draw: f64 = rng.gen();
        if draw < 1.0 - measures.intention_action_gap {
            return false;
        }

        self.measures.get_mut(kind).advance(spec.implementation_time);
        self.budget -= spec.cost;
        self.is_adapted = true;
        tracing::debug!(
            household = self.id.0,
            measure = kind.name(),
            budget = self.budget,
            "Started implementing measure"
        );
        true
    }

    /// Revise the motivation sub-factors after this step's decision
    pub fn update_motivation_factors(&mut self, ctx: &StepContext<'_>, rng: &mut ChaCha8Rng) {
        let config = ctx.config;

        self.factors.threat_appraisal = if ctx.flood_occurred {
            let (low, high) = threat_band(self.flood_depth_actual);
            rng.gen_range(low..high)
        } else {
            (self.factors.threat_appraisal - config.motivation.threat_decay).max(0.0)
        };

        self.factors.coping_appraisal =
            (self.factors.coping_appraisal * coping_multiplier(self.budget, &config.budget)).min(1.0);

        let engaged = self.history.mean() > rng.gen::<f64>();
        let recency_draw: f64 = rng.gen();
        let recent_flood = ctx.flood_recency.is_some_and(|r| r > recency_draw);
        self.factors.preceding_flood_engagement = (self.factors.preceding_flood_engagement
            * engagement_multiplier(engaged, recent_flood))
        .min(1.0);

        if let Some(neighbour_mean) = ctx.neighbour_motivation {
            self.factors.external_influence = (self.factors.external_influence
                * influence_multiplier(self.motivation, neighbour_mean))
            .min(1.0);
        }

        self.determine_motivation();
    }

    /// Apply an actual flood of `depth` metres.
    ///
    /// Each implemented measure that withstands the depth scales the damage by
    /// `1 - effectiveness`; any measure overtopped by the water is destroyed.
    /// Returns the damage fraction.
    pub fn apply_flood_damage(&mut self, depth: f64, measures: &MeasuresConfig, max_damage_cost: f64) -> f64 {
        self.flood_depth_actual = depth.max(0.0);
        let mut damage = basic_flood_damage(self.flood_depth_actual);

        for kind in MeasureKind::ALL {
            let spec = kind.spec(measures);
            let status = self.measures.get_mut(kind);
            if status.is_not_implemented() {
                continue;
            }
            if self.flood_depth_actual <= spec.protection_level {
                if status.is_implemented() {
                    damage *= 1.0 - spec.effectiveness;
                }
            } else {
                status.reset();
                tracing::debug!(household = self.id.0, measure = kind.name(), "Measure destroyed by flood");
            }
        }

        self.flood_damage_actual = damage;
        let cost = max_damage_cost * damage;
        self.budget = (self.budget - cost).max(0.0);
        self.financial_loss += cost;
        damage
    }

    /// Record that this household stayed dry during a flood
    pub fn clear_flood_exposure(&mut self) {
        self.flood_depth_actual = 0.0;
        self.flood_damage_actual = 0.0;
    }

    pub fn receive_income(&mut self, ctx: &StepContext<'_>, rng: &mut ChaCha8Rng) {
        let [low, high] = ctx.config.economy.income_range();
        let income = if high > low { rng.gen_range(low..high) } else { low };
        self.budget = (self.budget + income).max(0.0);
    }

    /// Ever started a measure during the run
    pub fn ever_adapted(&self) -> bool {
        self.first_adapted_at.is_some()
    }
}

impl SimulationAgent for Household {
    fn step(&mut self, ctx: &StepContext<'_>, rng: &mut ChaCha8Rng) {
        self.is_adapted = false;
        if self.measures.all_not_implemented() {
            self.has_adapted = false;
        }

        self.determine_motivation();
        self.progress_measures(&ctx.config.measures);
        self.choose_measure(ctx.config, ctx.step, rng);
        self.history.push(self.is_adapted);
        self.update_motivation_factors(ctx, rng);
        self.receive_income(ctx, rng);
    }
}
