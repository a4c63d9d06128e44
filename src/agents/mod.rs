//! Simulation participants
//!
//! Households and the government share one scheduling contract,
//! [`SimulationAgent`], and read model-level state through a [`StepContext`].

pub mod government;
pub mod household;
pub mod infrastructure;

use rand_chacha::ChaCha8Rng;

use crate::core::config::ModelConfig;
use crate::core::types::Step;

pub use government::{DecisionOutcome, FloodPolicy, Government, PolicyPhase};
pub use household::Household;
pub use infrastructure::InfrastructureOption;

/// Read-only view of model state handed to an agent when it is activated
#[derive(Debug, Clone, Copy)]
pub struct StepContext<'a> {
    pub config: &'a ModelConfig,
    pub step: Step,
    /// A flood shock happened earlier in this step
    pub flood_occurred: bool,
    /// `1 - steps_since_last_flood / horizon`; `None` before the first flood
    pub flood_recency: Option<f64>,
    pub avg_flood_damage: f64,
    pub avg_public_concern: f64,
    /// Mean motivation of the activated household's neighbours, if it has any
    pub neighbour_motivation: Option<f64>,
}

/// Anything the scheduler activates once per step
pub trait SimulationAgent {
    fn step(&mut self, ctx: &StepContext<'_>, rng: &mut ChaCha8Rng);
}
