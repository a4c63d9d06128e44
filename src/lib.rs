//! Flood Adapt - agent-based household flood adaptation model
//!
//! Households on a social network weigh up protective measures against
//! recurring floods while a government agent decides whether to build
//! shared infrastructure. [`simulation::AdaptationModel`] drives them.

pub mod adaptation;
pub mod agents;
pub mod core;
pub mod environment;
pub mod simulation;

pub use crate::core::{FloodError, ModelConfig, Result};
pub use crate::simulation::{run, AdaptationModel, BatchRunner, MetricsLog, RunOutput};
