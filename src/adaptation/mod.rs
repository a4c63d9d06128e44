//! Household adaptation building blocks
//!
//! Measure status lifecycle, the measure catalogue, and the motivation model.

pub mod measures;
pub mod motivation;
pub mod status;

pub use measures::{unlocked_measures, MeasureKind, MeasureSet};
pub use motivation::{AdoptionHistory, MotivationFactors};
pub use status::{ImplementationStatus, Transition};
