//! Model orchestration, metrics and run drivers

pub mod batch;
pub mod events;
pub mod metrics;
pub mod model;
pub mod output;

pub use batch::{run, BatchResult, BatchRunner, Variant};
pub use events::{Event, EventLog, EventType};
pub use metrics::{GovernmentRecord, HouseholdRecord, MetricsLog, MetricsSink, ModelRow, NullSink, StepRecord};
pub use model::AdaptationModel;
pub use output::{RunOutput, RunStats};
