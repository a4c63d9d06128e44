//! Run output and serialization

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::agents::PolicyPhase;
use crate::simulation::events::{EventLog, EventType};
use crate::simulation::metrics::{MetricsLog, ModelRow};
use crate::simulation::model::AdaptationModel;

/// Everything produced by a single run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunOutput {
    pub metrics: MetricsLog,
    pub history: EventLog,
    pub statistics: RunStats,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub seed: u64,
    pub steps_simulated: u32,
    pub simulation_time_ms: u64,
    pub households: u32,
    pub floodplain_households: u32,
    pub floods: u32,
    pub total_adapted_households: u32,
    pub total_financial_loss: f64,
    pub final_avg_motivation: f64,
    pub infrastructure: Option<String>,
    pub policy_phase: PolicyPhase,
}

impl RunOutput {
    pub fn new(model: &AdaptationModel, metrics: MetricsLog, steps: u32, elapsed: Duration) -> Self {
        let floods = model
            .history
            .events
            .iter()
            .filter(|e| matches!(e.event_type, EventType::FloodShock { .. }))
            .count() as u32;

        let last = metrics.last().map(ModelRow::from);

        Self {
            statistics: RunStats {
                seed: model.config().seed,
                steps_simulated: steps,
                simulation_time_ms: elapsed.as_millis() as u64,
                households: model.households.len() as u32,
                floodplain_households: model.floodplain_population().len() as u32,
                floods,
                total_adapted_households: last.map_or(0, |r| r.total_adapted_households),
                total_financial_loss: model.households.iter().map(|h| h.financial_loss).sum(),
                final_avg_motivation: last.map_or(0.0, |r| r.avg_motivation),
                infrastructure: model.government.decision().map(|o| o.name.clone()),
                policy_phase: model.government.phase(),
            },
            history: model.history.clone(),
            metrics,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn summary(&self) -> String {
        let s = &self.statistics;
        format!(
            "Simulated {} steps in {}ms (seed {})\n{} households, {} in floodplain, {} floods\n{} adapted, total loss {:.0}, infrastructure: {} ({:?})",
            s.steps_simulated,
            s.simulation_time_ms,
            s.seed,
            s.households,
            s.floodplain_households,
            s.floods,
            s.total_adapted_households,
            s.total_financial_loss,
            s.infrastructure.as_deref().unwrap_or("none"),
            s.policy_phase,
        )
    }
}
