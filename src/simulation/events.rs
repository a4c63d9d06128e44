//! Notable simulation events

use serde::{Deserialize, Serialize};

use crate::core::types::Step;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub step: Step,
    pub event_type: EventType,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum EventType {
    FloodShock {
        flooded_households: u32,
        protected_households: u32,
        avg_flood_damage: f64,
    },
    DecisionMade {
        option: String,
        completion_time: u32,
    },
    NoOptionAvailable,
    InfrastructureCompleted {
        option: String,
    },
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventLog {
    pub events: Vec<Event>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, step: Step, event_type: EventType) {
        self.events.push(Event { step, event_type });
    }

    pub fn flood_steps(&self) -> Vec<Step> {
        self.events
            .iter()
            .filter(|e| matches!(e.event_type, EventType::FloodShock { .. }))
            .map(|e| e.step)
            .collect()
    }
}
