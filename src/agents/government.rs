//! Government agent
//!
//! The government is a steppable participant that embeds a [`FloodPolicy`]
//! decision maker. Each step it estimates flood impact, turns it into a risk
//! score, surveys public concern, decides whether flood management belongs on
//! its agenda, and once it does, picks and builds one infrastructure project.

use ordered_float::OrderedFloat;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::adaptation::status::{ImplementationStatus, Transition};
use crate::agents::infrastructure::InfrastructureOption;
use crate::agents::{SimulationAgent, StepContext};
use crate::core::config::{GovernmentConfig, OrganisationStructure};

/// Concern reported when the government has no way to survey its citizens
pub const NEUTRAL_CONCERN: f64 = 0.0;

/// Where the government stands on flood infrastructure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PolicyPhase {
    NoDecision,
    AgendaPending,
    /// A project was chosen; its construction starts in the same step
    Implementing,
    Implemented,
}

/// Risk band that decides which option the government prefers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskTier {
    /// Build the fastest project
    High,
    /// Build the most protective project
    Medium,
    /// Build the cheapest project
    Low,
}

/// Result of one call to [`FloodPolicy::make_decision`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// Nothing on the agenda and nothing decided
    Idle,
    /// A project was chosen this step
    Chosen { index: usize },
    /// The chosen project moved along its lifecycle
    Advanced(Transition),
    /// On the agenda but the catalog offered nothing to choose
    NoOptionAvailable,
}

/// Agenda-setting and decision logic, independent of how the agent is scheduled
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloodPolicy {
    pub agenda: bool,
    decision: Option<usize>,
    flood_risk_threshold: f64,
    public_concern_threshold: f64,
    high_risk_bound: f64,
    low_risk_bound: f64,
    centralised_delay: u32,
    decentralised_speedup: u32,
}

impl FloodPolicy {
    pub fn new(config: &GovernmentConfig) -> Self {
        Self {
            agenda: false,
            decision: None,
            flood_risk_threshold: config.flood_risk_threshold,
            public_concern_threshold: config.public_concern_threshold,
            high_risk_bound: config.high_risk_bound,
            low_risk_bound: config.low_risk_bound,
            centralised_delay: config.centralised_delay,
            decentralised_speedup: config.decentralised_speedup,
        }
    }

    pub fn decision_made(&self) -> bool {
        self.decision.is_some()
    }

    /// Catalog index of the chosen project
    pub fn decision(&self) -> Option<usize> {
        self.decision
    }

    /// Put flood management on the agenda when risk or concern is high.
    ///
    /// Frozen once a decision has been made.
    pub fn put_on_agenda(&mut self, flood_risk: f64, public_concern: f64) -> bool {
        if self.decision_made() {
            return self.agenda;
        }
        self.agenda =
            flood_risk > self.flood_risk_threshold || public_concern > self.public_concern_threshold;
        self.agenda
    }

    pub fn risk_tier(&self, flood_risk: f64) -> RiskTier {
        if flood_risk >= self.high_risk_bound {
            RiskTier::High
        } else if flood_risk >= self.low_risk_bound {
            RiskTier::Medium
        } else {
            RiskTier::Low
        }
    }

    /// Choose or advance a project
    pub fn make_decision(
        &mut self,
        flood_risk: f64,
        options: &mut [InfrastructureOption],
        structure: OrganisationStructure,
    ) -> DecisionOutcome {
        if let Some(index) = self.decision {
            return match options.get_mut(index) {
                Some(option) => DecisionOutcome::Advanced(option.change_status()),
                None => DecisionOutcome::NoOptionAvailable,
            };
        }
        if !self.agenda {
            return DecisionOutcome::Idle;
        }

        let tier = self.risk_tier(flood_risk);
        let Some(index) = select_option(tier, options) else {
            tracing::warn!(risk = flood_risk, "Flood management on agenda but no infrastructure option available");
            return DecisionOutcome::NoOptionAvailable;
        };

        let option = &mut options[index];
        option.impact_planning(structure, self.centralised_delay, self.decentralised_speedup);
        option.change_status();
        tracing::info!(
            option = %option.name,
            tier = ?tier,
            risk = flood_risk,
            completion_time = option.completion_time,
            "Government decided on infrastructure"
        );

        self.agenda = false;
        self.decision = Some(index);
        DecisionOutcome::Chosen { index }
    }
}

/// First option in catalog order that best fits the risk tier
pub fn select_option(tier: RiskTier, options: &[InfrastructureOption]) -> Option<usize> {
    let indexed = options.iter().enumerate();
    let best = match tier {
        RiskTier::High => indexed.min_by_key(|(_, o)| o.completion_time),
        // max_by_key keeps the last maximum, so walk the catalog backwards
        RiskTier::Medium => indexed.rev().max_by_key(|(_, o)| OrderedFloat(o.protection_level)),
        RiskTier::Low => indexed.min_by_key(|(_, o)| OrderedFloat(o.cost)),
    };
    best.map(|(index, _)| index)
}

#[derive(Debug, Clone)]
pub struct Government {
    pub structure: OrganisationStructure,
    pub survey_capability: bool,
    pub policy: FloodPolicy,
    pub options: Vec<InfrastructureOption>,
    damage_threshold: f64,
    high_impact: [u32; 2],
    low_impact: [u32; 2],
    /// Values from the most recent step, kept for reporting
    pub last_impact: u32,
    pub last_risk: f64,
    pub last_concern: f64,
    pub last_outcome: DecisionOutcome,
}

impl Government {
    pub fn new(config: &GovernmentConfig) -> Self {
        Self {
            structure: config.structure,
            survey_capability: config.survey_capability,
            policy: FloodPolicy::new(config),
            options: config.options.iter().map(InfrastructureOption::from_spec).collect(),
            damage_threshold: config.damage_threshold,
            high_impact: config.high_impact,
            low_impact: config.low_impact,
            last_impact: 0,
            last_risk: 0.0,
            last_concern: 0.0,
            last_outcome: DecisionOutcome::Idle,
        }
    }

    /// Severity of the next flood, judged from the damage just observed
    pub fn estimate_impact(&self, avg_flood_damage: f64, rng: &mut ChaCha8Rng) -> u32 {
        let [low, high] = if avg_flood_damage > self.damage_threshold {
            self.high_impact
        } else {
            self.low_impact
        };
        rng.gen_range(low..=high)
    }

    pub fn assess_risk(&self, flood_probability: f64, impact: u32) -> f64 {
        flood_probability * impact as f64
    }

    pub fn take_survey(&self, public_concern: f64) -> f64 {
        if self.survey_capability {
            public_concern
        } else {
            NEUTRAL_CONCERN
        }
    }

    pub fn put_on_agenda(&mut self, flood_risk: f64, public_concern: f64) -> bool {
        let before = self.policy.agenda;
        let agenda = self.policy.put_on_agenda(flood_risk, public_concern);
        if agenda != before {
            tracing::info!(agenda, risk = flood_risk, concern = public_concern, "Flood agenda changed");
        }
        agenda
    }

    pub fn make_decision(&mut self, flood_risk: f64) -> DecisionOutcome {
        self.policy
            .make_decision(flood_risk, &mut self.options, self.structure)
    }

    /// Whether the chosen project now protects the floodplain
    pub fn implement_decision(&self) -> bool {
        self.decision().is_some_and(InfrastructureOption::is_implemented)
    }

    pub fn decision(&self) -> Option<&InfrastructureOption> {
        self.policy.decision().and_then(|i| self.options.get(i))
    }

    pub fn phase(&self) -> PolicyPhase {
        match self.decision().map(InfrastructureOption::status) {
            Some(ImplementationStatus::Implemented) => PolicyPhase::Implemented,
            Some(_) => PolicyPhase::Implementing,
            None if self.policy.agenda => PolicyPhase::AgendaPending,
            None => PolicyPhase::NoDecision,
        }
    }
}

impl SimulationAgent for Government {
    fn step(&mut self, ctx: &StepContext<'_>, rng: &mut ChaCha8Rng) {
        self.last_impact = self.estimate_impact(ctx.avg_flood_damage, rng);
        self.last_risk = self.assess_risk(ctx.config.flood.probability, self.last_impact);
        self.last_concern = self.take_survey(ctx.avg_public_concern);
        self.put_on_agenda(self.last_risk, self.last_concern);
        self.last_outcome = self.make_decision(self.last_risk);
    }
}
