//! Simulation configuration with documented defaults
//!
//! Every tunable parameter of the model lives in [`ModelConfig`]. The structure
//! is immutable once a model is built and is handed by reference to every
//! component that needs it. Sections carry `#[serde(default)]` so a scenario
//! file only has to list what it changes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use crate::core::error::{FloodError, Result};

// === CATEGORICAL CHOICES ===

/// Social network topology between households
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkKind {
    ErdosRenyi,
    BarabasiAlbert,
    WattsStrogatz,
    NoNetwork,
}

impl FromStr for NetworkKind {
    type Err = FloodError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "erdos_renyi" => Ok(Self::ErdosRenyi),
            "barabasi_albert" => Ok(Self::BarabasiAlbert),
            "watts_strogatz" => Ok(Self::WattsStrogatz),
            "no_network" => Ok(Self::NoNetwork),
            other => Err(FloodError::UnknownNetwork(other.to_string())),
        }
    }
}

impl fmt::Display for NetworkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ErdosRenyi => "erdos_renyi",
            Self::BarabasiAlbert => "barabasi_albert",
            Self::WattsStrogatz => "watts_strogatz",
            Self::NoNetwork => "no_network",
        };
        f.write_str(name)
    }
}

/// Which flood map the spatial provider loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FloodMapChoice {
    #[serde(rename = "harvey")]
    Harvey,
    #[serde(rename = "100yr")]
    Year100,
    #[serde(rename = "500yr")]
    Year500,
}

impl FromStr for FloodMapChoice {
    type Err = FloodError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "harvey" => Ok(Self::Harvey),
            "100yr" => Ok(Self::Year100),
            "500yr" => Ok(Self::Year500),
            other => Err(FloodError::UnknownFloodMap(other.to_string())),
        }
    }
}

impl fmt::Display for FloodMapChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Harvey => "harvey",
            Self::Year100 => "100yr",
            Self::Year500 => "500yr",
        };
        f.write_str(name)
    }
}

/// Organisational structure of the government
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrganisationStructure {
    /// Federal / state level: longer procedures
    Centralised,
    /// Regional level: shorter procedures
    Decentralised,
}

impl FromStr for OrganisationStructure {
    type Err = FloodError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "centralised" => Ok(Self::Centralised),
            "decentralised" => Ok(Self::Decentralised),
            other => Err(FloodError::UnknownStructure(other.to_string())),
        }
    }
}

/// Macro-economic state driving household income
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EconomicState {
    Growth,
    #[default]
    Neutral,
    Recession,
}

impl FromStr for EconomicState {
    type Err = FloodError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "growth" => Ok(Self::Growth),
            "neutral" => Ok(Self::Neutral),
            "recession" => Ok(Self::Recession),
            other => Err(FloodError::InvalidConfig(format!(
                "unknown economic state '{}', expected 'growth', 'neutral' or 'recession'",
                other
            ))),
        }
    }
}

/// How households read their neighbours' motivation during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InfluenceMode {
    /// Every household reads motivations as they were when the agent phase began
    #[default]
    Snapshot,
    /// Households read live values, so earlier activations cascade into later ones
    Sequential,
}

// === SECTIONS ===

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdConfig {
    /// Number of household agents (one per network node)
    pub count: u32,
    /// Inclusive bounds of the initial budget draw
    pub min_budget: u32,
    pub max_budget: u32,
}

impl Default for HouseholdConfig {
    fn default() -> Self {
        Self {
            count: 100,
            min_budget: 1000,
            max_budget: 7000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub kind: NetworkKind,
    /// Rewiring probability for Watts-Strogatz
    pub connection_probability: f64,
    /// Edges attached per new node for Barabasi-Albert
    pub edges: u32,
    /// Ring neighbours for Watts-Strogatz; expected degree for Erdos-Renyi
    pub nearest_neighbours: u32,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            kind: NetworkKind::WattsStrogatz,
            connection_probability: 0.4,
            edges: 3,
            nearest_neighbours: 5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FloodConfig {
    pub map: FloodMapChoice,
    /// Chance of a flood shock per step once the warm-up has passed
    pub probability: f64,
    /// Steps before any flood shock can occur
    pub warmup_steps: u32,
    /// Actual depth is drawn as `[min, max) * estimated depth`
    pub depth_factor_min: f64,
    pub depth_factor_max: f64,
    /// Steps after which a flood no longer counts as recent
    pub recency_horizon: u32,
    /// Repair cost of a fully destroyed house
    pub max_damage_cost: f64,
}

impl Default for FloodConfig {
    fn default() -> Self {
        Self {
            map: FloodMapChoice::Harvey,
            // 12 floods in 41 years in Houston
            probability: 0.2,
            warmup_steps: 5,
            depth_factor_min: 0.5,
            depth_factor_max: 1.2,
            recency_horizon: 20,
            max_damage_cost: 5000.0,
        }
    }
}

/// Cost, duration, and protection of one structural household measure
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasureSpec {
    pub cost: f64,
    /// Steps spent implementing before the measure protects
    pub implementation_time: u32,
    /// Highest inundation depth (m) the measure withstands
    pub protection_level: f64,
    /// Fraction of damage removed while the measure holds
    pub effectiveness: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasuresConfig {
    /// `1 - gap` is the draw a motivated household must reach to act
    pub intention_action_gap: f64,
    pub elevation: MeasureSpec,
    pub wet_proofing: MeasureSpec,
    pub dry_proofing: MeasureSpec,
}

impl Default for MeasuresConfig {
    fn default() -> Self {
        Self {
            intention_action_gap: 0.3,
            elevation: MeasureSpec {
                cost: 5000.0,
                implementation_time: 4,
                protection_level: 0.3,
                effectiveness: 1.0,
            },
            wet_proofing: MeasureSpec {
                cost: 3000.0,
                implementation_time: 2,
                protection_level: 3.0,
                effectiveness: 0.4,
            },
            dry_proofing: MeasureSpec {
                cost: 1500.0,
                implementation_time: 1,
                protection_level: 1.0,
                effectiveness: 0.85,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MotivationConfig {
    /// Unlocks dry-proofing
    pub low_threshold: f64,
    /// Unlocks wet-proofing
    pub medium_threshold: f64,
    /// Unlocks elevation
    pub high_threshold: f64,
    /// Per-step decline of threat appraisal without a flood
    pub threat_decay: f64,
    pub influence_mode: InfluenceMode,
}

impl Default for MotivationConfig {
    fn default() -> Self {
        Self {
            low_threshold: 0.6,
            medium_threshold: 0.7,
            high_threshold: 0.8,
            threat_decay: 0.02,
            influence_mode: InfluenceMode::Snapshot,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// At or above this budget coping appraisal grows
    pub upper_threshold: f64,
    /// At or below this budget coping appraisal shrinks
    pub lower_threshold: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            upper_threshold: 7000.0,
            lower_threshold: 3000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    pub state: EconomicState,
    /// Per-step income bounds `[min, max)` for each economic state
    pub growth_income: [f64; 2],
    pub neutral_income: [f64; 2],
    pub recession_income: [f64; 2],
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            state: EconomicState::Neutral,
            growth_income: [500.0, 1000.0],
            neutral_income: [250.0, 750.0],
            recession_income: [0.0, 400.0],
        }
    }
}

impl EconomyConfig {
    pub fn income_range(&self) -> [f64; 2] {
        match self.state {
            EconomicState::Growth => self.growth_income,
            EconomicState::Neutral => self.neutral_income,
            EconomicState::Recession => self.recession_income,
        }
    }
}

/// Catalog entry for a government infrastructure project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InfrastructureSpec {
    pub name: String,
    pub cost: f64,
    pub completion_time: u32,
    /// Fraction of the floodplain population covered once built
    pub protection_level: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernmentConfig {
    pub structure: OrganisationStructure,
    /// Whether the government can survey public concern
    pub survey_capability: bool,
    pub flood_risk_threshold: f64,
    pub public_concern_threshold: f64,
    /// Average damage above which the impact estimate is drawn from the high range
    pub damage_threshold: f64,
    /// Risk at or above this prefers the fastest option
    pub high_risk_bound: f64,
    /// Risk at or above this (and below high) prefers the most protective option
    pub low_risk_bound: f64,
    /// Inclusive impact severity ranges
    pub high_impact: [u32; 2],
    pub low_impact: [u32; 2],
    /// Steps added to a project's completion time under a centralised government
    pub centralised_delay: u32,
    /// Steps removed from a project's completion time under a decentralised government
    pub decentralised_speedup: u32,
    pub options: Vec<InfrastructureSpec>,
}

impl Default for GovernmentConfig {
    fn default() -> Self {
        Self {
            structure: OrganisationStructure::Centralised,
            survey_capability: true,
            flood_risk_threshold: 1.5,
            public_concern_threshold: 0.6,
            damage_threshold: 0.1,
            high_risk_bound: 1.5,
            low_risk_bound: 0.75,
            high_impact: [4, 8],
            low_impact: [1, 3],
            centralised_delay: 4,
            decentralised_speedup: 4,
            options: vec![
                InfrastructureSpec {
                    name: "Dyke".into(),
                    cost: 8.0,
                    completion_time: 5,
                    protection_level: 0.5,
                },
                InfrastructureSpec {
                    name: "Wetland".into(),
                    cost: 5.0,
                    completion_time: 2,
                    protection_level: 0.5,
                },
            ],
        }
    }
}

// === TOP LEVEL ===

/// Complete model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Seed for the single shared random generator
    pub seed: u64,
    pub households: HouseholdConfig,
    pub network: NetworkConfig,
    pub flood: FloodConfig,
    pub measures: MeasuresConfig,
    pub motivation: MotivationConfig,
    pub budget: BudgetConfig,
    pub economy: EconomyConfig,
    pub government: GovernmentConfig,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            households: HouseholdConfig::default(),
            network: NetworkConfig::default(),
            flood: FloodConfig::default(),
            measures: MeasuresConfig::default(),
            motivation: MotivationConfig::default(),
            budget: BudgetConfig::default(),
            economy: EconomyConfig::default(),
            government: GovernmentConfig::default(),
        }
    }
}

impl ModelConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a scenario from TOML and validate it
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: ModelConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a scenario file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(FloodError::InvalidConfig(msg));

        if self.households.count == 0 {
            return invalid("households.count must be at least 1".into());
        }
        if self.households.min_budget > self.households.max_budget {
            return invalid(format!(
                "households.min_budget ({}) exceeds max_budget ({})",
                self.households.min_budget, self.households.max_budget
            ));
        }

        for (name, p) in [
            ("flood.probability", self.flood.probability),
            ("network.connection_probability", self.network.connection_probability),
            ("measures.intention_action_gap", self.measures.intention_action_gap),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return invalid(format!("{} ({}) must be within [0, 1]", name, p));
            }
        }

        if self.flood.depth_factor_min > self.flood.depth_factor_max {
            return invalid("flood.depth_factor_min exceeds depth_factor_max".into());
        }
        if self.flood.recency_horizon == 0 {
            return invalid("flood.recency_horizon must be positive".into());
        }
        if self.flood.max_damage_cost < 0.0 {
            return invalid("flood.max_damage_cost must not be negative".into());
        }

        let m = &self.motivation;
        if !(m.low_threshold <= m.medium_threshold && m.medium_threshold <= m.high_threshold) {
            return invalid(format!(
                "motivation thresholds must be ordered low <= medium <= high ({}, {}, {})",
                m.low_threshold, m.medium_threshold, m.high_threshold
            ));
        }

        if self.budget.lower_threshold > self.budget.upper_threshold {
            return invalid(format!(
                "budget.lower_threshold ({}) exceeds upper_threshold ({})",
                self.budget.lower_threshold, self.budget.upper_threshold
            ));
        }

        for (name, spec) in [
            ("elevation", &self.measures.elevation),
            ("wet_proofing", &self.measures.wet_proofing),
            ("dry_proofing", &self.measures.dry_proofing),
        ] {
            if spec.implementation_time == 0 {
                return invalid(format!("{}.implementation_time must be positive", name));
            }
            if spec.cost < 0.0 {
                return invalid(format!("{}.cost must not be negative", name));
            }
            if !(0.0..=1.0).contains(&spec.effectiveness) {
                return invalid(format!("{}.effectiveness must be within [0, 1]", name));
            }
        }

        for range in [
            self.economy.growth_income,
            self.economy.neutral_income,
            self.economy.recession_income,
        ] {
            if range[0] > range[1] {
                return invalid(format!("income range {:?} is inverted", range));
            }
            if range[0] < 0.0 {
                return invalid(format!("income range {:?} must not be negative", range));
            }
        }

        let g = &self.government;
        if g.low_risk_bound > g.high_risk_bound {
            return invalid("government.low_risk_bound exceeds high_risk_bound".into());
        }
        if g.high_impact[0] > g.high_impact[1] || g.low_impact[0] > g.low_impact[1] {
            return invalid("government impact ranges must be ordered [min, max]".into());
        }
        for option in &g.options {
            if !(0.0..=1.0).contains(&option.protection_level) {
                return invalid(format!(
                    "option '{}' protection_level must be within [0, 1]",
                    option.name
                ));
            }
        }

        let n = self.households.count;
        match self.network.kind {
            NetworkKind::BarabasiAlbert => {
                if self.network.edges == 0 || self.network.edges >= n {
                    return invalid(format!(
                        "barabasi_albert needs 1 <= edges < households ({} vs {})",
                        self.network.edges, n
                    ));
                }
            }
            NetworkKind::WattsStrogatz => {
                if self.network.nearest_neighbours >= n {
                    return invalid(format!(
                        "watts_strogatz needs nearest_neighbours < households ({} vs {})",
                        self.network.nearest_neighbours, n
                    ));
                }
            }
            NetworkKind::ErdosRenyi | NetworkKind::NoNetwork => {}
        }

        Ok(())
    }
}
