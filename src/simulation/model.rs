//! The adaptation model
//!
//! [`AdaptationModel`] owns every agent, the social network and the flood map,
//! and drives them through one step at a time. Per step it samples
//! infrastructure protection, resolves a possible flood shock, refreshes the
//! aggregates agents read, activates agents in a shuffled order and finally
//! hands the step's metrics to a [`MetricsSink`].

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::agents::{DecisionOutcome, Government, Household, SimulationAgent, StepContext};
use crate::core::config::{InfluenceMode, ModelConfig};
use crate::core::error::Result;
use crate::core::types::{mean_or_zero, HouseholdId, Step};
use crate::environment::{FloodDataProvider, SocialNetwork, SyntheticFloodMap};
use crate::simulation::events::{EventLog, EventType};
use crate::simulation::metrics::{GovernmentRecord, HouseholdRecord, MetricsSink, StepRecord};

/// Who gets activated in the agent phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Activation {
    Household(usize),
    Government,
}

pub struct AdaptationModel {
    config: ModelConfig,
    network: SocialNetwork,
    flood_map: Box<dyn FloodDataProvider>,
    rng: ChaCha8Rng,
    pub households: Vec<Household>,
    pub government: Government,
    pub history: EventLog,
    step: Step,
    last_flood: Option<Step>,
    flood_recency: Option<f64>,
    flood_occurred: bool,
    avg_flood_damage: f64,
    avg_public_concern: f64,
    infrastructure_active: bool,
}

impl AdaptationModel {
    /// Build a model on the synthetic map named in the config
    pub fn new(config: ModelConfig) -> Result<Self> {
        let flood_map = Box::new(SyntheticFloodMap::new(config.flood.map));
        Self::with_provider(config, flood_map)
    }

    /// Build a model on an arbitrary flood data provider
    pub fn with_provider(config: ModelConfig, flood_map: Box<dyn FloodDataProvider>) -> Result<Self> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let count = config.households.count as usize;
        let network = SocialNetwork::generate(&config.network, count, &mut rng);

        let households: Vec<Household> = (0..count)
            .map(|i| Household::spawn(HouseholdId::new(i as u32), flood_map.as_ref(), &config, &mut rng))
            .collect();
        let government = Government::new(&config.government);

        let in_floodplain = households.iter().filter(|h| h.in_floodplain).count();
        tracing::info!(
            seed = config.seed,
            households = count,
            floodplain = in_floodplain,
            network = %config.network.kind,
            edges = network.edge_count(),
            flood_map = %config.flood.map,
            "Initialised adaptation model"
        );

        Ok(Self {
            config,
            network,
            flood_map,
            rng,
            households,
            government,
            history: EventLog::new(),
            step: 0,
            last_flood: None,
            flood_recency: None,
            flood_occurred: false,
            avg_flood_damage: 0.0,
            avg_public_concern: 0.0,
            infrastructure_active: false,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn network(&self) -> &SocialNetwork {
        &self.network
    }

    pub fn flood_map(&self) -> &dyn FloodDataProvider {
        self.flood_map.as_ref()
    }

    /// Number of completed steps
    pub fn current_step(&self) -> Step {
        self.step
    }

    pub fn last_flood(&self) -> Option<Step> {
        self.last_flood
    }

    pub fn flood_recency(&self) -> Option<f64> {
        self.flood_recency
    }

    pub fn avg_flood_damage(&self) -> f64 {
        self.avg_flood_damage
    }

    pub fn avg_public_concern(&self) -> f64 {
        self.avg_public_concern
    }

    pub fn infrastructure_active(&self) -> bool {
        self.infrastructure_active
    }

    /// Indices of households living inside the floodplain
    pub fn floodplain_population(&self) -> Vec<usize> {
        self.households
            .iter()
            .enumerate()
            .filter(|(_, h)| h.in_floodplain)
            .map(|(i, _)| i)
            .collect()
    }

    /// Advance the model by one step
    pub fn step(&mut self, sink: &mut dyn MetricsSink) {
        self.assign_protection();

        self.flood_occurred = false;
        self.avg_flood_damage = 0.0;
        if self.step >= self.config.flood.warmup_steps {
            let draw: f64 = self.rng.gen();
            let probability = self.config.flood.probability;
            if probability > 0.0 && draw <= probability {
                self.flood_shock();
            }
        }

        self.avg_public_concern =
            mean_or_zero(self.households.iter().map(|h| h.factors.threat_appraisal));

        let horizon = self.config.flood.recency_horizon as f64;
        self.flood_recency = self
            .last_flood
            .map(|last| 1.0 - (self.step - last) as f64 / horizon);

        self.activate_agents();

        let record = self.collect_metrics();
        sink.record(&record);

        self.step += 1;
    }

    /// Run `steps` consecutive steps
    pub fn run(&mut self, steps: u32, sink: &mut dyn MetricsSink) {
        for _ in 0..steps {
            self.step(sink);
        }
    }

    /// Redraw which floodplain households the infrastructure shields this step
    fn assign_protection(&mut self) {
        for household in &mut self.households {
            household.is_protected = false;
        }
        if !self.infrastructure_active {
            return;
        }
        let Some(protection_level) = self.government.decision().map(|o| o.protection_level) else {
            return;
        };

        let floodplain = self.floodplain_population();
        let amount = ((protection_level * floodplain.len() as f64).floor() as usize).min(floodplain.len());
        let chosen: Vec<usize> = floodplain
            .choose_multiple(&mut self.rng, amount)
            .copied()
            .collect();
        for index in chosen {
            self.households[index].is_protected = true;
        }
    }

    fn flood_shock(&mut self) {
        self.last_flood = Some(self.step);
        self.flood_occurred = true;

        let flood = &self.config.flood;
        let (min_factor, max_factor) = (flood.depth_factor_min, flood.depth_factor_max);
        let mut floodplain_size = 0u32;
        let mut flooded = 0u32;
        let mut protected = 0u32;
        let mut total_damage = 0.0;

        for household in &mut self.households {
            if household.in_floodplain {
                floodplain_size += 1;
            }
            if household.in_floodplain && !household.is_protected {
                let factor = if max_factor > min_factor {
                    self.rng.gen_range(min_factor..max_factor)
                } else {
                    min_factor
                };
                let depth = factor * household.flood_depth_estimated;
                total_damage +=
                    household.apply_flood_damage(depth, &self.config.measures, flood.max_damage_cost);
                flooded += 1;
            } else {
                if household.is_protected {
                    protected += 1;
                }
                household.clear_flood_exposure();
            }
        }

        self.avg_flood_damage = if floodplain_size == 0 {
            0.0
        } else {
            total_damage / floodplain_size as f64
        };

        tracing::info!(
            step = self.step,
            flooded,
            protected,
            avg_damage = self.avg_flood_damage,
            "Flood shock"
        );
        self.history.push(
            self.step,
            EventType::FloodShock {
                flooded_households: flooded,
                protected_households: protected,
                avg_flood_damage: self.avg_flood_damage,
            },
        );
    }

    fn activate_agents(&mut self) {
        let mut order: Vec<Activation> = (0..self.households.len())
            .map(Activation::Household)
            .chain(std::iter::once(Activation::Government))
            .collect();
        order.shuffle(&mut self.rng);

        let snapshot: Option<Vec<f64>> = match self.config.motivation.influence_mode {
            InfluenceMode::Snapshot => Some(self.households.iter().map(|h| h.motivation).collect()),
            InfluenceMode::Sequential => None,
        };

        let base = StepContext {
            config: &self.config,
            step: self.step,
            flood_occurred: self.flood_occurred,
            flood_recency: self.flood_recency,
            avg_flood_damage: self.avg_flood_damage,
            avg_public_concern: self.avg_public_concern,
            neighbour_motivation: None,
        };

        for activation in order {
            match activation {
                Activation::Household(index) => {
                    let neighbour_motivation =
                        neighbour_mean(&self.network, &self.households, snapshot.as_deref(), index);
                    let ctx = StepContext {
                        neighbour_motivation,
                        ..base
                    };
                    self.households[index].step(&ctx, &mut self.rng);
                }
                Activation::Government => {
                    let previous = self.government.last_outcome;
                    self.government.step(&base, &mut self.rng);

                    match self.government.last_outcome {
                        DecisionOutcome::Chosen { .. } => {
                            if let Some(option) = self.government.decision() {
                                self.history.push(
                                    self.step,
                                    EventType::DecisionMade {
                                        option: option.name.clone(),
                                        completion_time: option.completion_time,
                                    },
                                );
                            }
                        }
                        DecisionOutcome::NoOptionAvailable
                            if previous != DecisionOutcome::NoOptionAvailable =>
                        {
                            self.history.push(self.step, EventType::NoOptionAvailable);
                        }
                        _ => {}
                    }

                    if !self.infrastructure_active && self.government.implement_decision() {
                        self.infrastructure_active = true;
                        if let Some(option) = self.government.decision() {
                            tracing::info!(step = self.step, option = %option.name, "Infrastructure completed");
                            self.history.push(
                                self.step,
                                EventType::InfrastructureCompleted {
                                    option: option.name.clone(),
                                },
                            );
                        }
                    }
                }
            }
        }
    }

    /// Metrics describing the model as it stands
    pub fn collect_metrics(&self) -> StepRecord {
        let count = |pred: fn(&Household) -> bool| self.households.iter().filter(|h| pred(h)).count() as u32;

        StepRecord {
            step: self.step,
            adapted_households: count(|h| h.is_adapted),
            total_adapted_households: count(Household::ever_adapted),
            protected_households: count(|h| h.is_protected),
            avg_flood_damage: self.avg_flood_damage,
            avg_public_concern: self.avg_public_concern,
            avg_motivation: mean_or_zero(self.households.iter().map(|h| h.motivation)),
            infrastructure_active: self.infrastructure_active,
            flood_occurred: self.flood_occurred,
            households: self.households.iter().map(HouseholdRecord::from).collect(),
            government: GovernmentRecord::from(&self.government),
        }
    }
}

/// Mean motivation of a household's neighbours, read from `snapshot` when
/// given and from the live households otherwise. `None` without neighbours.
fn neighbour_mean(
    network: &SocialNetwork,
    households: &[Household],
    snapshot: Option<&[f64]>,
    index: usize,
) -> Option<f64> {
    let neighbours = network.neighbors(index);
    if neighbours.is_empty() {
        return None;
    }
    Some(match snapshot {
        Some(motivations) => mean_or_zero(neighbours.iter().map(|&j| motivations[j])),
        None => mean_or_zero(neighbours.iter().map(|&j| households[j].motivation)),
    })
}
