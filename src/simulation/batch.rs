//! Single runs and parallel parameter sweeps
//!
//! Each run owns its own model and generator, so runs are independent and a
//! sweep can be spread over rayon's pool without changing any run's results.

use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::core::config::ModelConfig;
use crate::core::error::Result;
use crate::simulation::metrics::{MetricsLog, ModelRow};
use crate::simulation::model::AdaptationModel;
use crate::simulation::output::RunOutput;

/// Build a model from `config`, run it for `steps` and collect everything
pub fn run(config: ModelConfig, steps: u32) -> Result<RunOutput> {
    let start = Instant::now();
    let mut model = AdaptationModel::new(config)?;
    let mut metrics = MetricsLog::new();
    model.run(steps, &mut metrics);
    Ok(RunOutput::new(&model, metrics, steps, start.elapsed()))
}

/// A named configuration in a sweep
#[derive(Debug, Clone)]
pub struct Variant {
    pub name: String,
    pub config: ModelConfig,
}

impl Variant {
    pub fn new(name: impl Into<String>, config: ModelConfig) -> Self {
        Self {
            name: name.into(),
            config,
        }
    }
}

/// Final metrics of one run in a sweep
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub variant: String,
    pub iteration: u32,
    pub seed: u64,
    pub steps: u32,
    pub final_metrics: Option<ModelRow>,
    pub floods: u32,
    pub infrastructure: Option<String>,
}

/// Runs every variant `iterations` times, seeding iteration `i` with `base_seed + i`
#[derive(Debug, Clone)]
pub struct BatchRunner {
    pub variants: Vec<Variant>,
    pub iterations: u32,
    pub steps: u32,
    pub base_seed: u64,
}

impl BatchRunner {
    pub fn new(variants: Vec<Variant>, iterations: u32, steps: u32, base_seed: u64) -> Self {
        Self {
            variants,
            iterations,
            steps,
            base_seed,
        }
    }

    /// Number of runs the sweep will perform
    pub fn run_count(&self) -> usize {
        self.variants.len() * self.iterations as usize
    }

    /// Execute the sweep in parallel. Results come back in variant-major order.
    pub fn run(&self) -> Result<Vec<BatchResult>> {
        let jobs: Vec<(&Variant, u32)> = self
            .variants
            .iter()
            .flat_map(|v| (0..self.iterations).map(move |i| (v, i)))
            .collect();

        tracing::info!(runs = jobs.len(), steps = self.steps, "Starting batch");

        jobs.into_par_iter()
            .map(|(variant, iteration)| -> Result<BatchResult> {
                let mut config = variant.config.clone();
                config.seed = self.base_seed + iteration as u64;
                let seed = config.seed;
                let output = run(config, self.steps)?;
                tracing::debug!(variant = %variant.name, iteration, seed, "Run finished");

                Ok(BatchResult {
                    variant: variant.name.clone(),
                    iteration,
                    seed,
                    steps: self.steps,
                    final_metrics: output.metrics.last().map(ModelRow::from),
                    floods: output.statistics.floods,
                    infrastructure: output.statistics.infrastructure,
                })
            })
            .collect()
    }
}
