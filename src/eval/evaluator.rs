//! Fitness evaluation for an external search loop.

use tracing::{debug, info};

use crate::controller::Controller;
use crate::core::{Result, RunConfig};
use crate::episode::{Episode, EpisodeSummary, FrameRecorder};

use super::stats::EvaluationStats;

/// Run one episode of `config` and return its final fitness.
///
/// The tick budget is `config.episode.max_ticks`; the seed is `config.seed`.
pub fn evaluate<C: Controller + ?Sized>(controller: &C, config: &RunConfig) -> Result<f64> {
    let mut episode = Episode::from_config(config, config.seed)?;
    Ok(episode.run(controller, None)?.fitness)
}

/// Evaluates controllers against one validated run configuration.
///
/// Every evaluation builds a fresh environment, so no state leaks between
/// controllers. Controller `i` of a population runs with seed `seed + i`.
#[derive(Clone, Debug)]
pub struct Evaluator {
    config: RunConfig,
}

impl Evaluator {
    /// Create an evaluator after validating `config`.
    pub fn new(config: RunConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    fn seed_for(&self, index: usize) -> u64 {
        self.config.seed.wrapping_add(index as u64)
    }

    /// Run one episode with the seed for population slot `index`.
    pub fn evaluate<C: Controller + ?Sized>(
        &self,
        controller: &C,
        index: usize,
    ) -> Result<EpisodeSummary> {
        let mut episode = Episode::from_config(&self.config, self.seed_for(index))?;
        episode.run(controller, None)
    }

    /// Run every controller and return full summaries, in order.
    ///
    /// Stops at the first controller error.
    pub fn run_population<C: Controller>(&self, controllers: &[C]) -> Result<Vec<EpisodeSummary>> {
        let total = controllers.len();
        let mut summaries = Vec::with_capacity(total);

        for (i, controller) in controllers.iter().enumerate() {
            let summary = self.evaluate(controller, i)?;
            debug!(
                index = i,
                fitness = summary.fitness,
                percent = (i + 1) * 100 / total,
                "controller evaluated"
            );
            summaries.push(summary);
        }

        let stats = EvaluationStats::from_summaries(&summaries);
        info!(
            task = self.config.task.name(),
            count = stats.count,
            mean = stats.mean,
            max = stats.max,
            best = ?stats.best_index,
            ticks_per_second = stats.ticks_per_second(),
            "population evaluated"
        );
        Ok(summaries)
    }

    /// Fitness of every controller, in order.
    pub fn evaluate_population<C: Controller>(&self, controllers: &[C]) -> Result<Vec<f64>> {
        Ok(self
            .run_population(controllers)?
            .into_iter()
            .map(|s| s.fitness)
            .collect())
    }

    /// Replay slot `index` while recording a frame per tick.
    pub fn record<C: Controller + ?Sized>(
        &self,
        controller: &C,
        index: usize,
    ) -> Result<(EpisodeSummary, FrameRecorder)> {
        let mut recorder = FrameRecorder::new(self.config.episode.frame_rate);
        let mut episode = Episode::from_config(&self.config, self.seed_for(index))?;
        let summary = episode.run(controller, Some(&mut recorder))?;
        Ok((summary, recorder))
    }
}
