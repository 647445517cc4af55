//! Population statistics for progress reports and tuning.

use serde::{Deserialize, Serialize};

use crate::episode::EpisodeSummary;

/// Statistics over one evaluated population.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationStats {
    /// Controllers evaluated.
    pub count: usize,

    /// Mean fitness (0 for an empty population).
    pub mean: f64,

    pub min: f64,

    pub max: f64,

    /// Index of the first controller with the highest fitness.
    pub best_index: Option<usize>,

    /// Ticks stepped across all episodes.
    pub total_ticks: u64,

    /// Wall-clock time across all episodes (microseconds).
    pub time_us: u64,
}

impl EvaluationStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Summarise a population's episodes.
    pub fn from_summaries(summaries: &[EpisodeSummary]) -> Self {
        let mut stats = Self::new();
        for summary in summaries {
            stats.push(summary);
        }
        stats
    }

    /// Fold one more episode into the statistics.
    pub fn push(&mut self, summary: &EpisodeSummary) {
        let fitness = summary.fitness;
        if self.count == 0 {
            self.min = fitness;
            self.max = fitness;
            self.best_index = Some(0);
        } else {
            self.min = self.min.min(fitness);
            if fitness > self.max {
                self.max = fitness;
                self.best_index = Some(self.count);
            }
        }
        self.mean += (fitness - self.mean) / (self.count + 1) as f64;
        self.count += 1;
        self.total_ticks += summary.ticks as u64;
        self.time_us += summary.elapsed.as_micros() as u64;
    }

    /// Calculate simulated ticks per second.
    #[must_use]
    pub fn ticks_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.total_ticks as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }

    /// Calculate average episode length.
    #[must_use]
    pub fn avg_ticks(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_ticks as f64 / self.count as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::episode::Termination;

    fn summary(fitness: f64, ticks: usize) -> EpisodeSummary {
        EpisodeSummary {
            fitness,
            ticks,
            termination: Termination::BudgetExhausted,
            elapsed: Duration::from_micros(500),
            tallies: Default::default(),
        }
    }

    #[test]
    fn test_stats_default() {
        let stats = EvaluationStats::new();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.best_index, None);
        assert_eq!(stats.avg_ticks(), 0.0);
        assert_eq!(stats.ticks_per_second(), 0.0);
    }

    #[test]
    fn test_stats_from_summaries() {
        let stats = EvaluationStats::from_summaries(&[
            summary(1.0, 10),
            summary(4.0, 20),
            summary(-2.0, 30),
            summary(4.0, 40),
        ]);

        assert_eq!(stats.count, 4);
        assert!((stats.mean - 1.75).abs() < 1e-12);
        assert_eq!(stats.min, -2.0);
        assert_eq!(stats.max, 4.0);
        // Ties keep the first
        assert_eq!(stats.best_index, Some(1));
        assert_eq!(stats.total_ticks, 100);
        assert_eq!(stats.avg_ticks(), 25.0);
    }

    #[test]
    fn test_stats_ticks_per_second() {
        let mut stats = EvaluationStats::new();
        stats.total_ticks = 1000;
        stats.time_us = 1_000_000;

        assert_eq!(stats.ticks_per_second(), 1000.0);
    }

    #[test]
    fn test_stats_serialization() {
        let stats = EvaluationStats::from_summaries(&[summary(3.0, 5)]);

        let json = serde_json::to_string(&stats).unwrap();
        let deserialized: EvaluationStats = serde_json::from_str(&json).unwrap();

        assert_eq!(stats, deserialized);
    }
}
