//! The search-loop boundary.
//!
//! ## Overview
//!
//! - **evaluate**: one controller, one episode, final fitness
//! - **Evaluator**: a whole generation, seeded per slot, with progress
//!   logging and replay recording
//! - **EvaluationStats**: mean/min/max fitness and throughput
//!
//! ## Usage
//!
//! ```rust,ignore
//! let evaluator = Evaluator::new(RunConfig::from_json_str(json)?)?;
//! let fitness = evaluator.evaluate_population(&genomes)?;
//! let (summary, frames) = evaluator.record(&genomes[best], best)?;
//! ```

pub mod evaluator;
pub mod stats;

pub use evaluator::{evaluate, Evaluator};
pub use stats::EvaluationStats;
