//! Python bindings for the evo-arcade environments.
//!
//! A Python neuro-evolution loop hands its networks' `activate` methods in
//! as controllers and reads fitness back.
//!
//! # Quick Start
//!
//! ```python
//! import evo_arcade
//!
//! evaluator = evo_arcade.Evaluator(task="jump", seed=1)
//!
//! def eval_genomes(genomes, config):
//!     nets = [neat.nn.FeedForwardNetwork.create(g, config) for _, g in genomes]
//!     scores = evaluator.evaluate_many([net.activate for net in nets])
//!     for (_, genome), score in zip(genomes, scores):
//!         genome.fitness = score
//!
//! fitness, frames = evaluator.record(winner_net.activate)
//! ```

use pyo3::prelude::*;

mod py_controller;
mod py_eval;

pub use py_controller::PyController;
pub use py_eval::PyEvaluator;

/// evo_arcade: 2D fitness environments for neuro-evolution.
#[pymodule]
fn evo_arcade(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyEvaluator>()?;
    Ok(())
}
