//! # evo-arcade
//!
//! Small 2D simulation tasks used as fitness environments for an external
//! neuro-evolution loop.
//!
//! ## Design Principles
//!
//! 1. **Controller-Agnostic**: A controller is any function from a sensor
//!    vector to an output vector. The search algorithm and the network
//!    forward pass live outside this crate.
//!
//! 2. **Deterministic**: Every random draw comes from a seeded `SimRng`
//!    stream, so the same config, seed and controller give bit-identical
//!    fitness.
//!
//! 3. **Configuration Over Constants**: Geometry, sensors and reward tables
//!    are plain config values (`RunConfig`), loadable from JSON.
//!
//! ## Tasks
//!
//! - **seek**: steer onto a small, periodically relocated target
//! - **sensing**: find a large target through ray or range sensors, without
//!   loitering
//! - **jump**: hop over obstacles scrolling in from the right
//!
//! ## Modules
//!
//! - `core`: geometry, RNG, configuration, errors
//! - `controller`: the `Controller` trait, decision decoding, baselines
//! - `env`: the `Environment` trait and the three tasks
//! - `episode`: episode driver, summaries, frame recording
//! - `eval`: the search-loop boundary (`evaluate`, `Evaluator`)

pub mod controller;
pub mod core;
pub mod env;
pub mod episode;
pub mod eval;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    ArenaConfig, EnvError, EpisodeConfig, JumpConfig, JumpMode, Rect, Result, RunConfig, SeekConfig,
    SensingConfig, SensorMode, SimRng, TargetMotion, TaskConfig, Vec2,
};

pub use crate::controller::{
    ConstantController, Controller, Decision, DecisionKind, FnController, LinearController,
    Observation,
};

pub use crate::env::{Environment, JumpTask, SeekTask, SensingTask, StepOutcome, Task, TickEvent};

pub use crate::episode::{Episode, EpisodeSummary, Frame, FrameRecorder, FrameSink, Termination};

pub use crate::eval::{evaluate, EvaluationStats, Evaluator};
