//! Core building blocks: geometry, RNG, configuration, errors.
//!
//! These are task-agnostic. Tasks are selected and tuned via `RunConfig`
//! rather than by modifying the core.

pub mod config;
pub mod error;
pub mod geometry;
pub mod rng;

pub use config::{
    ArenaConfig, EpisodeConfig, JumpConfig, JumpMode, JumpRewards, RunConfig, SeekConfig,
    SeekRewards, SensingConfig, SensingRewards, SensorMode, SubTargetConfig, TargetMotion,
    TaskConfig, MAX_ARENA_EXTENT,
};
pub use error::{EnvError, Result};
pub use geometry::{Rect, Vec2};
pub use rng::SimRng;
