//! Episode execution.
//!
//! ## Overview
//!
//! - **Episode**: drives one environment under one controller until a
//!   terminal event or the tick budget, accumulating fitness
//! - **EpisodeSummary**: fitness, ticks, termination reason, timing and
//!   event tallies of a finished episode
//! - **Frames**: optional per-tick geometry snapshots (`FrameSink`,
//!   `FrameRecorder`) for replaying a run outside the crate
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut episode = Episode::from_config(&run_config, seed)?;
//! let summary = episode.run(&controller, None)?;
//! println!("fitness {}", summary.fitness);
//! ```

pub mod frame;
pub mod runner;

pub use frame::{Frame, FrameRecorder, FrameSink};
pub use runner::{Episode, EpisodeSummary, StepReport, Termination};
