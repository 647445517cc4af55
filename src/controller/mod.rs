//! Controller integration.
//!
//! ## Overview
//!
//! - **Traits**: `Controller`, the sensor-to-output function under evaluation
//! - **Decisions**: `Observation`, `DecisionKind`, `Decision`
//! - **Baselines**: `ConstantController`, `FnController`, `LinearController`
//!
//! ## Usage
//!
//! ```rust,ignore
//! let obs = env.observe();
//! let outputs = controller.activate(obs.as_slice())?;
//! let decision = env.decision_kind().decode(&outputs)?;
//! ```

pub mod decision;
pub mod traits;

pub use decision::{Decision, DecisionKind, Observation};
pub use traits::{ConstantController, Controller, FnController, LinearController};
