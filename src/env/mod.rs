//! Environment trait and the three task implementations.
//!
//! Every task follows the same tick structure:
//! sense → decide → move → score → check terminal.
//!
//! The episode runner drives it:
//! 1. `begin_tick` (scheduled world changes, e.g. target relocation)
//! 2. `observe` → controller → `decision_kind().decode(..)`
//! 3. `advance` applies the decision and returns the reward delta and events
//!
//! Tasks never touch the fitness accumulator directly; they report a delta.

pub mod jump;
pub mod seek;
pub mod sensing;
pub mod task;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::controller::{Decision, DecisionKind, Observation};
use crate::core::{Rect, Result};

pub use jump::{JumpTask, Obstacle, ObstacleState, SubTarget, SubTargetState};
pub use seek::{Move, SeekTask};
pub use sensing::SensingTask;
pub use task::Task;

/// Something notable that happened during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickEvent {
    /// Actor left the arena.
    OutOfBounds,
    /// Actor touched the goal target.
    GoalReached,
    /// Distance to the target shrank.
    Closer,
    /// Distance to the target did not shrink.
    Farther,
    /// Actor sat on a remembered position.
    Revisited,
    /// Actor sat on no remembered position.
    FreshGround,
    /// A jump was started.
    Jumped,
    /// An obstacle was cleared.
    Dodged,
    /// Actor ran into an obstacle.
    Collided,
    /// Actor touched an obstacle's sub-target.
    SubTargetReached,
}

impl TickEvent {
    /// Whether this event ends the episode (under the default policy).
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, TickEvent::OutOfBounds | TickEvent::GoalReached)
    }
}

/// Result of advancing a task by one tick.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepOutcome {
    /// Reward delta for this tick.
    pub reward: f64,
    /// Events in the order they fired.
    pub events: SmallVec<[TickEvent; 4]>,
}

impl StepOutcome {
    /// Add a reward and record the event that earned it.
    pub fn score(&mut self, event: TickEvent, reward: f64) {
        self.reward += reward;
        self.events.push(event);
    }

    /// First terminal event, if any.
    #[must_use]
    pub fn terminal_event(&self) -> Option<TickEvent> {
        self.events.iter().copied().find(|e| e.is_terminal())
    }

    /// Whether any terminal event fired.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.terminal_event().is_some()
    }
}

/// Role of a shape in a rendered frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShapeKind {
    Actor,
    Target,
    Obstacle,
    SubTarget,
    Floor,
    /// Remembered position in the sensing task.
    Trail,
}

/// A rectangle tagged with its role, for external renderers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub kind: ShapeKind,
    pub rect: Rect,
}

impl Shape {
    #[must_use]
    pub const fn new(kind: ShapeKind, rect: Rect) -> Self {
        Self { kind, rect }
    }
}

/// A steppable task.
///
/// Implementations must be deterministic given their construction seed
/// and the sequence of decisions.
pub trait Environment {
    /// Short task name.
    fn name(&self) -> &'static str;

    /// Decision shape the controller must produce.
    fn decision_kind(&self) -> DecisionKind;

    /// Length of the sensor vector produced by `observe`.
    fn observation_len(&self) -> usize;

    /// Scheduled world changes at the start of `tick` (0-indexed).
    fn begin_tick(&mut self, _tick: usize) {}

    /// Current sensor vector.
    fn observe(&self) -> Observation;

    /// Apply a decision and advance the world by one tick.
    fn advance(&mut self, decision: Decision) -> Result<StepOutcome>;

    /// Geometry for an external renderer.
    fn shapes(&self) -> Vec<Shape>;
}

/// Clamp a distance so it is safe to divide by.
#[must_use]
pub(crate) fn guard_distance(distance: f32) -> f32 {
    if distance > 0.0 {
        distance
    } else {
        1.0
    }
}
