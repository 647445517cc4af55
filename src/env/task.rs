//! The three tasks behind one type, built from a `TaskConfig`.

use crate::controller::{Decision, DecisionKind, Observation};
use crate::core::{ArenaConfig, Result, TaskConfig, Vec2};

use super::{Environment, JumpTask, SeekTask, SensingTask, Shape, StepOutcome};

/// Any of the built-in tasks.
#[derive(Clone, Debug)]
pub enum Task {
    Seek(SeekTask),
    Sensing(SensingTask),
    Jump(JumpTask),
}

impl Task {
    /// Validate `config` and build a fresh task seeded with `seed`.
    pub fn new(config: &TaskConfig, arena: ArenaConfig, seed: u64) -> Result<Self> {
        config.validate(&arena)?;
        Ok(match config {
            TaskConfig::Seek(c) => Task::Seek(SeekTask::new(c.clone(), arena, seed)),
            TaskConfig::Sensing(c) => Task::Sensing(SensingTask::new(c.clone(), arena, seed)),
            TaskConfig::Jump(c) => Task::Jump(JumpTask::new(c.clone(), arena, seed)),
        })
    }

    /// Pin the seek target, for externally driven target motion.
    ///
    /// Returns `false` (and does nothing) for tasks without a movable target.
    pub fn set_target_center(&mut self, center: Vec2) -> bool {
        match self {
            Task::Seek(t) => {
                t.set_target_center(center);
                true
            }
            Task::Sensing(_) | Task::Jump(_) => false,
        }
    }

    fn inner(&self) -> &dyn Environment {
        match self {
            Task::Seek(t) => t,
            Task::Sensing(t) => t,
            Task::Jump(t) => t,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Environment {
        match self {
            Task::Seek(t) => t,
            Task::Sensing(t) => t,
            Task::Jump(t) => t,
        }
    }
}

impl Environment for Task {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn decision_kind(&self) -> DecisionKind {
        self.inner().decision_kind()
    }

    fn observation_len(&self) -> usize {
        self.inner().observation_len()
    }

    fn begin_tick(&mut self, tick: usize) {
        self.inner_mut().begin_tick(tick);
    }

    fn observe(&self) -> Observation {
        self.inner().observe()
    }

    fn advance(&mut self, decision: Decision) -> Result<StepOutcome> {
        self.inner_mut().advance(decision)
    }

    fn shapes(&self) -> Vec<Shape> {
        self.inner().shapes()
    }
}
