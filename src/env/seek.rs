//! Seek task: steer the actor onto a small target.
//!
//! - Sensor: `[dx, dy, |d|]` where `d = actor.center - target.center`
//! - Decision: 4-way argmax (`up`, `down`, `left`, `right`)
//! - Leaving the arena or touching the target ends the episode
//! - Otherwise a small shaping reward for closing distance, a small penalty
//!   for not closing it

use crate::controller::{Decision, DecisionKind, Observation};
use crate::core::{ArenaConfig, EnvError, Rect, Result, SeekConfig, SimRng, TargetMotion, Vec2};

use super::{guard_distance, Environment, Shape, ShapeKind, StepOutcome, TickEvent};

/// Axis-aligned move for the seek and sensing tasks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Move {
    Up,
    Down,
    Left,
    Right,
}

impl Move {
    /// All moves in decision-index order.
    pub const ALL: [Move; 4] = [Move::Up, Move::Down, Move::Left, Move::Right];

    /// Decision index of this move.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Interpret a decoded decision.
    pub fn from_decision(decision: Decision) -> Result<Self> {
        match decision {
            Decision::Action(i) => Self::ALL
                .get(i)
                .copied()
                .ok_or(EnvError::UnexpectedDecision("move index out of range")),
            Decision::Value(_) => Err(EnvError::UnexpectedDecision("move needs a discrete action")),
        }
    }

    /// Displacement for a step of `speed`.
    #[must_use]
    pub fn delta(self, speed: f32) -> (f32, f32) {
        match self {
            Move::Up => (0.0, -speed),
            Move::Down => (0.0, speed),
            Move::Left => (-speed, 0.0),
            Move::Right => (speed, 0.0),
        }
    }
}

/// Whether the actor's top-left corner is strictly inside the arena.
pub(crate) fn corner_in_bounds(actor: &Rect, arena: &ArenaConfig) -> bool {
    actor.x > 0.0 && actor.x < arena.width && actor.y > 0.0 && actor.y < arena.height
}

/// Seek task state.
#[derive(Clone, Debug)]
pub struct SeekTask {
    config: SeekConfig,
    arena: ArenaConfig,
    actor: Rect,
    target: Rect,
    rng: SimRng,
}

impl SeekTask {
    /// Create the task with the actor centred and the target placed at random.
    pub fn new(config: SeekConfig, arena: ArenaConfig, seed: u64) -> Self {
        let center = Vec2::new(arena.width / 2.0, arena.height / 2.0);
        let actor = Rect::centered(center, config.actor_size, config.actor_size);
        let target = Rect::centered(Vec2::ZERO, config.target_size, config.target_size);

        let mut task = Self {
            config,
            arena,
            actor,
            target,
            rng: SimRng::new(seed).for_context("seek-target"),
        };
        task.relocate_target();
        task
    }

    #[must_use]
    pub fn actor(&self) -> Rect {
        self.actor
    }

    #[must_use]
    pub fn target(&self) -> Rect {
        self.target
    }

    #[must_use]
    pub fn config(&self) -> &SeekConfig {
        &self.config
    }

    /// Move the actor (test setup and replays).
    pub fn set_actor_center(&mut self, center: Vec2) {
        self.actor.set_center(center);
    }

    /// Move the target. This is how a driver steers it in `External` mode.
    pub fn set_target_center(&mut self, center: Vec2) {
        self.target.set_center(center);
    }

    fn relocate_target(&mut self) {
        let margin = self.config.target_margin as i32;
        let x = self.rng.gen_inclusive(margin, self.arena.width as i32 - margin);
        let y = self.rng.gen_inclusive(margin, self.arena.height as i32 - margin);
        self.target.set_center(Vec2::new(x as f32, y as f32));
    }

    fn offset(&self) -> Vec2 {
        self.actor.center() - self.target.center()
    }
}

impl Environment for SeekTask {
    fn name(&self) -> &'static str {
        "seek"
    }

    fn decision_kind(&self) -> DecisionKind {
        DecisionKind::Discrete(Move::ALL.len())
    }

    fn observation_len(&self) -> usize {
        3
    }

    fn begin_tick(&mut self, tick: usize) {
        // Tick 0 placement already happened at construction.
        if let TargetMotion::Periodic { every } = self.config.motion {
            if tick > 0 && tick % every as usize == 0 {
                self.relocate_target();
            }
        }
    }

    fn observe(&self) -> Observation {
        let d = self.offset();
        Observation::new([d.x, d.y, d.length()])
    }

    fn advance(&mut self, decision: Decision) -> Result<StepOutcome> {
        let mv = Move::from_decision(decision)?;
        let rewards = self.config.rewards;
        let old_distance = self.offset().length();

        let (dx, dy) = mv.delta(self.config.speed);
        self.actor.translate(dx, dy);

        let mut outcome = StepOutcome::default();
        if !corner_in_bounds(&self.actor, &self.arena) {
            outcome.score(TickEvent::OutOfBounds, rewards.out_of_bounds);
            return Ok(outcome);
        }
        if self.actor.collides(&self.target) {
            outcome.score(TickEvent::GoalReached, rewards.goal);
            return Ok(outcome);
        }

        let new_distance = guard_distance(self.offset().length());
        if new_distance < old_distance {
            outcome.score(TickEvent::Closer, rewards.closer);
        } else {
            outcome.score(TickEvent::Farther, rewards.farther);
        }
        Ok(outcome)
    }

    fn shapes(&self) -> Vec<Shape> {
        vec![
            Shape::new(ShapeKind::Target, self.target),
            Shape::new(ShapeKind::Actor, self.actor),
        ]
    }
}
