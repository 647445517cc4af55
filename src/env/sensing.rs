//! Sensing task: find a large target the actor can only partly see.
//!
//! The actor moves in big axis-aligned steps and perceives the target either
//! through a fan of ray casts or through a range-limited offset sensor.
//! Reward shaping depends on whether the target was sensed before the move,
//! and a trailing window of visited positions penalises loitering.

use std::collections::VecDeque;

use crate::controller::{Decision, DecisionKind, Observation};
use crate::core::{ArenaConfig, Rect, Result, SensingConfig, SensorMode, SimRng, Vec2};

use super::seek::{corner_in_bounds, Move};
use super::{guard_distance, Environment, Shape, ShapeKind, StepOutcome, TickEvent};

/// Drawn size of a remembered position.
const TRAIL_MARK: f32 = 5.0;

/// Re-rolls before accepting a target that overlaps the actor.
const PLACEMENT_ATTEMPTS: usize = 64;

/// A sensor reading plus whether it saw the target.
#[derive(Clone, Debug, PartialEq)]
pub struct Reading {
    pub observation: Observation,
    pub sensed: bool,
}

/// Sensing task state.
#[derive(Clone, Debug)]
pub struct SensingTask {
    config: SensingConfig,
    arena: ArenaConfig,
    actor: Rect,
    target: Rect,
    /// Oldest first; never longer than `config.history_len`.
    history: VecDeque<Vec2>,
}

impl SensingTask {
    /// Create the task with the actor centred and the target placed at
    /// random, re-rolled while it overlaps the actor.
    ///
    /// If every re-roll overlaps, the target takes the first clear extreme
    /// placement; validated configs always have one.
    pub fn new(config: SensingConfig, arena: ArenaConfig, seed: u64) -> Self {
        let actor = config.start_actor(&arena);

        let mut rng = SimRng::new(seed).for_context("sensing-target");
        let ((x_lo, x_hi), (y_lo, y_hi)) = config.target_corner_range(&arena);
        let mut target = Rect::new(0.0, 0.0, config.target_size, config.target_size);
        let mut placed = false;
        for _ in 0..PLACEMENT_ATTEMPTS {
            target.x = rng.gen_inclusive(x_lo, x_hi) as f32;
            target.y = rng.gen_inclusive(y_lo, y_hi) as f32;
            if !target.collides(&actor) {
                placed = true;
                break;
            }
        }
        if !placed {
            if let Some(clear) = config
                .extreme_targets(&arena)
                .into_iter()
                .find(|t| !t.collides(&actor))
            {
                target = clear;
            }
        }

        let mut history = VecDeque::with_capacity(config.history_len);
        history.push_back(actor.center());

        Self {
            config,
            arena,
            actor,
            target,
            history,
        }
    }

    #[must_use]
    pub fn actor(&self) -> Rect {
        self.actor
    }

    #[must_use]
    pub fn target(&self) -> Rect {
        self.target
    }

    /// Remembered positions, oldest first.
    pub fn history(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.history.iter().copied()
    }

    #[must_use]
    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Move the actor (test setup and replays).
    pub fn set_actor_center(&mut self, center: Vec2) {
        self.actor.set_center(center);
    }

    /// Move the target (test setup and replays).
    pub fn set_target_top_left(&mut self, corner: Vec2) {
        self.target.x = corner.x;
        self.target.y = corner.y;
    }

    /// Distance between actor and target top-left corners.
    fn corner_distance(&self) -> f32 {
        self.actor.top_left().distance(self.target.top_left())
    }

    /// Take a sensor reading from the current positions.
    #[must_use]
    pub fn read(&self) -> Reading {
        match self.config.sensor {
            SensorMode::Rays { count, step } => self.read_rays(count, step),
            SensorMode::RangeOffset => self.read_range_offset(),
        }
    }

    fn read_rays(&self, count: usize, step: f32) -> Reading {
        let range = self.config.range;
        let origin = self.actor.center();

        let mut observation =
            Observation::new([self.corner_distance(), self.actor.x, self.actor.y]);
        let mut sensed = false;

        for i in 0..count {
            let direction = Vec2::from_angle_degrees(360.0 / count as f32 * i as f32);
            let mut hit = 0.0;
            let mut j = 1.0;
            while j < range {
                if self.target.contains_point(origin + direction.scale(j)) {
                    hit = j / range;
                    sensed = true;
                    break;
                }
                j += step;
            }
            observation.push(hit);
        }

        Reading { observation, sensed }
    }

    fn read_range_offset(&self) -> Reading {
        let range = self.config.range;
        let offset = self.target.center() - self.actor.center();
        let in_range = offset.length() <= range;

        let observation = if in_range {
            Observation::new([1.0, offset.x / range, offset.y / range])
        } else {
            Observation::new([0.0, 0.0, 0.0])
        };
        Reading { observation, sensed: in_range }
    }

    fn remember(&mut self, position: Vec2) {
        self.history.push_back(position);
        while self.history.len() > self.config.history_len {
            self.history.pop_front();
        }
    }
}

impl Environment for SensingTask {
    fn name(&self) -> &'static str {
        "sensing"
    }

    fn decision_kind(&self) -> DecisionKind {
        DecisionKind::Discrete(Move::ALL.len())
    }

    fn observation_len(&self) -> usize {
        match self.config.sensor {
            SensorMode::Rays { count, .. } => 3 + count,
            SensorMode::RangeOffset => 3,
        }
    }

    fn observe(&self) -> Observation {
        self.read().observation
    }

    fn advance(&mut self, decision: Decision) -> Result<StepOutcome> {
        let mv = Move::from_decision(decision)?;
        let rewards = self.config.rewards;
        let sensed = self.read().sensed;
        let old_distance = self.corner_distance();

        let (dx, dy) = mv.delta(self.config.speed);
        self.actor.translate(dx, dy);

        let mut outcome = StepOutcome::default();
        if self.actor.collides(&self.target) {
            outcome.score(TickEvent::GoalReached, rewards.goal);
            return Ok(outcome);
        }
        if !corner_in_bounds(&self.actor, &self.arena) {
            outcome.score(TickEvent::OutOfBounds, rewards.out_of_bounds);
            return Ok(outcome);
        }

        let revisits = self.history.iter().filter(|&&p| self.actor.contains_point(p)).count();
        for _ in 0..revisits {
            outcome.score(TickEvent::Revisited, rewards.revisit);
        }
        if revisits == 0 {
            outcome.score(TickEvent::FreshGround, rewards.fresh_ground);
        }
        self.remember(self.actor.center());

        let new_distance = guard_distance(self.corner_distance());
        match (new_distance < old_distance, sensed) {
            (true, true) => outcome.score(TickEvent::Closer, rewards.closer_sensed),
            (true, false) => outcome.score(TickEvent::Closer, rewards.closer_blind),
            (false, true) => outcome.score(TickEvent::Farther, rewards.farther_sensed),
            (false, false) => outcome.score(TickEvent::Farther, rewards.farther_blind),
        }
        Ok(outcome)
    }

    fn shapes(&self) -> Vec<Shape> {
        let mut shapes: Vec<Shape> = self
            .history
            .iter()
            .map(|p| Shape::new(ShapeKind::Trail, Rect::new(p.x, p.y, TRAIL_MARK, TRAIL_MARK)))
            .collect();
        shapes.push(Shape::new(ShapeKind::Target, self.target));
        shapes.push(Shape::new(ShapeKind::Actor, self.actor));
        shapes
    }
}
