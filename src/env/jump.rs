//! Jump task: hop over obstacles scrolling in from the right.
//!
//! ## Overview
//!
//! The actor sits on a floor and can only move vertically. Obstacles of
//! random height spawn at the right edge and scroll left. Each obstacle is a
//! small state machine:
//!
//! ```text
//! Pending --(passed)--> Dodged
//!    \----(touched)---> Hit (removed)
//! ```
//!
//! so the dodge bonus and the collision penalty are each paid at most once
//! per obstacle. The extended variant carries a sub-target above every
//! obstacle (`Pending -> Reached`).
//!
//! There is no terminal condition; episodes run their full tick budget.

use serde::{Deserialize, Serialize};

use crate::controller::{Decision, DecisionKind, Observation};
use crate::core::{ArenaConfig, EnvError, JumpConfig, JumpMode, Rect, Result, SimRng, Vec2};

use super::{Environment, Shape, ShapeKind, StepOutcome, TickEvent};

/// Lifecycle of an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleState {
    /// Still ahead of, or beside, the actor.
    Pending,
    /// Fully passed without contact. Bonus already paid.
    Dodged,
    /// Touched the actor. Penalty already paid.
    Hit,
}

/// Lifecycle of a sub-target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubTargetState {
    Pending,
    Reached,
}

/// Bonus rectangle riding above an obstacle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SubTarget {
    pub rect: Rect,
    pub state: SubTargetState,
}

/// A scrolling obstacle standing on the floor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub rect: Rect,
    pub state: ObstacleState,
    pub sub_target: Option<SubTarget>,
}

impl Obstacle {
    fn scroll(&mut self, dx: f32) {
        self.rect.translate(-dx, 0.0);
        if let Some(sub) = &mut self.sub_target {
            sub.rect.translate(-dx, 0.0);
        }
    }
}

/// Jump task state.
#[derive(Clone, Debug)]
pub struct JumpTask {
    config: JumpConfig,
    arena: ArenaConfig,
    actor: Rect,
    floor: Rect,
    /// Vertical velocity, positive downward.
    vy: f32,
    on_floor: bool,
    obstacles: Vec<Obstacle>,
    rng: SimRng,
}

impl JumpTask {
    /// Create the task. The actor starts centred at `(w/2, h-40)`, slightly
    /// above the floor, so it settles during the first ticks.
    pub fn new(config: JumpConfig, arena: ArenaConfig, seed: u64) -> Self {
        let floor = Rect::new(
            0.0,
            arena.height - config.floor_height,
            arena.width,
            config.floor_height,
        );
        let actor = Rect::centered(
            Vec2::new(arena.width / 2.0, arena.height - 40.0),
            config.actor_size,
            config.actor_size,
        );
        let on_floor = actor.bottom() == floor.top();

        Self {
            config,
            arena,
            actor,
            floor,
            vy: 0.0,
            on_floor,
            obstacles: Vec::new(),
            rng: SimRng::new(seed).for_context("obstacle"),
        }
    }

    #[must_use]
    pub fn actor(&self) -> Rect {
        self.actor
    }

    #[must_use]
    pub fn floor(&self) -> Rect {
        self.floor
    }

    #[must_use]
    pub fn velocity(&self) -> f32 {
        self.vy
    }

    #[must_use]
    pub fn is_airborne(&self) -> bool {
        !self.on_floor
    }

    /// Obstacles currently on screen, oldest first.
    #[must_use]
    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Nearest obstacle whose left edge is past the actor's right edge.
    #[must_use]
    pub fn next_obstacle(&self) -> Option<&Obstacle> {
        self.obstacles
            .iter()
            .filter(|o| o.rect.left() > self.actor.right())
            .min_by(|a, b| a.rect.left().total_cmp(&b.rect.left()))
    }

    /// Nearest sub-target still worth reaching.
    fn next_sub_target(&self) -> Option<Rect> {
        self.obstacles
            .iter()
            .filter(|o| o.rect.right() >= self.actor.left())
            .filter_map(|o| o.sub_target)
            .filter(|s| s.state == SubTargetState::Pending)
            .map(|s| s.rect)
            .min_by(|a, b| a.left().total_cmp(&b.left()))
    }

    /// Upward impulse requested by `decision`, if any.
    fn requested_impulse(&self, decision: Decision) -> Result<Option<f32>> {
        match (self.config.jump, decision) {
            (JumpMode::Fixed { .. }, Decision::Action(0)) => Ok(None),
            (JumpMode::Fixed { impulse }, Decision::Action(1)) => Ok(Some(impulse)),
            (JumpMode::Fixed { .. }, Decision::Action(_)) => {
                Err(EnvError::UnexpectedDecision("jump index out of range"))
            }
            (JumpMode::Fixed { .. }, Decision::Value(_)) => {
                Err(EnvError::UnexpectedDecision("fixed jump needs a discrete action"))
            }
            (JumpMode::Scaled { max_impulse, threshold }, Decision::Value(v)) => {
                let impulse = max_impulse * v.clamp(0.0, 1.0);
                Ok((v > threshold && impulse > 0.0).then_some(impulse))
            }
            (JumpMode::Scaled { .. }, Decision::Action(_)) => {
                Err(EnvError::UnexpectedDecision("scaled jump needs a continuous value"))
            }
        }
    }

    fn integrate(&mut self) {
        self.actor.translate(0.0, self.vy);
        self.vy += self.config.gravity;
        if self.actor.bottom() >= self.floor.top() {
            self.actor.set_bottom(self.floor.top());
            self.vy = 0.0;
            self.on_floor = true;
        }
    }

    fn spawn_obstacle(&mut self) {
        let max_height = self.config.max_obstacle_height(&self.arena);
        let height = self.rng.gen_inclusive(self.config.min_obstacle_height, max_height) as f32;
        let rect = Rect::new(
            self.arena.width,
            self.floor.top() - height,
            self.config.obstacle_width,
            height,
        );
        let sub_target = self.config.sub_target.map(|sub| SubTarget {
            rect: Rect::new(
                rect.center().x - sub.size / 2.0,
                rect.top() - sub.lift - sub.size,
                sub.size,
                sub.size,
            ),
            state: SubTargetState::Pending,
        });

        self.obstacles.push(Obstacle {
            rect,
            state: ObstacleState::Pending,
            sub_target,
        });
    }
}

impl Environment for JumpTask {
    fn name(&self) -> &'static str {
        "jump"
    }

    fn decision_kind(&self) -> DecisionKind {
        match self.config.jump {
            JumpMode::Fixed { .. } => DecisionKind::Discrete(2),
            JumpMode::Scaled { .. } => DecisionKind::Continuous,
        }
    }

    fn observation_len(&self) -> usize {
        if self.config.sub_target.is_some() {
            4
        } else {
            3
        }
    }

    fn observe(&self) -> Observation {
        let sentinel = self.config.absent_sentinel;
        let mut observation = match self.next_obstacle() {
            Some(o) => Observation::new([o.rect.right() - self.actor.right(), 1.0, o.rect.h]),
            None => Observation::new([0.0, 0.0, sentinel]),
        };
        if self.config.sub_target.is_some() {
            let distance = self
                .next_sub_target()
                .map_or(sentinel, |s| self.actor.center().distance(s.center()));
            observation.push(distance);
        }
        observation
    }

    fn advance(&mut self, decision: Decision) -> Result<StepOutcome> {
        let impulse = self.requested_impulse(decision)?;
        let rewards = self.config.rewards;
        let mut outcome = StepOutcome::default();

        if !self.on_floor {
            self.integrate();
        } else if let Some(impulse) = impulse {
            self.vy = -impulse;
            self.on_floor = false;
            outcome.score(TickEvent::Jumped, rewards.jump);
        }

        if self.obstacles.len() < self.config.max_obstacles {
            self.spawn_obstacle();
        }

        let actor = self.actor;
        let scroll = self.config.scroll_speed;
        self.obstacles.retain_mut(|o| {
            o.scroll(scroll);

            if let Some(sub) = &mut o.sub_target {
                if sub.state == SubTargetState::Pending && sub.rect.collides(&actor) {
                    sub.state = SubTargetState::Reached;
                    outcome.score(TickEvent::SubTargetReached, rewards.sub_target);
                }
            }

            if o.rect.right() < 0.0 {
                return false;
            }
            if o.rect.collides(&actor) {
                if o.state != ObstacleState::Hit {
                    o.state = ObstacleState::Hit;
                    outcome.score(TickEvent::Collided, rewards.collision);
                }
                return false;
            }
            if o.rect.right() < actor.left() && o.state == ObstacleState::Pending {
                o.state = ObstacleState::Dodged;
                outcome.score(TickEvent::Dodged, rewards.dodged);
            }
            true
        });

        Ok(outcome)
    }

    fn shapes(&self) -> Vec<Shape> {
        let mut shapes = vec![Shape::new(ShapeKind::Floor, self.floor)];
        for o in &self.obstacles {
            shapes.push(Shape::new(ShapeKind::Obstacle, o.rect));
            if let Some(sub) = o.sub_target.filter(|s| s.state == SubTargetState::Pending) {
                shapes.push(Shape::new(ShapeKind::SubTarget, sub.rect));
            }
        }
        shapes.push(Shape::new(ShapeKind::Actor, self.actor));
        shapes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{JumpRewards, SubTargetConfig};

    const STAY: Decision = Decision::Action(0);
    const JUMP: Decision = Decision::Action(1);

    fn landed(config: JumpConfig) -> JumpTask {
        let mut task = JumpTask::new(config, ArenaConfig::default(), 11);
        let floor_top = task.floor.top();
        task.actor.set_bottom(floor_top);
        task.vy = 0.0;
        task.on_floor = true;
        task
    }

    fn obstacle(x: f32, height: f32) -> Obstacle {
        Obstacle {
            rect: Rect::new(x, 480.0 - height, 20.0, height),
            state: ObstacleState::Pending,
            sub_target: None,
        }
    }

    #[test]
    fn test_initial_layout() {
        let task = JumpTask::new(JumpConfig::default(), ArenaConfig::default(), 1);
        assert_eq!(task.actor().center(), Vec2::new(250.0, 460.0));
        assert_eq!(task.actor().bottom(), 470.0);
        assert_eq!(task.floor().top(), 480.0);
        assert!(task.is_airborne());
        assert!(task.obstacles().is_empty());
    }

    #[test]
    fn test_settles_onto_floor() {
        let mut task = JumpTask::new(JumpConfig::default(), ArenaConfig::default(), 1);
        for _ in 0..30 {
            task.advance(STAY).unwrap();
        }
        assert!(!task.is_airborne());
        assert_eq!(task.actor().bottom(), 480.0);
        assert_eq!(task.velocity(), 0.0);
    }

    #[test]
    fn test_jump_from_floor() {
        let mut task = landed(JumpConfig::default());
        let y = task.actor().y;

        let outcome = task.advance(JUMP).unwrap();
        assert_eq!(outcome.events.first(), Some(&TickEvent::Jumped));
        assert_eq!(outcome.reward, -40.0);
        assert_eq!(task.velocity(), -13.0);
        assert_eq!(task.actor().y, y);

        task.advance(STAY).unwrap();
        assert_eq!(task.actor().y, y - 13.0);
    }

    #[test]
    fn test_jump_ignored_midair() {
        let mut task = landed(JumpConfig::default());
        task.advance(JUMP).unwrap();
        task.advance(STAY).unwrap();

        let y = task.actor().y;
        let vy = task.velocity();
        assert!(vy != 0.0);

        let outcome = task.advance(JUMP).unwrap();
        assert!(!outcome.events.contains(&TickEvent::Jumped));
        assert_eq!(task.actor().y, y + vy);
        assert!((task.velocity() - (vy + 0.3)).abs() < 1e-6);
    }

    #[test]
    fn test_full_jump_lands() {
        let mut task = landed(JumpConfig::default());
        task.advance(JUMP).unwrap();
        let mut ticks = 0;
        while task.is_airborne() {
            task.advance(STAY).unwrap();
            ticks += 1;
            assert!(ticks < 200);
        }
        assert_eq!(task.actor().bottom(), 480.0);
    }

    #[test]
    fn test_spawn_and_scroll() {
        let mut task = landed(JumpConfig::default());
        task.advance(STAY).unwrap();

        assert_eq!(task.obstacles().len(), 1);
        let o = task.obstacles()[0];
        assert_eq!(o.rect.x, 497.0);
        assert_eq!(o.rect.bottom(), 480.0);
        assert!((10.0..=294.0).contains(&o.rect.h));

        task.advance(STAY).unwrap();
        assert_eq!(task.obstacles().len(), 1);
        assert_eq!(task.obstacles()[0].rect.x, 494.0);
    }

    #[test]
    fn test_obstacle_cap() {
        let mut task = landed(JumpConfig::default().with_max_obstacles(3));
        for _ in 0..3 {
            task.advance(STAY).unwrap();
        }
        assert_eq!(task.obstacles().len(), 3);
        task.advance(STAY).unwrap();
        assert_eq!(task.obstacles().len(), 3);
    }

    #[test]
    fn test_collision_penalised_once() {
        let mut task = landed(JumpConfig::default());
        task.obstacles.push(obstacle(255.0, 50.0));

        let outcome = task.advance(STAY).unwrap();
        assert_eq!(outcome.events.as_slice(), &[TickEvent::Collided]);
        assert_eq!(outcome.reward, -200.0);
        assert!(task.obstacles().is_empty());
    }

    #[test]
    fn test_dodge_rewarded_once() {
        let mut task = landed(JumpConfig::default());
        task.obstacles.push(obstacle(210.0, 50.0));

        let outcome = task.advance(STAY).unwrap();
        assert_eq!(outcome.events.as_slice(), &[TickEvent::Dodged]);
        assert_eq!(outcome.reward, 145.0);
        assert_eq!(task.obstacles()[0].state, ObstacleState::Dodged);

        let outcome = task.advance(STAY).unwrap();
        assert_eq!(outcome.reward, 0.0);
    }

    #[test]
    fn test_offscreen_obstacle_removed() {
        let mut task = landed(JumpConfig::default());
        task.obstacles.push(obstacle(-22.0, 50.0));
        task.obstacles[0].state = ObstacleState::Dodged;

        task.advance(STAY).unwrap();
        assert!(task.obstacles().is_empty());
    }

    #[test]
    fn test_observation() {
        let mut task = landed(JumpConfig::default());
        assert_eq!(task.observe().as_slice(), &[0.0, 0.0, -10_000.0]);

        task.obstacles.push(obstacle(300.0, 50.0));
        assert_eq!(task.observe().as_slice(), &[60.0, 1.0, 50.0]);

        // Obstacles level with or behind the actor are not "ahead"
        task.obstacles[0].rect.x = 250.0;
        assert_eq!(task.observe().get(1), Some(0.0));
    }

    #[test]
    fn test_scaled_jump() {
        let config = JumpConfig::default().with_jump(JumpMode::Scaled {
            max_impulse: 13.0,
            threshold: 0.2,
        });
        let mut task = landed(config);
        assert_eq!(task.decision_kind(), DecisionKind::Continuous);

        let outcome = task.advance(Decision::Value(0.1)).unwrap();
        assert!(outcome.events.is_empty());
        assert!(!task.is_airborne());

        let outcome = task.advance(Decision::Value(0.5)).unwrap();
        assert_eq!(outcome.events.as_slice(), &[TickEvent::Jumped]);
        assert_eq!(task.velocity(), -6.5);

        assert!(task.advance(STAY).is_err());
    }

    #[test]
    fn test_bad_fixed_decision() {
        let mut task = landed(JumpConfig::default());
        assert!(matches!(
            task.advance(Decision::Action(2)),
            Err(EnvError::UnexpectedDecision(_))
        ));
        assert!(task.advance(Decision::Value(1.0)).is_err());
    }

    #[test]
    fn test_sub_target() {
        let config = JumpConfig::default()
            .with_sub_target(SubTargetConfig::default())
            .with_rewards(JumpRewards::default());
        let mut task = landed(config);
        assert_eq!(task.observation_len(), 4);
        assert_eq!(task.observe().get(3), Some(-10_000.0));

        let mut o = obstacle(400.0, 50.0);
        o.sub_target = Some(SubTarget {
            rect: Rect::centered(Vec2::new(252.0, 470.0), 10.0, 10.0),
            state: SubTargetState::Pending,
        });
        task.obstacles.push(o);

        let outcome = task.advance(STAY).unwrap();
        assert_eq!(outcome.events.as_slice(), &[TickEvent::SubTargetReached]);
        assert_eq!(outcome.reward, 50.0);

        // Still overlapping, but already reached
        let outcome = task.advance(STAY).unwrap();
        assert!(!outcome.events.contains(&TickEvent::SubTargetReached));
    }

    #[test]
    fn test_spawned_sub_target_rides_above() {
        let mut task = landed(JumpConfig::default().with_sub_target(SubTargetConfig::default()));
        task.advance(STAY).unwrap();

        let o = task.obstacles()[0];
        let sub = o.sub_target.unwrap();
        assert_eq!(sub.rect.bottom(), o.rect.top() - 40.0);
        assert_eq!(sub.rect.center().x, o.rect.center().x);
    }
}
