//! Run configuration.
//!
//! Every tunable of every task lives here rather than in ambient state:
//! - `ArenaConfig`: playfield size
//! - `SeekConfig`, `SensingConfig`, `JumpConfig`: per-task geometry, sensors
//!   and reward tables
//! - `TaskConfig`: which task to run (tagged union of the above)
//! - `EpisodeConfig`: tick budget, terminal policy, frame rate
//! - `RunConfig`: combines all of the above with a seed
//!
//! Defaults reproduce the hand-tuned constants the environments were first
//! trained with. Reward tables differ between tasks on purpose; they are
//! tuning values, not invariants.

use serde::{Deserialize, Serialize};

use super::error::{EnvError, Result};
use super::geometry::{Rect, Vec2};

/// Largest accepted arena side. Random placement works in `i32` pixels.
pub const MAX_ARENA_EXTENT: f32 = 1_000_000.0;

/// Whether `margin` is a usable placement margin.
fn valid_margin(margin: f32) -> bool {
    margin.is_finite() && margin >= 0.0
}

/// Playfield dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self { width: 500.0, height: 500.0 }
    }
}

impl ArenaConfig {
    /// Create an arena of the given size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    fn validate(&self) -> Result<()> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(EnvError::InvalidConfig("arena must have positive width and height"));
        }
        if !(self.width <= MAX_ARENA_EXTENT && self.height <= MAX_ARENA_EXTENT) {
            return Err(EnvError::InvalidConfig("arena is too large"));
        }
        Ok(())
    }
}

// =============================================================================
// Seek
// =============================================================================

/// How the seek target moves over an episode.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetMotion {
    /// Placed once at reset.
    Static,
    /// Placed at reset, then relocated every `every` ticks.
    Periodic { every: u32 },
    /// Placed at reset, then moved only by the driver (follow mode).
    External,
}

/// Reward table for the seek task.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekRewards {
    pub out_of_bounds: f64,
    pub goal: f64,
    pub closer: f64,
    pub farther: f64,
}

impl Default for SeekRewards {
    fn default() -> Self {
        Self {
            out_of_bounds: -2.0,
            goal: 1.0,
            closer: 0.15,
            farther: -0.1,
        }
    }
}

/// Seek task configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekConfig {
    /// Side length of the square actor.
    pub actor_size: f32,
    /// Side length of the square target.
    pub target_size: f32,
    /// Distance moved per tick.
    pub speed: f32,
    /// Random target centres keep this far from the arena edges.
    pub target_margin: f32,
    pub motion: TargetMotion,
    pub rewards: SeekRewards,
}

impl Default for SeekConfig {
    fn default() -> Self {
        Self {
            actor_size: 20.0,
            target_size: 10.0,
            speed: 5.0,
            target_margin: 30.0,
            motion: TargetMotion::Periodic { every: 200 },
            rewards: SeekRewards::default(),
        }
    }
}

impl SeekConfig {
    /// Set the step size.
    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Set the target motion mode.
    #[must_use]
    pub fn with_motion(mut self, motion: TargetMotion) -> Self {
        self.motion = motion;
        self
    }

    /// Replace the reward table.
    #[must_use]
    pub fn with_rewards(mut self, rewards: SeekRewards) -> Self {
        self.rewards = rewards;
        self
    }

    fn validate(&self, arena: &ArenaConfig) -> Result<()> {
        if self.actor_size <= 0.0 || self.target_size <= 0.0 {
            return Err(EnvError::InvalidConfig("seek actor and target sizes must be positive"));
        }
        if !valid_margin(self.target_margin) {
            return Err(EnvError::InvalidConfig(
                "seek target margin must be finite and non-negative",
            ));
        }
        if self.target_margin * 2.0 > arena.width.min(arena.height) {
            return Err(EnvError::InvalidConfig("seek target margin leaves no room in the arena"));
        }
        if let TargetMotion::Periodic { every: 0 } = self.motion {
            return Err(EnvError::InvalidConfig("seek relocation period must be non-zero"));
        }
        Ok(())
    }
}

// =============================================================================
// Sensing
// =============================================================================

/// Sensor encoding for the sensing task.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SensorMode {
    /// `count` rays at even angular spacing, each sampled every `step` units.
    Rays { count: usize, step: f32 },
    /// In-range flag plus the target offset scaled by the sensing range.
    RangeOffset,
}

/// Reward table for the sensing task.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensingRewards {
    pub goal: f64,
    pub out_of_bounds: f64,
    /// Charged once per remembered position the actor sits on.
    pub revisit: f64,
    /// Paid when no remembered position is under the actor.
    pub fresh_ground: f64,
    pub closer_sensed: f64,
    pub closer_blind: f64,
    pub farther_sensed: f64,
    pub farther_blind: f64,
}

impl Default for SensingRewards {
    fn default() -> Self {
        Self {
            goal: 4.5,
            out_of_bounds: -6.0,
            revisit: -0.05,
            fresh_ground: 0.2,
            closer_sensed: 0.4,
            closer_blind: 0.2,
            farther_sensed: -1.2,
            farther_blind: -0.5,
        }
    }
}

/// Sensing task configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensingConfig {
    pub actor_size: f32,
    pub target_size: f32,
    /// Random target corners keep this far from the arena edges.
    pub target_margin: f32,
    pub speed: f32,
    /// Maximum sensing distance.
    pub range: f32,
    /// Trailing window of visited positions.
    pub history_len: usize,
    pub sensor: SensorMode,
    pub rewards: SensingRewards,
}

impl Default for SensingConfig {
    fn default() -> Self {
        Self {
            actor_size: 20.0,
            target_size: 60.0,
            target_margin: 60.0,
            speed: 15.0,
            range: 200.0,
            history_len: 15,
            sensor: SensorMode::Rays { count: 10, step: 12.0 },
            rewards: SensingRewards::default(),
        }
    }
}

impl SensingConfig {
    /// Set the sensor encoding.
    #[must_use]
    pub fn with_sensor(mut self, sensor: SensorMode) -> Self {
        self.sensor = sensor;
        self
    }

    /// Set the trailing history window.
    #[must_use]
    pub fn with_history_len(mut self, len: usize) -> Self {
        self.history_len = len;
        self
    }

    /// Set the step size.
    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    /// Replace the reward table.
    #[must_use]
    pub fn with_rewards(mut self, rewards: SensingRewards) -> Self {
        self.rewards = rewards;
        self
    }

    /// Actor at reset, centred in the arena.
    pub(crate) fn start_actor(&self, arena: &ArenaConfig) -> Rect {
        let center = Vec2::new(arena.width / 2.0, arena.height / 2.0);
        Rect::centered(center, self.actor_size, self.actor_size)
    }

    /// Inclusive `(x, y)` ranges for the target's top-left corner.
    pub(crate) fn target_corner_range(&self, arena: &ArenaConfig) -> ((i32, i32), (i32, i32)) {
        let margin = self.target_margin as i32;
        (
            (margin, arena.width as i32 - margin),
            (margin, arena.height as i32 - margin),
        )
    }

    /// The four targets at the ends of the corner ranges.
    ///
    /// If any placement clears the actor, one of these does.
    pub(crate) fn extreme_targets(&self, arena: &ArenaConfig) -> [Rect; 4] {
        let ((x_lo, x_hi), (y_lo, y_hi)) = self.target_corner_range(arena);
        let size = self.target_size;
        [(x_lo, y_lo), (x_hi, y_lo), (x_lo, y_hi), (x_hi, y_hi)]
            .map(|(x, y)| Rect::new(x as f32, y as f32, size, size))
    }

    fn validate(&self, arena: &ArenaConfig) -> Result<()> {
        if self.actor_size <= 0.0 || self.target_size <= 0.0 {
            return Err(EnvError::InvalidConfig("sensing actor and target sizes must be positive"));
        }
        if self.range <= 0.0 {
            return Err(EnvError::InvalidConfig("sensing range must be positive"));
        }
        if self.history_len == 0 {
            return Err(EnvError::InvalidConfig("position history must hold at least one entry"));
        }
        if !valid_margin(self.target_margin) {
            return Err(EnvError::InvalidConfig(
                "sensing target margin must be finite and non-negative",
            ));
        }
        if self.target_margin * 2.0 > arena.width.min(arena.height) {
            return Err(EnvError::InvalidConfig(
                "sensing target margin leaves no room in the arena",
            ));
        }
        let actor = self.start_actor(arena);
        if self.extreme_targets(arena).iter().all(|t| t.collides(&actor)) {
            return Err(EnvError::InvalidConfig(
                "sensing target cannot be placed clear of the actor",
            ));
        }
        if let SensorMode::Rays { count, step } = self.sensor {
            if count == 0 {
                return Err(EnvError::InvalidConfig("ray sensor needs at least one ray"));
            }
            if step <= 0.0 {
                return Err(EnvError::InvalidConfig("ray sample step must be positive"));
            }
        }
        Ok(())
    }
}

// =============================================================================
// Jump
// =============================================================================

/// How the controller's output becomes a jump.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum JumpMode {
    /// Two outputs; argmax 1 jumps with a fixed upward impulse.
    Fixed { impulse: f32 },
    /// One output `v`; jumps when `v > threshold` with `max_impulse * clamp(v, 0, 1)`.
    Scaled { max_impulse: f32, threshold: f32 },
}

/// Bonus rectangle riding above each obstacle (extended variant).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubTargetConfig {
    pub size: f32,
    /// Gap between the obstacle top and the sub-target bottom.
    pub lift: f32,
}

impl Default for SubTargetConfig {
    fn default() -> Self {
        Self { size: 10.0, lift: 40.0 }
    }
}

/// Reward table for the jump task.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpRewards {
    pub dodged: f64,
    pub collision: f64,
    pub jump: f64,
    pub sub_target: f64,
}

impl Default for JumpRewards {
    fn default() -> Self {
        Self {
            dodged: 145.0,
            collision: -200.0,
            jump: -40.0,
            sub_target: 50.0,
        }
    }
}

/// Jump task configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpConfig {
    pub actor_size: f32,
    pub floor_height: f32,
    /// Added to vertical velocity every airborne tick.
    pub gravity: f32,
    /// Leftward obstacle speed per tick.
    pub scroll_speed: f32,
    pub obstacle_width: f32,
    pub min_obstacle_height: i32,
    /// Tallest obstacle is `round(height / ratio)`.
    pub obstacle_height_ratio: f32,
    /// New obstacles spawn while fewer than this many are on screen.
    pub max_obstacles: usize,
    pub jump: JumpMode,
    pub sub_target: Option<SubTargetConfig>,
    /// Sensor value reported for quantities with nothing to measure.
    pub absent_sentinel: f32,
    pub rewards: JumpRewards,
}

impl Default for JumpConfig {
    fn default() -> Self {
        Self {
            actor_size: 20.0,
            floor_height: 20.0,
            gravity: 0.3,
            scroll_speed: 3.0,
            obstacle_width: 20.0,
            min_obstacle_height: 10,
            obstacle_height_ratio: 1.7,
            max_obstacles: 1,
            jump: JumpMode::Fixed { impulse: 13.0 },
            sub_target: None,
            absent_sentinel: -10_000.0,
            rewards: JumpRewards::default(),
        }
    }
}

impl JumpConfig {
    /// Set the jump mode.
    #[must_use]
    pub fn with_jump(mut self, jump: JumpMode) -> Self {
        self.jump = jump;
        self
    }

    /// Enable sub-targets above obstacles.
    #[must_use]
    pub fn with_sub_target(mut self, sub_target: SubTargetConfig) -> Self {
        self.sub_target = Some(sub_target);
        self
    }

    /// Set the concurrent obstacle cap.
    #[must_use]
    pub fn with_max_obstacles(mut self, max: usize) -> Self {
        self.max_obstacles = max;
        self
    }

    /// Replace the reward table.
    #[must_use]
    pub fn with_rewards(mut self, rewards: JumpRewards) -> Self {
        self.rewards = rewards;
        self
    }

    /// Tallest obstacle height for the given arena.
    #[must_use]
    pub fn max_obstacle_height(&self, arena: &ArenaConfig) -> i32 {
        (arena.height / self.obstacle_height_ratio).round() as i32
    }

    fn validate(&self, arena: &ArenaConfig) -> Result<()> {
        if self.actor_size <= 0.0 || self.obstacle_width <= 0.0 {
            return Err(EnvError::InvalidConfig("jump actor and obstacle sizes must be positive"));
        }
        if self.floor_height < 0.0 || self.floor_height + self.actor_size >= arena.height {
            return Err(EnvError::InvalidConfig("jump floor leaves no room for the actor"));
        }
        if self.obstacle_height_ratio <= 0.0 {
            return Err(EnvError::InvalidConfig("obstacle height ratio must be positive"));
        }
        if self.min_obstacle_height < 1
            || self.min_obstacle_height > self.max_obstacle_height(arena)
        {
            return Err(EnvError::InvalidConfig("obstacle height range is empty"));
        }
        if self.max_obstacles == 0 {
            return Err(EnvError::InvalidConfig("at least one obstacle must be allowed"));
        }
        Ok(())
    }
}

// =============================================================================
// Task / episode / run
// =============================================================================

/// Which task to run, with its parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum TaskConfig {
    Seek(SeekConfig),
    Sensing(SensingConfig),
    Jump(JumpConfig),
}

impl TaskConfig {
    /// Short task name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TaskConfig::Seek(_) => "seek",
            TaskConfig::Sensing(_) => "sensing",
            TaskConfig::Jump(_) => "jump",
        }
    }

    /// Tick budget the task was tuned with.
    #[must_use]
    pub fn default_ticks(&self) -> usize {
        match self {
            TaskConfig::Seek(_) => 1000,
            TaskConfig::Sensing(_) => 200,
            TaskConfig::Jump(_) => 1500,
        }
    }

    /// Check the task parameters against the arena.
    pub fn validate(&self, arena: &ArenaConfig) -> Result<()> {
        arena.validate()?;
        match self {
            TaskConfig::Seek(c) => c.validate(arena),
            TaskConfig::Sensing(c) => c.validate(arena),
            TaskConfig::Jump(c) => c.validate(arena),
        }
    }
}

impl Default for TaskConfig {
    fn default() -> Self {
        TaskConfig::Seek(SeekConfig::default())
    }
}

/// Per-episode settings.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeConfig {
    /// Maximum ticks before the episode is truncated.
    pub max_ticks: usize,
    /// Stop at the first terminal event instead of running out the budget.
    pub end_on_terminal: bool,
    /// Playback rate stamped on recorded frames; has no effect on fitness.
    pub frame_rate: u32,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self {
            max_ticks: 1000,
            end_on_terminal: true,
            frame_rate: 120,
        }
    }
}

impl EpisodeConfig {
    /// Episode settings with the given tick budget.
    #[must_use]
    pub fn with_max_ticks(mut self, ticks: usize) -> Self {
        self.max_ticks = ticks;
        self
    }

    /// Keep stepping after terminal events (events still score).
    #[must_use]
    pub fn continue_after_terminal(mut self) -> Self {
        self.end_on_terminal = false;
        self
    }

    /// Set the recorded playback rate.
    #[must_use]
    pub fn with_frame_rate(mut self, fps: u32) -> Self {
        self.frame_rate = fps;
        self
    }

    /// Check the episode settings.
    pub fn validate(&self) -> Result<()> {
        if self.max_ticks == 0 {
            return Err(EnvError::InvalidConfig("tick budget must be non-zero"));
        }
        Ok(())
    }
}

/// Complete description of an evaluation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub arena: ArenaConfig,
    pub task: TaskConfig,
    pub episode: EpisodeConfig,
    /// Base seed; episode `i` of a population uses `seed + i`.
    #[serde(default)]
    pub seed: u64,
}

impl RunConfig {
    /// Run config for `task` using the task's tuned tick budget.
    pub fn new(task: TaskConfig) -> Self {
        let episode = EpisodeConfig::default().with_max_ticks(task.default_ticks());
        Self {
            arena: ArenaConfig::default(),
            task,
            episode,
            seed: 0,
        }
    }

    /// Set the arena size.
    #[must_use]
    pub fn with_arena(mut self, arena: ArenaConfig) -> Self {
        self.arena = arena;
        self
    }

    /// Replace episode settings.
    #[must_use]
    pub fn with_episode(mut self, episode: EpisodeConfig) -> Self {
        self.episode = episode;
        self
    }

    /// Set the tick budget.
    #[must_use]
    pub fn with_max_ticks(mut self, ticks: usize) -> Self {
        self.episode.max_ticks = ticks;
        self
    }

    /// Set the base seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Parse and validate a JSON run description.
    ///
    /// When `episode` is omitted the task's tuned tick budget is used.
    pub fn from_json_str(json: &str) -> Result<Self> {
        #[derive(Deserialize)]
        struct Raw {
            #[serde(default)]
            arena: ArenaConfig,
            task: TaskConfig,
            episode: Option<EpisodeConfig>,
            #[serde(default)]
            seed: u64,
        }

        let raw: Raw = serde_json::from_str(json)
            .map_err(|_| EnvError::InvalidConfig("malformed run config JSON"))?;
        let episode = raw
            .episode
            .unwrap_or_else(|| EpisodeConfig::default().with_max_ticks(raw.task.default_ticks()));
        let config = Self {
            arena: raw.arena,
            task: raw.task,
            episode,
            seed: raw.seed,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate every part of the run.
    pub fn validate(&self) -> Result<()> {
        self.task.validate(&self.arena)?;
        self.episode.validate()
    }
}
