//! Episode driver: owns one environment and its fitness accumulator.

use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::controller::Controller;
use crate::core::{EnvError, EpisodeConfig, Result, RunConfig};
use crate::env::{Environment, Task, TickEvent};

use super::frame::{Frame, FrameSink};

/// Why an episode stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// A terminal event fired and the config stops on terminal events.
    Terminal(TickEvent),
    /// The tick budget ran out.
    BudgetExhausted,
}

/// What happened during one `Episode::step`.
#[derive(Clone, Debug, PartialEq)]
pub struct StepReport {
    /// Index of the tick just stepped.
    pub tick: usize,
    /// Reward delta of this tick.
    pub reward: f64,
    /// Fitness after this tick.
    pub fitness: f64,
    pub events: SmallVec<[TickEvent; 4]>,
    /// Set when this tick ended the episode.
    pub finished: Option<Termination>,
}

/// Final result of an episode.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EpisodeSummary {
    pub fitness: f64,
    /// Ticks actually stepped.
    pub ticks: usize,
    pub termination: Termination,
    /// Wall-clock time from the first step to the end.
    pub elapsed: Duration,
    /// How often each event fired.
    pub tallies: FxHashMap<TickEvent, u32>,
}

impl EpisodeSummary {
    /// Number of times `event` fired.
    #[must_use]
    pub fn count(&self, event: TickEvent) -> u32 {
        self.tallies.get(&event).copied().unwrap_or(0)
    }

    /// Obstacles cleared (jump task).
    #[must_use]
    pub fn dodged(&self) -> u32 {
        self.count(TickEvent::Dodged)
    }
}

/// One bounded run of an environment under a controller.
///
/// Fitness starts at zero and is only ever changed by a fully successful
/// tick: if the controller or decoding fails, the error is returned and the
/// episode state is left as it was.
#[derive(Clone, Debug)]
pub struct Episode<E: Environment> {
    env: E,
    config: EpisodeConfig,
    fitness: f64,
    tick: usize,
    /// Whether `begin_tick` already ran for `tick`.
    tick_started: bool,
    termination: Option<Termination>,
    tallies: FxHashMap<TickEvent, u32>,
    started: Option<Instant>,
    elapsed: Duration,
}

impl Episode<Task> {
    /// Build a validated episode of the configured task.
    pub fn from_config(config: &RunConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let task = Task::new(&config.task, config.arena, seed)?;
        Ok(Self::new(task, config.episode))
    }
}

impl<E: Environment> Episode<E> {
    /// Wrap a freshly built environment.
    pub fn new(env: E, config: EpisodeConfig) -> Self {
        Self {
            env,
            config,
            fitness: 0.0,
            tick: 0,
            tick_started: false,
            termination: None,
            tallies: FxHashMap::default(),
            started: None,
            elapsed: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Mutable access, for drivers that steer parts of the world.
    pub fn env_mut(&mut self) -> &mut E {
        &mut self.env
    }

    #[must_use]
    pub fn config(&self) -> &EpisodeConfig {
        &self.config
    }

    #[must_use]
    pub fn fitness(&self) -> f64 {
        self.fitness
    }

    /// Ticks stepped so far.
    #[must_use]
    pub fn tick(&self) -> usize {
        self.tick
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.termination.is_some()
    }

    #[must_use]
    pub fn termination(&self) -> Option<Termination> {
        self.termination
    }

    #[must_use]
    pub fn tallies(&self) -> &FxHashMap<TickEvent, u32> {
        &self.tallies
    }

    /// Run one tick: sense, decide, move, score, check terminal.
    pub fn step<C: Controller + ?Sized>(&mut self, controller: &C) -> Result<StepReport> {
        if self.termination.is_some() {
            return Err(EnvError::EpisodeFinished);
        }
        let started = *self.started.get_or_insert_with(Instant::now);

        if !self.tick_started {
            self.env.begin_tick(self.tick);
            self.tick_started = true;
        }

        let observation = self.env.observe();
        let outputs = controller.activate(observation.as_slice())?;
        let decision = self.env.decision_kind().decode(&outputs)?;
        let outcome = self.env.advance(decision)?;

        let tick = self.tick;
        self.tick += 1;
        self.tick_started = false;
        self.fitness += outcome.reward;
        for &event in &outcome.events {
            *self.tallies.entry(event).or_insert(0) += 1;
        }

        let terminal = outcome.terminal_event();
        if let Some(event) = terminal {
            trace!(tick, ?event, fitness = self.fitness, "terminal event");
        }
        self.termination = match terminal {
            Some(event) if self.config.end_on_terminal => Some(Termination::Terminal(event)),
            _ if self.tick >= self.config.max_ticks => Some(Termination::BudgetExhausted),
            _ => None,
        };
        if self.termination.is_some() {
            self.elapsed = started.elapsed();
        }

        Ok(StepReport {
            tick,
            reward: outcome.reward,
            fitness: self.fitness,
            events: outcome.events,
            finished: self.termination,
        })
    }

    /// Snapshot of the current geometry, stamped with the last stepped tick.
    #[must_use]
    pub fn frame(&self) -> Frame {
        Frame {
            tick: self.tick.saturating_sub(1),
            fitness: self.fitness,
            shapes: self.env.shapes(),
        }
    }

    /// Step until the episode finishes, optionally recording every tick.
    pub fn run<C: Controller + ?Sized>(
        &mut self,
        controller: &C,
        mut sink: Option<&mut dyn FrameSink>,
    ) -> Result<EpisodeSummary> {
        while !self.is_finished() {
            self.step(controller)?;
            if let Some(sink) = sink.as_deref_mut() {
                sink.record(&self.frame());
            }
        }

        let summary = self.summary()?;
        debug!(
            task = self.env.name(),
            fitness = summary.fitness,
            ticks = summary.ticks,
            termination = ?summary.termination,
            elapsed_ms = summary.elapsed.as_millis() as u64,
            "episode finished"
        );
        Ok(summary)
    }

    /// Summary of a finished episode.
    pub fn summary(&self) -> Result<EpisodeSummary> {
        let termination = self.termination.ok_or(EnvError::EpisodeRunning)?;
        Ok(EpisodeSummary {
            fitness: self.fitness,
            ticks: self.tick,
            termination,
            elapsed: self.elapsed,
            tallies: self.tallies.clone(),
        })
    }
}
