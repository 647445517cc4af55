//! Integration tests for episodes, evaluation and recording.

use evo_arcade::controller::{ConstantController, Controller, FnController, LinearController};
use evo_arcade::core::{
    EnvError, EpisodeConfig, JumpConfig, Result, RunConfig, SeekConfig, SensingConfig, TaskConfig,
    Vec2,
};
use evo_arcade::env::TickEvent;
use evo_arcade::episode::{Episode, FrameRecorder, Termination};
use evo_arcade::eval::{evaluate, EvaluationStats, Evaluator};

/// Controller that fails after a fixed number of calls.
struct Flaky {
    calls: std::cell::Cell<usize>,
    fail_at: usize,
}

impl Controller for Flaky {
    fn activate(&self, _inputs: &[f32]) -> Result<Vec<f32>> {
        let n = self.calls.get();
        self.calls.set(n + 1);
        if n == self.fail_at {
            Err(EnvError::Controller("network exploded".into()))
        } else {
            Ok(vec![1.0, 0.0, 0.0, 0.0])
        }
    }
}

// =============================================================================
// Episode lifecycle
// =============================================================================

#[test]
fn test_length_is_budget_without_terminal() {
    let config = RunConfig::new(TaskConfig::Jump(JumpConfig::default())).with_max_ticks(321);
    let mut episode = Episode::from_config(&config, 0).unwrap();
    let summary = episode.run(&ConstantController::one_hot(0, 2), None).unwrap();
    assert_eq!(summary.ticks, 321);
    assert_eq!(summary.termination, Termination::BudgetExhausted);
}

#[test]
fn test_controller_error_surfaces() {
    let config = RunConfig::new(TaskConfig::Seek(SeekConfig::default()));
    let mut episode = Episode::from_config(&config, 0).unwrap();
    assert!(episode.env_mut().set_target_center(Vec2::new(400.0, 400.0)));
    let flaky = Flaky {
        calls: std::cell::Cell::new(0),
        fail_at: 3,
    };

    for _ in 0..3 {
        episode.step(&flaky).unwrap();
    }
    let fitness = episode.fitness();
    let err = episode.step(&flaky).unwrap_err();
    assert_eq!(err, EnvError::Controller("network exploded".into()));
    assert_eq!(err.to_string(), "controller failed: network exploded");
    assert_eq!(episode.fitness(), fitness);
    assert_eq!(episode.tick(), 3);

    // The same tick can be retried
    episode.step(&flaky).unwrap();
    assert_eq!(episode.tick(), 4);
}

#[test]
fn test_non_finite_output_rejected() {
    let config = RunConfig::new(TaskConfig::Seek(SeekConfig::default()));
    let mut episode = Episode::from_config(&config, 0).unwrap();
    let nan = ConstantController::new(vec![0.0, f32::NAN, 0.0, 0.0]);
    assert!(matches!(
        episode.step(&nan),
        Err(EnvError::NonFiniteOutput { index: 1 })
    ));
    assert_eq!(episode.tick(), 0);
}

#[test]
fn test_linear_controller_drives_seek() {
    // inputs [dx, dy, d]; outputs [up, down, left, right]
    // up ~ dy, down ~ -dy, left ~ dx, right ~ -dx
    let weights = vec![
        0.0, 1.0, 0.0, //
        0.0, -1.0, 0.0, //
        1.0, 0.0, 0.0, //
        -1.0, 0.0, 0.0,
    ];
    let controller = LinearController::new(3, weights, vec![0.0; 4]).unwrap();
    let config = RunConfig::new(TaskConfig::Seek(SeekConfig::default()));

    let mut reached = 0;
    for seed in 0..10 {
        let mut episode = Episode::from_config(&config, seed).unwrap();
        let summary = episode.run(&controller, None).unwrap();
        if summary.termination == Termination::Terminal(TickEvent::GoalReached) {
            reached += 1;
            assert!(summary.fitness > 0.0);
        }
    }
    assert_eq!(reached, 10);
}

// =============================================================================
// Evaluation boundary
// =============================================================================

#[test]
fn test_evaluate_from_json() {
    let json = r#"{
        "task": { "task": "sensing", "history_len": 10 },
        "episode": { "max_ticks": 50 },
        "seed": 9
    }"#;
    let config = RunConfig::from_json_str(json).unwrap();
    assert_eq!(config.task, TaskConfig::Sensing(SensingConfig::default().with_history_len(10)));

    let up = ConstantController::one_hot(0, 4);
    let a = evaluate(&up, &config).unwrap();
    let b = evaluate(&up, &config).unwrap();
    assert_eq!(a.to_bits(), b.to_bits());
}

#[test]
fn test_population_stats() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    let config = RunConfig::new(TaskConfig::Jump(JumpConfig::default())).with_max_ticks(400);
    let evaluator = Evaluator::new(config).unwrap();
    let controllers: Vec<Box<dyn Controller>> = vec![
        Box::new(ConstantController::one_hot(0, 2)),
        Box::new(FnController::new(|inputs: &[f32]| {
            if inputs[1] > 0.5 && inputs[0] < 140.0 {
                vec![0.0, 1.0]
            } else {
                vec![1.0, 0.0]
            }
        })),
    ];

    let summaries = evaluator.run_population(&controllers).unwrap();
    let stats = EvaluationStats::from_summaries(&summaries);
    assert_eq!(stats.count, 2);
    assert_eq!(stats.total_ticks, 800);
    assert!(stats.max >= stats.mean && stats.mean >= stats.min);

    let fitness = evaluator.evaluate_population(&controllers).unwrap();
    assert_eq!(fitness, summaries.iter().map(|s| s.fitness).collect::<Vec<_>>());
}

#[test]
fn test_recording_roundtrip_through_bytes() {
    let config = RunConfig::new(TaskConfig::Seek(SeekConfig::default()))
        .with_episode(EpisodeConfig::default().with_max_ticks(30).with_frame_rate(30));
    let evaluator = Evaluator::new(config).unwrap();

    let (summary, recorder) = evaluator.record(&ConstantController::one_hot(1, 4), 0).unwrap();
    assert_eq!(recorder.len(), summary.ticks);
    assert_eq!(recorder.frame_rate, 30);

    let restored = FrameRecorder::from_bytes(&recorder.to_bytes().unwrap()).unwrap();
    assert_eq!(restored, recorder);
    let ticks: Vec<usize> = restored.frames().iter().map(|f| f.tick).collect();
    assert_eq!(ticks, (0..summary.ticks).collect::<Vec<_>>());
}
