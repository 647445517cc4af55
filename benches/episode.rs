use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use evo_arcade::controller::{ConstantController, FnController};
use evo_arcade::core::{JumpConfig, RunConfig, SeekConfig, SensingConfig, SensorMode, TaskConfig};
use evo_arcade::episode::Episode;
use evo_arcade::eval::Evaluator;
use std::time::Duration;

fn bench_episodes(c: &mut Criterion) {
    let mut group = c.benchmark_group("episode");
    group.sample_size(30);
    group.measurement_time(Duration::from_secs(5));

    let tasks = [
        ("seek", TaskConfig::Seek(SeekConfig::default())),
        ("sensing_rays", TaskConfig::Sensing(SensingConfig::default())),
        (
            "sensing_range_offset",
            TaskConfig::Sensing(SensingConfig::default().with_sensor(SensorMode::RangeOffset)),
        ),
    ];
    // Circle clockwise so episodes run the whole budget
    let circler = FnController::new(|inputs: &[f32]| {
        let phase = (inputs.iter().sum::<f32>() as i64).rem_euclid(4) as usize;
        let mut out = vec![0.0; 4];
        out[phase] = 1.0;
        out
    });

    for (name, task) in tasks {
        let config = RunConfig::new(task).with_max_ticks(1000);
        group.bench_function(name, |b| {
            b.iter_batched(
                || Episode::from_config(&config, 7).expect("episode"),
                |mut episode| episode.run(&circler, None).expect("run"),
                BatchSize::SmallInput,
            );
        });
    }

    let jump = RunConfig::new(TaskConfig::Jump(JumpConfig::default()));
    let stay = ConstantController::one_hot(0, 2);
    group.bench_function("jump", |b| {
        b.iter_batched(
            || Episode::from_config(&jump, 7).expect("episode"),
            |mut episode| episode.run(&stay, None).expect("run"),
            BatchSize::SmallInput,
        );
    });
    group.finish();
}

fn bench_population(c: &mut Criterion) {
    let config = RunConfig::new(TaskConfig::Jump(JumpConfig::default())).with_max_ticks(500);
    let evaluator = Evaluator::new(config).expect("evaluator");
    let population: Vec<ConstantController> = (0..32)
        .map(|i| ConstantController::one_hot(i % 2, 2))
        .collect();

    c.bench_function("population_32_jump", |b| {
        b.iter(|| evaluator.evaluate_population(&population).expect("population"));
    });
}

criterion_group!(benches, bench_episodes, bench_population);
criterion_main!(benches);
