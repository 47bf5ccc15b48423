//! End-to-end run scenarios through the public API.

use std::ops::ControlFlow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use u_swarm::abc::{Abc, AbcConfig};
use u_swarm::engine::{Bound, Engine, EngineConfig, Metaheuristic, Snapshot};
use u_swarm::gwo::{Gwo, GwoConfig};
use u_swarm::request::{Algorithm, AlgorithmRequest};
use u_swarm::sfla::{Sfla, SflaConfig};
use u_swarm::{SwarmError, ValidationError};

fn square_bounds() -> Vec<Bound> {
    vec![Bound::new(-5.0, 5.0); 2]
}

#[test]
fn test_zero_iterations_emit_only_the_initial_state() {
    let population = vec![
        vec![3.0, 4.0],
        vec![-1.0, 2.0],
        vec![0.5, -0.5],
        vec![-2.0, -2.0],
    ];
    for algorithm in Algorithm::ALL {
        let engine = EngineConfig::default()
            .with_bounds(square_bounds())
            .with_population(population.clone())
            .with_iterations(0)
            .with_seed(1);
        let request = AlgorithmRequest::with_defaults(algorithm, "x*x + y*y", engine);
        let mut optimizer = request.into_optimizer().unwrap();

        let mut snapshots: Vec<Snapshot> = Vec::new();
        let result = optimizer.run_with_sink(&mut snapshots);

        assert_eq!(snapshots.len(), 1, "{algorithm}");
        assert_eq!(snapshots[0].iteration, 0);
        assert_eq!(snapshots[0].positions, population);
        assert_eq!(result.best_value, 0.5);
        assert_eq!(result.best_position, vec![0.5, -0.5]);
        assert!(!result.cancelled);
    }
}

#[test]
fn test_abc_zero_limit_scouts_in_the_same_iteration() {
    let population = vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0], vec![4.0, 4.0]];
    let config = EngineConfig::default()
        .with_bounds(square_bounds())
        .with_population(population.clone())
        .with_iterations(1)
        .with_seed(13);
    // nothing can improve on a flat objective
    let engine = Engine::new(|_: &[f64]| 0.0, &config).unwrap();
    let mut abc = Abc::new(engine, &AbcConfig::default().with_limit(0).with_forager_size(2)).unwrap();

    let mut snapshots: Vec<Snapshot> = Vec::new();
    abc.run_with_sink(&mut snapshots);

    let after = &snapshots[1].positions;
    assert_ne!(after[0], population[0]);
    assert_ne!(after[1], population[1]);
    // observers never move
    assert_eq!(after[2], population[2]);
    assert_eq!(after[3], population[3]);
    assert_eq!(abc.trials(), &[0, 0]);
}

#[test]
fn test_gwo_single_member_runs_without_lower_ranks() {
    let config = EngineConfig::default()
        .with_bounds(square_bounds())
        .with_population_size(1)
        .with_iterations(15)
        .with_seed(2);
    let engine = Engine::from_formula("x*x + y*y", &config).unwrap();
    let mut gwo = Gwo::new(engine, &GwoConfig::default()).unwrap();

    let result = gwo.run();

    assert_eq!(result.iterations, 15);
    assert!(result.best_value.is_finite());
    assert!(!gwo.beta().is_set());
    assert!(gwo.beta().value.is_infinite());
    assert!(!gwo.delta().is_set());
    assert!(gwo.delta().value.is_infinite());
}

#[test]
fn test_sfla_worst_moves_and_order_changes() {
    let config = EngineConfig::default()
        .with_bounds(square_bounds())
        .with_population_size(10)
        .with_iterations(10)
        .with_seed(5);
    let engine = Engine::from_formula("x*x + y*y", &config).unwrap();
    let sfla_config = SflaConfig::default()
        .with_subpopulations(1)
        .with_inner_iterations(1);
    let mut sfla = Sfla::new(engine, &sfla_config).unwrap();

    let mut snapshots: Vec<Snapshot> = Vec::new();
    sfla.run_with_sink(&mut snapshots);

    for window in snapshots.windows(2) {
        let (before, after) = (&window[0].positions, &window[1].positions);
        let moved = before.iter().filter(|p| !after.contains(p)).count();
        assert_eq!(moved, 1, "exactly one frog leaps per iteration");
        assert_ne!(before, after);
    }
}

#[test]
fn test_sink_failure_stops_all_work() {
    for algorithm in Algorithm::ALL {
        let evaluations = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&evaluations);
        let objective = move |x: &[f64]| {
            counter.fetch_add(1, Ordering::SeqCst);
            x.iter().map(|v| v * v).sum::<f64>()
        };
        let config = EngineConfig::default()
            .with_bounds(square_bounds())
            .with_population_size(8)
            .with_iterations(20)
            .with_seed(17);
        let engine = Engine::new(objective, &config).unwrap();

        let mut last: Option<Snapshot> = None;
        let mut evaluations_at_stop = 0;
        let mut sink = |snapshot: Snapshot| {
            let stop = snapshot.iteration == 3;
            last = Some(snapshot);
            if stop {
                evaluations_at_stop = evaluations.load(Ordering::SeqCst);
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        };

        let result = match algorithm {
            Algorithm::Abc => Abc::new(engine, &AbcConfig::default()).unwrap().run_with_sink(&mut sink),
            Algorithm::Afsa => u_swarm::afsa::Afsa::new(engine, &Default::default())
                .unwrap()
                .run_with_sink(&mut sink),
            Algorithm::Firefly => u_swarm::fa::Firefly::new(engine, &Default::default())
                .unwrap()
                .run_with_sink(&mut sink),
            Algorithm::Gwo => Gwo::new(engine, &GwoConfig::default()).unwrap().run_with_sink(&mut sink),
            Algorithm::Sfla => Sfla::new(engine, &SflaConfig::default()).unwrap().run_with_sink(&mut sink),
        };

        let last = last.unwrap();
        assert!(result.cancelled, "{algorithm}");
        assert_eq!(result.iterations, 3);
        assert_eq!(result.best_value, last.best_value);
        assert_eq!(result.best_position, last.best_position);
        assert_eq!(evaluations.load(Ordering::SeqCst), evaluations_at_stop, "{algorithm}");
    }
}

#[test]
fn test_mismatch_is_rejected_before_any_evaluation() {
    let config = EngineConfig::default()
        .with_bounds(vec![Bound::new(-1.0, 1.0); 3])
        .with_population(vec![vec![0.0, 0.0]; 4]);
    let result = Engine::new(|_: &[f64]| -> f64 { panic!("evaluated") }, &config);
    assert!(matches!(
        result,
        Err(ValidationError::DimensionMismatch { .. })
    ));

    let request = AlgorithmRequest::with_defaults(Algorithm::Abc, "x + ", config);
    assert!(matches!(
        request.into_optimizer(),
        Err(SwarmError::Validation(ValidationError::DimensionMismatch { .. }))
    ));
}

#[test]
fn test_unseeded_runs_still_work() {
    let config = EngineConfig::default()
        .with_population_size(6)
        .with_dimensions(2)
        .with_iterations(3);
    let request = AlgorithmRequest::with_defaults(Algorithm::Firefly, "abs(x) + abs(y)", config);
    let mut optimizer = request.into_optimizer().unwrap();
    let result = optimizer.run();
    assert_eq!(result.value_history.len(), 4);
    for p in optimizer.engine().positions() {
        assert!(p.iter().all(|v| (-100.0..=100.0).contains(v)));
    }
}
