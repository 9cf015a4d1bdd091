//! Integration tests for the optimization session.

use gp_bayesopt::objective::Problem;
use gp_bayesopt::prelude::*;

#[test]
fn test_sin_x_x_single_step() {
    let (mut session, init) = Session::initialize("sin_x_x", 3).expect("init should succeed");
    assert_eq!(init.samples.len(), 3);

    let step = session.step(0.01).expect("step should succeed");

    assert_eq!(step.iteration, 1);
    assert_eq!(step.samples.len(), 4);
    assert!(
        (0.0..=10.0).contains(&step.next_x),
        "next_x {} outside bounds",
        step.next_x
    );
    assert_eq!(step.grid.len(), DEFAULT_GRID_SIZE);
    assert_eq!(step.posterior_mean.len(), step.grid.len());
    assert_eq!(step.posterior_std.len(), step.grid.len());
    assert_eq!(step.ei_curve.len(), step.grid.len());
    assert_eq!(step.true_function_on_grid.len(), step.grid.len());
}

#[test]
fn test_sample_history_is_append_only() {
    let (mut session, init) = Session::builder()
        .seed(1)
        .initialize("gramacy_lee", 4)
        .unwrap();

    let mut previous = init.samples;
    for k in 1..=10 {
        let step = session.step(0.01).unwrap();
        assert_eq!(step.samples.len(), 4 + k);
        assert_eq!(&step.samples[..previous.len()], previous.as_slice());
        previous = step.samples;
    }
    assert_eq!(session.iteration(), 10);
    assert_eq!(session.samples(), previous);
}

#[test]
fn test_seeded_sessions_are_reproducible() {
    let run = || {
        let (mut session, init) = Session::builder()
            .seed(1234)
            .initialize("forrester", 3)
            .unwrap();
        let steps = session.run(6, 0.05).unwrap();
        (init, steps)
    };

    let (init_a, steps_a) = run();
    let (init_b, steps_b) = run();
    assert_eq!(init_a, init_b);
    assert_eq!(steps_a, steps_b);
}

#[test]
fn test_next_points_lie_on_grid() {
    let (mut session, _) = Session::builder()
        .seed(99)
        .grid_size(37)
        .initialize("sin_x_x", 2)
        .unwrap();
    for _ in 0..8 {
        let step = session.step(0.1).unwrap();
        assert!(step.grid.contains(&step.next_x));
        assert_eq!(step.grid.len(), 37);
    }
}

#[test]
fn test_posterior_outputs_are_well_formed() {
    let (mut session, init) = Session::builder()
        .seed(5)
        .initialize("gramacy_lee", 3)
        .unwrap();
    assert!(init.posterior_std.iter().all(|&s| s >= 0.0 && s.is_finite()));
    assert!(init.ei_curve.iter().all(|&e| e >= 0.0));

    for step in session.run(5, 0.01).unwrap() {
        assert!(step.posterior_std.iter().all(|&s| s >= 0.0 && s.is_finite()));
        assert!(step.posterior_mean.iter().all(|m| m.is_finite()));
        assert!(step.ei_curve.iter().all(|&e| e >= 0.0));
    }
}

#[test]
fn test_true_function_matches_catalog() {
    let (_, init) = Session::initialize("forrester", 2).unwrap();
    let problem = Problem::from_id(ObjectiveId::Forrester);
    for (x, y) in init.grid.iter().zip(&init.true_function_on_grid) {
        assert_eq!(problem.evaluate(*x), *y);
    }
}

#[test]
fn test_finds_minimum_of_smooth_function() {
    // f(x) = (x - 6)² / 10 - 1, minimum -1 at x = 6
    let problem = Problem::new(|x| (x - 6.0).powi(2) / 10.0 - 1.0, 0.0, 10.0).unwrap();
    for seed in 0..5 {
        let (mut session, _) = Session::builder()
            .seed(seed)
            .initialize_problem(problem, 3)
            .unwrap();
        session.run(8, 0.01).unwrap();

        let best = session.best().unwrap();
        assert!(
            best.y < -0.99,
            "seed {seed}: best f({}) = {} should be near -1",
            best.x,
            best.y
        );
    }
}

#[test]
fn test_flat_objective_repeats_points_without_panicking() {
    // A two-point grid forces repeated samples, so the covariance matrix
    // gains duplicate rows.
    let problem = Problem::new(|_| 1.0, 0.0, 1.0).unwrap();
    let (mut session, _) = Session::builder()
        .seed(0)
        .grid_size(2)
        .initialize_problem(problem, 2)
        .unwrap();

    let steps = session.run(5, 0.01).unwrap();
    for step in &steps {
        assert!(step.posterior_mean.iter().all(|m| m.is_finite()));
        assert!(step.posterior_std.iter().all(|s| s.is_finite()));
    }
    assert_eq!(session.n_samples(), 7);
    assert!(session.x()[2..].iter().all(|&x| x == 0.0 || x == 1.0));
}

#[test]
fn test_duplicate_inputs_with_different_targets() {
    let params = KernelParams::new(1.0, 1.0, 0.0).unwrap();
    let mut gp = GaussianProcess::new(params);
    gp.fit(&[2.0, 2.0], &[1.0, -1.0])
        .expect("degenerate covariance should be regularized");

    let factor = gp.cholesky_factor().unwrap();
    assert!(factor.l().iter().all(|v| v.is_finite()));

    let posterior = gp.predict(&[1.0, 2.0, 3.0]).unwrap();
    assert!(posterior.variance.iter().all(|&v| v >= 0.0));
}

#[test]
fn test_custom_kernel_params_are_used() {
    let params = KernelParams::new(4.0, 0.1, 1e-3).unwrap();
    let (session, _) = Session::builder()
        .kernel_params(params)
        .seed(2)
        .initialize("forrester", 3)
        .unwrap();
    assert_eq!(session.kernel_params(), &params);
}

#[test]
fn test_errors_surface_immediately() {
    assert!(matches!(
        Session::initialize("ackley", 3),
        Err(Error::UnknownObjective(name)) if name == "ackley"
    ));

    let (mut session, _) = Session::builder().seed(3).initialize("sin_x_x", 3).unwrap();
    assert!(matches!(
        session.step(-0.5),
        Err(Error::InvalidExploration(_))
    ));
    assert_eq!(session.n_samples(), 3);
    assert_eq!(session.iteration(), 0);
}
