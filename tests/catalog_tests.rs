//! Every catalog objective driven through the public session API.

use gp_bayesopt::objective::Problem;
use gp_bayesopt::prelude::*;

#[test]
fn test_every_objective_initializes_and_steps() {
    for id in ObjectiveId::ALL {
        let (low, high) = id.bounds();
        let (mut session, init) = Session::builder()
            .seed(17)
            .initialize(id.name(), 3)
            .unwrap_or_else(|e| panic!("{id}: {e}"));

        assert_eq!(session.problem().id(), Some(id));
        assert_eq!(init.grid.first().copied(), Some(low));
        assert!((init.grid.last().unwrap() - high).abs() < 1e-12);
        assert!(init.samples.iter().all(|s| s.x >= low && s.x < high));

        for step in session.run(4, 0.01).unwrap() {
            assert!(
                (low..=high).contains(&step.next_x),
                "{id}: next_x {} outside [{low}, {high}]",
                step.next_x
            );
        }
        assert_eq!(session.n_samples(), 7);
    }
}

#[test]
fn test_samples_match_objective() {
    for id in ObjectiveId::ALL {
        let problem = Problem::from_id(id);
        let (mut session, _) = Session::builder().seed(8).initialize(id.name(), 2).unwrap();
        session.run(3, 0.05).unwrap();
        for sample in session.samples() {
            assert_eq!(sample.y, problem.evaluate(sample.x));
        }
    }
}

#[test]
fn test_best_never_worsens() {
    for id in ObjectiveId::ALL {
        let (mut session, _) = Session::builder().seed(3).initialize(id.name(), 3).unwrap();
        let mut best = session.best().unwrap().y;
        for _ in 0..6 {
            session.step(0.01).unwrap();
            let current = session.best().unwrap().y;
            assert!(current <= best, "{id}: best rose from {best} to {current}");
            best = current;
        }
    }
}

#[test]
fn test_identifiers_are_case_sensitive() {
    for name in ["Forrester", "SIN_X_X", "gramacy-lee", ""] {
        assert!(matches!(
            Session::initialize(name, 3),
            Err(Error::UnknownObjective(_))
        ));
    }
}
