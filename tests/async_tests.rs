#![cfg(feature = "async")]

use gp_bayesopt::prelude::*;

#[tokio::test]
async fn test_handle_init_and_step() {
    let handle = WorkerHandle::spawn(Worker::with_builder(SessionBuilder::new().seed(21)));

    let init = handle.init("sin_x_x", 3).await.unwrap();
    assert_eq!(init.samples.len(), 3);

    let step = handle.step(0.01).await.unwrap();
    assert_eq!(step.iteration, 1);
    assert_eq!(step.samples.len(), 4);
    assert_eq!(&step.samples[..3], init.samples.as_slice());
}

#[tokio::test]
async fn test_step_before_init_is_reported() {
    let handle = WorkerHandle::spawn(Worker::new());
    assert!(matches!(
        handle.step(0.01).await,
        Err(Error::SessionNotInitialized)
    ));

    // The task keeps serving after an error reply.
    handle.init("forrester", 2).await.unwrap();
    assert_eq!(handle.step(0.01).await.unwrap().iteration, 1);
}

#[tokio::test]
async fn test_replies_follow_submission_order() {
    let handle = WorkerHandle::spawn(Worker::with_builder(SessionBuilder::new().seed(5)));
    handle.init("gramacy_lee", 3).await.unwrap();

    let mut iterations = Vec::new();
    for _ in 0..5 {
        match handle
            .request(Request::Step { exploration: 0.01 })
            .await
            .unwrap()
        {
            Response::Step(step) => iterations.push(step.iteration),
            Response::Init(_) => panic!("expected a step reply"),
        }
    }
    assert_eq!(iterations, vec![1, 2, 3, 4, 5]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_requests_from_cloned_handles() {
    let handle = WorkerHandle::spawn(Worker::with_builder(SessionBuilder::new().seed(9)));
    handle.init("sin_x_x", 2).await.unwrap();

    let mut tasks = Vec::new();
    for _ in 0..8 {
        let h = handle.clone();
        tasks.push(tokio::spawn(async move { h.step(0.01).await }));
    }

    let mut iterations = Vec::new();
    for task in tasks {
        let step = task.await.unwrap().unwrap();
        assert_eq!(step.samples.len(), 2 + step.iteration as usize);
        iterations.push(step.iteration);
    }
    iterations.sort_unstable();
    assert_eq!(iterations, (1..=8).collect::<Vec<u32>>());
}

#[tokio::test]
async fn test_matches_synchronous_session() {
    let handle = WorkerHandle::spawn(Worker::with_builder(SessionBuilder::new().seed(31)));
    let init = handle.init("forrester", 3).await.unwrap();
    let mut steps = Vec::new();
    for _ in 0..3 {
        steps.push(handle.step(0.1).await.unwrap());
    }

    let (mut session, direct_init) = Session::builder()
        .seed(31)
        .initialize("forrester", 3)
        .unwrap();
    assert_eq!(init, direct_init);
    assert_eq!(steps, session.run(3, 0.1).unwrap());
}
