//! Concurrent routing over a shared dispatcher.

mod common;

use std::sync::Arc;
use std::thread;

use common::{expect_hit, hit, TestDispatcher};
use path_router::routing::RouteError;

fn populated() -> TestDispatcher {
    let dispatcher = TestDispatcher::new();
    dispatcher.add("GET", "/service/shutdown", hit("shutdown")).unwrap();
    dispatcher.add("GET", "/service/candy/{kind}", hit("candy")).unwrap();
    dispatcher.add("GET", "/device/sensor/*", hit("sensor")).unwrap();
    for i in 0..50 {
        dispatcher
            .add("GET", &format!("/bulk/{i}/{{id}}"), hit("bulk"))
            .unwrap();
    }
    dispatcher
}

#[test]
fn test_parallel_routing_is_consistent() {
    let dispatcher = Arc::new(populated());

    thread::scope(|scope| {
        for t in 0..8 {
            let dispatcher = Arc::clone(&dispatcher);
            scope.spawn(move || {
                for i in 0..500 {
                    let kind = format!("kind-{t}-{i}");
                    let hit = expect_hit(dispatcher.route("GET", &format!("/service/candy/{kind}"), ()));
                    assert_eq!(hit.params.get("kind"), Some(kind.as_str()));

                    let hit = expect_hit(dispatcher.route("GET", &format!("/bulk/{}/{i}", i % 50), ()));
                    assert_eq!(hit.params.get("id"), Some(i.to_string().as_str()));

                    let hit = expect_hit(dispatcher.route("GET", "/device/sensor/a/b", ()));
                    assert_eq!(hit.params.wildcard(), Some("a/b"));

                    assert!(dispatcher.route("POST", "/service/shutdown", ()).unwrap().is_none());
                }
            });
        }
    });
}

#[test]
fn test_parallel_registration_is_serialised() {
    let dispatcher = TestDispatcher::new();

    let failures: usize = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let dispatcher = &dispatcher;
                scope.spawn(move || {
                    let mut failures = 0;
                    for i in 0..25 {
                        match dispatcher.add("GET", &format!("/shared/{i}/{{id}}"), hit("shared")) {
                            Ok(_) => {}
                            Err(RouteError::DuplicateRoute { .. }) => failures += 1,
                            Err(other) => panic!("unexpected error: {other}"),
                        }
                    }
                    failures
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    // Exactly one registration per pattern wins.
    assert_eq!(dispatcher.len(), 25);
    assert_eq!(failures, 7 * 25);
}
