//! Wildcard pattern registration and matching.

mod common;

use common::{expect_hit, hit, TestDispatcher};
use path_router::routing::{RouteError, RouteOutcome, ScanMode};
use path_router::routing::DispatcherBuilder;

fn sensor_dispatcher() -> TestDispatcher {
    let dispatcher = TestDispatcher::new();
    dispatcher.add("GET", "/device/sensor/*", hit("sensor")).unwrap();
    dispatcher
}

#[test]
fn test_prefix_alone_does_not_match() {
    let dispatcher = sensor_dispatcher();
    assert_eq!(dispatcher.resolve("GET", "/device/sensor"), RouteOutcome::NotFound);
    assert_eq!(dispatcher.resolve("GET", "/device/sensor/"), RouteOutcome::NotFound);
}

#[test]
fn test_differing_prefix_does_not_match() {
    let dispatcher = sensor_dispatcher();
    assert_eq!(dispatcher.resolve("GET", "/device/actuator/x"), RouteOutcome::NotFound);
    assert_eq!(dispatcher.resolve("GET", "/devices/sensor/x"), RouteOutcome::NotFound);
}

#[test]
fn test_remainder_is_rejoined() {
    let dispatcher = sensor_dispatcher();
    for (path, remainder) in [
        ("/device/sensor/a", "a"),
        ("/device/sensor/a/b", "a/b"),
        ("/device/sensor/id/6230f/readings/latest", "id/6230f/readings/latest"),
    ] {
        let hit = expect_hit(dispatcher.route("GET", path, ()));
        assert_eq!(hit.params.wildcard(), Some(remainder), "{path}");
    }
}

#[test]
fn test_concrete_routes_win_over_wildcard() {
    let dispatcher = sensor_dispatcher();
    dispatcher.add("GET", "/device/sensor/{id}", hit("by-id")).unwrap();
    dispatcher.add("GET", "/device/sensor/count", hit("count")).unwrap();

    assert_eq!(expect_hit(dispatcher.route("GET", "/device/sensor/count", ())).label, "count");
    let hit = expect_hit(dispatcher.route("GET", "/device/sensor/6230f", ()));
    assert_eq!(hit.label, "by-id");
    assert_eq!(hit.params.get("id"), Some("6230f"));
    assert_eq!(expect_hit(dispatcher.route("GET", "/device/sensor/6230f/x", ())).label, "sensor");
}

#[test]
fn test_catch_all() {
    let dispatcher = TestDispatcher::new();
    dispatcher.add("GET", "/*", hit("all")).unwrap();

    let hit = expect_hit(dispatcher.route("GET", "/anything/at/all", ()));
    assert_eq!(hit.params.wildcard(), Some("anything/at/all"));
    assert_eq!(dispatcher.resolve("GET", "/"), RouteOutcome::NotFound);
}

#[test]
fn test_parameter_in_wildcard_prefix() {
    let dispatcher: TestDispatcher = DispatcherBuilder::default().scan_mode(ScanMode::Full).build();
    dispatcher.add("GET", "/files/{bucket}/*", hit("files")).unwrap();

    let hit = expect_hit(dispatcher.route("GET", "/files/media/2024/cat.png", ()));
    assert_eq!(hit.params.get("bucket"), Some("media"));
    assert_eq!(hit.params.wildcard(), Some("2024/cat.png"));
}

#[test]
fn test_wildcard_method_not_allowed() {
    let dispatcher = sensor_dispatcher();
    assert_eq!(
        dispatcher.resolve("DELETE", "/device/sensor/x"),
        RouteOutcome::MethodNotAllowed
    );
}

#[test]
fn test_invalid_wildcards_rejected() {
    let dispatcher = TestDispatcher::new();
    for pattern in ["/cut/sheet/id*", "/a/*/b", "/a/*/*", "*", "/a/**"] {
        let err = dispatcher.add("GET", pattern, hit("bad")).unwrap_err();
        assert!(matches!(err, RouteError::InvalidWildcard { .. }), "{pattern}");
    }
    assert!(dispatcher.is_empty());
}

#[test]
fn test_wildcard_shape_conflicts_per_method() {
    let dispatcher = TestDispatcher::new();
    dispatcher.add("GET", "/a/{x}/*", hit("x")).unwrap();
    assert!(dispatcher.add("GET", "/a/{y}/*", hit("y")).is_err());
    assert!(dispatcher.add("POST", "/a/{y}/*", hit("y")).is_ok());
}

#[test]
fn test_wildcard_remainder_collapses_empty_segments() {
    let dispatcher = TestDispatcher::new();
    dispatcher.add("GET", "/device/sensor/*", hit("sensor")).unwrap();

    let hit = expect_hit(dispatcher.route("GET", "/device/sensor/a//b/", ()));
    assert_eq!(hit.params.wildcard(), Some("a/b"));
}
