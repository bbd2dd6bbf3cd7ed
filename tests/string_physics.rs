//! Integration tests for the string physics engine

use pretty_assertions::assert_eq;

use threadboard::board::{Connector, NodeBoxes};
use threadboard::geometry::{Point, Rect};
use threadboard::physics::{RegisterOutcome, StringPhysics, MAX_CONNECTIONS, POINTS_COUNT};

fn connector(id: &str, from: &str, to: &str, from_port: &str, to_port: &str) -> Connector {
    Connector {
        id: id.to_string(),
        from: from.to_string(),
        to: to.to_string(),
        from_port: from_port.to_string(),
        to_port: to_port.to_string(),
        label: String::new(),
        arrow_left: false,
        arrow_right: false,
    }
}

/// Two 200x120 nodes with a horizontal gap between their facing edges
fn facing_boxes(gap: f64) -> NodeBoxes {
    let mut boxes = NodeBoxes::new();
    boxes.set("a", Rect::new(0.0, 0.0, 200.0, 120.0));
    boxes.set("b", Rect::new(200.0 + gap, 0.0, 200.0, 120.0));
    boxes
}

#[test]
fn linear_seeding_interpolates_all_points() {
    let boxes = facing_boxes(200.0);
    let mut physics = StringPhysics::new();
    physics.register(&connector("c", "a", "b", "right", "left"), &boxes);

    let view = physics.polyline("c").expect("registered");
    let start = Point::new(200.0, 60.0);
    let end = Point::new(400.0, 60.0);
    for (i, point) in view.points.iter().enumerate() {
        let expected = start.lerp(end, i as f64 / (POINTS_COUNT - 1) as f64);
        assert_eq!(*point, expected, "point {i}");
    }
    assert_eq!(view.stress, 0.0);
}

#[test]
fn scenario_two_nodes_right_to_left() {
    // A(0,0,200,120) and B(400,0,200,120), ports right -> left
    let boxes = facing_boxes(200.0);
    let mut physics = StringPhysics::new();
    physics.register(&connector("c", "a", "b", "right", "left"), &boxes);

    let view = physics.polyline("c").unwrap();
    assert_eq!(view.points[0], Point::new(200.0, 60.0));
    assert_eq!(view.points[8], Point::new(400.0, 60.0));
    assert_eq!(view.points[4], Point::new(300.0, 60.0));
}

#[test]
fn slack_thread_converges_to_segment_length() {
    // Anchors 100 apart; the 8 segments rest at 18 each, so the thread has
    // slack to hang at rest length
    let boxes = facing_boxes(100.0);
    let mut physics = StringPhysics::new();
    physics.register(&connector("c", "a", "b", "right", "left"), &boxes);

    for _ in 0..200 {
        physics.step(&boxes);
    }

    let view = physics.polyline("c").unwrap();
    for i in 0..POINTS_COUNT - 1 {
        let dist = view.points[i].distance(view.points[i + 1]);
        assert!(
            (dist - 18.0).abs() < 1.5,
            "segment {i} settled at {dist}, expected close to 18"
        );
    }
}

#[test]
fn thread_sags_below_its_anchors() {
    let boxes = facing_boxes(100.0);
    let mut physics = StringPhysics::new();
    physics.register(&connector("c", "a", "b", "right", "left"), &boxes);

    for _ in 0..200 {
        physics.step(&boxes);
    }

    let view = physics.polyline("c").unwrap();
    // Both anchors sit at y = 60; gravity pulls the middle well below
    assert!(view.points[4].y > 80.0);
    // Endpoints stay pinned through it all
    assert_eq!(view.points[0], Point::new(200.0, 60.0));
    assert_eq!(view.points[8], Point::new(300.0, 60.0));
}

#[test]
fn settled_thread_sleeps_and_step_leaves_it_alone() {
    let boxes = facing_boxes(200.0);
    let mut physics = StringPhysics::new();
    physics.register(&connector("c", "a", "b", "right", "left"), &boxes);

    let mut slept_at = None;
    for frame in 0..500 {
        physics.step(&boxes);
        if !physics.is_awake("c") {
            slept_at = Some(frame);
            break;
        }
    }
    assert!(slept_at.is_some(), "thread never settled");

    let before = physics.polyline("c").unwrap();
    physics.step(&boxes);
    let after = physics.polyline("c").unwrap();
    assert_eq!(before.points, after.points);
    assert_eq!(before.stress, after.stress);
}

#[test]
fn wake_resumes_simulation_for_incident_connectors() {
    let boxes = facing_boxes(200.0);
    let mut physics = StringPhysics::new();
    physics.register(&connector("c", "a", "b", "right", "left"), &boxes);

    for _ in 0..500 {
        physics.step(&boxes);
    }
    assert!(!physics.is_awake("c"));

    physics.wake("a");
    assert!(physics.is_awake("c"));
    physics.wake("b");
    assert!(physics.is_awake("c"));
}

#[test]
fn moved_node_repins_endpoint_after_wake() {
    let mut boxes = facing_boxes(200.0);
    let mut physics = StringPhysics::new();
    physics.register(&connector("c", "a", "b", "right", "left"), &boxes);

    for _ in 0..500 {
        physics.step(&boxes);
    }
    assert!(!physics.is_awake("c"));

    // Host moves node a down by 300 and notifies the engine
    boxes.set("a", Rect::new(0.0, 300.0, 200.0, 120.0));
    physics.wake("a");
    physics.step(&boxes);

    let view = physics.polyline("c").unwrap();
    assert_eq!(view.points[0], Point::new(200.0, 360.0));
    assert_eq!(view.points[8], Point::new(400.0, 60.0));
}

#[test]
fn capacity_ceiling_drops_registration_silently() {
    let mut boxes = NodeBoxes::new();
    for i in 0..=MAX_CONNECTIONS {
        boxes.set(&format!("n{i}"), Rect::new(i as f64 * 10.0, 0.0, 8.0, 8.0));
    }

    let mut physics = StringPhysics::new();
    for i in 0..MAX_CONNECTIONS {
        let conn = connector(
            &format!("c{i}"),
            &format!("n{i}"),
            &format!("n{}", i + 1),
            "right",
            "left",
        );
        assert_eq!(physics.register(&conn, &boxes), RegisterOutcome::Registered);
    }
    assert_eq!(physics.len(), MAX_CONNECTIONS);
    assert_eq!(physics.remaining_capacity(), 0);

    // One past the ceiling: dropped, nothing else changes
    let overflow = connector("c_overflow", "n0", &format!("n{MAX_CONNECTIONS}"), "top", "top");
    assert_eq!(
        physics.register(&overflow, &boxes),
        RegisterOutcome::CapacityExhausted
    );
    assert_eq!(physics.len(), MAX_CONNECTIONS);
    assert!(physics.polyline("c_overflow").is_none());
    assert!(!physics.is_awake("c_overflow"));

    // Existing registrations are untouched
    assert!(physics.polyline("c0").is_some());
}

#[test]
fn missing_endpoint_box_skips_the_frame() {
    let mut boxes = facing_boxes(200.0);
    let mut physics = StringPhysics::new();
    physics.register(&connector("c", "a", "b", "right", "left"), &boxes);
    let seeded = physics.polyline("c").unwrap();

    // Node b disappears for a few frames; the thread holds still
    boxes.remove("b");
    for _ in 0..5 {
        physics.step(&boxes);
    }
    let held = physics.polyline("c").unwrap();
    assert_eq!(seeded.points, held.points);

    // Box returns: simulation picks up again
    boxes.set("b", Rect::new(400.0, 0.0, 200.0, 120.0));
    physics.step(&boxes);
    let moving = physics.polyline("c").unwrap();
    assert!(moving.points[4].y > seeded.points[4].y);
}

#[test]
fn stretched_thread_reports_stress() {
    // Anchors 400 apart against a rest length of 8 * 18 = 144
    let boxes = facing_boxes(400.0);
    let mut physics = StringPhysics::new();
    physics.register(&connector("c", "a", "b", "right", "left"), &boxes);

    for _ in 0..100 {
        physics.step(&boxes);
    }

    let view = physics.polyline("c").unwrap();
    assert!(view.stress > 10.0, "stress was {}", view.stress);
}

#[test]
fn reseed_straightens_and_zeroes_stress() {
    let boxes = facing_boxes(400.0);
    let mut physics = StringPhysics::new();
    physics.register(&connector("c", "a", "b", "right", "left"), &boxes);

    for _ in 0..100 {
        physics.step(&boxes);
    }
    assert!(physics.polyline("c").unwrap().stress > 0.0);

    physics.reseed("c", &boxes);
    let view = physics.polyline("c").unwrap();
    assert_eq!(view.stress, 0.0);
    assert_eq!(view.points[4], Point::new(400.0, 60.0));
    assert!(physics.is_awake("c"));
}

#[test]
fn unregister_removes_the_strand() {
    let boxes = facing_boxes(200.0);
    let mut physics = StringPhysics::new();
    physics.register(&connector("c", "a", "b", "right", "left"), &boxes);
    physics.unregister("c");

    assert_eq!(physics.len(), 0);
    assert!(physics.polyline("c").is_none());
    assert!(!physics.is_awake("c"));

    // step and wake on the gone connector's nodes stay harmless
    physics.wake("a");
    physics.step(&boxes);
}
