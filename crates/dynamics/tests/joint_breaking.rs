use dynamics::{
    BodyKind, BodySpec, BuiltScene, Event, JointSpec, Pose, SceneDesc, Shape,
};
use glam::Vec3;

/// A weight hanging from a passive anchor by a fixed joint with the given
/// breaking threshold.
fn hanging_weight(threshold: Option<f32>) -> BuiltScene {
    let desc = SceneDesc {
        bodies: vec![
            BodySpec {
                shape: Shape::Sphere { radius: 0.1 },
                kind: BodyKind::Passive,
                pose: Pose::from_position(Vec3::new(0.0, 0.0, 10.0)),
                ..BodySpec::default()
            },
            BodySpec {
                shape: Shape::Sphere { radius: 0.2 },
                mass: 1.0,
                pose: Pose::from_position(Vec3::new(0.0, 0.0, 9.0)),
                linear_damping: 0.0,
                angular_damping: 0.0,
                ..BodySpec::default()
            },
        ],
        joints: vec![JointSpec {
            breaking_threshold: threshold,
            ..JointSpec::fixed(0, 1, Vec3::new(0.0, 0.0, 9.5))
        }],
        ..SceneDesc::default()
    };
    desc.build().unwrap()
}

#[test]
fn weak_joint_breaks_exactly_once() {
    let mut scene = hanging_weight(Some(1e-3));

    let mut broken_steps = Vec::new();
    for step in 0..100 {
        let report = scene.world.step(1.0 / 60.0);
        for event in report.events {
            if let Event::JointBroken(handle) = event {
                assert_eq!(handle, scene.joints[0]);
                broken_steps.push(step);
            }
        }
    }
    assert_eq!(broken_steps, vec![0], "expected a single break on step 0");
    assert!(!scene.world.joint(scene.joints[0]).unwrap().is_enabled());
}

#[test]
fn body_free_falls_after_break() {
    let mut scene = hanging_weight(Some(1e-3));
    scene.world.step(1.0 / 60.0);

    // Joint is gone; from here on each step adds exactly one step of
    // gravity to the weight's velocity.
    let v0 = scene.world.body(scene.bodies[1]).unwrap().linear_velocity();
    scene.world.step(1.0 / 60.0);
    let v1 = scene.world.body(scene.bodies[1]).unwrap().linear_velocity();
    let dv = v1 - v0;
    assert!((dv.z + 9.81 / 60.0).abs() < 1e-4, "dv = {dv:?}");
    assert!(dv.x.abs() < 1e-6 && dv.y.abs() < 1e-6);
}

#[test]
fn strong_joint_holds_the_weight() {
    let mut scene = hanging_weight(Some(100.0));
    let mut broke = false;
    for _ in 0..300 {
        let report = scene.world.step(1.0 / 60.0);
        broke |= report
            .events
            .iter()
            .any(|event| matches!(event, Event::JointBroken(_)));
    }
    assert!(!broke);
    let z = scene.world.body(scene.bodies[1]).unwrap().pose().position.z;
    assert!((z - 9.0).abs() < 0.05, "weight sagged to z={z}");
}

#[test]
fn unbreakable_joint_never_emits_break_events() {
    let mut scene = hanging_weight(None);
    for _ in 0..120 {
        let report = scene.world.step(1.0 / 60.0);
        assert!(report
            .events
            .iter()
            .all(|event| !matches!(event, Event::JointBroken(_))));
    }
}
