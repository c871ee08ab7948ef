use dynamics::{BodySpec, JointSpec, Pose, SceneDesc, Shape, World};
use glam::Vec3;

fn free_fall_pair() -> (World, dynamics::BodyHandle, dynamics::BodyHandle) {
    let desc = SceneDesc {
        bodies: vec![
            BodySpec {
                shape: Shape::Sphere { radius: 0.2 },
                mass: 1.0,
                pose: Pose::from_position(Vec3::new(-0.5, 0.0, 0.0)),
                linear_damping: 0.0,
                angular_damping: 0.0,
                ..BodySpec::default()
            },
            BodySpec {
                shape: Shape::Sphere { radius: 0.2 },
                mass: 1.0,
                pose: Pose::from_position(Vec3::new(0.5, 0.0, 0.0)),
                linear_damping: 0.0,
                angular_damping: 0.0,
                ..BodySpec::default()
            },
        ],
        joints: vec![JointSpec::fixed(0, 1, Vec3::ZERO)],
        ..SceneDesc::default()
    };
    let scene = desc.build().unwrap();
    (scene.world, scene.bodies[0], scene.bodies[1])
}

#[test]
fn fixed_pair_does_not_drift_in_free_fall() {
    let (mut world, a, b) = free_fall_pair();
    let initial_offset = world.body(b).unwrap().pose().position
        - world.body(a).unwrap().pose().position;

    for _ in 0..1000 {
        world.step(1.0 / 60.0);
    }

    let pose_a = world.body(a).unwrap().pose();
    let pose_b = world.body(b).unwrap().pose();
    let offset = pose_b.position - pose_a.position;
    assert!(
        (offset - initial_offset).length() < 1e-3,
        "anchor separation drifted by {}",
        (offset - initial_offset).length()
    );

    // Frames must also co-rotate: relative orientation stays identity.
    let rel = pose_a.orientation.conjugate() * pose_b.orientation;
    assert!(rel.w.abs() > 1.0 - 1e-4, "relative rotation crept in: {rel:?}");
}

#[test]
fn fixed_pair_falls_as_one_body() {
    let (mut world, a, b) = free_fall_pair();
    for _ in 0..300 {
        world.step(1.0 / 60.0);
    }
    let va = world.body(a).unwrap().linear_velocity();
    let vb = world.body(b).unwrap().linear_velocity();
    assert!((va - vb).length() < 1e-3);
    assert!(va.z < -1.0, "pair should be falling, vz={}", va.z);
}
