use dynamics::{
    BodyDesc, BodyKind, BodySpec, Error, Event, HingeLimit, JointAnchor, JointDesc, JointKind,
    JointSpec, JointSpecKind, Pose, SceneDesc, Shape, World,
};
use glam::{Quat, Vec3};

fn default_anchor() -> JointAnchor {
    JointAnchor::new(Vec3::ZERO, Quat::IDENTITY)
}

#[test]
fn construction_errors_are_typed() {
    let mut world = World::new();

    let err = world
        .add_body(BodyDesc {
            mass: -2.0,
            ..BodyDesc::default()
        })
        .unwrap_err();
    assert_eq!(err, Error::InvalidMass(-2.0));

    let err = world
        .add_body(BodyDesc {
            shape: Shape::Box {
                half_extents: Vec3::new(1.0, 0.0, 1.0),
            },
            ..BodyDesc::default()
        })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidShape(_)));

    let err = world
        .add_body(BodyDesc {
            shape: Shape::Cylinder {
                radius: -0.1,
                half_height: 1.0,
            },
            ..BodyDesc::default()
        })
        .unwrap_err();
    assert!(matches!(err, Error::InvalidShape(_)));
}

#[test]
fn joint_validation_rejects_bad_references() {
    let mut world = World::new();
    let a = world.add_body(BodyDesc::default()).unwrap();
    let b = world.add_body(BodyDesc::default()).unwrap();

    let err = world
        .add_joint(JointDesc {
            body_a: a,
            body_b: a,
            anchor_a: default_anchor(),
            anchor_b: default_anchor(),
            kind: JointKind::Fixed,
            breaking_threshold: None,
            collide_connected: false,
        })
        .unwrap_err();
    assert_eq!(err, Error::SelfJoint);

    let err = world
        .add_joint(JointDesc {
            body_a: a,
            body_b: b,
            anchor_a: default_anchor(),
            anchor_b: default_anchor(),
            kind: JointKind::Hinge {
                limit: Some(HingeLimit { lower: 1.0, upper: -1.0 }),
                motor: None,
            },
            breaking_threshold: None,
            collide_connected: false,
        })
        .unwrap_err();
    assert_eq!(
        err,
        Error::InvalidLimit {
            lower: 1.0,
            upper: -1.0
        }
    );
}

#[test]
fn removal_is_deferred_to_the_step_boundary() -> anyhow::Result<()> {
    let mut world = World::new();
    let handle = world.add_body(BodyDesc::default())?;
    world.remove_body(handle)?;

    // Still accessible until the next step applies the removal.
    assert!(world.body(handle).is_ok());
    world.step(1.0 / 60.0);
    assert!(matches!(
        world.body(handle).unwrap_err(),
        Error::StaleBodyHandle { .. }
    ));
    assert_eq!(world.body_count(), 0);
    Ok(())
}

#[test]
fn stale_handle_does_not_alias_a_reused_slot() -> anyhow::Result<()> {
    let mut world = World::new();
    let first = world.add_body(BodyDesc::default())?;
    world.remove_body(first)?;
    world.step(1.0 / 60.0);

    let second = world.add_body(BodyDesc {
        pose: Pose::from_position(Vec3::new(7.0, 0.0, 0.0)),
        ..BodyDesc::default()
    })?;
    // Same slot, different generation.
    assert_eq!(first.index(), second.index());
    assert!(world.body(first).is_err());
    assert_eq!(
        world.body(second)?.pose().position,
        Vec3::new(7.0, 0.0, 0.0)
    );
    Ok(())
}

#[test]
fn removing_a_body_detaches_its_joints_silently() {
    let desc = SceneDesc {
        bodies: vec![
            BodySpec {
                kind: BodyKind::Passive,
                ..BodySpec::default()
            },
            BodySpec {
                pose: Pose::from_position(Vec3::new(1.0, 0.0, 0.0)),
                ..BodySpec::default()
            },
        ],
        joints: vec![JointSpec::fixed(0, 1, Vec3::new(0.5, 0.0, 0.0))],
        ..SceneDesc::default()
    };
    let mut scene = desc.build().unwrap();
    scene.world.remove_body(scene.bodies[0]).unwrap();

    let report = scene.world.step(1.0 / 60.0);
    // Detaching is not breaking: no JointBroken event.
    assert!(report
        .events
        .iter()
        .all(|event| !matches!(event, Event::JointBroken(_))));
    assert!(!scene.world.joint(scene.joints[0]).unwrap().is_enabled());

    // The surviving body is free now.
    for _ in 0..30 {
        scene.world.step(1.0 / 60.0);
    }
    let v = scene.world.body(scene.bodies[1]).unwrap().linear_velocity();
    assert!(v.z < -1.0, "detached body should be falling, vz={}", v.z);
}

#[test]
fn nan_impulse_is_absorbed_not_propagated() {
    let mut world = World::new();
    let faulty = world
        .add_body(BodyDesc {
            pose: Pose::from_position(Vec3::new(0.0, 0.0, 5.0)),
            ..BodyDesc::default()
        })
        .unwrap();
    let healthy = world
        .add_body(BodyDesc {
            pose: Pose::from_position(Vec3::new(10.0, 0.0, 5.0)),
            linear_damping: 0.0,
            ..BodyDesc::default()
        })
        .unwrap();

    world
        .apply_impulse(faulty, Vec3::new(f32::NAN, 0.0, 0.0), Vec3::ZERO)
        .unwrap();

    let report = world.step(1.0 / 60.0);
    let faults: Vec<_> = report
        .events
        .iter()
        .filter(|event| matches!(event, Event::NumericalFault(_)))
        .collect();
    assert_eq!(faults.len(), 1);
    assert_eq!(*faults[0], Event::NumericalFault(faulty));

    // Faulted body is stopped and asleep; the rest of the world continues.
    let body = world.body(faulty).unwrap();
    assert!(body.is_sleeping());
    assert_eq!(body.linear_velocity(), Vec3::ZERO);

    for _ in 0..30 {
        world.step(1.0 / 60.0);
    }
    let other = world.body(healthy).unwrap();
    assert!(other.linear_velocity().z < -1.0);
    assert!(other.pose().position.is_finite());
}

#[test]
fn hinge_angle_ignores_a_reused_body_slot() -> anyhow::Result<()> {
    let desc = SceneDesc {
        bodies: vec![
            BodySpec {
                kind: BodyKind::Passive,
                ..BodySpec::default()
            },
            BodySpec {
                pose: Pose::from_position(Vec3::new(1.0, 0.0, 0.0)),
                ..BodySpec::default()
            },
        ],
        joints: vec![JointSpec::hinge(0, 1, Vec3::ZERO, Vec3::Y)],
        ..SceneDesc::default()
    };
    let mut scene = desc.build()?;
    assert!(scene.world.hinge_angle(scene.joints[0])?.is_some());

    scene.world.remove_body(scene.bodies[0])?;
    scene.world.step(1.0 / 60.0);
    assert_eq!(scene.world.hinge_angle(scene.joints[0])?, None);

    // A new body reuses the freed slot; the detached joint must not start
    // measuring against it.
    let replacement = scene.world.add_body(BodyDesc {
        pose: Pose::new(
            Vec3::new(0.0, 0.0, 9.0),
            Quat::from_axis_angle(Vec3::Y, 1.0),
        ),
        ..BodyDesc::default()
    })?;
    assert_eq!(replacement.index(), scene.bodies[0].index());
    assert_eq!(scene.world.hinge_angle(scene.joints[0])?, None);
    Ok(())
}

#[test]
fn world_state_is_debug_printable() {
    let mut world = World::new();
    let handle = world.add_body(BodyDesc::default()).unwrap();
    let dump = format!("{world:?}");
    assert!(dump.contains("World"));
    let body = format!("{:?}", world.body(handle).unwrap());
    assert!(body.contains("RigidBody"));
}

#[test]
fn scene_joint_kinds_round_trip_through_build() {
    let desc = SceneDesc {
        bodies: vec![
            BodySpec {
                kind: BodyKind::Passive,
                ..BodySpec::default()
            },
            BodySpec {
                pose: Pose::from_position(Vec3::new(1.0, 0.0, 0.0)),
                ..BodySpec::default()
            },
        ],
        joints: vec![JointSpec {
            kind: JointSpecKind::Hinge {
                axis: Vec3::Z,
                limit: Some(HingeLimit::new(-1.0, 1.0).unwrap()),
                motor: None,
            },
            ..JointSpec::hinge(0, 1, Vec3::ZERO, Vec3::Z)
        }],
        ..SceneDesc::default()
    };
    let scene = desc.build().unwrap();
    let joint = scene.world.joint(scene.joints[0]).unwrap();
    assert!(matches!(
        joint.kind(),
        JointKind::Hinge {
            limit: Some(_),
            motor: None
        }
    ));
}
