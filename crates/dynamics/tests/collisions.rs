use dynamics::{BodyDesc, BodyKind, Event, Material, Pose, Shape, World};
use glam::Vec3;

fn ground(world: &mut World) {
    world
        .add_body(BodyDesc {
            shape: Shape::Box {
                half_extents: Vec3::new(10.0, 10.0, 0.5),
            },
            kind: BodyKind::Passive,
            pose: Pose::from_position(Vec3::new(0.0, 0.0, -0.5)),
            ..BodyDesc::default()
        })
        .unwrap();
}

#[test]
fn sphere_comes_to_rest_on_the_ground() {
    let mut world = World::new();
    ground(&mut world);
    let ball = world
        .add_body(BodyDesc {
            shape: Shape::Sphere { radius: 0.5 },
            mass: 1.0,
            pose: Pose::from_position(Vec3::new(0.0, 0.0, 2.0)),
            ..BodyDesc::default()
        })
        .unwrap();

    for _ in 0..300 {
        world.step(1.0 / 60.0);
    }

    let body = world.body(ball).unwrap();
    let z = body.pose().position.z;
    assert!((z - 0.5).abs() < 0.02, "ball rests at z={z}, expected 0.5");
    assert!(body.linear_velocity().length() < 0.05);
}

#[test]
fn restitution_makes_a_ball_bounce() {
    let mut world = World::new();
    world
        .add_body(BodyDesc {
            shape: Shape::Box {
                half_extents: Vec3::new(10.0, 10.0, 0.5),
            },
            kind: BodyKind::Passive,
            pose: Pose::from_position(Vec3::new(0.0, 0.0, -0.5)),
            material: Material {
                friction: 0.5,
                restitution: 0.9,
            },
            ..BodyDesc::default()
        })
        .unwrap();
    let ball = world
        .add_body(BodyDesc {
            shape: Shape::Sphere { radius: 0.5 },
            mass: 1.0,
            pose: Pose::from_position(Vec3::new(0.0, 0.0, 3.0)),
            material: Material {
                friction: 0.5,
                restitution: 0.9,
            },
            linear_damping: 0.0,
            ..BodyDesc::default()
        })
        .unwrap();

    let mut bounced = false;
    for _ in 0..300 {
        world.step(1.0 / 60.0);
        if world.body(ball).unwrap().linear_velocity().z > 1.0 {
            bounced = true;
            break;
        }
    }
    assert!(bounced, "ball never bounced back up");
}

#[test]
fn small_box_stack_stays_standing() {
    let mut world = World::new();
    ground(&mut world);
    let mut boxes = Vec::new();
    for i in 0..3 {
        boxes.push(
            world
                .add_body(BodyDesc {
                    shape: Shape::Box {
                        half_extents: Vec3::splat(0.25),
                    },
                    mass: 1.0,
                    pose: Pose::from_position(Vec3::new(0.0, 0.0, 0.3 + 0.55 * i as f32)),
                    ..BodyDesc::default()
                })
                .unwrap(),
        );
    }

    for _ in 0..300 {
        world.step(1.0 / 60.0);
    }

    for (i, &handle) in boxes.iter().enumerate() {
        let pos = world.body(handle).unwrap().pose().position;
        let expected_z = 0.25 + 0.5 * i as f32;
        assert!(
            (pos.z - expected_z).abs() < 0.1,
            "box {i} at z={}, expected near {expected_z}",
            pos.z
        );
        assert!(pos.truncate().length() < 0.1, "box {i} slid to {pos:?}");
    }
}

#[test]
fn cylinder_rests_on_its_side() {
    let mut world = World::new();
    ground(&mut world);
    // Cylinder lying along x: local y axis rotated onto world x.
    let cylinder = world
        .add_body(BodyDesc {
            shape: Shape::Cylinder {
                radius: 0.3,
                half_height: 0.6,
            },
            mass: 1.0,
            pose: Pose::new(
                Vec3::new(0.0, 0.0, 1.0),
                glam::Quat::from_axis_angle(Vec3::Z, std::f32::consts::FRAC_PI_2),
            ),
            ..BodyDesc::default()
        })
        .unwrap();

    for _ in 0..300 {
        world.step(1.0 / 60.0);
    }
    let z = world.body(cylinder).unwrap().pose().position.z;
    assert!((z - 0.3).abs() < 0.05, "cylinder rests at z={z}, expected 0.3");
}

#[test]
fn impact_wakes_a_sleeping_body() {
    let mut world = World::new();
    ground(&mut world);
    let resting = world
        .add_body(BodyDesc {
            shape: Shape::Sphere { radius: 0.5 },
            mass: 1.0,
            pose: Pose::from_position(Vec3::new(0.0, 0.0, 0.5)),
            ..BodyDesc::default()
        })
        .unwrap();

    // Let it settle and fall asleep.
    let mut slept = false;
    for _ in 0..200 {
        let report = world.step(1.0 / 60.0);
        slept |= report.events.contains(&Event::BodySlept(resting));
    }
    assert!(slept);
    assert!(world.body(resting).unwrap().is_sleeping());

    // Drop a second ball onto it.
    world
        .add_body(BodyDesc {
            shape: Shape::Sphere { radius: 0.3 },
            mass: 1.0,
            pose: Pose::from_position(Vec3::new(0.0, 0.0, 2.5)),
            ..BodyDesc::default()
        })
        .unwrap();

    let mut woke = false;
    for _ in 0..120 {
        let report = world.step(1.0 / 60.0);
        woke |= report.events.contains(&Event::BodyWoke(resting));
    }
    assert!(woke, "impact should wake the sleeping ball");
}
