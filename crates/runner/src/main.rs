//! # Dynamics Runner
//!
//! Small CLI that builds one of a few demonstration scenes through the
//! declarative scene layer, steps the world, and logs the event stream.
//! It exercises the public API end to end; verification of scenario
//! properties stays in the engine's test suite.

use anyhow::Result;
use clap::{Parser, ValueEnum};
use dynamics::{
    BodyKind, BodySpec, HingeMotor, JointSpec, JointSpecKind, Pose, SceneDesc, Shape,
};
use glam::Vec3;
use tracing::info;

#[derive(Parser)]
#[command(name = "runner", about = "Step a demonstration rigid-body scene")]
struct Args {
    /// Scene to simulate.
    #[arg(long, value_enum, default_value = "pendulum")]
    scene: Scene,

    /// Number of steps to run.
    #[arg(long, default_value_t = 300)]
    steps: u32,

    /// Step length in seconds.
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scene {
    /// A motorized hinge pendulum on a fixed anchor.
    Pendulum,
    /// A fixed-joint chain with one weak link that breaks under load.
    Chain,
    /// A stack of boxes settling on the ground.
    Stack,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let desc = match args.scene {
        Scene::Pendulum => pendulum(),
        Scene::Chain => chain(),
        Scene::Stack => stack(),
    };

    let mut scene = desc.build()?;
    info!(
        bodies = scene.bodies.len(),
        joints = scene.joints.len(),
        "scene built"
    );

    for step in 0..args.steps {
        let report = scene.world.step(args.dt);
        for event in &report.events {
            info!(step, ?event, "event");
        }
    }

    for (handle, snapshot) in scene.world.poses() {
        let [x, y, z] = snapshot.position;
        info!(body = handle.index(), x, y, z, "final pose");
    }
    Ok(())
}

/// A rod hinged to a passive anchor, driven at 2 rad/s about world y.
fn pendulum() -> SceneDesc {
    let mut desc = SceneDesc::default();
    desc.bodies.push(BodySpec {
        shape: Shape::Sphere { radius: 0.1 },
        kind: BodyKind::Passive,
        pose: Pose::from_position(Vec3::new(0.0, 0.0, 3.0)),
        ..BodySpec::default()
    });
    desc.bodies.push(BodySpec {
        shape: Shape::Box {
            half_extents: Vec3::new(0.5, 0.1, 0.1),
        },
        mass: 1.0,
        pose: Pose::from_position(Vec3::new(0.6, 0.0, 3.0)),
        ..BodySpec::default()
    });
    desc.joints.push(JointSpec {
        kind: JointSpecKind::Hinge {
            axis: Vec3::Y,
            limit: None,
            motor: Some(HingeMotor {
                target_velocity: 2.0,
                max_impulse: 0.5,
            }),
        },
        ..JointSpec::hinge(0, 1, Vec3::new(0.0, 0.0, 3.0), Vec3::Y)
    });
    desc
}

/// Five boxes joined in a vertical chain; the middle link is weak enough
/// to break once the dangling half swings.
fn chain() -> SceneDesc {
    let mut desc = SceneDesc::default();
    desc.bodies.push(BodySpec {
        shape: Shape::Box {
            half_extents: Vec3::splat(0.2),
        },
        kind: BodyKind::Passive,
        pose: Pose::from_position(Vec3::new(0.0, 0.0, 5.0)),
        ..BodySpec::default()
    });
    for i in 1..=5 {
        desc.bodies.push(BodySpec {
            shape: Shape::Box {
                half_extents: Vec3::splat(0.2),
            },
            mass: 1.0,
            pose: Pose::from_position(Vec3::new(0.5 * i as f32, 0.0, 5.0)),
            ..BodySpec::default()
        });
    }
    for i in 0..5 {
        let anchor = Vec3::new(0.5 * i as f32 + 0.25, 0.0, 5.0);
        let mut joint = JointSpec::fixed(i, i + 1, anchor);
        if i == 2 {
            joint.breaking_threshold = Some(2.0);
        }
        desc.joints.push(joint);
    }
    desc
}

/// Six boxes stacked on a passive ground slab.
fn stack() -> SceneDesc {
    let mut desc = SceneDesc::default();
    desc.bodies.push(BodySpec {
        shape: Shape::Box {
            half_extents: Vec3::new(5.0, 5.0, 0.5),
        },
        kind: BodyKind::Passive,
        pose: Pose::from_position(Vec3::new(0.0, 0.0, -0.5)),
        ..BodySpec::default()
    });
    for i in 0..6 {
        desc.bodies.push(BodySpec {
            shape: Shape::Box {
                half_extents: Vec3::splat(0.25),
            },
            mass: 1.0,
            pose: Pose::from_position(Vec3::new(0.0, 0.0, 0.3 + 0.55 * i as f32)),
            ..BodySpec::default()
        });
    }
    desc
}
