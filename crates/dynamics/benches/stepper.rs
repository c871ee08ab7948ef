//! Stepper throughput over two reference scenes.

use criterion::{criterion_group, criterion_main, Criterion};
use dynamics::{BodyKind, BodySpec, JointSpec, Pose, SceneDesc, Shape};
use glam::Vec3;

fn chain_scene(links: usize) -> SceneDesc {
    let mut desc = SceneDesc::default();
    desc.bodies.push(BodySpec {
        shape: Shape::Box {
            half_extents: Vec3::splat(0.2),
        },
        kind: BodyKind::Passive,
        pose: Pose::from_position(Vec3::new(0.0, 0.0, 10.0)),
        ..BodySpec::default()
    });
    for i in 1..=links {
        desc.bodies.push(BodySpec {
            shape: Shape::Box {
                half_extents: Vec3::splat(0.2),
            },
            mass: 1.0,
            pose: Pose::from_position(Vec3::new(0.5 * i as f32, 0.0, 10.0)),
            ..BodySpec::default()
        });
        desc.joints.push(JointSpec::fixed(
            i - 1,
            i,
            Vec3::new(0.5 * i as f32 - 0.25, 0.0, 10.0),
        ));
    }
    desc
}

fn stack_scene(boxes: usize) -> SceneDesc {
    let mut desc = SceneDesc::default();
    desc.bodies.push(BodySpec {
        shape: Shape::Box {
            half_extents: Vec3::new(5.0, 5.0, 0.5),
        },
        kind: BodyKind::Passive,
        pose: Pose::from_position(Vec3::new(0.0, 0.0, -0.5)),
        ..BodySpec::default()
    });
    for i in 0..boxes {
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

fn bench_step(c: &mut Criterion) {
    c.bench_function("step_chain_20", |b| {
        let mut scene = chain_scene(20).build().unwrap();
        b.iter(|| scene.world.step(1.0 / 60.0));
    });
    c.bench_function("step_stack_10", |b| {
        let mut scene = stack_scene(10).build().unwrap();
        b.iter(|| scene.world.step(1.0 / 60.0));
    });
}

criterion_group!(benches, bench_step);
criterion_main!(benches);
