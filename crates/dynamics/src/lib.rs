#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]
//! # Rigid-Body Dynamics Engine
//!
//! A deterministic rigid-body dynamics engine with iterative constraint
//! solving. It simulates assemblies of analytic primitives (boxes, spheres,
//! cylinders) connected by joints (fixed, hinge, motorized hinge with
//! breaking thresholds), with contact generation between unconnected bodies.
//!
//! ## Key Components
//!
//! -   **Rigid Bodies:** Bodies carry mass/inertia, a pose, velocities and a
//!     sleep state. The three body kinds are defined in [`types`]
//!     ([`BodyKind::Active`], [`BodyKind::Passive`], [`BodyKind::Kinematic`]).
//! -   **World:** The [`World`] struct in the [`world`] module owns the body
//!     and joint arenas and steps the simulation forward with
//!     [`World::step`]. Each step returns the body poses together with the
//!     event stream (joints breaking, bodies falling asleep or waking).
//! -   **Joints:** The [`joint`] module defines the closed set of joint
//!     kinds. Hinges optionally carry angular limits, a velocity motor with a
//!     torque cap, and a breaking threshold.
//! -   **Solver:** A sequential-impulse solver (projected Gauss-Seidel) with
//!     warm starting and Baumgarte stabilization, in the [`solver`] module.
//! -   **Scenes:** The [`scene`] module accepts a declarative scene
//!     description and builds a validated [`World`] from it.
//!
//! ## Usage
//!
//! ```rust
//! use dynamics::{BodyDesc, BodyKind, Pose, Shape, World};
//! use glam::Vec3;
//!
//! let mut world = World::new();
//! let ball = world
//!     .add_body(BodyDesc {
//!         shape: Shape::Sphere { radius: 0.5 },
//!         mass: 1.0,
//!         pose: Pose::from_position(Vec3::new(0.0, 0.0, 10.0)),
//!         kind: BodyKind::Active,
//!         ..BodyDesc::default()
//!     })
//!     .unwrap();
//!
//! let report = world.step(1.0 / 60.0);
//! assert_eq!(report.poses.len(), 1);
//! let _ = ball;
//! ```

pub mod body;
pub mod collision;
pub mod error;
pub mod events;
pub mod handle;
pub mod joint;
pub mod scene;
pub mod shapes;
pub mod sleep;
pub mod solver;
pub mod types;
pub mod world;

pub use body::{BodyDesc, RigidBody};
pub use error::Error;
pub use events::{Event, StepReport};
pub use handle::{BodyHandle, JointHandle};
pub use joint::{HingeLimit, HingeMotor, Joint, JointAnchor, JointDesc, JointKind};
pub use scene::{BodySpec, BuiltScene, JointSpec, JointSpecKind, SceneDesc, WorldConfig};
pub use shapes::{Aabb, Shape};
pub use sleep::SleepParams;
pub use types::{BodyKind, Material, Pose, PoseSnapshot, StepConfig};
pub use world::World;
