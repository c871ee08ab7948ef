//! # Declarative Scene Construction
//!
//! A [`SceneDesc`] is a plain list of body and joint specs plus a world
//! configuration, the form an external assembly layer naturally produces.
//! [`SceneDesc::build`] validates every spec up front and returns a ready
//! [`World`] together with the handles in spec order, or the first error.
//! Nothing is stepped during construction, so a failed build has no partial
//! side effects visible to the caller.
//!
//! Joint specs reference bodies by their index in the body list and give
//! the anchor as a world-space point on the initial poses; the body-local
//! anchor frames are derived once here and fixed for the joint's lifetime.

use glam::Vec3;

use crate::body::BodyDesc;
use crate::error::Error;
use crate::handle::{BodyHandle, JointHandle};
use crate::joint::{HingeLimit, HingeMotor, Joint, JointDesc, JointKind};
use crate::shapes::Shape;
use crate::sleep::SleepParams;
use crate::types::{BodyKind, Material, Pose, StepConfig};
use crate::world::World;

/// Global simulation settings for a scene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WorldConfig {
    pub gravity: Vec3,
    pub step: StepConfig,
    pub sleep: SleepParams,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, 0.0, -9.81),
            step: StepConfig::default(),
            sleep: SleepParams::default(),
        }
    }
}

/// One body in a scene description.
#[derive(Clone, Copy, Debug)]
pub struct BodySpec {
    pub shape: Shape,
    /// Ignored for Passive and Kinematic bodies.
    pub mass: f32,
    pub pose: Pose,
    pub kind: BodyKind,
    pub material: Material,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Default for BodySpec {
    fn default() -> Self {
        let desc = BodyDesc::default();
        Self {
            shape: desc.shape,
            mass: desc.mass,
            pose: desc.pose,
            kind: desc.kind,
            material: desc.material,
            linear_damping: desc.linear_damping,
            angular_damping: desc.angular_damping,
        }
    }
}

impl From<BodySpec> for BodyDesc {
    fn from(spec: BodySpec) -> Self {
        Self {
            shape: spec.shape,
            mass: spec.mass,
            pose: spec.pose,
            kind: spec.kind,
            material: spec.material,
            linear_damping: spec.linear_damping,
            angular_damping: spec.angular_damping,
            ..Self::default()
        }
    }
}

/// Joint kind in a scene description. The hinge axis is given in world
/// space on the initial poses.
#[derive(Clone, Copy, Debug)]
pub enum JointSpecKind {
    Fixed,
    Hinge {
        axis: Vec3,
        limit: Option<HingeLimit>,
        motor: Option<HingeMotor>,
    },
}

/// One joint in a scene description, referencing bodies by spec index.
#[derive(Clone, Copy, Debug)]
pub struct JointSpec {
    pub body_a: usize,
    pub body_b: usize,
    /// World-space anchor point on the initial poses.
    pub anchor: Vec3,
    pub kind: JointSpecKind,
    pub breaking_threshold: Option<f32>,
    pub collide_connected: bool,
}

impl JointSpec {
    /// Fixed joint anchored at a world point, collision between the pair
    /// disabled.
    #[must_use]
    pub fn fixed(body_a: usize, body_b: usize, anchor: Vec3) -> Self {
        Self {
            body_a,
            body_b,
            anchor,
            kind: JointSpecKind::Fixed,
            breaking_threshold: None,
            collide_connected: false,
        }
    }

    /// Free hinge about a world axis through a world anchor point.
    #[must_use]
    pub fn hinge(body_a: usize, body_b: usize, anchor: Vec3, axis: Vec3) -> Self {
        Self {
            body_a,
            body_b,
            anchor,
            kind: JointSpecKind::Hinge {
                axis,
                limit: None,
                motor: None,
            },
            breaking_threshold: None,
            collide_connected: false,
        }
    }
}

/// A complete scene description.
#[derive(Clone, Debug, Default)]
pub struct SceneDesc {
    pub config: WorldConfig,
    pub bodies: Vec<BodySpec>,
    pub joints: Vec<JointSpec>,
}

/// Result of building a scene: the world plus the handles in spec order.
#[derive(Debug)]
pub struct BuiltScene {
    pub world: World,
    pub bodies: Vec<BodyHandle>,
    pub joints: Vec<JointHandle>,
}

impl SceneDesc {
    /// Validate every spec and assemble the world. Fails on the first
    /// invalid spec with the underlying construction error.
    pub fn build(&self) -> Result<BuiltScene, Error> {
        let mut world = World::new();
        world.set_gravity(self.config.gravity);
        world.set_config(self.config.step);
        world.set_sleep_params(self.config.sleep);

        let mut bodies = Vec::with_capacity(self.bodies.len());
        for spec in &self.bodies {
            bodies.push(world.add_body(BodyDesc::from(*spec))?);
        }

        let mut joints = Vec::with_capacity(self.joints.len());
        for spec in &self.joints {
            let pose_a = self
                .bodies
                .get(spec.body_a)
                .ok_or(Error::UnknownSceneBody(spec.body_a))?
                .pose;
            let pose_b = self
                .bodies
                .get(spec.body_b)
                .ok_or(Error::UnknownSceneBody(spec.body_b))?
                .pose;

            let (kind, axis) = match spec.kind {
                JointSpecKind::Fixed => (JointKind::Fixed, None),
                JointSpecKind::Hinge { axis, limit, motor } => {
                    (JointKind::Hinge { limit, motor }, Some(axis))
                }
            };
            let (anchor_a, anchor_b) =
                Joint::frames_from_world(&pose_a, &pose_b, spec.anchor, axis);
            joints.push(world.add_joint(JointDesc {
                body_a: bodies[spec.body_a],
                body_b: bodies[spec.body_b],
                anchor_a,
                anchor_b,
                kind,
                breaking_threshold: spec.breaking_threshold,
                collide_connected: spec.collide_connected,
            })?);
        }

        Ok(BuiltScene {
            world,
            bodies,
            joints,
        })
    }
}
