//! Rigid bodies and their integration.
//!
//! Bodies store mass and inertia in body space; the world-space inverse
//! inertia is rebuilt from the current orientation whenever the solver needs
//! it. Integration is semi-implicit Euler: velocities first, then poses, with
//! the orientation quaternion renormalized every step - the one place
//! floating-point drift is actively corrected.

use glam::{Mat3, Quat, Vec3};

use crate::error::Error;
use crate::shapes::Shape;
use crate::types::{BodyKind, Material, Pose};

/// Input descriptor when creating a body.
#[derive(Clone, Copy, Debug)]
pub struct BodyDesc {
    pub shape: Shape,
    /// Ignored for Passive and Kinematic bodies.
    pub mass: f32,
    pub pose: Pose,
    pub kind: BodyKind,
    pub linear_velocity: Vec3,
    pub angular_velocity: Vec3,
    pub material: Material,
    pub linear_damping: f32,
    pub angular_damping: f32,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self {
            shape: Shape::Sphere { radius: 0.5 },
            mass: 1.0,
            pose: Pose::IDENTITY,
            kind: BodyKind::Active,
            linear_velocity: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            material: Material::default(),
            linear_damping: 0.01,
            angular_damping: 0.01,
        }
    }
}

/// A simulated rigid body.
#[derive(Debug)]
pub struct RigidBody {
    pub(crate) shape: Shape,
    pub(crate) kind: BodyKind,
    pub(crate) pose: Pose,
    pub(crate) linear_velocity: Vec3,
    pub(crate) angular_velocity: Vec3,
    pub(crate) mass: f32,
    pub(crate) inv_mass: f32,
    pub(crate) inv_inertia_local: Mat3,
    pub(crate) material: Material,
    pub(crate) linear_damping: f32,
    pub(crate) angular_damping: f32,
    pub(crate) force: Vec3,
    pub(crate) torque: Vec3,
    pub(crate) low_motion_steps: u32,
    pub(crate) sleeping: bool,
}

impl RigidBody {
    /// Build a body from its descriptor, validating shape and mass.
    /// Inverse mass and inverse inertia are exactly zero iff the body is not
    /// Active.
    pub(crate) fn new(desc: BodyDesc) -> Result<Self, Error> {
        desc.shape.validate()?;
        let (mass, inv_mass, inv_inertia_local) = match desc.kind {
            BodyKind::Active => {
                if !(desc.mass.is_finite() && desc.mass > 0.0) {
                    return Err(Error::InvalidMass(desc.mass));
                }
                let inertia = desc.shape.inertia(desc.mass);
                (desc.mass, 1.0 / desc.mass, inertia.inverse())
            }
            BodyKind::Passive | BodyKind::Kinematic => (0.0, 0.0, Mat3::ZERO),
        };
        Ok(Self {
            shape: desc.shape,
            kind: desc.kind,
            pose: desc.pose,
            linear_velocity: desc.linear_velocity,
            angular_velocity: desc.angular_velocity,
            mass,
            inv_mass,
            inv_inertia_local,
            material: desc.material,
            linear_damping: desc.linear_damping.max(0.0),
            angular_damping: desc.angular_damping.max(0.0),
            force: Vec3::ZERO,
            torque: Vec3::ZERO,
            low_motion_steps: 0,
            sleeping: false,
        })
    }

    #[must_use]
    pub fn pose(&self) -> Pose {
        self.pose
    }

    #[must_use]
    pub fn linear_velocity(&self) -> Vec3 {
        self.linear_velocity
    }

    #[must_use]
    pub fn angular_velocity(&self) -> Vec3 {
        self.angular_velocity
    }

    #[must_use]
    pub fn mass(&self) -> f32 {
        self.mass
    }

    #[must_use]
    pub fn kind(&self) -> BodyKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[must_use]
    pub fn is_sleeping(&self) -> bool {
        self.sleeping
    }

    /// World-space inverse inertia: `R * I_local^-1 * R^T`.
    #[must_use]
    pub fn inv_inertia_world(&self) -> Mat3 {
        if self.inv_mass == 0.0 {
            return Mat3::ZERO;
        }
        let rot = Mat3::from_quat(self.pose.orientation);
        rot * self.inv_inertia_local * rot.transpose()
    }

    /// Set the velocities of a Kinematic body (no-op for other kinds; the
    /// solver owns Active velocities and Passive bodies never move).
    pub fn set_kinematic_velocity(&mut self, linear: Vec3, angular: Vec3) {
        if self.kind == BodyKind::Kinematic {
            self.linear_velocity = linear;
            self.angular_velocity = angular;
        }
    }

    /// Accumulate a force applied at a world-space point.
    pub(crate) fn add_force_at_point(&mut self, force: Vec3, world_point: Vec3) {
        self.force += force;
        self.torque += (world_point - self.pose.position).cross(force);
    }

    /// Immediate velocity change from an impulse at a world-space point.
    pub(crate) fn add_impulse_at_point(&mut self, impulse: Vec3, world_point: Vec3) {
        self.linear_velocity += impulse * self.inv_mass;
        let angular = (world_point - self.pose.position).cross(impulse);
        self.angular_velocity += self.inv_inertia_world() * angular;
    }

    /// Velocity update: gravity plus accumulated forces, then damping.
    /// Sleeping bodies receive nothing here; they keep their (zero)
    /// velocities but stay available to the solver at normal inverse mass.
    pub(crate) fn integrate_forces(&mut self, gravity: Vec3, dt: f32) {
        if self.kind != BodyKind::Active || self.sleeping {
            return;
        }
        self.linear_velocity += dt * (gravity + self.inv_mass * self.force);
        self.angular_velocity += dt * (self.inv_inertia_world() * self.torque);
        self.linear_velocity *= 1.0 / (1.0 + dt * self.linear_damping);
        self.angular_velocity *= 1.0 / (1.0 + dt * self.angular_damping);
    }

    /// Pose update from current velocities. The orientation integrates via
    /// `q += dt * 0.5 * quat(0, w) * q` and is renormalized.
    pub(crate) fn integrate_pose(&mut self, dt: f32) {
        match self.kind {
            BodyKind::Passive => return,
            BodyKind::Active | BodyKind::Kinematic => {}
        }
        if self.sleeping {
            return;
        }
        self.pose.position += self.linear_velocity * dt;

        let w = self.angular_velocity;
        if w != Vec3::ZERO {
            let q = self.pose.orientation;
            let dq = Quat::from_xyzw(w.x, w.y, w.z, 0.0) * q;
            let half_dt = 0.5 * dt;
            self.pose.orientation = Quat::from_xyzw(
                q.x + dq.x * half_dt,
                q.y + dq.y * half_dt,
                q.z + dq.z * half_dt,
                q.w + dq.w * half_dt,
            )
            .normalize();
        }
    }

    pub(crate) fn clear_forces(&mut self) {
        self.force = Vec3::ZERO;
        self.torque = Vec3::ZERO;
    }

    /// True when any component of the state has gone non-finite.
    pub(crate) fn has_numerical_fault(&self) -> bool {
        !(self.pose.position.is_finite()
            && self.pose.orientation.is_finite()
            && self.linear_velocity.is_finite()
            && self.angular_velocity.is_finite())
    }

    /// Zero motion and force sleep. Used both by the sleep pass and as the
    /// containment response to a numerical fault.
    pub(crate) fn put_to_sleep(&mut self) {
        self.linear_velocity = Vec3::ZERO;
        self.angular_velocity = Vec3::ZERO;
        self.sleeping = true;
        self.low_motion_steps = 0;
    }

    pub(crate) fn wake(&mut self) {
        self.sleeping = false;
        self.low_motion_steps = 0;
    }
}
