//! Core value types shared across the engine.

use glam::{Quat, Vec3};

/// World-space position and orientation of a body.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        orientation: Quat::IDENTITY,
    };

    #[must_use]
    pub const fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }

    #[must_use]
    pub const fn from_position(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }

    /// Map a body-local point into world space.
    #[must_use]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.orientation * local
    }

    /// Map a world point into body-local space.
    #[must_use]
    pub fn inverse_transform_point(&self, world: Vec3) -> Vec3 {
        self.orientation.conjugate() * (world - self.position)
    }

    /// Rotate a body-local direction into world space.
    #[must_use]
    pub fn rotate(&self, local: Vec3) -> Vec3 {
        self.orientation * local
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// How a body participates in the simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BodyKind {
    /// Moved by forces, constraints and impulses.
    Active,
    /// Never moves; infinite effective mass.
    Passive,
    /// Moved by user-set velocities; pushes Active bodies but is not pushed.
    Kinematic,
}

/// Surface properties used when two bodies touch. Pair values are combined
/// with a geometric mean.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub friction: f32,
    pub restitution: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            friction: 0.5,
            restitution: 0.0,
        }
    }
}

/// Per-step configuration of the stepper.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepConfig {
    /// Step length the caller is expected to pass to `step`.
    pub fixed_dt: f32,
    /// Number of equal sub-intervals a step is divided into.
    pub substeps: u32,
    /// Solver iterations per substep.
    pub solver_iterations: u32,
}

impl Default for StepConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            substeps: 4,
            solver_iterations: 10,
        }
    }
}

/// Pose of one body at the end of a step, in a layout an external renderer
/// can upload directly.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PoseSnapshot {
    pub position: [f32; 3],
    /// Unit quaternion as `[x, y, z, w]`.
    pub orientation: [f32; 4],
}

impl PoseSnapshot {
    #[must_use]
    pub fn from_pose(pose: &Pose) -> Self {
        Self {
            position: pose.position.to_array(),
            orientation: pose.orientation.to_array(),
        }
    }

    #[must_use]
    pub fn position_vec(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    #[must_use]
    pub fn orientation_quat(&self) -> Quat {
        Quat::from_array(self.orientation)
    }
}
