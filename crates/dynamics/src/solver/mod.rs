//! # Sequential Impulse Solver
//!
//! Projected Gauss-Seidel over velocity constraints. Every constraint -
//! contact or joint - is one or more 1-DOF (or small block) velocity rows
//! with an effective mass assembled from both bodies' inverse mass and
//! world-space inverse inertia. Impulses are applied to the working
//! velocities immediately, so later rows in the same pass see the update.
//!
//! Iteration order is fixed: contacts in insertion order, then joints in
//! creation order, repeated `solver_iterations` times. Positional drift is
//! handled with a Baumgarte bias folded into the velocity error rather than
//! a separate position solve.
//!
//! Joints warm-start from the impulse they stored last step; contacts are
//! transient (rebuilt every substep) and always start from zero.

pub(crate) mod contact;
pub(crate) mod joint;

use glam::{Mat3, Vec3};

pub(crate) use contact::ContactConstraint;
pub(crate) use joint::JointConstraint;

/// Baumgarte position-correction factor.
pub(crate) const BAUMGARTE_BETA: f32 = 0.2;
/// Penetration below this depth is tolerated without correction.
pub(crate) const CONTACT_SLOP: f32 = 0.005;
/// Cap on the bias velocity so deep penetrations do not explode.
pub(crate) const MAX_CORRECTION_SPEED: f32 = 4.0;
/// Normal-velocity magnitude below which restitution is suppressed, so
/// resting stacks settle instead of jittering.
pub(crate) const RESTITUTION_CUTOFF: f32 = 0.5;

/// Velocity-level working copy of one body. The solver mutates these and
/// the world writes them back after the iterations finish.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SolverBody {
    pub linear: Vec3,
    pub angular: Vec3,
    pub inv_mass: f32,
    pub inv_inertia: Mat3,
}

impl SolverBody {
    /// True when the body cannot be moved by any impulse.
    pub fn is_immovable(&self) -> bool {
        self.inv_mass == 0.0 && self.inv_inertia == Mat3::ZERO
    }

    pub fn apply_impulse(&mut self, impulse: Vec3, arm: Vec3) {
        self.linear += impulse * self.inv_mass;
        self.angular += self.inv_inertia * arm.cross(impulse);
    }

    pub fn apply_angular_impulse(&mut self, impulse: Vec3) {
        self.angular += self.inv_inertia * impulse;
    }

    /// Velocity of the material point at `arm` from the center of mass.
    pub fn point_velocity(&self, arm: Vec3) -> Vec3 {
        self.linear + self.angular.cross(arm)
    }
}

/// Effective mass of a 1-DOF row along `dir` with lever arms `ra`, `rb`.
pub(crate) fn effective_mass(
    a: &SolverBody,
    b: &SolverBody,
    dir: Vec3,
    ra: Vec3,
    rb: Vec3,
) -> f32 {
    let ang_a = a.inv_inertia * ra.cross(dir);
    let ang_b = b.inv_inertia * rb.cross(dir);
    let k = a.inv_mass + b.inv_mass + ang_a.cross(ra).dot(dir) + ang_b.cross(rb).dot(dir);
    if k > 1e-9 {
        1.0 / k
    } else {
        0.0
    }
}

/// Skew-symmetric cross-product matrix of `v`.
pub(crate) fn skew(v: Vec3) -> Mat3 {
    Mat3::from_cols(
        Vec3::new(0.0, v.z, -v.y),
        Vec3::new(-v.z, 0.0, v.x),
        Vec3::new(v.y, -v.x, 0.0),
    )
}

/// Invert a constraint-block matrix, falling back to zero (no impulse) when
/// the block is singular, e.g. a joint between two immovable bodies.
pub(crate) fn invert_block(k: Mat3) -> Mat3 {
    if k.determinant().abs() > 1e-9 {
        k.inverse()
    } else {
        Mat3::ZERO
    }
}

/// Run the Gauss-Seidel iterations over prepared constraints.
pub(crate) fn iterate(
    bodies: &mut [SolverBody],
    contacts: &mut [ContactConstraint],
    joints: &mut [JointConstraint],
    iterations: u32,
) {
    for _ in 0..iterations {
        for constraint in contacts.iter_mut() {
            constraint.solve(bodies);
        }
        for constraint in joints.iter_mut() {
            constraint.solve(bodies);
        }
    }
}
