//! # Collision Detection
//!
//! Broad-phase candidate pair generation over world AABBs and analytic
//! narrow-phase tests per shape pair. The narrow phase only produces contact
//! data; the response is solved with everything else by the sequential
//! impulse solver.

mod box_box;
mod broad_phase;
mod capsule;
mod dispatcher;
mod sphere_box;
mod sphere_sphere;

pub(crate) use broad_phase::{compute_aabbs, sweep_pairs};
pub(crate) use dispatcher::collide;

use glam::Vec3;

use crate::types::Material;

/// Contact information produced by the narrow phase. Contacts are transient:
/// rebuilt every substep, never persisted.
#[derive(Clone, Copy, Debug)]
pub struct Contact {
    /// Contact point in world space.
    pub point: Vec3,
    /// Contact normal, from body A to body B.
    pub normal: Vec3,
    /// Penetration depth; the narrow phase discards negative depths.
    pub depth: f32,
    /// Combined friction coefficient.
    pub friction: f32,
    /// Combined restitution coefficient.
    pub restitution: f32,
}

impl Contact {
    /// Create a contact, combining the two bodies' material properties.
    #[must_use]
    pub fn new(point: Vec3, normal: Vec3, depth: f32, mat_a: &Material, mat_b: &Material) -> Self {
        Self {
            point,
            normal,
            depth,
            friction: combine_friction(mat_a.friction, mat_b.friction),
            restitution: combine_restitution(mat_a.restitution, mat_b.restitution),
        }
    }

    /// Same contact with the A/B roles swapped.
    #[must_use]
    pub fn flipped(mut self) -> Self {
        self.normal = -self.normal;
        self
    }
}

/// Combine friction coefficients using a geometric mean.
fn combine_friction(f1: f32, f2: f32) -> f32 {
    (f1 * f2).sqrt()
}

/// Combine restitution coefficients using a geometric mean.
fn combine_restitution(r1: f32, r2: f32) -> f32 {
    (r1 * r2).sqrt()
}
