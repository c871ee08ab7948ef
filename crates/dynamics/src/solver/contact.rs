//! Contact constraint rows: one non-negative normal row plus two friction
//! rows clamped to the friction cone.

use glam::Vec3;

use super::{
    effective_mass, SolverBody, BAUMGARTE_BETA, CONTACT_SLOP, MAX_CORRECTION_SPEED,
    RESTITUTION_CUTOFF,
};
use crate::collision::Contact;

pub(crate) struct ContactConstraint {
    /// Solver-body indices.
    a: usize,
    b: usize,
    normal: Vec3,
    tangents: [Vec3; 2],
    /// Lever arms from each center of mass to the contact point.
    ra: Vec3,
    rb: Vec3,
    normal_mass: f32,
    tangent_mass: [f32; 2],
    /// Post-solve target normal velocity: Baumgarte push plus restitution.
    target_velocity: f32,
    friction: f32,
    normal_impulse: f32,
    tangent_impulse: [f32; 2],
}

impl ContactConstraint {
    /// Assemble the rows for one contact between solver bodies `a` and `b`.
    pub fn prepare(
        a: usize,
        b: usize,
        bodies: &[SolverBody],
        contact: &Contact,
        pos_a: Vec3,
        pos_b: Vec3,
        dt: f32,
    ) -> Self {
        let body_a = &bodies[a];
        let body_b = &bodies[b];
        let ra = contact.point - pos_a;
        let rb = contact.point - pos_b;
        let normal = contact.normal;
        let tangents = normal.any_orthonormal_pair();
        let tangents = [tangents.0, tangents.1];

        let normal_mass = effective_mass(body_a, body_b, normal, ra, rb);
        let tangent_mass = [
            effective_mass(body_a, body_b, tangents[0], ra, rb),
            effective_mass(body_a, body_b, tangents[1], ra, rb),
        ];

        let baumgarte = (BAUMGARTE_BETA / dt * (contact.depth - CONTACT_SLOP).max(0.0))
            .min(MAX_CORRECTION_SPEED);
        let approach = (body_b.point_velocity(rb) - body_a.point_velocity(ra)).dot(normal);
        let restitution = if approach < -RESTITUTION_CUTOFF {
            -contact.restitution * approach
        } else {
            0.0
        };

        Self {
            a,
            b,
            normal,
            tangents,
            ra,
            rb,
            normal_mass,
            tangent_mass,
            target_velocity: baumgarte.max(restitution),
            friction: contact.friction,
            normal_impulse: 0.0,
            tangent_impulse: [0.0; 2],
        }
    }

    /// One Gauss-Seidel pass over this contact's rows.
    pub fn solve(&mut self, bodies: &mut [SolverBody]) {
        let (body_a, body_b) = pair_mut(bodies, self.a, self.b);

        // Normal row: accumulated impulse clamped non-negative.
        let rel = body_b.point_velocity(self.rb) - body_a.point_velocity(self.ra);
        let vn = rel.dot(self.normal);
        let lambda = -self.normal_mass * (vn - self.target_velocity);
        let new_total = (self.normal_impulse + lambda).max(0.0);
        let applied = new_total - self.normal_impulse;
        self.normal_impulse = new_total;
        let impulse = self.normal * applied;
        body_a.apply_impulse(-impulse, self.ra);
        body_b.apply_impulse(impulse, self.rb);

        // Friction rows: accumulated impulse clamped to the cone.
        let max_tangent = self.friction * self.normal_impulse;
        for i in 0..2 {
            let rel = body_b.point_velocity(self.rb) - body_a.point_velocity(self.ra);
            let vt = rel.dot(self.tangents[i]);
            let lambda = -self.tangent_mass[i] * vt;
            let new_total = (self.tangent_impulse[i] + lambda).clamp(-max_tangent, max_tangent);
            let applied = new_total - self.tangent_impulse[i];
            self.tangent_impulse[i] = new_total;
            let impulse = self.tangents[i] * applied;
            body_a.apply_impulse(-impulse, self.ra);
            body_b.apply_impulse(impulse, self.rb);
        }
    }
}

/// Disjoint mutable borrows of two solver bodies.
pub(crate) fn pair_mut(
    bodies: &mut [SolverBody],
    a: usize,
    b: usize,
) -> (&mut SolverBody, &mut SolverBody) {
    debug_assert_ne!(a, b);
    if a < b {
        let (lo, hi) = bodies.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = bodies.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    }
}
