//! Narrow-phase dispatch over shape pairs.

use super::box_box::detect_box_box;
use super::capsule::{detect_box_capsule, detect_capsule_capsule, detect_capsule_sphere};
use super::sphere_box::detect_box_sphere;
use super::sphere_sphere::detect_sphere_sphere;
use super::Contact;
use crate::body::RigidBody;
use crate::shapes::Shape;

/// Run the analytic test for the pair's shape combination. Returns at most
/// one contact with the normal pointing from `a` to `b`.
pub(crate) fn collide(a: &RigidBody, b: &RigidBody) -> Option<Contact> {
    let pose_a = a.pose();
    let pose_b = b.pose();
    match (a.shape(), b.shape()) {
        (Shape::Sphere { radius: ra }, Shape::Sphere { radius: rb }) => detect_sphere_sphere(
            pose_a.position,
            ra,
            pose_b.position,
            rb,
            &a.material,
            &b.material,
        ),

        (Shape::Box { half_extents }, Shape::Sphere { radius }) => detect_box_sphere(
            &pose_a,
            half_extents,
            pose_b.position,
            radius,
            &a.material,
            &b.material,
        ),
        (Shape::Sphere { radius }, Shape::Box { half_extents }) => detect_box_sphere(
            &pose_b,
            half_extents,
            pose_a.position,
            radius,
            &b.material,
            &a.material,
        )
        .map(Contact::flipped),

        (Shape::Box { half_extents: ha }, Shape::Box { half_extents: hb }) => {
            detect_box_box(&pose_a, ha, &pose_b, hb, &a.material, &b.material)
        }

        (Shape::Cylinder { .. }, Shape::Sphere { radius }) => {
            let (s0, s1, cr) = a.shape().as_capsule(&pose_a)?;
            detect_capsule_sphere(
                (s0, s1),
                cr,
                pose_b.position,
                radius,
                &a.material,
                &b.material,
            )
        }
        (Shape::Sphere { radius }, Shape::Cylinder { .. }) => {
            let (s0, s1, cr) = b.shape().as_capsule(&pose_b)?;
            detect_capsule_sphere(
                (s0, s1),
                cr,
                pose_a.position,
                radius,
                &b.material,
                &a.material,
            )
            .map(Contact::flipped)
        }

        (Shape::Box { half_extents }, Shape::Cylinder { .. }) => {
            let (s0, s1, cr) = b.shape().as_capsule(&pose_b)?;
            detect_box_capsule(
                &pose_a,
                half_extents,
                (s0, s1),
                cr,
                &a.material,
                &b.material,
            )
        }
        (Shape::Cylinder { .. }, Shape::Box { half_extents }) => {
            let (s0, s1, cr) = a.shape().as_capsule(&pose_a)?;
            detect_box_capsule(
                &pose_b,
                half_extents,
                (s0, s1),
                cr,
                &b.material,
                &a.material,
            )
            .map(Contact::flipped)
        }

        (Shape::Cylinder { .. }, Shape::Cylinder { .. }) => {
            let (a0, a1, ra) = a.shape().as_capsule(&pose_a)?;
            let (b0, b1, rb) = b.shape().as_capsule(&pose_b)?;
            detect_capsule_capsule((a0, a1), ra, (b0, b1), rb, &a.material, &b.material)
        }
    }
}
