//! Box-sphere collision detection via closest point on an oriented box.

use glam::Vec3;

use super::Contact;
use crate::types::{Material, Pose};

/// Detect a contact between an oriented box (A) and a sphere (B).
/// The normal points from the box to the sphere.
pub(crate) fn detect_box_sphere(
    box_pose: &Pose,
    half_extents: Vec3,
    center: Vec3,
    radius: f32,
    mat_box: &Material,
    mat_sphere: &Material,
) -> Option<Contact> {
    let local_center = box_pose.inverse_transform_point(center);
    let clamped = local_center.clamp(-half_extents, half_extents);

    if clamped == local_center {
        // Sphere center inside the box: push out through the nearest face.
        let face_dist = half_extents - local_center.abs();
        let (axis, dist) = if face_dist.x <= face_dist.y && face_dist.x <= face_dist.z {
            (Vec3::X * local_center.x.signum(), face_dist.x)
        } else if face_dist.y <= face_dist.z {
            (Vec3::Y * local_center.y.signum(), face_dist.y)
        } else {
            (Vec3::Z * local_center.z.signum(), face_dist.z)
        };
        let normal = box_pose.rotate(axis);
        let depth = dist + radius;
        let point = center - normal * radius;
        return Some(Contact::new(point, normal, depth, mat_box, mat_sphere));
    }

    let closest_world = box_pose.transform_point(clamped);
    let delta = center - closest_world;
    let dist_sq = delta.length_squared();
    if dist_sq >= radius * radius {
        return None;
    }
    let dist = dist_sq.sqrt();
    let normal = if dist > 1e-6 {
        delta / dist
    } else {
        box_pose.rotate(Vec3::X)
    };
    Some(Contact::new(
        closest_world,
        normal,
        radius - dist,
        mat_box,
        mat_sphere,
    ))
}
