//! Sphere-sphere collision detection (closed form).

use glam::Vec3;

use super::Contact;
use crate::types::Material;

/// Detect a contact between two spheres. The normal points from A to B.
pub(crate) fn detect_sphere_sphere(
    center_a: Vec3,
    radius_a: f32,
    center_b: Vec3,
    radius_b: f32,
    mat_a: &Material,
    mat_b: &Material,
) -> Option<Contact> {
    let delta = center_b - center_a;
    let dist_sq = delta.length_squared();
    let radius_sum = radius_a + radius_b;
    if dist_sq >= radius_sum * radius_sum {
        return None;
    }

    let dist = dist_sq.sqrt();
    // Concentric spheres have no preferred direction; pick x.
    let normal = if dist > 1e-6 { delta / dist } else { Vec3::X };
    let depth = radius_sum - dist;
    let point = center_a + normal * (radius_a - 0.5 * depth);
    Some(Contact::new(point, normal, depth, mat_a, mat_b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separated_spheres_do_not_touch() {
        let mat = Material::default();
        assert!(detect_sphere_sphere(
            Vec3::ZERO,
            1.0,
            Vec3::new(2.5, 0.0, 0.0),
            1.0,
            &mat,
            &mat
        )
        .is_none());
    }

    #[test]
    fn overlap_reports_depth_and_normal() {
        let mat = Material::default();
        let contact = detect_sphere_sphere(
            Vec3::ZERO,
            1.0,
            Vec3::new(1.5, 0.0, 0.0),
            1.0,
            &mat,
            &mat,
        )
        .unwrap();
        assert!((contact.depth - 0.5).abs() < 1e-6);
        assert!((contact.normal - Vec3::X).length() < 1e-6);
    }
}
