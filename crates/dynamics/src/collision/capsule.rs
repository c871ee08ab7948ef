//! Capsule contact generation. Cylinders are approximated by an oriented
//! capsule (core segment plus radius) for all contact tests, so every pair
//! involving a cylinder reduces to a closest-point problem followed by the
//! sphere test at that point.

use glam::Vec3;

use super::sphere_box::detect_box_sphere;
use super::sphere_sphere::detect_sphere_sphere;
use super::Contact;
use crate::types::{Material, Pose};

/// Capsule (A) against sphere (B): sphere test from the closest point on the
/// core segment.
pub(crate) fn detect_capsule_sphere(
    seg_a: (Vec3, Vec3),
    radius_a: f32,
    center_b: Vec3,
    radius_b: f32,
    mat_a: &Material,
    mat_b: &Material,
) -> Option<Contact> {
    let on_segment = closest_point_on_segment(seg_a.0, seg_a.1, center_b);
    detect_sphere_sphere(on_segment, radius_a, center_b, radius_b, mat_a, mat_b)
}

/// Capsule (A) against capsule (B): sphere test at the closest points of the
/// two core segments.
pub(crate) fn detect_capsule_capsule(
    seg_a: (Vec3, Vec3),
    radius_a: f32,
    seg_b: (Vec3, Vec3),
    radius_b: f32,
    mat_a: &Material,
    mat_b: &Material,
) -> Option<Contact> {
    let (on_a, on_b) = closest_points_on_segments(seg_a.0, seg_a.1, seg_b.0, seg_b.1);
    detect_sphere_sphere(on_a, radius_a, on_b, radius_b, mat_a, mat_b)
}

/// Box (A) against capsule (B). The capsule is sampled at the segment point
/// nearest the box center, then the box-sphere test finishes the job. One
/// contact point is enough for the single-point manifolds used here.
pub(crate) fn detect_box_capsule(
    box_pose: &Pose,
    half_extents: Vec3,
    seg: (Vec3, Vec3),
    radius: f32,
    mat_box: &Material,
    mat_capsule: &Material,
) -> Option<Contact> {
    let probe = closest_point_on_segment(seg.0, seg.1, box_pose.position);
    detect_box_sphere(box_pose, half_extents, probe, radius, mat_box, mat_capsule)
}

/// Closest point to `p` on segment `ab`.
fn closest_point_on_segment(a: Vec3, b: Vec3, p: Vec3) -> Vec3 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-12 {
        return a;
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}

/// Closest points between segments `p1q1` and `p2q2` (Ericson, Real-Time
/// Collision Detection, 5.1.9). Also used for box edge-edge contacts.
pub(crate) fn closest_points_on_segments(p1: Vec3, q1: Vec3, p2: Vec3, q2: Vec3) -> (Vec3, Vec3) {
    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.length_squared();
    let e = d2.length_squared();
    let f = d2.dot(r);

    let (s, t);
    if a < 1e-12 && e < 1e-12 {
        return (p1, p2);
    }
    if a < 1e-12 {
        s = 0.0;
        t = (f / e).clamp(0.0, 1.0);
    } else {
        let c = d1.dot(r);
        if e < 1e-12 {
            t = 0.0;
            s = (-c / a).clamp(0.0, 1.0);
        } else {
            let b = d1.dot(d2);
            let denom = a * e - b * b;
            let s0 = if denom > 1e-12 {
                ((b * f - c * e) / denom).clamp(0.0, 1.0)
            } else {
                0.0
            };
            let t0 = (b * s0 + f) / e;
            if t0 < 0.0 {
                t = 0.0;
                s = (-c / a).clamp(0.0, 1.0);
            } else if t0 > 1.0 {
                t = 1.0;
                s = ((b - c) / a).clamp(0.0, 1.0);
            } else {
                t = t0;
                s = s0;
            }
        }
    }
    (p1 + d1 * s, p2 + d2 * t)
}
