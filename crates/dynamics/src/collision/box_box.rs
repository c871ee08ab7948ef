//! Box-box collision detection: separating axis test over the 6 face
//! normals and 9 edge-pair cross products of two oriented boxes, then a
//! contact point from reference-face clipping (face axes) or the closest
//! points of the supporting edges (edge axes).

use glam::{Mat3, Vec3};

use super::capsule::closest_points_on_segments;
use super::Contact;
use crate::types::{Material, Pose};

/// Detect a contact between two oriented boxes. The normal points from A to
/// B and is the axis of minimum penetration.
pub(crate) fn detect_box_box(
    pose_a: &Pose,
    half_a: Vec3,
    pose_b: &Pose,
    half_b: Vec3,
    mat_a: &Material,
    mat_b: &Material,
) -> Option<Contact> {
    let rot_a = Mat3::from_quat(pose_a.orientation);
    let rot_b = Mat3::from_quat(pose_b.orientation);
    let axes_a = [rot_a.x_axis, rot_a.y_axis, rot_a.z_axis];
    let axes_b = [rot_b.x_axis, rot_b.y_axis, rot_b.z_axis];
    let center_delta = pose_b.position - pose_a.position;

    let mut best_overlap = f32::MAX;
    let mut best_axis = Vec3::X;
    let mut best_index = 0usize;

    let mut test_axis = |index: usize, axis: Vec3| -> bool {
        let len_sq = axis.length_squared();
        // Near-parallel edges produce a degenerate cross product; skip.
        if len_sq < 1e-8 {
            return true;
        }
        let axis = axis / len_sq.sqrt();
        let ra = half_a.x * axes_a[0].dot(axis).abs()
            + half_a.y * axes_a[1].dot(axis).abs()
            + half_a.z * axes_a[2].dot(axis).abs();
        let rb = half_b.x * axes_b[0].dot(axis).abs()
            + half_b.y * axes_b[1].dot(axis).abs()
            + half_b.z * axes_b[2].dot(axis).abs();
        let dist = center_delta.dot(axis);
        let overlap = ra + rb - dist.abs();
        if overlap <= 0.0 {
            return false;
        }
        // Strict comparison: face axes are tested first, so an edge axis
        // only wins when it is genuinely shallower.
        if overlap < best_overlap {
            best_overlap = overlap;
            best_axis = if dist >= 0.0 { axis } else { -axis };
            best_index = index;
        }
        true
    };

    for (i, axis) in axes_a.iter().enumerate() {
        if !test_axis(i, *axis) {
            return None;
        }
    }
    for (i, axis) in axes_b.iter().enumerate() {
        if !test_axis(3 + i, *axis) {
            return None;
        }
    }
    for (i, a) in axes_a.iter().enumerate() {
        for (j, b) in axes_b.iter().enumerate() {
            if !test_axis(6 + 3 * i + j, a.cross(*b)) {
                return None;
            }
        }
    }

    // Single-point manifold. Face separation: clip the incident face of the
    // other box against the reference face and take the centroid of the
    // penetrating region, so the point always lies inside the overlap
    // footprint. Edge separation: midpoint of the supporting edges' closest
    // points.
    let point = if best_index < 3 {
        face_contact_point(
            pose_a, half_a, &axes_a, best_index, pose_b, half_b, &axes_b, best_axis,
        )
    } else if best_index < 6 {
        face_contact_point(
            pose_b,
            half_b,
            &axes_b,
            best_index - 3,
            pose_a,
            half_a,
            &axes_a,
            -best_axis,
        )
    } else {
        let rel = best_index - 6;
        let edge_a = supporting_edge(pose_a, half_a, &axes_a, rel / 3, best_axis);
        let edge_b = supporting_edge(pose_b, half_b, &axes_b, rel % 3, -best_axis);
        let (on_a, on_b) = closest_points_on_segments(edge_a.0, edge_a.1, edge_b.0, edge_b.1);
        0.5 * (on_a + on_b)
    };

    Some(Contact::new(point, best_axis, best_overlap, mat_a, mat_b))
}

/// Contact point for a face separation. `normal` is the unit reference face
/// normal, pointing from the reference box toward the incident box.
#[allow(clippy::too_many_arguments)]
fn face_contact_point(
    ref_pose: &Pose,
    ref_half: Vec3,
    ref_axes: &[Vec3; 3],
    ref_face: usize,
    inc_pose: &Pose,
    inc_half: Vec3,
    inc_axes: &[Vec3; 3],
    normal: Vec3,
) -> Vec3 {
    let ref_half = ref_half.to_array();
    let inc_half = inc_half.to_array();

    // Incident face: the face of the other box most anti-parallel to the
    // reference normal.
    let mut inc_face = 0;
    let mut most = -1.0;
    for (i, axis) in inc_axes.iter().enumerate() {
        let d = axis.dot(normal).abs();
        if d > most {
            most = d;
            inc_face = i;
        }
    }
    let sign = -inc_axes[inc_face].dot(normal).signum();
    let face_center = inc_pose.position + inc_axes[inc_face] * (sign * inc_half[inc_face]);
    let (u, v) = ((inc_face + 1) % 3, (inc_face + 2) % 3);
    let du = inc_axes[u] * inc_half[u];
    let dv = inc_axes[v] * inc_half[v];
    let mut poly = vec![
        face_center + du + dv,
        face_center - du + dv,
        face_center - du - dv,
        face_center + du - dv,
    ];

    // Clip against the four side planes of the reference face.
    for s in 0..3 {
        if s == ref_face {
            continue;
        }
        for dir in [1.0f32, -1.0] {
            let plane_normal = ref_axes[s] * dir;
            let plane_offset = plane_normal.dot(ref_pose.position) + ref_half[s];
            poly = clip_half_space(&poly, plane_normal, plane_offset);
        }
    }

    // Keep points at or below the reference face; their centroid is the
    // contact point. Falls back to the deepest candidate when the clipped
    // polygon sits entirely above the face.
    let mut sum = Vec3::ZERO;
    let mut count = 0u32;
    let mut deepest = face_center;
    let mut deepest_separation = f32::MAX;
    for &p in &poly {
        let separation = normal.dot(p - ref_pose.position) - ref_half[ref_face];
        if separation < deepest_separation {
            deepest_separation = separation;
            deepest = p;
        }
        if separation <= 0.0 {
            sum += p;
            count += 1;
        }
    }
    if count > 0 {
        sum / count as f32
    } else {
        deepest
    }
}

/// Sutherland-Hodgman clip of a polygon against the half space
/// `normal . p <= offset`.
fn clip_half_space(poly: &[Vec3], normal: Vec3, offset: f32) -> Vec<Vec3> {
    if poly.is_empty() {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(poly.len() + 1);
    for (i, &p) in poly.iter().enumerate() {
        let q = poly[(i + 1) % poly.len()];
        let dp = normal.dot(p) - offset;
        let dq = normal.dot(q) - offset;
        if dp <= 0.0 {
            out.push(p);
        }
        if dp * dq < 0.0 {
            out.push(p + (q - p) * (dp / (dp - dq)));
        }
    }
    out
}

/// Edge of the box farthest along `dir`, as a segment.
fn supporting_edge(
    pose: &Pose,
    half: Vec3,
    axes: &[Vec3; 3],
    edge_axis: usize,
    dir: Vec3,
) -> (Vec3, Vec3) {
    let half = half.to_array();
    let mut mid = pose.position;
    for (k, axis) in axes.iter().enumerate() {
        if k == edge_axis {
            continue;
        }
        mid += *axis * (half[k] * axis.dot(dir).signum());
    }
    let along = axes[edge_axis] * half[edge_axis];
    (mid - along, mid + along)
}
