//! Analytic collision primitives.
//!
//! Shapes are immutable once attached to a body. Each shape knows its world
//! AABB for a given pose and its body-space inertia tensor for a given mass.
//! Cylinders are approximated by an oriented capsule for contact generation;
//! the capsule view lives here so the narrow phase stays purely analytic.

use glam::{Mat3, Vec3};

use crate::error::Error;
use crate::types::Pose;

/// Local axis of a cylinder before rotation.
pub(crate) const CYLINDER_AXIS: Vec3 = Vec3::Y;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
    /// Axis along local +Y.
    Cylinder { radius: f32, half_height: f32 },
}

impl Shape {
    /// Reject malformed parameters. Called once when the shape is attached
    /// to a body; shapes are immutable afterwards.
    pub fn validate(&self) -> Result<(), Error> {
        let ok = match *self {
            Shape::Box { half_extents } => {
                half_extents.is_finite() && half_extents.cmpgt(Vec3::ZERO).all()
            }
            Shape::Sphere { radius } => radius.is_finite() && radius > 0.0,
            Shape::Cylinder {
                radius,
                half_height,
            } => radius.is_finite() && radius > 0.0 && half_height.is_finite() && half_height > 0.0,
        };
        if ok {
            Ok(())
        } else {
            Err(Error::InvalidShape(match self {
                Shape::Box { .. } => "box half extents must be positive",
                Shape::Sphere { .. } => "sphere radius must be positive",
                Shape::Cylinder { .. } => "cylinder radius and half height must be positive",
            }))
        }
    }

    /// World-space AABB of the shape at `pose`.
    #[must_use]
    pub fn aabb(&self, pose: &Pose) -> Aabb {
        match *self {
            Shape::Box { half_extents } => {
                // Extent along each world axis is the absolute rotation
                // matrix applied to the half extents.
                let rot = Mat3::from_quat(pose.orientation);
                let abs_r = Mat3::from_cols(rot.x_axis.abs(), rot.y_axis.abs(), rot.z_axis.abs());
                let world_ext = abs_r * half_extents;
                Aabb {
                    min: pose.position - world_ext,
                    max: pose.position + world_ext,
                }
            }
            Shape::Sphere { radius } => Aabb {
                min: pose.position - Vec3::splat(radius),
                max: pose.position + Vec3::splat(radius),
            },
            Shape::Cylinder {
                radius,
                half_height,
            } => {
                let axis = pose.rotate(CYLINDER_AXIS) * half_height;
                let lo = pose.position - axis;
                let hi = pose.position + axis;
                Aabb {
                    min: lo.min(hi) - Vec3::splat(radius),
                    max: lo.max(hi) + Vec3::splat(radius),
                }
            }
        }
    }

    /// Body-space inertia tensor for a body of mass `mass`.
    #[must_use]
    pub fn inertia(&self, mass: f32) -> Mat3 {
        match *self {
            Shape::Box { half_extents } => {
                let Vec3 { x, y, z } = half_extents;
                Mat3::from_diagonal(Vec3::new(
                    mass / 3.0 * (y * y + z * z),
                    mass / 3.0 * (x * x + z * z),
                    mass / 3.0 * (x * x + y * y),
                ))
            }
            Shape::Sphere { radius } => {
                Mat3::from_diagonal(Vec3::splat(0.4 * mass * radius * radius))
            }
            Shape::Cylinder {
                radius,
                half_height,
            } => {
                let height = 2.0 * half_height;
                let lateral = mass / 12.0 * (3.0 * radius * radius + height * height);
                let axial = 0.5 * mass * radius * radius;
                Mat3::from_diagonal(Vec3::new(lateral, axial, lateral))
            }
        }
    }

    /// Capsule view of a cylinder: world segment endpoints plus radius.
    /// The segment is shortened so the capsule's total half height matches
    /// the cylinder's; a squat cylinder degenerates to a sphere.
    pub(crate) fn as_capsule(&self, pose: &Pose) -> Option<(Vec3, Vec3, f32)> {
        match *self {
            Shape::Cylinder {
                radius,
                half_height,
            } => {
                let seg = (half_height - radius).max(0.0);
                let axis = pose.rotate(CYLINDER_AXIS) * seg;
                Some((pose.position - axis, pose.position + axis, radius))
            }
            _ => None,
        }
    }
}

/// Axis-aligned bounding box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Check if two bounding boxes overlap.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
            && self.min.z <= other.max.z
            && self.max.z >= other.min.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    #[test]
    fn validate_rejects_bad_parameters() {
        assert!(Shape::Sphere { radius: -1.0 }.validate().is_err());
        assert!(Shape::Box {
            half_extents: Vec3::new(1.0, 0.0, 1.0)
        }
        .validate()
        .is_err());
        assert!(Shape::Cylinder {
            radius: 0.3,
            half_height: f32::NAN
        }
        .validate()
        .is_err());
        assert!(Shape::Sphere { radius: 0.5 }.validate().is_ok());
    }

    #[test]
    fn rotated_box_aabb_grows() {
        let shape = Shape::Box {
            half_extents: Vec3::new(1.0, 1.0, 1.0),
        };
        let pose = Pose::new(
            Vec3::ZERO,
            Quat::from_axis_angle(Vec3::Z, std::f32::consts::FRAC_PI_4),
        );
        let aabb = shape.aabb(&pose);
        // A unit cube rotated 45 degrees about Z spans sqrt(2) in x and y.
        assert!((aabb.max.x - 2.0_f32.sqrt()).abs() < 1e-5);
        assert!((aabb.max.y - 2.0_f32.sqrt()).abs() < 1e-5);
        assert!((aabb.max.z - 1.0).abs() < 1e-5);
    }

    #[test]
    fn sphere_inertia_matches_closed_form() {
        let shape = Shape::Sphere { radius: 2.0 };
        let inertia = shape.inertia(5.0);
        assert!((inertia.x_axis.x - 0.4 * 5.0 * 4.0).abs() < 1e-5);
    }

    #[test]
    fn squat_cylinder_capsule_degenerates_to_sphere() {
        let shape = Shape::Cylinder {
            radius: 1.0,
            half_height: 0.5,
        };
        let (a, b, radius) = shape.as_capsule(&Pose::IDENTITY).unwrap();
        assert_eq!(a, b);
        assert_eq!(radius, 1.0);
    }
}
