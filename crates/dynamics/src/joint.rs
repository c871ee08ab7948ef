//! Persistent joint constraints.
//!
//! The joint set is a closed enum: a joint is either Fixed (all six relative
//! DOF removed) or Hinge (one rotational DOF left free, optionally limited
//! and/or motorized). Anchor frames are fixed in each body's local space at
//! creation and never recomputed from world geometry afterwards.
//!
//! Convention: the hinge axis is the +X axis of both anchor frames. The
//! helper [`Joint::frames_from_world`] builds matching frames from a world
//! anchor point and world axis at assembly time.

use glam::{Quat, Vec3};

use crate::error::Error;
use crate::handle::BodyHandle;
use crate::types::Pose;

/// One-sided angular stops on a hinge, in radians. Active only when the
/// hinge angle reaches a bound.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HingeLimit {
    pub lower: f32,
    pub upper: f32,
}

impl HingeLimit {
    pub fn new(lower: f32, upper: f32) -> Result<Self, Error> {
        if lower > upper {
            return Err(Error::InvalidLimit { lower, upper });
        }
        Ok(Self { lower, upper })
    }
}

/// Velocity-target motor on a hinge's free axis. The impulse applied per
/// substep is clamped to `max_impulse` - the torque cap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HingeMotor {
    /// Target relative angular velocity about the hinge axis, rad/s.
    pub target_velocity: f32,
    /// Maximum impulse magnitude per substep; `f32::INFINITY` for unbounded.
    pub max_impulse: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum JointKind {
    /// Anchor points coincide and anchor frames co-rotate: 6 constraints.
    Fixed,
    /// All relative motion removed except rotation about the shared +X axis
    /// of the anchor frames: 5 constraints plus optional limit and motor.
    Hinge {
        limit: Option<HingeLimit>,
        motor: Option<HingeMotor>,
    },
}

/// Anchor frame in a body's local space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointAnchor {
    pub position: Vec3,
    pub orientation: Quat,
}

impl JointAnchor {
    #[must_use]
    pub const fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }
}

/// Input descriptor when creating a joint.
#[derive(Clone, Copy, Debug)]
pub struct JointDesc {
    pub body_a: BodyHandle,
    pub body_b: BodyHandle,
    pub anchor_a: JointAnchor,
    pub anchor_b: JointAnchor,
    pub kind: JointKind,
    /// Impulse magnitude per step above which the joint breaks permanently.
    pub breaking_threshold: Option<f32>,
    /// Whether the two connected bodies still collide with each other.
    pub collide_connected: bool,
}

/// Warm-start and accounting state carried across solver runs.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct JointImpulses {
    /// Accumulated linear (anchor coincidence) impulse.
    pub linear: Vec3,
    /// Accumulated angular impulse; all three components for Fixed, the two
    /// axis-alignment rows for Hinge (z unused).
    pub angular: Vec3,
}

#[derive(Debug)]
pub struct Joint {
    pub(crate) body_a: BodyHandle,
    pub(crate) body_b: BodyHandle,
    pub(crate) anchor_a: JointAnchor,
    pub(crate) anchor_b: JointAnchor,
    pub(crate) kind: JointKind,
    pub(crate) enabled: bool,
    pub(crate) collide_connected: bool,
    pub(crate) breaking_threshold: Option<f32>,
    pub(crate) impulses: JointImpulses,
    /// Equality-row impulse magnitude accumulated over the current step.
    pub(crate) step_impulse: f32,
}

impl Joint {
    pub(crate) fn new(desc: JointDesc) -> Result<Self, Error> {
        if desc.body_a == desc.body_b {
            return Err(Error::SelfJoint);
        }
        if let JointKind::Hinge {
            limit: Some(limit), ..
        } = desc.kind
        {
            // Re-validate; HingeLimit::new enforces this, but the struct
            // fields are public.
            HingeLimit::new(limit.lower, limit.upper)?;
        }
        Ok(Self {
            body_a: desc.body_a,
            body_b: desc.body_b,
            anchor_a: desc.anchor_a,
            anchor_b: desc.anchor_b,
            kind: desc.kind,
            enabled: true,
            collide_connected: desc.collide_connected,
            breaking_threshold: desc.breaking_threshold,
            impulses: JointImpulses::default(),
            step_impulse: 0.0,
        })
    }

    #[must_use]
    pub fn body_a(&self) -> BodyHandle {
        self.body_a
    }

    #[must_use]
    pub fn body_b(&self) -> BodyHandle {
        self.body_b
    }

    #[must_use]
    pub fn kind(&self) -> JointKind {
        self.kind
    }

    /// False once the joint has broken or been detached. One-way: a broken
    /// joint is never re-enabled.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Build matching anchor frames from a world anchor point and, for
    /// hinges, a world axis. The frame's +X is aligned with the axis; for
    /// fixed joints the frame orientation is the world identity. Both
    /// frames coincide in world space at creation, so the captured relative
    /// pose is the joint's rest pose.
    #[must_use]
    pub fn frames_from_world(
        pose_a: &Pose,
        pose_b: &Pose,
        world_point: Vec3,
        world_axis: Option<Vec3>,
    ) -> (JointAnchor, JointAnchor) {
        let world_frame = match world_axis {
            Some(axis) => {
                let x = axis.normalize();
                let (y, z) = x.any_orthonormal_pair();
                Quat::from_mat3(&glam::Mat3::from_cols(x, y, z))
            }
            None => Quat::IDENTITY,
        };
        let anchor_a = JointAnchor::new(
            pose_a.inverse_transform_point(world_point),
            (pose_a.orientation.conjugate() * world_frame).normalize(),
        );
        let anchor_b = JointAnchor::new(
            pose_b.inverse_transform_point(world_point),
            (pose_b.orientation.conjugate() * world_frame).normalize(),
        );
        (anchor_a, anchor_b)
    }

    /// World-space anchor frame on body A for the given body pose.
    pub(crate) fn world_frame_a(&self, pose: &Pose) -> Pose {
        Pose::new(
            pose.transform_point(self.anchor_a.position),
            (pose.orientation * self.anchor_a.orientation).normalize(),
        )
    }

    pub(crate) fn world_frame_b(&self, pose: &Pose) -> Pose {
        Pose::new(
            pose.transform_point(self.anchor_b.position),
            (pose.orientation * self.anchor_b.orientation).normalize(),
        )
    }

    /// Hinge angle: the twist of frame B relative to frame A about the
    /// shared +X axis, wrapped to `[-pi, pi]`.
    pub(crate) fn hinge_angle(&self, pose_a: &Pose, pose_b: &Pose) -> f32 {
        let frame_a = self.world_frame_a(pose_a).orientation;
        let frame_b = self.world_frame_b(pose_b).orientation;
        let rel = (frame_a.conjugate() * frame_b).normalize();
        // Twist-swing decomposition about x: the twist quaternion is
        // (rel.x, 0, 0, rel.w) normalized.
        let angle = 2.0 * rel.x.atan2(rel.w);
        if angle > std::f32::consts::PI {
            angle - 2.0 * std::f32::consts::PI
        } else if angle < -std::f32::consts::PI {
            angle + 2.0 * std::f32::consts::PI
        } else {
            angle
        }
    }

    pub(crate) fn reset_warm_start(&mut self) {
        self.impulses = JointImpulses::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn hinge_between(pose_a: &Pose, pose_b: &Pose) -> Joint {
        let (anchor_a, anchor_b) =
            Joint::frames_from_world(pose_a, pose_b, Vec3::ZERO, Some(Vec3::Z));
        Joint::new(JointDesc {
            body_a: BodyHandle {
                index: 0,
                generation: 0,
            },
            body_b: BodyHandle {
                index: 1,
                generation: 0,
            },
            anchor_a,
            anchor_b,
            kind: JointKind::Hinge {
                limit: None,
                motor: None,
            },
            breaking_threshold: None,
            collide_connected: false,
        })
        .unwrap()
    }

    #[test]
    fn empty_limit_is_rejected() {
        assert!(HingeLimit::new(1.0, -1.0).is_err());
        assert!(HingeLimit::new(-0.5, 0.5).is_ok());
    }

    #[test]
    fn hinge_angle_is_zero_at_rest() {
        let pose_a = Pose::from_position(Vec3::new(-1.0, 0.0, 0.0));
        let pose_b = Pose::from_position(Vec3::new(1.0, 0.0, 0.0));
        let joint = hinge_between(&pose_a, &pose_b);
        assert!(joint.hinge_angle(&pose_a, &pose_b).abs() < 1e-6);
    }

    #[test]
    fn hinge_angle_tracks_rotation_about_axis() {
        let pose_a = Pose::from_position(Vec3::new(-1.0, 0.0, 0.0));
        let pose_b = Pose::from_position(Vec3::new(1.0, 0.0, 0.0));
        let joint = hinge_between(&pose_a, &pose_b);

        // Rotate body B a quarter turn about the hinge axis (world z).
        let rotated = Pose::new(pose_b.position, Quat::from_axis_angle(Vec3::Z, FRAC_PI_2));
        let angle = joint.hinge_angle(&pose_a, &rotated);
        assert!((angle - FRAC_PI_2).abs() < 1e-5);

        let counter = Pose::new(pose_b.position, Quat::from_axis_angle(Vec3::Z, -FRAC_PI_2));
        assert!((joint.hinge_angle(&pose_a, &counter) + FRAC_PI_2).abs() < 1e-5);
    }
}
