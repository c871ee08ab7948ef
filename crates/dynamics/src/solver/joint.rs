//! Joint constraint blocks.
//!
//! Fixed joints solve two 3x3 blocks (anchor coincidence, frame
//! co-rotation). Hinges solve the 3x3 linear block, a 2x2 axis-alignment
//! block, then the optional motor and limit rows on the free axis. The
//! limit row is solved after the motor row in the same pass, so whenever
//! both are active the limit's impulse lands last and cannot be violated
//! by the motor.

use glam::{Mat2, Mat3, Quat, Vec2, Vec3};

use super::contact::pair_mut;
use super::{invert_block, skew, SolverBody, BAUMGARTE_BETA, MAX_CORRECTION_SPEED};
use crate::joint::{Joint, JointImpulses, JointKind};
use crate::types::Pose;

/// Which bound of the hinge limit is currently active.
#[derive(Clone, Copy, Debug, PartialEq)]
enum LimitState {
    Inactive,
    /// At the lower bound: the constraint pushes the angle upward, so the
    /// accumulated limit impulse is clamped non-negative.
    Lower { bias: f32 },
    /// At the upper bound; impulse clamped non-positive.
    Upper { bias: f32 },
}

struct HingeRows {
    /// World basis perpendicular to the hinge axis, from frame A.
    b1: Vec3,
    b2: Vec3,
    /// World hinge axis, from frame A.
    axis: Vec3,
    align_mass: Mat2,
    align_bias: Vec2,
    /// Effective mass about the free axis, shared by motor and limit.
    axis_mass: f32,
    motor: Option<(f32, f32)>,
    limit: LimitState,
    motor_impulse: f32,
    limit_impulse: f32,
    align_impulse: Vec2,
}

enum AngularPart {
    Fixed {
        angular_mass: Mat3,
        angular_bias: Vec3,
        impulse: Vec3,
    },
    Hinge(Box<HingeRows>),
}

pub(crate) struct JointConstraint {
    /// Slot of the joint in the world's joint arena, for write-back.
    pub joint_index: u32,
    a: usize,
    b: usize,
    ra: Vec3,
    rb: Vec3,
    linear_mass: Mat3,
    linear_bias: Vec3,
    linear_impulse: Vec3,
    angular: AngularPart,
}

impl JointConstraint {
    /// Assemble the blocks for one enabled joint and warm-start it with the
    /// impulses stored from the previous step.
    #[allow(clippy::too_many_arguments)]
    pub fn prepare(
        joint_index: u32,
        joint: &Joint,
        a: usize,
        b: usize,
        bodies: &mut [SolverBody],
        pose_a: &Pose,
        pose_b: &Pose,
        dt: f32,
    ) -> Self {
        let frame_a = joint.world_frame_a(pose_a);
        let frame_b = joint.world_frame_b(pose_b);
        let ra = frame_a.position - pose_a.position;
        let rb = frame_b.position - pose_b.position;

        let inv_i_sum = bodies[a].inv_inertia + bodies[b].inv_inertia;
        let k_linear = Mat3::IDENTITY * (bodies[a].inv_mass + bodies[b].inv_mass)
            - skew(ra) * bodies[a].inv_inertia * skew(ra)
            - skew(rb) * bodies[b].inv_inertia * skew(rb);
        let linear_mass = invert_block(k_linear);
        let linear_bias = clamp_speed(BAUMGARTE_BETA / dt * (frame_b.position - frame_a.position));

        let angular = match joint.kind {
            JointKind::Fixed => {
                let angular_mass = invert_block(inv_i_sum);
                let angular_bias =
                    clamp_speed(BAUMGARTE_BETA / dt * rotation_error(&frame_a, &frame_b));
                AngularPart::Fixed {
                    angular_mass,
                    angular_bias,
                    impulse: joint.impulses.angular,
                }
            }
            JointKind::Hinge { limit, motor } => {
                let axis = frame_a.rotate(Vec3::X);
                let b1 = frame_a.rotate(Vec3::Y);
                let b2 = frame_a.rotate(Vec3::Z);
                let axis_b = frame_b.rotate(Vec3::X);
                let misalign = axis.cross(axis_b);

                let k = Mat2::from_cols(
                    Vec2::new(b1.dot(inv_i_sum * b1), b2.dot(inv_i_sum * b1)),
                    Vec2::new(b1.dot(inv_i_sum * b2), b2.dot(inv_i_sum * b2)),
                );
                let align_mass = if k.determinant().abs() > 1e-9 {
                    k.inverse()
                } else {
                    Mat2::ZERO
                };
                let align_bias = clamp_speed(
                    BAUMGARTE_BETA / dt * Vec3::new(misalign.dot(b1), misalign.dot(b2), 0.0),
                )
                .truncate();

                let k_axis = axis.dot(inv_i_sum * axis);
                let axis_mass = if k_axis > 1e-9 { 1.0 / k_axis } else { 0.0 };

                let limit_state = match limit {
                    None => LimitState::Inactive,
                    Some(lim) => {
                        let angle = joint.hinge_angle(pose_a, pose_b);
                        if angle <= lim.lower {
                            LimitState::Lower {
                                bias: clamp_scalar(BAUMGARTE_BETA / dt * (lim.lower - angle)),
                            }
                        } else if angle >= lim.upper {
                            LimitState::Upper {
                                bias: clamp_scalar(BAUMGARTE_BETA / dt * (angle - lim.upper)),
                            }
                        } else {
                            LimitState::Inactive
                        }
                    }
                };

                AngularPart::Hinge(Box::new(HingeRows {
                    b1,
                    b2,
                    axis,
                    align_mass,
                    align_bias,
                    axis_mass,
                    motor: motor.map(|m| (m.target_velocity, m.max_impulse)),
                    limit: limit_state,
                    motor_impulse: 0.0,
                    limit_impulse: 0.0,
                    align_impulse: Vec2::new(joint.impulses.angular.x, joint.impulses.angular.y),
                }))
            }
        };

        let mut constraint = Self {
            joint_index,
            a,
            b,
            ra,
            rb,
            linear_mass,
            linear_bias,
            linear_impulse: joint.impulses.linear,
            angular,
        };
        constraint.warm_start(bodies);
        constraint
    }

    /// Re-apply the impulses carried over from the previous step.
    fn warm_start(&mut self, bodies: &mut [SolverBody]) {
        let (body_a, body_b) = pair_mut(bodies, self.a, self.b);
        body_a.apply_impulse(-self.linear_impulse, self.ra);
        body_b.apply_impulse(self.linear_impulse, self.rb);
        match &self.angular {
            AngularPart::Fixed { impulse, .. } => {
                body_a.apply_angular_impulse(-*impulse);
                body_b.apply_angular_impulse(*impulse);
            }
            AngularPart::Hinge(rows) => {
                let impulse = rows.b1 * rows.align_impulse.x + rows.b2 * rows.align_impulse.y;
                body_a.apply_angular_impulse(-impulse);
                body_b.apply_angular_impulse(impulse);
            }
        }
    }

    /// One Gauss-Seidel pass over this joint's blocks.
    pub fn solve(&mut self, bodies: &mut [SolverBody]) {
        let (body_a, body_b) = pair_mut(bodies, self.a, self.b);

        // Linear block: anchor points must share a velocity.
        let rel = body_b.point_velocity(self.rb) - body_a.point_velocity(self.ra);
        let lambda = self.linear_mass * -(rel + self.linear_bias);
        self.linear_impulse += lambda;
        body_a.apply_impulse(-lambda, self.ra);
        body_b.apply_impulse(lambda, self.rb);

        match &mut self.angular {
            AngularPart::Fixed {
                angular_mass,
                angular_bias,
                impulse,
            } => {
                let rel = body_b.angular - body_a.angular;
                let lambda = *angular_mass * -(rel + *angular_bias);
                *impulse += lambda;
                body_a.apply_angular_impulse(-lambda);
                body_b.apply_angular_impulse(lambda);
            }
            AngularPart::Hinge(rows) => {
                // Axis alignment: kill the two angular DOF off the axis.
                let rel = body_b.angular - body_a.angular;
                let err = Vec2::new(rel.dot(rows.b1), rel.dot(rows.b2)) + rows.align_bias;
                let lambda = rows.align_mass * -err;
                rows.align_impulse += lambda;
                let impulse = rows.b1 * lambda.x + rows.b2 * lambda.y;
                body_a.apply_angular_impulse(-impulse);
                body_b.apply_angular_impulse(impulse);

                // Motor row, clamped to the torque cap.
                if let Some((target, max_impulse)) = rows.motor {
                    let rel = (body_b.angular - body_a.angular).dot(rows.axis);
                    let lambda = -rows.axis_mass * (rel - target);
                    let new_total =
                        (rows.motor_impulse + lambda).clamp(-max_impulse, max_impulse);
                    let applied = new_total - rows.motor_impulse;
                    rows.motor_impulse = new_total;
                    let impulse = rows.axis * applied;
                    body_a.apply_angular_impulse(-impulse);
                    body_b.apply_angular_impulse(impulse);
                }

                // Limit row last, so the stop always wins over the motor.
                match rows.limit {
                    LimitState::Inactive => {}
                    LimitState::Lower { bias } => {
                        let rel = (body_b.angular - body_a.angular).dot(rows.axis);
                        let lambda = -rows.axis_mass * (rel - bias);
                        let new_total = (rows.limit_impulse + lambda).max(0.0);
                        let applied = new_total - rows.limit_impulse;
                        rows.limit_impulse = new_total;
                        let impulse = rows.axis * applied;
                        body_a.apply_angular_impulse(-impulse);
                        body_b.apply_angular_impulse(impulse);
                    }
                    LimitState::Upper { bias } => {
                        let rel = (body_b.angular - body_a.angular).dot(rows.axis);
                        let lambda = -rows.axis_mass * (rel + bias);
                        let new_total = (rows.limit_impulse + lambda).min(0.0);
                        let applied = new_total - rows.limit_impulse;
                        rows.limit_impulse = new_total;
                        let impulse = rows.axis * applied;
                        body_a.apply_angular_impulse(-impulse);
                        body_b.apply_angular_impulse(impulse);
                    }
                }
            }
        }
    }

    /// Impulses to store back on the joint for next step's warm start, and
    /// the equality-row magnitude that counts toward breaking. The motor and
    /// limit rows are deliberately excluded from the breaking magnitude.
    pub fn into_result(self) -> (u32, JointImpulses, f32) {
        let (angular, equality_magnitude) = match self.angular {
            AngularPart::Fixed { impulse, .. } => {
                (impulse, self.linear_impulse.length() + impulse.length())
            }
            AngularPart::Hinge(rows) => (
                Vec3::new(rows.align_impulse.x, rows.align_impulse.y, 0.0),
                self.linear_impulse.length() + rows.align_impulse.length(),
            ),
        };
        (
            self.joint_index,
            JointImpulses {
                linear: self.linear_impulse,
                angular,
            },
            equality_magnitude,
        )
    }
}

/// Small-angle rotation error between two frames that should coincide,
/// as a world-space rotation vector.
fn rotation_error(frame_a: &Pose, frame_b: &Pose) -> Vec3 {
    let mut err: Quat = frame_b.orientation * frame_a.orientation.conjugate();
    if err.w < 0.0 {
        err = Quat::from_xyzw(-err.x, -err.y, -err.z, -err.w);
    }
    2.0 * Vec3::new(err.x, err.y, err.z)
}

fn clamp_speed(v: Vec3) -> Vec3 {
    let len = v.length();
    if len > MAX_CORRECTION_SPEED {
        v * (MAX_CORRECTION_SPEED / len)
    } else {
        v
    }
}

fn clamp_scalar(s: f32) -> f32 {
    s.clamp(-MAX_CORRECTION_SPEED, MAX_CORRECTION_SPEED)
}
