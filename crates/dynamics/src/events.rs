//! Per-step simulation events.
//!
//! Expected transitions (a joint breaking, a body settling) and absorbed
//! numerical faults are all reported here rather than as errors; the caller
//! drains the stream from the [`StepReport`] each step.

use crate::handle::{BodyHandle, JointHandle};
use crate::types::PoseSnapshot;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    /// A joint's accumulated constraint impulse exceeded its breaking
    /// threshold this step. Emitted at most once per joint.
    JointBroken(JointHandle),
    /// A body's motion stayed below the sleep thresholds long enough.
    BodySlept(BodyHandle),
    /// A sleeping body was disturbed by the solver or an explicit wake.
    BodyWoke(BodyHandle),
    /// Non-finite state was detected and contained: the body was stopped
    /// and forced asleep, and the simulation continued.
    NumericalFault(BodyHandle),
}

/// Output of one [`crate::World::step`] call.
#[derive(Clone, Debug, Default)]
pub struct StepReport {
    /// Pose of every live body at the end of the step, in creation order.
    pub poses: Vec<(BodyHandle, PoseSnapshot)>,
    /// Events raised during the step, in occurrence order.
    pub events: Vec<Event>,
}
