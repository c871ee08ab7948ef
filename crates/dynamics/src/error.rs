//! Engine error types.
//!
//! Everything that can be rejected is rejected at construction time with a
//! typed error. Runtime numerical faults are not errors: they are absorbed
//! by the stepper and reported through the event stream instead.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum Error {
    /// An Active body was created with a non-positive or non-finite mass.
    #[error("active body mass must be positive and finite, got {0}")]
    InvalidMass(f32),

    /// A shape was created with a non-positive extent, radius or height.
    #[error("shape parameter out of range: {0}")]
    InvalidShape(&'static str),

    /// A hinge limit with `lower > upper` is unsatisfiable.
    #[error("hinge limit is empty: lower {lower} > upper {upper}")]
    InvalidLimit { lower: f32, upper: f32 },

    /// A joint was created between a body and itself.
    #[error("joint may not connect a body to itself")]
    SelfJoint,

    /// A body handle whose slot has since been reused or freed.
    #[error("stale body handle (slot {index}, generation {generation})")]
    StaleBodyHandle { index: u32, generation: u32 },

    /// A joint handle whose slot has since been reused or freed.
    #[error("stale joint handle (slot {index}, generation {generation})")]
    StaleJointHandle { index: u32, generation: u32 },

    /// A scene joint spec referenced a body spec index that does not exist.
    #[error("scene joint references body spec index {0}, which does not exist")]
    UnknownSceneBody(usize),
}
