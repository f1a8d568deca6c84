//! Error types for cloth construction and addressing.

use core::fmt;

/// Errors that can occur while building or addressing a cloth network.
///
/// Nothing raised during a step is an error: degenerate geometry is skipped
/// locally and reported through [`StepStats`](crate::observer::StepStats).
#[derive(Debug, Clone, PartialEq)]
pub enum ClothError {
    /// Grid must have at least one segment along each axis.
    InvalidGridDimensions { width: usize, height: usize },
    /// Particle mass must be positive and finite.
    InvalidMass,
    /// Cloth span must be positive and finite.
    InvalidSpan,
    /// Damping must be in [0, 1).
    InvalidDamping,
    /// Friction must be in [0, 1].
    InvalidFriction,
    /// Gravity must be finite.
    InvalidGravity,
    /// Collision clearances must be non-negative and finite.
    InvalidClearance,
    /// At least one relaxation pass is required per step.
    InvalidRelaxationPasses,
    /// Self-collision radius must be positive and finite.
    InvalidSelfCollisionRadius,
    /// Self-collision stiffness must be in (0, 1].
    InvalidSelfCollisionStiffness,
    /// A constraint was given a rest length that is not positive and finite.
    InvalidRestLength,
    /// Grid coordinate lies outside `[0, width] x [0, height]`.
    ParticleOutOfBounds { u: usize, v: usize, width: usize, height: usize },
}

impl fmt::Display for ClothError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClothError::InvalidGridDimensions { width, height } => {
                write!(f, "grid must have at least 1x1 segments (got {}x{})", width, height)
            }
            ClothError::InvalidMass => write!(f, "particle mass must be positive and finite"),
            ClothError::InvalidSpan => write!(f, "cloth span must be positive and finite"),
            ClothError::InvalidDamping => write!(f, "damping must be in [0, 1)"),
            ClothError::InvalidFriction => write!(f, "friction must be in [0, 1]"),
            ClothError::InvalidGravity => write!(f, "gravity must be finite"),
            ClothError::InvalidClearance => write!(f, "collision clearance must be non-negative"),
            ClothError::InvalidRelaxationPasses => {
                write!(f, "at least one relaxation pass is required")
            }
            ClothError::InvalidSelfCollisionRadius => {
                write!(f, "self-collision radius must be positive and finite")
            }
            ClothError::InvalidSelfCollisionStiffness => {
                write!(f, "self-collision stiffness must be in (0, 1]")
            }
            ClothError::InvalidRestLength => write!(f, "rest length must be positive and finite"),
            ClothError::ParticleOutOfBounds { u, v, width, height } => write!(
                f,
                "grid coordinate ({}, {}) out of bounds (grid: {}x{} segments)",
                u, v, width, height
            ),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ClothError {}
