//! Pairwise distance constraints between cloth particles.

use crate::error::ClothError;
use crate::float::Float;
use crate::particle::Particle;

/// Which part of the spring network a constraint belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ConstraintKind {
    /// Edge of the cloth; always present so the boundary cannot unravel.
    Border,
    /// Adjacent neighbours (resists stretching).
    Structural,
    /// Diagonal neighbours (resists shearing).
    Shear,
    /// Neighbours two apart (resists folding).
    Bending,
}

/// Keeps particles `a` and `b` at `rest_length` apart.
///
/// Holds indices into the particle arena, never the particles themselves.
#[derive(Clone, Debug, PartialEq)]
pub struct DistanceConstraint<F: Float> {
    pub a: usize,
    pub b: usize,
    rest_length: F,
    kind: ConstraintKind,
}

impl<F: Float> DistanceConstraint<F> {
    pub fn new(a: usize, b: usize, rest_length: F, kind: ConstraintKind) -> Result<Self, ClothError> {
        if !(rest_length > F::zero()) || !rest_length.is_finite() {
            return Err(ClothError::InvalidRestLength);
        }
        Ok(DistanceConstraint { a, b, rest_length, kind })
    }

    pub fn rest_length(&self) -> F { self.rest_length }
    pub fn kind(&self) -> ConstraintKind { self.kind }

    /// The particle pair as `(low, high)`, independent of insertion order.
    pub fn pair(&self) -> (usize, usize) {
        ordered_pair(self.a, self.b)
    }

    /// `current_length - rest_length`.
    pub fn error(&self, particles: &[Particle<F>]) -> F {
        particles[self.a].position.distance(particles[self.b].position) - self.rest_length
    }

    /// One relaxation step: move both ends by half the length error along
    /// the connecting line. Masses are treated as equal.
    ///
    /// Returns `false` (and moves nothing) when the particles coincide and
    /// the direction is undefined.
    pub fn enforce(&self, particles: &mut [Particle<F>]) -> bool {
        let delta = particles[self.b].position - particles[self.a].position;
        let Some(direction) = delta.try_normalize() else {
            return false;
        };
        let error = delta.length() - self.rest_length;
        let correction = direction.scale(error * F::half());
        particles[self.a].position += correction;
        particles[self.b].position -= correction;
        true
    }
}

pub(crate) fn ordered_pair(a: usize, b: usize) -> (usize, usize) {
    if a <= b { (a, b) } else { (b, a) }
}
