//! Verlet particles with an explicit force accumulator.

use crate::error::ClothError;
use crate::float::Float;
use crate::vec::Vec3;

/// A cloth particle: position-based dynamics with implicit velocity.
///
/// Velocity is never stored; it is `position - previous_position`.
/// `rest_position` and `mass` are fixed at creation.
#[derive(Clone, Debug)]
pub struct Particle<F: Float> {
    pub position: Vec3<F>,
    pub previous_position: Vec3<F>,
    rest_position: Vec3<F>,
    mass: F,
    inv_mass: F,
    force: Vec3<F>,
}

impl<F: Float> Particle<F> {
    /// Create a particle at rest at `position`.
    ///
    /// Fails with [`ClothError::InvalidMass`] unless `mass` is positive and finite.
    pub fn new(position: Vec3<F>, mass: F) -> Result<Self, ClothError> {
        if !(mass > F::zero()) || !mass.is_finite() {
            return Err(ClothError::InvalidMass);
        }
        Ok(Particle {
            position,
            previous_position: position,
            rest_position: position,
            mass,
            inv_mass: F::one() / mass,
            force: Vec3::zero(),
        })
    }

    pub fn rest_position(&self) -> Vec3<F> { self.rest_position }
    pub fn mass(&self) -> F { self.mass }

    /// Force accumulated since the last integration.
    pub fn force(&self) -> Vec3<F> { self.force }

    /// Accumulate a force for the next [`integrate`](Self::integrate).
    pub fn add_force(&mut self, force: Vec3<F>) {
        self.force += force;
    }

    /// Verlet step:
    /// `next = x + (1 - damping)(x - x_prev) + f/m * dt^2`.
    ///
    /// The pre-update position becomes `previous_position` and the force
    /// accumulator is cleared.
    pub fn integrate(&mut self, dt: F, damping: F) {
        let velocity = (self.position - self.previous_position).scale(F::one() - damping);
        let acceleration = self.force.scale(self.inv_mass);
        let next = self.position + velocity + acceleration.scale(dt * dt);
        self.previous_position = self.position;
        self.position = next;
        self.force = Vec3::zero();
    }

    /// Per-step displacement (implicit velocity times dt).
    pub fn velocity_raw(&self) -> Vec3<F> {
        self.position - self.previous_position
    }

    /// Move the particle without touching `previous_position`, so the offset
    /// shows up as implicit velocity on the next integration.
    pub fn displace(&mut self, offset: Vec3<F>) {
        self.position += offset;
    }

    /// Put the particle back at its rest position, motionless and force-free.
    pub fn reset(&mut self) {
        self.position = self.rest_position;
        self.previous_position = self.rest_position;
        self.force = Vec3::zero();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_mass() {
        assert_eq!(Particle::new(Vec3::<f32>::zero(), 0.0).unwrap_err(), ClothError::InvalidMass);
        assert_eq!(Particle::new(Vec3::<f32>::zero(), -1.0).unwrap_err(), ClothError::InvalidMass);
        assert_eq!(
            Particle::new(Vec3::<f32>::zero(), f32::NAN).unwrap_err(),
            ClothError::InvalidMass
        );
    }

    #[test]
    fn integrate_clears_force() {
        let mut p = Particle::new(Vec3::new(0.0f32, 0.0, 0.0), 2.0).unwrap();
        p.add_force(Vec3::new(4.0, 0.0, 0.0));
        p.integrate(1.0, 0.0);
        assert_eq!(p.force(), Vec3::zero());
        assert!((p.position.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn integrate_keeps_pre_update_position_as_previous() {
        let mut p = Particle::new(Vec3::new(0.0f32, 0.0, 0.0), 1.0).unwrap();
        p.position = Vec3::new(1.0, 0.0, 0.0);
        p.integrate(0.1, 0.0);
        assert_eq!(p.previous_position, Vec3::new(1.0, 0.0, 0.0));
        assert!((p.position.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn damping_scales_implicit_velocity() {
        let mut p = Particle::new(Vec3::new(0.0f64, 0.0, 0.0), 1.0).unwrap();
        p.position = Vec3::new(1.0, 0.0, 0.0);
        p.integrate(0.1, 0.5);
        assert!((p.position.x - 1.5).abs() < 1e-12);
    }

    #[test]
    fn displace_creates_velocity_and_reset_removes_it() {
        let mut p = Particle::new(Vec3::new(1.0f32, 2.0, 3.0), 1.0).unwrap();
        p.displace(Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(p.velocity_raw(), Vec3::new(0.0, 1.0, 0.0));
        p.add_force(Vec3::new(1.0, 1.0, 1.0));
        p.reset();
        assert_eq!(p.position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(p.velocity_raw(), Vec3::zero());
        assert_eq!(p.force(), Vec3::zero());
    }
}
