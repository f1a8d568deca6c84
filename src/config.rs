//! Configuration for building and stepping a cloth network.

use crate::collision::CollisionPolicy;
use crate::error::ClothError;
use crate::float::{from_usize, Float};
use crate::topology::SpringToggles;
use crate::vec::Vec3;

/// Optional particle-particle repulsion inside the cloth.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SelfCollision<F: Float> {
    /// Particles closer than this are pushed apart. Also the hash cell size.
    pub radius: F,
    /// Fraction of the overlap removed per pass, in (0, 1].
    pub stiffness: F,
}

/// Immutable configuration of a [`ClothNetwork`](crate::network::ClothNetwork).
///
/// # Builder Pattern
/// ```
/// use weft::config::ClothConfig;
/// use weft::topology::SpringToggles;
///
/// let config: ClothConfig<f32> = ClothConfig::new()
///     .with_grid(20, 20)
///     .with_span(200.0)
///     .with_springs(SpringToggles { bending: false, ..SpringToggles::all() })
///     .with_damping(0.05)
///     .with_relaxation_passes(2);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ClothConfig<F: Float> {
    /// Segments along u. The grid has `width + 1` particles per row.
    pub width: usize,
    /// Segments along v.
    pub height: usize,
    /// Physical length of the cloth along u. Default: 250.
    pub span: F,
    /// Rest position of particle (0, 0).
    pub origin: Vec3<F>,
    pub springs: SpringToggles,
    /// Mass of every particle. Default: 0.1.
    pub particle_mass: F,
    /// Velocity damping in [0, 1). 0 = undamped. Default: 0.03.
    pub damping: F,
    /// Contact friction in [0, 1]. Default: 0.9.
    pub friction: F,
    /// Gravitational acceleration magnitude (along -y). Default: 981.
    pub gravity: F,
    /// When false, `update` leaves particles where they are.
    pub integration_enabled: bool,
    /// Constraint sweeps per step. More passes = stiffer cloth. Default: 1.
    pub relaxation_passes: usize,
    /// Floor and sphere clearance. Default: 3.
    pub surface_clearance: F,
    /// Box clearance. Default: 10.
    pub box_clearance: F,
    pub collision_policy: CollisionPolicy,
    pub self_collision: Option<SelfCollision<F>>,
    /// Seed for the rain impact generator.
    pub rain_seed: u64,
}

impl<F: Float> ClothConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        ClothConfig {
            width: 10,
            height: 10,
            span: F::from_f32(250.0),
            origin: Vec3::zero(),
            springs: SpringToggles::all(),
            particle_mass: F::from_f32(0.1),
            damping: F::from_f32(0.03),
            friction: F::from_f32(0.9),
            gravity: F::from_f32(981.0),
            integration_enabled: true,
            relaxation_passes: 1,
            surface_clearance: F::from_f32(3.0),
            box_clearance: F::from_f32(10.0),
            collision_policy: CollisionPolicy::PositionOnly,
            self_collision: None,
            rain_seed: 0x5eed,
        }
    }

    pub fn with_grid(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_span(mut self, span: F) -> Self {
        self.span = span;
        self
    }

    pub fn with_origin(mut self, origin: Vec3<F>) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_springs(mut self, springs: SpringToggles) -> Self {
        self.springs = springs;
        self
    }

    pub fn with_particle_mass(mut self, mass: F) -> Self {
        self.particle_mass = mass;
        self
    }

    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping;
        self
    }

    pub fn with_friction(mut self, friction: F) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_gravity(mut self, gravity: F) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_integration(mut self, enabled: bool) -> Self {
        self.integration_enabled = enabled;
        self
    }

    pub fn with_relaxation_passes(mut self, passes: usize) -> Self {
        self.relaxation_passes = passes;
        self
    }

    pub fn with_clearances(mut self, surface: F, cuboid: F) -> Self {
        self.surface_clearance = surface;
        self.box_clearance = cuboid;
        self
    }

    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }

    pub fn with_self_collision(mut self, radius: F, stiffness: F) -> Self {
        self.self_collision = Some(SelfCollision { radius, stiffness });
        self
    }

    pub fn with_rain_seed(mut self, seed: u64) -> Self {
        self.rain_seed = seed;
        self
    }

    /// Rest distance between adjacent particles.
    pub fn spacing(&self) -> F {
        self.span / from_usize::<F>(self.width.max(1))
    }

    /// Check every invariant the solver relies on.
    pub fn validate(&self) -> Result<(), ClothError> {
        if self.width == 0 || self.height == 0 {
            return Err(ClothError::InvalidGridDimensions { width: self.width, height: self.height });
        }
        if !(self.span > F::zero()) || !self.span.is_finite() {
            return Err(ClothError::InvalidSpan);
        }
        if !(self.particle_mass > F::zero()) || !self.particle_mass.is_finite() {
            return Err(ClothError::InvalidMass);
        }
        if !(self.damping >= F::zero() && self.damping < F::one()) {
            return Err(ClothError::InvalidDamping);
        }
        if !(self.friction >= F::zero() && self.friction <= F::one()) {
            return Err(ClothError::InvalidFriction);
        }
        if !self.gravity.is_finite() {
            return Err(ClothError::InvalidGravity);
        }
        let clearance_ok = |c: F| c >= F::zero() && c.is_finite();
        if !clearance_ok(self.surface_clearance) || !clearance_ok(self.box_clearance) {
            return Err(ClothError::InvalidClearance);
        }
        if self.relaxation_passes == 0 {
            return Err(ClothError::InvalidRelaxationPasses);
        }
        if let Some(sc) = &self.self_collision {
            if !(sc.radius > F::zero()) || !sc.radius.is_finite() {
                return Err(ClothError::InvalidSelfCollisionRadius);
            }
            if !(sc.stiffness > F::zero() && sc.stiffness <= F::one()) {
                return Err(ClothError::InvalidSelfCollisionStiffness);
            }
        }
        Ok(())
    }
}

impl<F: Float> Default for ClothConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(ClothConfig::<f32>::new().validate(), Ok(()));
        assert_eq!(ClothConfig::<f64>::default().spacing(), 25.0);
    }

    #[test]
    fn rejects_out_of_range_values() {
        let base = ClothConfig::<f32>::new();
        assert_eq!(base.clone().with_damping(1.0).validate(), Err(ClothError::InvalidDamping));
        assert_eq!(base.clone().with_damping(-0.1).validate(), Err(ClothError::InvalidDamping));
        assert_eq!(base.clone().with_friction(1.5).validate(), Err(ClothError::InvalidFriction));
        assert_eq!(base.clone().with_particle_mass(0.0).validate(), Err(ClothError::InvalidMass));
        assert_eq!(base.clone().with_span(-3.0).validate(), Err(ClothError::InvalidSpan));
        assert_eq!(
            base.clone().with_relaxation_passes(0).validate(),
            Err(ClothError::InvalidRelaxationPasses)
        );
        assert_eq!(
            base.clone().with_clearances(-1.0, 10.0).validate(),
            Err(ClothError::InvalidClearance)
        );
        assert_eq!(
            base.clone().with_self_collision(0.0, 1.0).validate(),
            Err(ClothError::InvalidSelfCollisionRadius)
        );
        assert_eq!(
            base.clone().with_gravity(f32::NAN).validate(),
            Err(ClothError::InvalidGravity)
        );
        assert_eq!(
            base.clone().with_gravity(f32::INFINITY).validate(),
            Err(ClothError::InvalidGravity)
        );
        assert_eq!(base.clone().with_gravity(-9.8).validate(), Ok(()));
        for stiffness in [f32::NAN, f32::INFINITY, 0.0, -0.5, 1.5] {
            assert_eq!(
                base.clone().with_self_collision(0.5, stiffness).validate(),
                Err(ClothError::InvalidSelfCollisionStiffness),
                "stiffness {}",
                stiffness
            );
        }
        assert_eq!(base.clone().with_self_collision(0.5, 1.0).validate(), Ok(()));
        assert_eq!(
            base.with_grid(0, 4).validate(),
            Err(ClothError::InvalidGridDimensions { width: 0, height: 4 })
        );
    }
}
