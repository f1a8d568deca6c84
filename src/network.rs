//! The cloth network: particle grid, spring constraints and the step pipeline.

use crate::collision::Contact;
use crate::config::ClothConfig;
use crate::constraint::DistanceConstraint;
use crate::error::ClothError;
use crate::float::Float;
use crate::forces::{self, CustomForce, ForceConfig, Frame};
use crate::grid::ParticleGrid;
use crate::obstacle::Obstacles;
use crate::observer::{StepObserver, StepStats};
use crate::particle::Particle;
use crate::self_collision;
use crate::topology::build_constraints;
use crate::vec::Vec3;
use alloc::boxed::Box;
use alloc::vec::Vec;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// A mass-spring cloth advanced by Verlet integration.
///
/// Each [`step`](Self::step) runs, in order: force generators, integration,
/// constraint relaxation, obstacle collisions and the optional
/// self-collision pass. Positions may be read between steps.
pub struct ClothNetwork<F: Float> {
    grid: ParticleGrid<F>,
    constraints: Vec<DistanceConstraint<F>>,
    config: ClothConfig<F>,
    spacing: F,
    rng: ChaCha8Rng,
    custom: Option<Box<dyn CustomForce<F>>>,
}

impl<F: Float> ClothNetwork<F> {
    /// Build the particle grid and its spring topology.
    ///
    /// Fails if the configuration is invalid; nothing is built in that case.
    pub fn new(config: ClothConfig<F>) -> Result<Self, ClothError> {
        config.validate()?;
        let spacing = config.spacing();
        let grid = ParticleGrid::new(
            config.width,
            config.height,
            config.origin,
            spacing,
            config.particle_mass,
        )?;
        let constraints = build_constraints(config.width, config.height, spacing, config.springs)?;
        log::debug!(
            "cloth network: {} particles, {} constraints, spacing {}",
            grid.len(),
            constraints.len(),
            spacing
        );
        Ok(ClothNetwork {
            grid,
            constraints,
            rng: ChaCha8Rng::seed_from_u64(config.rain_seed),
            config,
            spacing,
            custom: None,
        })
    }

    pub fn config(&self) -> &ClothConfig<F> { &self.config }
    pub fn width(&self) -> usize { self.grid.width() }
    pub fn height(&self) -> usize { self.grid.height() }
    /// Rest distance between adjacent particles.
    pub fn spacing(&self) -> F { self.spacing }
    pub fn grid(&self) -> &ParticleGrid<F> { &self.grid }
    pub fn particle_count(&self) -> usize { self.grid.len() }
    pub fn constraint_count(&self) -> usize { self.constraints.len() }

    /// Particles in flat index order `u + v * (width + 1)`.
    pub fn particles(&self) -> &[Particle<F>] { self.grid.particles() }

    pub fn particle(&self, u: usize, v: usize) -> Option<&Particle<F>> {
        self.grid.get(u, v)
    }

    /// Snapshot of all positions, in flat index order.
    pub fn positions(&self) -> Vec<Vec3<F>> {
        self.grid.particles().iter().map(|p| p.position).collect()
    }

    /// Constraints in insertion (and relaxation) order.
    pub fn constraints(&self) -> &[DistanceConstraint<F>] { &self.constraints }

    /// Triangle index triples for building a render mesh.
    pub fn faces(&self) -> Vec<[usize; 3]> {
        self.grid.faces().collect()
    }

    /// Install the effect run when [`ForceConfig::custom`] is set.
    pub fn set_custom_force(&mut self, force: Box<dyn CustomForce<F>>) {
        self.custom = Some(force);
    }

    pub fn clear_custom_force(&mut self) {
        self.custom = None;
    }

    /// Run every enabled generator once. Returns the number of degenerate
    /// faces the wind skipped.
    pub fn apply_forces(&mut self, frame: &Frame<F>, forces: &ForceConfig<F>) -> usize {
        let mut degenerate_faces = 0;
        if forces.gravity {
            forces::apply_gravity(&mut self.grid, self.config.gravity);
        }
        if forces.wind.enabled {
            degenerate_faces = forces::apply_wind(&mut self.grid, &forces.wind, frame.time);
        }
        if forces.rain.enabled {
            forces::apply_rain(&mut self.grid, &forces.rain, &mut self.rng);
        }
        if forces.wave.enabled {
            forces::apply_wave(&mut self.grid, &forces.wave, frame.time);
        }
        if forces.custom {
            if let Some(custom) = self.custom.as_mut() {
                custom.apply(&mut self.grid, frame);
            }
        }
        degenerate_faces
    }

    /// Integrate every particle over `dt`. Returns `false` without touching
    /// anything when integration is disabled.
    pub fn update(&mut self, dt: F) -> bool {
        if !self.config.integration_enabled {
            return false;
        }
        let damping = self.config.damping;
        for p in self.grid.particles_mut() {
            p.integrate(dt, damping);
        }
        true
    }

    /// One relaxation pass over all constraints in insertion order.
    /// Returns the number of constraints skipped as degenerate.
    pub fn enforce_constraints(&mut self) -> usize {
        let particles = self.grid.particles_mut();
        self.constraints
            .iter()
            .filter(|c| !c.enforce(particles))
            .count()
    }

    /// Resolve floor, sphere and box contacts for every particle.
    /// Returns `(resolved, degenerate)` contact counts.
    pub fn handle_collisions(&mut self, obstacles: &Obstacles<F>) -> (usize, usize) {
        let ClothConfig { surface_clearance, box_clearance, friction, collision_policy: policy, .. } =
            self.config;
        let mut resolved = 0;
        let mut degenerate = 0;
        let mut tally = |contact: Contact| match contact {
            Contact::Clear => {}
            Contact::Resolved => resolved += 1,
            Contact::Degenerate => degenerate += 1,
        };
        for p in self.grid.particles_mut() {
            if let Some(floor) = &obstacles.floor {
                tally(p.handle_floor_collision(floor, surface_clearance, policy));
            }
            if let Some(sphere) = &obstacles.sphere {
                tally(p.handle_sphere_collision(sphere, surface_clearance, friction, policy));
            }
            if let Some(cuboid) = &obstacles.cuboid {
                tally(p.handle_box_collision(cuboid, box_clearance, friction, policy));
            }
        }
        (resolved, degenerate)
    }

    /// Separate non-neighbouring particles that came too close. A no-op
    /// unless self-collision is configured.
    pub fn handle_self_intersections(&mut self) -> usize {
        match &self.config.self_collision {
            Some(settings) => self_collision::separate(&mut self.grid, settings),
            None => 0,
        }
    }

    /// Advance the cloth by one frame.
    ///
    /// Skipped entirely (returning empty stats) when integration is disabled.
    pub fn step<O: StepObserver>(
        &mut self,
        frame: Frame<F>,
        forces: &ForceConfig<F>,
        obstacles: &Obstacles<F>,
        observer: &mut O,
    ) -> StepStats {
        let mut stats = StepStats::default();
        if !self.config.integration_enabled {
            log::trace!("integration disabled, step at t={} skipped", frame.time);
            return stats;
        }

        stats.degenerate_faces = self.apply_forces(&frame, forces);
        observer.on_forces_applied();

        self.update(frame.dt);
        observer.on_integrate();

        for pass in 0..self.config.relaxation_passes {
            stats.degenerate_constraints += self.enforce_constraints();
            observer.on_constraint_iteration(pass);
        }

        let (contacts, degenerate_contacts) = self.handle_collisions(obstacles);
        stats.contacts = contacts;
        stats.degenerate_contacts = degenerate_contacts;
        observer.on_collisions_resolved();

        stats.self_contacts = self.handle_self_intersections();

        if stats.skipped() > 0 {
            log::warn!(
                "step at t={} skipped {} degenerate corrections",
                frame.time,
                stats.skipped()
            );
        }
        log::trace!("step at t={}: {:?}", frame.time, stats);
        observer.on_step_complete(&stats);
        stats
    }

    /// Move the particle at `(u, v)` by `offset`. The previous position is
    /// kept, so the offset becomes velocity on the next step.
    pub fn apply_impulse(&mut self, u: usize, v: usize, offset: Vec3<F>) -> Result<(), ClothError> {
        let index = self.grid.checked_index(u, v).map_err(|err| {
            log::warn!("impulse ignored: {}", err);
            err
        })?;
        self.grid.particles_mut()[index].displace(offset);
        Ok(())
    }

    /// Return every particle to its rest position, motionless.
    pub fn reset(&mut self) {
        for p in self.grid.particles_mut() {
            p.reset();
        }
        log::debug!("cloth network reset to rest");
    }

    pub fn reset_particle(&mut self, u: usize, v: usize) -> Result<(), ClothError> {
        let index = self.grid.checked_index(u, v)?;
        self.grid.particles_mut()[index].reset();
        Ok(())
    }

    /// Largest `|length - rest| / rest` over all constraints.
    pub fn max_strain(&self) -> F {
        let particles = self.grid.particles();
        self.constraints
            .iter()
            .map(|c| c.error(particles).abs() / c.rest_length())
            .fold(F::zero(), F::max)
    }
}
