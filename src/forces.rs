//! Per-step force generators: gravity, wind, rain, wave and a custom slot.
//!
//! Gravity and wind feed the force accumulators. Rain, wave and custom
//! effects move positions directly and are only reconciled with the
//! spring network by the next relaxation pass.

use crate::float::{from_usize, Float};
use crate::grid::ParticleGrid;
use crate::vec::Vec3;
use rand::Rng;

/// Simulation clock for one step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Frame<F: Float> {
    /// Elapsed simulation time.
    pub time: F,
    /// Integration time step.
    pub dt: F,
}

impl<F: Float> Frame<F> {
    pub fn new(time: F, dt: F) -> Self {
        Frame { time, dt }
    }

    /// The frame after this one.
    pub fn next(self) -> Self {
        Frame { time: self.time + self.dt, dt: self.dt }
    }
}

/// Wind with a fixed direction and a sinusoidally gusting magnitude.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WindConfig<F: Float> {
    pub enabled: bool,
    pub direction: Vec3<F>,
    /// Mean magnitude.
    pub strength: F,
    /// Relative gust amplitude; 0 gives a steady wind.
    pub gust: F,
    /// Angular frequency of the gusts.
    pub gust_frequency: F,
}

impl<F: Float> WindConfig<F> {
    /// Wind vector at `time`. Zero if the direction is degenerate.
    pub fn force_at(&self, time: F) -> Vec3<F> {
        let magnitude = self.strength * (F::one() + self.gust * (self.gust_frequency * time).sin());
        self.direction
            .try_normalize()
            .map_or(Vec3::zero(), |dir| dir.scale(magnitude))
    }
}

/// Random downward impacts on the sheet.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RainConfig<F: Float> {
    pub enabled: bool,
    /// Height lost by the struck particle; neighbours lose a tenth of it.
    pub strength: F,
    pub impacts_per_step: usize,
}

/// Boundary row driven by the wave generator.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Edge {
    /// Row `v = 0`.
    Near,
    /// Row `v = height`.
    Far,
}

/// Vertical oscillation of one boundary row.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct WaveConfig<F: Float> {
    pub enabled: bool,
    pub edge: Edge,
    pub amplitude: F,
    /// Oscillations per unit time.
    pub frequency: F,
}

/// Per-step generator switches and parameters.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ForceConfig<F: Float> {
    pub gravity: bool,
    pub wind: WindConfig<F>,
    pub rain: RainConfig<F>,
    pub wave: WaveConfig<F>,
    /// Run the installed [`CustomForce`], if any.
    pub custom: bool,
}

impl<F: Float> ForceConfig<F> {
    /// Gravity only.
    pub fn new() -> Self {
        ForceConfig {
            gravity: true,
            wind: WindConfig {
                enabled: false,
                direction: Vec3::new(F::one(), F::zero(), F::zero()),
                strength: F::from_f32(30.0),
                gust: F::half(),
                gust_frequency: F::one(),
            },
            rain: RainConfig {
                enabled: false,
                strength: F::from_f32(5.0),
                impacts_per_step: 1,
            },
            wave: WaveConfig {
                enabled: false,
                edge: Edge::Near,
                amplitude: F::from_f32(20.0),
                frequency: F::half(),
            },
            custom: false,
        }
    }

    /// Every generator switched off.
    pub fn none() -> Self {
        ForceConfig { gravity: false, ..Self::new() }
    }

    pub fn with_gravity(mut self, enabled: bool) -> Self {
        self.gravity = enabled;
        self
    }

    pub fn with_wind(mut self, direction: Vec3<F>, strength: F) -> Self {
        self.wind.enabled = true;
        self.wind.direction = direction;
        self.wind.strength = strength;
        self
    }

    pub fn with_rain(mut self, strength: F, impacts_per_step: usize) -> Self {
        self.rain = RainConfig { enabled: true, strength, impacts_per_step };
        self
    }

    pub fn with_wave(mut self, edge: Edge, amplitude: F, frequency: F) -> Self {
        self.wave = WaveConfig { enabled: true, edge, amplitude, frequency };
        self
    }

    pub fn with_custom(mut self, enabled: bool) -> Self {
        self.custom = enabled;
        self
    }
}

impl<F: Float> Default for ForceConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Extension slot for position-based effects run once per step after the
/// built-in generators.
pub trait CustomForce<F: Float> {
    fn apply(&mut self, grid: &mut ParticleGrid<F>, frame: &Frame<F>);
}

/// Adds `(0, -gravity * mass, 0)` to every particle.
pub fn apply_gravity<F: Float>(grid: &mut ParticleGrid<F>, gravity: F) {
    for p in grid.particles_mut() {
        let weight = Vec3::new(F::zero(), -gravity * p.mass(), F::zero());
        p.add_force(weight);
    }
}

/// Pushes every face along its normal by the wind component on that normal.
///
/// All three vertices of a face receive the same force, so interior
/// particles collect contributions from each face they touch. Returns the
/// number of degenerate (zero-area) faces skipped.
pub fn apply_wind<F: Float>(grid: &mut ParticleGrid<F>, wind: &WindConfig<F>, time: F) -> usize {
    let force = wind.force_at(time);
    let mut skipped = 0;
    for v in 0..grid.height() {
        for u in 0..grid.width() {
            for face in grid.cell_faces(u, v) {
                let particles = grid.particles();
                let [a, b, c] = face.map(|i| particles[i].position);
                let Some(normal) = (b - a).cross(c - a).try_normalize() else {
                    skipped += 1;
                    continue;
                };
                let push = normal.scale(normal.dot(force));
                let particles = grid.particles_mut();
                for i in face {
                    particles[i].add_force(push);
                }
            }
        }
    }
    skipped
}

/// Drops `impacts_per_step` raindrops on random grid cells.
pub fn apply_rain<F: Float, R: Rng>(grid: &mut ParticleGrid<F>, rain: &RainConfig<F>, rng: &mut R) {
    let splash = rain.strength * F::from_f32(0.1);
    for _ in 0..rain.impacts_per_step {
        let u = rng.gen_range(0..=grid.width());
        let v = rng.gen_range(0..=grid.height());
        if let Some(p) = grid.get_mut(u, v) {
            p.position.y = p.position.y - rain.strength;
        }
        let mut splashed = [0usize; 8];
        let mut count = 0;
        for (slot, i) in splashed.iter_mut().zip(grid.neighbours(u, v)) {
            *slot = i;
            count += 1;
        }
        let particles = grid.particles_mut();
        for &i in &splashed[..count] {
            particles[i].position.y = particles[i].position.y - splash;
        }
    }
}

/// Sets the chosen boundary row to its rest height plus a sinusoid of time.
/// Previous positions follow, so the motion injects no velocity.
pub fn apply_wave<F: Float>(grid: &mut ParticleGrid<F>, wave: &WaveConfig<F>, time: F) {
    let v = match wave.edge {
        Edge::Near => 0,
        Edge::Far => grid.height(),
    };
    let phase = F::two() * F::pi() * wave.frequency * time;
    let lift = Vec3::up().scale(wave.amplitude * phase.sin());
    for u in 0..=grid.width() {
        if let Some(p) = grid.get_mut(u, v) {
            p.position = p.rest_position() + lift;
            p.previous_position = p.position;
        }
    }
}

/// Illustrative custom effect: a bump that walks across the grid.
///
/// At time `t` the particle with flat index `floor(t * rate) mod count` is
/// lifted by `amplitude`, and particles within `radius` grid cells of it by
/// `amplitude / (1 + d)` where `d` is their grid distance.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pulse<F: Float> {
    pub amplitude: F,
    pub radius: usize,
    pub rate: F,
}

impl<F: Float> Pulse<F> {
    pub fn new(amplitude: F, radius: usize, rate: F) -> Self {
        Pulse { amplitude, radius, rate }
    }

    /// Grid cell the pulse is centred on at `time`.
    pub fn focus(&self, grid: &ParticleGrid<F>, time: F) -> (usize, usize) {
        let step = (time * self.rate).floor().to_f64().max(0.0) as usize;
        grid.coords(step % grid.len())
    }
}

impl<F: Float> CustomForce<F> for Pulse<F> {
    fn apply(&mut self, grid: &mut ParticleGrid<F>, frame: &Frame<F>) {
        let (cu, cv) = self.focus(grid, frame.time);
        let u_range = cu.saturating_sub(self.radius)..=(cu + self.radius).min(grid.width());
        let v_range = cv.saturating_sub(self.radius)..=(cv + self.radius).min(grid.height());
        for v in v_range {
            for u in u_range.clone() {
                let d = cu.abs_diff(u).max(cv.abs_diff(v));
                let lift = self.amplitude / (F::one() + from_usize::<F>(d));
                if let Some(p) = grid.get_mut(u, v) {
                    p.position.y = p.position.y + lift;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sheet(width: usize, height: usize) -> ParticleGrid<f32> {
        ParticleGrid::new(width, height, Vec3::zero(), 1.0, 2.0).unwrap()
    }

    #[test]
    fn gravity_scales_with_mass() {
        let mut grid = sheet(1, 1);
        apply_gravity(&mut grid, 9.8);
        for p in grid.particles() {
            assert!((p.force().y + 19.6).abs() < 1e-5);
        }
    }

    #[test]
    fn steady_wind_magnitude() {
        let wind = WindConfig {
            enabled: true,
            direction: Vec3::new(0.0f32, 3.0, 0.0),
            strength: 10.0,
            gust: 0.0,
            gust_frequency: 1.0,
        };
        assert_eq!(wind.force_at(123.0), Vec3::new(0.0, 10.0, 0.0));
    }

    #[test]
    fn wind_along_normal_accumulates_per_face() {
        let mut grid = sheet(2, 2);
        let wind = WindConfig {
            enabled: true,
            direction: Vec3::up(),
            strength: 1.0,
            gust: 0.0,
            gust_frequency: 0.0,
        };
        assert_eq!(apply_wind(&mut grid, &wind, 0.0), 0);
        // corner (0, 0) touches one face, centre (1, 1) touches six
        assert!((grid.get(0, 0).unwrap().force().y - 1.0).abs() < 1e-5);
        assert!((grid.get(1, 1).unwrap().force().y - 6.0).abs() < 1e-5);
    }

    #[test]
    fn wind_parallel_to_sheet_does_nothing() {
        let mut grid = sheet(2, 2);
        let wind = WindConfig {
            enabled: true,
            direction: Vec3::new(1.0, 0.0, 0.0),
            strength: 50.0,
            gust: 0.0,
            gust_frequency: 0.0,
        };
        apply_wind(&mut grid, &wind, 0.0);
        for p in grid.particles() {
            assert!(p.force().length() < 1e-4);
        }
    }

    #[test]
    fn rain_drops_centre_and_splashes_neighbours() {
        let mut grid = sheet(4, 4);
        let rain = RainConfig { enabled: true, strength: 10.0, impacts_per_step: 1 };
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        apply_rain(&mut grid, &rain, &mut rng);

        let drops: Vec<f32> = grid.particles().iter().map(|p| -p.position.y).collect();
        let struck = drops.iter().position(|&d| (d - 10.0).abs() < 1e-5).unwrap();
        let (u, v) = grid.coords(struck);
        let neighbours: Vec<usize> = grid.neighbours(u, v).collect();
        for (i, d) in drops.iter().enumerate() {
            if i == struck {
                continue;
            }
            let expected = if neighbours.contains(&i) { 1.0 } else { 0.0 };
            assert!((d - expected).abs() < 1e-5, "particle {} dropped {}", i, d);
        }
    }

    #[test]
    fn wave_moves_row_without_velocity() {
        let mut grid = sheet(3, 3);
        let wave = WaveConfig { enabled: true, edge: Edge::Far, amplitude: 2.0, frequency: 0.25 };
        apply_wave(&mut grid, &wave, 1.0);
        for u in 0..=3 {
            let p = grid.get(u, 3).unwrap();
            assert!((p.position.y - 2.0).abs() < 1e-5);
            assert_eq!(p.velocity_raw(), Vec3::zero());
            assert_eq!(grid.get(u, 0).unwrap().position.y, 0.0);
        }
    }

    #[test]
    fn pulse_walks_and_falls_off() {
        let mut grid = sheet(4, 4);
        let mut pulse = Pulse::new(6.0, 1, 2.0);
        // t = 3.2 -> index 6 -> (1, 1)
        let frame = Frame::new(3.2, 0.1);
        assert_eq!(pulse.focus(&grid, frame.time), (1, 1));
        pulse.apply(&mut grid, &frame);
        assert!((grid.get(1, 1).unwrap().position.y - 6.0).abs() < 1e-5);
        assert!((grid.get(2, 2).unwrap().position.y - 3.0).abs() < 1e-5);
        assert_eq!(grid.get(3, 3).unwrap().position.y, 0.0);
    }
}
