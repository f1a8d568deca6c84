//! Read-only obstacle descriptors supplied fresh every step.
//!
//! The simulation never stores or mutates these; the scene layer owns the
//! real geometry and hands over only what collision response needs.

use crate::float::Float;
use crate::vec::Vec3;

/// Horizontal plane `y = height`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Floor<F: Float> {
    pub height: F,
}

impl<F: Float> Floor<F> {
    pub fn new(height: F) -> Self {
        Floor { height }
    }
}

/// A (possibly moving) sphere. `previous_center` is where the sphere was
/// on the prior frame and drives contact friction.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Sphere<F: Float> {
    pub active: bool,
    pub center: Vec3<F>,
    pub previous_center: Vec3<F>,
    pub radius: F,
}

impl<F: Float> Sphere<F> {
    /// An active, stationary sphere.
    pub fn new(center: Vec3<F>, radius: F) -> Self {
        Sphere { active: true, center, previous_center: center, radius }
    }

    /// Move the sphere, remembering where it was.
    pub fn moved_to(self, center: Vec3<F>) -> Self {
        Sphere { previous_center: self.center, center, ..self }
    }

    /// Displacement since the previous frame.
    pub fn displacement(&self) -> Vec3<F> {
        self.center - self.previous_center
    }
}

/// Axis-aligned box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Cuboid<F: Float> {
    pub active: bool,
    pub min: Vec3<F>,
    pub max: Vec3<F>,
}

impl<F: Float> Cuboid<F> {
    /// An active box; the corners may be given in any order.
    pub fn new(a: Vec3<F>, b: Vec3<F>) -> Self {
        Cuboid {
            active: true,
            min: Vec3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Vec3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// The box grown by `margin` on every side.
    pub fn expanded(&self, margin: F) -> Self {
        Cuboid {
            active: self.active,
            min: self.min - Vec3::splat(margin),
            max: self.max + Vec3::splat(margin),
        }
    }

    /// Strict containment on all three axes.
    pub fn contains(&self, p: Vec3<F>) -> bool {
        p.x > self.min.x && p.x < self.max.x
            && p.y > self.min.y && p.y < self.max.y
            && p.z > self.min.z && p.z < self.max.z
    }
}

/// Everything the collision pass looks at for one step.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Obstacles<F: Float> {
    pub floor: Option<Floor<F>>,
    pub sphere: Option<Sphere<F>>,
    pub cuboid: Option<Cuboid<F>>,
}

impl<F: Float> Obstacles<F> {
    /// No obstacles at all.
    pub fn none() -> Self {
        Obstacles { floor: None, sphere: None, cuboid: None }
    }

    pub fn with_floor(mut self, floor: Floor<F>) -> Self {
        self.floor = Some(floor);
        self
    }

    pub fn with_sphere(mut self, sphere: Sphere<F>) -> Self {
        self.sphere = Some(sphere);
        self
    }

    pub fn with_cuboid(mut self, cuboid: Cuboid<F>) -> Self {
        self.cuboid = Some(cuboid);
        self
    }
}

impl<F: Float> Default for Obstacles<F> {
    fn default() -> Self {
        Self::none()
    }
}
