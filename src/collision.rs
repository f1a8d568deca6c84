//! Collision response of a single particle against floor, sphere and box.
//!
//! All routines are purely positional and keep no per-particle contact
//! state, so they are safe to call for every particle on every step.

use crate::float::Float;
use crate::obstacle::{Cuboid, Floor, Sphere};
use crate::particle::Particle;
use crate::vec::Vec3;

/// What a collision correction does to `previous_position`.
///
/// `PositionOnly` leaves it untouched. The correction then reads as implicit
/// velocity on the next integration, which injects a little energy on
/// repeated contact. `CarryPrevious` shifts `previous_position` by the same
/// correction, so contact does not change the implicit velocity.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    #[default]
    PositionOnly,
    CarryPrevious,
}

/// Outcome of one collision test.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Contact {
    /// No overlap; the particle was not touched.
    Clear,
    /// The particle was moved out of the obstacle.
    Resolved,
    /// Overlap with no usable direction (particle at the sphere center).
    /// The correction was skipped for this step.
    Degenerate,
}

impl<F: Float> Particle<F> {
    fn settle(&mut self, target: Vec3<F>, policy: CollisionPolicy) -> Contact {
        let delta = target - self.position;
        self.position = target;
        if policy == CollisionPolicy::CarryPrevious {
            self.previous_position += delta;
        }
        Contact::Resolved
    }

    /// Keep the particle at least `clearance` above the floor plane.
    pub fn handle_floor_collision(
        &mut self,
        floor: &Floor<F>,
        clearance: F,
        policy: CollisionPolicy,
    ) -> Contact {
        let limit = floor.height + clearance;
        if self.position.y >= limit {
            return Contact::Clear;
        }
        let target = Vec3::new(self.position.x, limit, self.position.z);
        self.settle(target, policy)
    }

    /// Push the particle onto the sphere's `radius + clearance` shell.
    ///
    /// On first contact (previous position outside the shell) the radial
    /// projection is blended by `friction` toward a point that co-moves with
    /// the sphere, dragging the cloth along with a moving ball.
    pub fn handle_sphere_collision(
        &mut self,
        sphere: &Sphere<F>,
        clearance: F,
        friction: F,
        policy: CollisionPolicy,
    ) -> Contact {
        if !sphere.active {
            return Contact::Clear;
        }
        let shell = sphere.radius + clearance;
        let offset = self.position - sphere.center;
        if offset.length() >= shell {
            return Contact::Clear;
        }
        let Some(normal) = offset.try_normalize() else {
            return Contact::Degenerate;
        };
        let projected = sphere.center + normal.scale(shell);

        let entering = self.previous_position.distance(sphere.previous_center) >= shell;
        let mut target = projected;
        if entering && friction != F::zero() {
            let co_moving = self.previous_position + sphere.displacement();
            target = projected.lerp(co_moving, friction);
            let reach = target - sphere.center;
            if reach.length() < sphere.radius {
                target = match reach.try_normalize() {
                    Some(dir) => sphere.center + dir.scale(shell),
                    None => projected,
                };
            }
        }
        self.settle(target, policy)
    }

    /// Snap a particle inside the box (grown by `clearance`) onto the nearest face.
    ///
    /// Ties between faces resolve in the order +x, -x, +y, -y, +z, -z. When the
    /// previous position was outside the box, the snap is blended toward it by
    /// `friction`, unless that would leave the particle deeper than it started.
    pub fn handle_box_collision(
        &mut self,
        cuboid: &Cuboid<F>,
        clearance: F,
        friction: F,
        policy: CollisionPolicy,
    ) -> Contact {
        if !cuboid.active {
            return Contact::Clear;
        }
        let grown = cuboid.expanded(clearance);
        let Some(depth) = penetration_depth(&grown, self.position) else {
            return Contact::Clear;
        };

        let snapped = nearest_face(&grown, self.position);
        let mut target = snapped;
        if !cuboid.contains(self.previous_position) {
            let dragged = snapped.lerp(self.previous_position, friction);
            let dragged_depth = penetration_depth(&grown, dragged).unwrap_or(F::zero());
            if dragged_depth <= depth {
                target = dragged;
            }
        }
        self.settle(target, policy)
    }
}

/// Smallest distance to any face for a point strictly inside `cuboid`.
fn penetration_depth<F: Float>(cuboid: &Cuboid<F>, p: Vec3<F>) -> Option<F> {
    if !cuboid.contains(p) {
        return None;
    }
    let depths = face_distances(cuboid, p);
    Some(depths.iter().fold(depths[0], |acc, &d| acc.min(d)))
}

/// Distances to the +x, -x, +y, -y, +z, -z faces.
fn face_distances<F: Float>(cuboid: &Cuboid<F>, p: Vec3<F>) -> [F; 6] {
    [
        cuboid.max.x - p.x,
        p.x - cuboid.min.x,
        cuboid.max.y - p.y,
        p.y - cuboid.min.y,
        cuboid.max.z - p.z,
        p.z - cuboid.min.z,
    ]
}

fn nearest_face<F: Float>(cuboid: &Cuboid<F>, p: Vec3<F>) -> Vec3<F> {
    let depths = face_distances(cuboid, p);
    let mut face = 0;
    for (i, &d) in depths.iter().enumerate().skip(1) {
        if d < depths[face] {
            face = i;
        }
    }
    let mut snapped = p;
    match face {
        0 => snapped.x = cuboid.max.x,
        1 => snapped.x = cuboid.min.x,
        2 => snapped.y = cuboid.max.y,
        3 => snapped.y = cuboid.min.y,
        4 => snapped.z = cuboid.max.z,
        _ => snapped.z = cuboid.min.z,
    }
    snapped
}
