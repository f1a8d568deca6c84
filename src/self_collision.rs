//! Spatial-hash particle repulsion inside the cloth.

use crate::config::SelfCollision;
use crate::float::Float;
use crate::grid::ParticleGrid;
use crate::vec::Vec3;
use alloc::vec::Vec;
use fnv::FnvBuildHasher;
use hashbrown::HashMap;

type Cell = (i64, i64, i64);

/// Pairs within this many grid steps are already held apart by springs.
const LINKED_REACH: usize = 2;

fn cell_of<F: Float>(p: Vec3<F>, inv_cell: F) -> Cell {
    (
        (p.x * inv_cell).floor().to_f64() as i64,
        (p.y * inv_cell).floor().to_f64() as i64,
        (p.z * inv_cell).floor().to_f64() as i64,
    )
}

/// Push apart particles closer than `settings.radius` that are not grid
/// neighbours. Returns the number of pairs separated.
///
/// Candidate pairs come from a hash of cells `radius` wide, so only the 27
/// cells around each particle are searched.
pub fn separate<F: Float>(grid: &mut ParticleGrid<F>, settings: &SelfCollision<F>) -> usize {
    let radius = settings.radius;
    let radius_sq = radius * radius;
    let inv_cell = F::one() / radius;

    let mut cells: HashMap<Cell, Vec<usize>, FnvBuildHasher> = HashMap::default();
    for (i, p) in grid.particles().iter().enumerate() {
        if p.position.is_finite() {
            cells.entry(cell_of(p.position, inv_cell)).or_default().push(i);
        }
    }

    let mut corrections = Vec::new();
    let particles = grid.particles();
    for (i, p) in particles.iter().enumerate() {
        if !p.position.is_finite() {
            continue;
        }
        let (ui, vi) = grid.coords(i);
        let (cx, cy, cz) = cell_of(p.position, inv_cell);
        for dx in -1..=1 {
            for dy in -1..=1 {
                for dz in -1..=1 {
                    let Some(bucket) = cells.get(&(cx + dx, cy + dy, cz + dz)) else {
                        continue;
                    };
                    for &j in bucket {
                        if j <= i {
                            continue;
                        }
                        let (uj, vj) = grid.coords(j);
                        if ui.abs_diff(uj) <= LINKED_REACH && vi.abs_diff(vj) <= LINKED_REACH {
                            continue;
                        }
                        let dist_sq = p.position.distance_sq(particles[j].position);
                        if dist_sq >= radius_sq {
                            continue;
                        }
                        let delta = particles[j].position - p.position;
                        let dist = dist_sq.sqrt();
                        if let Some(dir) = delta.try_normalize() {
                            let push = dir.scale((radius - dist) * settings.stiffness * F::half());
                            corrections.push((i, j, push));
                        }
                    }
                }
            }
        }
    }

    let particles = grid.particles_mut();
    for &(i, j, push) in &corrections {
        particles[i].position -= push;
        particles[j].position += push;
    }
    corrections.len()
}
