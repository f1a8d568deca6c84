//! Flat particle arena addressed by `(u, v)` grid coordinates.

use crate::error::ClothError;
use crate::float::{from_usize, Float};
use crate::particle::Particle;
use crate::vec::Vec3;
use alloc::vec::Vec;

/// `(width + 1) x (height + 1)` particles stored row by row.
///
/// Particle `(u, v)` lives at index `u + v * (width + 1)` and rests at
/// `origin + (u * spacing, 0, v * spacing)`.
#[derive(Clone, Debug)]
pub struct ParticleGrid<F: Float> {
    particles: Vec<Particle<F>>,
    width: usize,
    height: usize,
}

impl<F: Float> ParticleGrid<F> {
    pub fn new(
        width: usize,
        height: usize,
        origin: Vec3<F>,
        spacing: F,
        mass: F,
    ) -> Result<Self, ClothError> {
        if width == 0 || height == 0 {
            return Err(ClothError::InvalidGridDimensions { width, height });
        }
        let mut particles = Vec::with_capacity((width + 1) * (height + 1));
        for v in 0..=height {
            for u in 0..=width {
                let offset = Vec3::new(from_usize::<F>(u) * spacing, F::zero(), from_usize::<F>(v) * spacing);
                particles.push(Particle::new(origin + offset, mass)?);
            }
        }
        Ok(ParticleGrid { particles, width, height })
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.height }
    pub fn len(&self) -> usize { self.particles.len() }
    pub fn is_empty(&self) -> bool { self.particles.is_empty() }

    /// Flat index of `(u, v)`, or `None` outside `[0, width] x [0, height]`.
    pub fn index(&self, u: usize, v: usize) -> Option<usize> {
        if u > self.width || v > self.height {
            None
        } else {
            Some(u + v * (self.width + 1))
        }
    }

    /// Like [`index`](Self::index), but for signed coordinates near the border.
    pub fn index_signed(&self, u: isize, v: isize) -> Option<usize> {
        if u < 0 || v < 0 {
            return None;
        }
        self.index(u as usize, v as usize)
    }

    /// Grid coordinate of a flat index.
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % (self.width + 1), index / (self.width + 1))
    }

    pub fn checked_index(&self, u: usize, v: usize) -> Result<usize, ClothError> {
        self.index(u, v).ok_or(ClothError::ParticleOutOfBounds {
            u,
            v,
            width: self.width,
            height: self.height,
        })
    }

    pub fn get(&self, u: usize, v: usize) -> Option<&Particle<F>> {
        let i = self.index(u, v)?;
        Some(&self.particles[i])
    }

    pub fn get_mut(&mut self, u: usize, v: usize) -> Option<&mut Particle<F>> {
        let i = self.index(u, v)?;
        Some(&mut self.particles[i])
    }

    pub fn particles(&self) -> &[Particle<F>] { &self.particles }
    pub fn particles_mut(&mut self) -> &mut [Particle<F>] { &mut self.particles }

    /// Flat indices of the up-to-eight grid neighbours of `(u, v)`.
    pub fn neighbours(&self, u: usize, v: usize) -> impl Iterator<Item = usize> + '_ {
        let (u, v) = (u as isize, v as isize);
        (-1isize..=1)
            .flat_map(move |dv| (-1isize..=1).map(move |du| (du, dv)))
            .filter(|&(du, dv)| du != 0 || dv != 0)
            .filter_map(move |(du, dv)| self.index_signed(u + du, v + dv))
    }

    /// The two triangles of cell `(u, v)`, wound so that normals of the flat
    /// rest sheet point along +y. The cell must lie inside the grid.
    pub fn cell_faces(&self, u: usize, v: usize) -> [[usize; 3]; 2] {
        let stride = self.width + 1;
        let a = u + v * stride;
        let b = a + 1;
        let c = a + stride + 1;
        let d = a + stride;
        [[a, d, b], [b, d, c]]
    }

    /// All triangles, two per cell, row by row.
    pub fn faces(&self) -> impl Iterator<Item = [usize; 3]> + '_ {
        (0..self.height).flat_map(move |v| {
            (0..self.width).flat_map(move |u| self.cell_faces(u, v))
        })
    }
}
