//! Spring topology of a cloth grid: border, structural, shear and bend links.

use crate::constraint::{ordered_pair, ConstraintKind, DistanceConstraint};
use crate::error::ClothError;
use crate::float::Float;
use alloc::vec::Vec;
use fnv::FnvBuildHasher;
use hashbrown::HashSet;

/// Which optional spring families to build. Border edges are always built.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SpringToggles {
    pub structural: bool,
    pub shear: bool,
    pub bending: bool,
}

impl SpringToggles {
    pub fn all() -> Self {
        SpringToggles { structural: true, shear: true, bending: true }
    }

    pub fn none() -> Self {
        SpringToggles { structural: false, shear: false, bending: false }
    }
}

impl Default for SpringToggles {
    fn default() -> Self {
        Self::all()
    }
}

/// Builds constraints and drops any unordered particle pair already present.
struct Builder<F: Float> {
    stride: usize,
    constraints: Vec<DistanceConstraint<F>>,
    seen: HashSet<(usize, usize), FnvBuildHasher>,
    duplicates: usize,
}

impl<F: Float> Builder<F> {
    fn link(
        &mut self,
        (u0, v0): (usize, usize),
        (u1, v1): (usize, usize),
        rest_length: F,
        kind: ConstraintKind,
    ) -> Result<(), ClothError> {
        let a = u0 + v0 * self.stride;
        let b = u1 + v1 * self.stride;
        if !self.seen.insert(ordered_pair(a, b)) {
            self.duplicates += 1;
            return Ok(());
        }
        self.constraints.push(DistanceConstraint::new(a, b, rest_length, kind)?);
        Ok(())
    }
}

/// Build the constraint set for a `width x height` segment grid whose
/// neighbouring particles are `spacing` apart.
///
/// Rest lengths: adjacent `spacing`, diagonal `spacing * sqrt(2)`,
/// two-apart `spacing * 2`. No unordered pair appears twice, across all
/// categories; the first category to claim a pair keeps it.
pub fn build_constraints<F: Float>(
    width: usize,
    height: usize,
    spacing: F,
    toggles: SpringToggles,
) -> Result<Vec<DistanceConstraint<F>>, ClothError> {
    if width == 0 || height == 0 {
        return Err(ClothError::InvalidGridDimensions { width, height });
    }
    let diagonal = spacing * F::two().sqrt();
    let bend = spacing * F::two();

    let mut builder = Builder {
        stride: width + 1,
        constraints: Vec::new(),
        seen: HashSet::default(),
        duplicates: 0,
    };

    // Border: the two boundary rows and the two boundary columns.
    for u in 0..width {
        builder.link((u, 0), (u + 1, 0), spacing, ConstraintKind::Border)?;
        builder.link((u, height), (u + 1, height), spacing, ConstraintKind::Border)?;
    }
    for v in 0..height {
        builder.link((0, v), (0, v + 1), spacing, ConstraintKind::Border)?;
        builder.link((width, v), (width, v + 1), spacing, ConstraintKind::Border)?;
    }

    for v in 0..=height {
        for u in 0..=width {
            if toggles.structural {
                if u < width {
                    builder.link((u, v), (u + 1, v), spacing, ConstraintKind::Structural)?;
                }
                if v < height {
                    builder.link((u, v), (u, v + 1), spacing, ConstraintKind::Structural)?;
                }
            }
            if toggles.shear && u < width && v < height {
                builder.link((u, v), (u + 1, v + 1), diagonal, ConstraintKind::Shear)?;
                builder.link((u + 1, v), (u, v + 1), diagonal, ConstraintKind::Shear)?;
            }
            if toggles.bending {
                if u + 2 <= width {
                    builder.link((u, v), (u + 2, v), bend, ConstraintKind::Bending)?;
                }
                if v + 2 <= height {
                    builder.link((u, v), (u, v + 2), bend, ConstraintKind::Bending)?;
                }
            }
        }
    }

    log::debug!(
        "built {} constraints for {}x{} grid ({} duplicate pairs suppressed)",
        builder.constraints.len(),
        width,
        height,
        builder.duplicates
    );
    Ok(builder.constraints)
}
