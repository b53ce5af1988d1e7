//! Spatial partitioning for static world geometry.
//!
//! # Invariants
//! - Walls are assigned to exactly one bucket, once, at construction.
//! - Buckets never change afterwards: walls do not move after level generation.
//!
//! Dynamic entities are few and are scanned linearly by the kernel; only the
//! wall set, which can be large, is bucketed here.

mod buckets;
mod path_grid;

pub use buckets::{BucketCoord, WallBuckets};
pub use path_grid::{GridCell, PathGrid};

use glam::Vec2;

/// Upper bound on the number of cells in any grid sized from world dimensions.
pub const MAX_GRID_CELLS: usize = 1 << 24;

/// Cells per axis when `world_size` is split into `cell_size` squares, plus
/// `pad` extra cells on each axis.
///
/// `None` when the size is not finite or the grid would hold more than
/// [`MAX_GRID_CELLS`] cells.
fn axis_counts(world_size: Vec2, cell_size: f32, pad: usize) -> Option<(usize, usize)> {
    if !world_size.is_finite() || !cell_size.is_finite() || cell_size <= 0.0 {
        return None;
    }
    let count = |extent: f32| {
        let cells = (extent / cell_size).floor().max(0.0);
        if cells >= MAX_GRID_CELLS as f32 {
            None
        } else {
            (cells as usize).checked_add(pad)
        }
    };
    let (cols, rows) = (count(world_size.x)?, count(world_size.y)?);
    cols.checked_mul(rows)
        .filter(|&n| n <= MAX_GRID_CELLS)
        .map(|_| (cols, rows))
}
