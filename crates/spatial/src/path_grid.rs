use glam::Vec2;

/// A cell in the pathfinding grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    pub x: usize,
    pub y: usize,
}

impl GridCell {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Occupancy grid used by enemy pathfinding.
///
/// Finer than the wall buckets. A cell is blocked when a wall's top-left
/// corner falls inside it. Built once from the wall set.
#[derive(Debug, Clone)]
pub struct PathGrid {
    cell_size: f32,
    cols: usize,
    rows: usize,
    /// Column-major (`x * rows + y`).
    blocked: Vec<bool>,
}

impl PathGrid {
    /// Mark the cell holding each wall corner as blocked. Walls outside the
    /// grid are logged and skipped.
    ///
    /// # Panics
    /// If `cell_size` is not positive, or [`dimensions_for`](Self::dimensions_for)
    /// rejects the world size.
    pub fn build(world_size: Vec2, cell_size: f32, walls: impl IntoIterator<Item = Vec2>) -> Self {
        assert!(cell_size > 0.0, "cell_size must be positive");
        let Some((cols, rows)) = Self::dimensions_for(world_size, cell_size) else {
            panic!("world size {world_size:?} cannot be split into {cell_size}-unit cells");
        };
        let mut grid = Self {
            cell_size,
            cols,
            rows,
            blocked: vec![false; cols * rows],
        };
        for pos in walls {
            match grid.cell_of(pos) {
                Some(cell) => {
                    let slot = grid.slot(cell);
                    grid.blocked[slot] = true;
                }
                None => tracing::warn!(x = pos.x, y = pos.y, "wall outside pathfinding grid"),
            }
        }
        tracing::debug!(cols, rows, "pathfinding grid built\n{}", grid.render_text());
        grid
    }

    /// `(columns, rows)` of whole cells covering `world_size`. `None` for
    /// non-finite or oversized worlds.
    pub fn dimensions_for(world_size: Vec2, cell_size: f32) -> Option<(usize, usize)> {
        crate::axis_counts(world_size, cell_size, 0)
    }

    /// Side length of one cell in world units.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Grid dimensions as `(columns, rows)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Cell containing `pos`, or `None` when `pos` is outside the grid.
    pub fn cell_of(&self, pos: Vec2) -> Option<GridCell> {
        if pos.x < 0.0 || pos.y < 0.0 {
            return None;
        }
        let x = (pos.x / self.cell_size).floor() as usize;
        let y = (pos.y / self.cell_size).floor() as usize;
        (x < self.cols && y < self.rows).then_some(GridCell { x, y })
    }

    /// Cells outside the grid count as blocked.
    pub fn is_blocked(&self, cell: GridCell) -> bool {
        if cell.x >= self.cols || cell.y >= self.rows {
            return true;
        }
        self.blocked[self.slot(cell)]
    }

    /// Top-left corner of a cell in world units.
    pub fn cell_origin(&self, cell: GridCell) -> Vec2 {
        Vec2::new(cell.x as f32, cell.y as f32) * self.cell_size
    }

    /// Free cells sharing an edge with `cell`.
    pub fn walkable_neighbors(&self, cell: GridCell) -> Vec<GridCell> {
        let mut out = Vec::with_capacity(4);
        if cell.x > 0 {
            out.push(GridCell::new(cell.x - 1, cell.y));
        }
        out.push(GridCell::new(cell.x + 1, cell.y));
        if cell.y > 0 {
            out.push(GridCell::new(cell.x, cell.y - 1));
        }
        out.push(GridCell::new(cell.x, cell.y + 1));
        out.retain(|c| !self.is_blocked(*c));
        out
    }

    /// Number of blocked cells.
    pub fn blocked_count(&self) -> usize {
        self.blocked.iter().filter(|b| **b).count()
    }

    /// One text row per grid row: `1` blocked, `0` free.
    pub fn render_text(&self) -> String {
        let mut out = String::with_capacity((self.cols * 2 + 1) * self.rows);
        for y in 0..self.rows {
            for x in 0..self.cols {
                out.push(if self.is_blocked(GridCell::new(x, y)) { '1' } else { '0' });
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }

    fn slot(&self, cell: GridCell) -> usize {
        cell.x * self.rows + cell.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_dimensions_truncate() {
        let g = PathGrid::build(Vec2::new(110.0, 60.0), 25.0, std::iter::empty());
        assert_eq!(g.dimensions(), (4, 2));
        assert_eq!(g.blocked_count(), 0);
    }

    #[test]
    fn dimensions_for_rejects_non_finite_world() {
        assert_eq!(PathGrid::dimensions_for(Vec2::new(110.0, 60.0), 25.0), Some((4, 2)));
        assert_eq!(PathGrid::dimensions_for(Vec2::new(100.0, f32::NAN), 25.0), None);
    }

    #[test]
    fn wall_blocks_its_cell() {
        let g = PathGrid::build(Vec2::new(100.0, 100.0), 25.0, [Vec2::new(30.0, 55.0)]);
        assert!(g.is_blocked(GridCell::new(1, 2)));
        assert!(!g.is_blocked(GridCell::new(2, 1)));
        assert_eq!(g.blocked_count(), 1);
    }

    #[test]
    fn out_of_grid_is_blocked() {
        let g = PathGrid::build(Vec2::new(100.0, 100.0), 25.0, std::iter::empty());
        assert!(g.is_blocked(GridCell::new(4, 0)));
        assert_eq!(g.cell_of(Vec2::new(-1.0, 10.0)), None);
        assert_eq!(g.cell_of(Vec2::new(100.0, 10.0)), None);
    }

    #[test]
    fn walls_outside_grid_are_skipped() {
        let g = PathGrid::build(Vec2::new(100.0, 100.0), 25.0, [Vec2::new(400.0, 0.0)]);
        assert_eq!(g.blocked_count(), 0);
    }

    #[test]
    fn neighbors_skip_blocked_and_edges() {
        let g = PathGrid::build(Vec2::new(75.0, 75.0), 25.0, [Vec2::new(25.0, 0.0)]);
        let n = g.walkable_neighbors(GridCell::new(0, 0));
        assert_eq!(n, vec![GridCell::new(0, 1)]);
    }

    #[test]
    fn render_text_marks_walls() {
        let g = PathGrid::build(Vec2::new(50.0, 25.0), 25.0, [Vec2::new(26.0, 1.0)]);
        assert_eq!(g.render_text(), "0 1 \n");
        assert_eq!(g.cell_origin(GridCell::new(1, 0)), Vec2::new(25.0, 0.0));
    }
}
