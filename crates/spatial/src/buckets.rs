use dungeon_common::Rect;
use glam::Vec2;

/// A 2D bucket coordinate in the wall index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BucketCoord {
    pub x: usize,
    pub y: usize,
}

impl BucketCoord {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Uniform bucket grid over the world holding wall indices.
///
/// Walls are identified by their index in the sequence passed to
/// [`WallBuckets::build`]. A wall belongs to the bucket containing its
/// top-left corner. The grid is sized from the world dimensions so every
/// in-world position maps to a valid bucket.
#[derive(Debug, Clone)]
pub struct WallBuckets {
    bucket_size: f32,
    cols: usize,
    rows: usize,
    /// Flat `cols * rows` storage, column-major (`x * rows + y`).
    buckets: Vec<Vec<usize>>,
}

impl WallBuckets {
    /// Bucket every wall position. Indices in the result refer to the
    /// iteration order of `walls`.
    ///
    /// # Panics
    /// If `bucket_size` is not positive, or [`dimensions_for`](Self::dimensions_for)
    /// rejects the world size.
    pub fn build(
        world_size: Vec2,
        bucket_size: f32,
        walls: impl IntoIterator<Item = Vec2>,
    ) -> Self {
        assert!(bucket_size > 0.0, "bucket_size must be positive");
        let Some((cols, rows)) = Self::dimensions_for(world_size, bucket_size) else {
            panic!("world size {world_size:?} cannot be split into {bucket_size}-unit buckets");
        };
        let mut index = Self {
            bucket_size,
            cols,
            rows,
            buckets: vec![Vec::new(); cols * rows],
        };
        let mut count = 0;
        for (i, pos) in walls.into_iter().enumerate() {
            let coord = index.bucket_of(pos);
            let slot = index.slot(coord);
            index.buckets[slot].push(i);
            count += 1;
        }
        tracing::debug!(
            walls = count,
            cols,
            rows,
            bucket_size,
            "wall buckets built"
        );
        index
    }

    /// `(columns, rows)` a world of `world_size` needs: one bucket past the far
    /// edge on each axis. `None` for non-finite or oversized worlds.
    pub fn dimensions_for(world_size: Vec2, bucket_size: f32) -> Option<(usize, usize)> {
        crate::axis_counts(world_size, bucket_size, 1)
    }

    /// Side length of one bucket in world units.
    pub fn bucket_size(&self) -> f32 {
        self.bucket_size
    }

    /// Grid dimensions as `(columns, rows)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Bucket containing `pos`, clamped to the grid.
    pub fn bucket_of(&self, pos: Vec2) -> BucketCoord {
        BucketCoord {
            x: self.axis_index(pos.x, self.cols),
            y: self.axis_index(pos.y, self.rows),
        }
    }

    /// Wall indices stored in a single bucket. Out-of-grid coordinates are empty.
    pub fn walls_in_bucket(&self, coord: BucketCoord) -> &[usize] {
        if coord.x >= self.cols || coord.y >= self.rows {
            return &[];
        }
        &self.buckets[self.slot(coord)]
    }

    /// Walls in the 3x3 block of buckets around the bucket containing `pos`.
    ///
    /// Over-approximates: walls just outside collision range may be included.
    pub fn walls_near(&self, pos: Vec2) -> Vec<usize> {
        let center = self.bucket_of(pos);
        let x0 = center.x.saturating_sub(1);
        let x1 = (center.x + 1).min(self.cols - 1);
        let y0 = center.y.saturating_sub(1);
        let y1 = (center.y + 1).min(self.rows - 1);
        self.collect_range(x0, x1, y0, y1)
    }

    /// Walls in every bucket touched by `rect`, with one extra bucket row
    /// above it so tall walls straddling the top edge are not cut off.
    ///
    /// Meant for view culling, not collision.
    pub fn walls_in_rect(&self, rect: &Rect) -> Vec<usize> {
        let x0 = self.axis_index(rect.x, self.cols);
        let x1 = self.axis_index(rect.right(), self.cols);
        let y0 = self.axis_index(rect.y, self.rows).saturating_sub(1);
        let y1 = self.axis_index(rect.bottom(), self.rows);
        self.collect_range(x0, x1, y0, y1)
    }

    /// Total number of walls indexed.
    pub fn total_placements(&self) -> usize {
        self.buckets.iter().map(Vec::len).sum()
    }

    /// Number of buckets holding at least one wall.
    pub fn occupied_buckets(&self) -> usize {
        self.buckets.iter().filter(|b| !b.is_empty()).count()
    }

    fn collect_range(&self, x0: usize, x1: usize, y0: usize, y1: usize) -> Vec<usize> {
        let mut result = Vec::new();
        for x in x0..=x1 {
            for y in y0..=y1 {
                result.extend_from_slice(&self.buckets[self.slot(BucketCoord::new(x, y))]);
            }
        }
        result
    }

    fn axis_index(&self, v: f32, len: usize) -> usize {
        let i = (v / self.bucket_size).floor();
        if i <= 0.0 {
            0
        } else {
            (i as usize).min(len - 1)
        }
    }

    fn slot(&self, coord: BucketCoord) -> usize {
        coord.x * self.rows + coord.y
    }
}
