use rand::Rng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
use terrarium_data::Position;

/// Upper bound on grid cells along either axis.
pub const MAX_GRID_SIDE: usize = 512;

/// Uniform polar sample around `center`: angle in `[0, 2π)`, distance in
/// `[inner, outer]`.
pub fn random_ring_point<R: Rng>(rng: &mut R, center: Position, inner: f64, outer: f64) -> Position {
    let angle = rng.gen_range(0.0..std::f64::consts::TAU);
    let distance = if outer > inner {
        rng.gen_range(inner..=outer)
    } else {
        inner
    };
    center.offset(angle.cos() * distance, angle.sin() * distance)
}

/// Uniform grid over a fixed set of points.
///
/// Stores point indices in one contiguous buffer sorted by cell, with
/// `cell_offsets[i]..cell_offsets[i + 1]` covering cell `i` (compressed sparse
/// row layout). The grid bounds are fitted to the points at build time, so
/// negative coordinates are fine.
///
/// Each axis holds at most [`MAX_GRID_SIDE`] cells. Point sets spread wider
/// than that get coarser cells, so memory follows the grid cap rather than
/// the spatial extent.
///
/// Queries return candidate indices from every cell overlapping the query
/// square; callers filter by exact distance. Query squares reaching past the
/// grid (including infinite radii) are clamped to its edges.
///
/// # Examples
/// ```
/// use terrarium_core::spatial_hash::SpatialHash;
/// use terrarium_data::Position;
///
/// let positions = vec![Position::new(-40.0, 10.0), Position::new(15.0, 15.0)];
/// let mut spatial = SpatialHash::new(50.0);
/// spatial.build(&positions);
///
/// let mut nearby = Vec::new();
/// spatial.query_into(Position::new(10.0, 10.0), 20.0, &mut nearby);
/// assert!(nearby.contains(&1));
/// ```
#[derive(Clone, Debug, Default)]
pub struct SpatialHash {
    /// Requested cell edge; the built grid never uses smaller cells.
    pub min_cell_size: f64,
    /// Cell edge of the current build.
    pub cell_size: f64,
    pub origin: Position,
    pub cols: usize,
    pub rows: usize,
    pub cell_offsets: Vec<usize>,
    pub entity_indices: Vec<usize>,
}

impl SpatialHash {
    #[must_use]
    pub fn new(cell_size: f64) -> Self {
        Self {
            min_cell_size: cell_size,
            cell_size,
            origin: Position::ORIGIN,
            cols: 0,
            rows: 0,
            cell_offsets: vec![0],
            entity_indices: Vec::new(),
        }
    }

    #[inline]
    fn cell_coords(&self, x: f64, y: f64) -> Option<(i64, i64)> {
        if !x.is_finite() || !y.is_finite() {
            return None;
        }
        let cx = ((x - self.origin.x) / self.cell_size).floor();
        let cy = ((y - self.origin.y) / self.cell_size).floor();
        if cx.abs() > i32::MAX as f64 || cy.abs() > i32::MAX as f64 {
            return None;
        }
        Some((cx as i64, cy as i64))
    }

    /// Cell span `[lo, hi]` along one axis clamped to `0..cells`, or `None`
    /// when it misses the grid.
    fn axis_span(&self, lo: f64, hi: f64, origin: f64, cells: usize) -> Option<(usize, usize)> {
        let to_cell = |v: f64| {
            if v.is_infinite() {
                v
            } else {
                ((v - origin) / self.cell_size).floor()
            }
        };
        let (lo, hi) = (to_cell(lo), to_cell(hi));
        if lo.is_nan() || hi.is_nan() || hi < 0.0 || lo >= cells as f64 || lo > hi {
            return None;
        }
        Some((lo.max(0.0) as usize, hi.min(cells as f64 - 1.0) as usize))
    }

    /// Flat cell index of a world coordinate, or `None` outside the grid.
    #[inline]
    pub fn get_cell_idx(&self, x: f64, y: f64) -> Option<usize> {
        let (cx, cy) = self.cell_coords(x, y)?;
        if cx < 0 || cx >= self.cols as i64 || cy < 0 || cy >= self.rows as i64 {
            None
        } else {
            Some(cy as usize * self.cols + cx as usize)
        }
    }

    /// Rebuilds the grid around `positions`. Point `i` is reported as index `i`.
    pub fn build(&mut self, positions: &[Position]) {
        let finite = positions
            .iter()
            .filter(|p| p.x.is_finite() && p.y.is_finite());
        let (mut min_x, mut min_y, mut max_x, mut max_y) =
            (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for p in finite {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        if min_x > max_x {
            self.origin = Position::ORIGIN;
            self.cols = 0;
            self.rows = 0;
            self.cell_offsets = vec![0];
            self.entity_indices.clear();
            return;
        }

        let extent = (max_x - min_x).max(max_y - min_y);
        self.cell_size = self
            .min_cell_size
            .max(extent / (MAX_GRID_SIDE - 1) as f64);
        self.origin = Position::new(min_x, min_y);
        self.cols = axis_cells(max_x - min_x, self.cell_size);
        self.rows = axis_cells(max_y - min_y, self.cell_size);

        let cell_count = self.cols * self.rows;

        let atomic_counts: Vec<AtomicUsize> =
            (0..cell_count).map(|_| AtomicUsize::new(0)).collect();
        positions.par_iter().for_each(|p| {
            if let Some(idx) = self.get_cell_idx(p.x, p.y) {
                atomic_counts[idx].fetch_add(1, AtomicOrdering::Relaxed);
            }
        });

        self.cell_offsets.clear();
        self.cell_offsets.reserve(cell_count + 1);
        let mut total = 0;
        for count in atomic_counts.into_iter().map(AtomicUsize::into_inner) {
            self.cell_offsets.push(total);
            total += count;
        }
        self.cell_offsets.push(total);

        self.entity_indices.clear();
        self.entity_indices.resize(total, 0);
        let mut cursor = self.cell_offsets[..cell_count].to_vec();
        for (entity_idx, p) in positions.iter().enumerate() {
            if let Some(cell_idx) = self.get_cell_idx(p.x, p.y) {
                self.entity_indices[cursor[cell_idx]] = entity_idx;
                cursor[cell_idx] += 1;
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entity_indices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entity_indices.is_empty()
    }

    /// Inclusive cell range overlapping the square around `center`.
    fn cell_range(&self, center: Position, radius: f64) -> Option<(usize, usize, usize, usize)> {
        if self.cols == 0 || self.rows == 0 || center.x.is_nan() || center.y.is_nan() {
            return None;
        }
        let (min_cx, max_cx) =
            self.axis_span(center.x - radius, center.x + radius, self.origin.x, self.cols)?;
        let (min_cy, max_cy) =
            self.axis_span(center.y - radius, center.y + radius, self.origin.y, self.rows)?;
        Some((min_cx, max_cx, min_cy, max_cy))
    }

    pub fn query_callback<F>(&self, center: Position, radius: f64, mut callback: F)
    where
        F: FnMut(usize),
    {
        let Some((min_cx, max_cx, min_cy, max_cy)) = self.cell_range(center, radius) else {
            return;
        };
        for cy in min_cy..=max_cy {
            for cx in min_cx..=max_cx {
                let cell_idx = cy * self.cols + cx;
                let start = self.cell_offsets[cell_idx];
                let end = self.cell_offsets[cell_idx + 1];
                for &entity_idx in &self.entity_indices[start..end] {
                    callback(entity_idx);
                }
            }
        }
    }

    #[inline]
    pub fn query_into(&self, center: Position, radius: f64, result: &mut Vec<usize>) {
        result.clear();
        self.query_callback(center, radius, |idx| result.push(idx));
    }

    /// Candidate count in the overlapping cells (an upper bound on the exact count).
    #[must_use]
    pub fn count_nearby(&self, center: Position, radius: f64) -> usize {
        let Some((min_cx, max_cx, min_cy, max_cy)) = self.cell_range(center, radius) else {
            return 0;
        };
        let mut count = 0;
        for cy in min_cy..=max_cy {
            for cx in min_cx..=max_cx {
                let cell_idx = cy * self.cols + cx;
                count += self.cell_offsets[cell_idx + 1] - self.cell_offsets[cell_idx];
            }
        }
        count
    }
}

/// Cells needed to cover `span` with edge `cell`, capped at [`MAX_GRID_SIDE`].
fn axis_cells(span: f64, cell: f64) -> usize {
    let cells = (span / cell).floor();
    if cells.is_nan() {
        1
    } else {
        (cells.min((MAX_GRID_SIDE - 1) as f64) as usize) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(points: &[(f64, f64)], cell: f64) -> (SpatialHash, Vec<Position>) {
        let positions: Vec<Position> = points.iter().map(|&(x, y)| Position::new(x, y)).collect();
        let mut sh = SpatialHash::new(cell);
        sh.build(&positions);
        (sh, positions)
    }

    #[test]
    fn test_query_finds_nearby() {
        let (sh, _) = grid(&[(1.0, 1.0), (2.0, 2.0), (10.0, 10.0)], 5.0);
        let mut count = 0;
        sh.query_callback(Position::new(1.5, 1.5), 2.0, |_| count += 1);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_negative_coordinates_are_indexed() {
        let (sh, _) = grid(&[(-500.0, -500.0), (500.0, 500.0)], 100.0);
        assert_eq!(sh.len(), 2);
        let mut found = Vec::new();
        sh.query_into(Position::new(-490.0, -490.0), 20.0, &mut found);
        assert_eq!(found, vec![0]);
    }

    #[test]
    fn test_query_outside_grid_is_empty() {
        let (sh, _) = grid(&[(0.0, 0.0), (10.0, 10.0)], 5.0);
        assert_eq!(sh.count_nearby(Position::new(1000.0, 1000.0), 5.0), 0);
    }

    #[test]
    fn test_every_point_reachable_from_itself() {
        let points: Vec<(f64, f64)> = (0..100)
            .map(|i| ((i as f64 * 37.0) % 400.0 - 200.0, (i as f64 * 53.0) % 300.0 - 150.0))
            .collect();
        let (sh, positions) = grid(&points, 25.0);
        let mut found = Vec::new();
        for (i, p) in positions.iter().enumerate() {
            sh.query_into(*p, 0.0, &mut found);
            assert!(found.contains(&i));
        }
    }

    #[test]
    fn test_ring_samples_stay_in_annulus() {
        use rand::SeedableRng;
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(4);
        let center = Position::new(50.0, -50.0);
        for _ in 0..500 {
            let d = random_ring_point(&mut rng, center, 100.0, 2000.0).distance_to(&center);
            assert!((100.0 - 1e-6..=2000.0 + 1e-6).contains(&d));
        }
    }

    #[test]
    fn test_infinite_radius_covers_every_point() {
        let (sh, _) = grid(&[(-300.0, 20.0), (0.0, 0.0), (450.0, -75.0)], 10.0);
        let mut found = Vec::new();
        sh.query_into(Position::new(5.0, 5.0), f64::INFINITY, &mut found);
        found.sort_unstable();
        assert_eq!(found, vec![0, 1, 2]);
        assert_eq!(sh.count_nearby(Position::ORIGIN, 1e12), 3);
        assert_eq!(sh.count_nearby(Position::new(f64::NAN, 0.0), f64::INFINITY), 0);
    }

    #[test]
    fn test_grid_size_is_capped_for_wide_spreads() {
        let (sh, positions) = grid(&[(-4e5, -4e5), (4e5, 4e5), (1.0, 1.0)], 250.0);
        assert!(sh.cols <= MAX_GRID_SIDE && sh.rows <= MAX_GRID_SIDE);
        assert!(sh.cell_offsets.len() <= MAX_GRID_SIDE * MAX_GRID_SIDE + 1);
        let mut found = Vec::new();
        for (i, p) in positions.iter().enumerate() {
            sh.query_into(*p, 0.0, &mut found);
            assert!(found.contains(&i));
        }
    }

    #[test]
    fn test_rebuild_restores_fine_cells() {
        let mut sh = SpatialHash::new(5.0);
        sh.build(&[Position::new(-1e6, 0.0), Position::new(1e6, 0.0)]);
        assert!(sh.cell_size > 5.0);
        sh.build(&[Position::new(0.0, 0.0), Position::new(20.0, 20.0)]);
        assert_eq!(sh.cell_size, 5.0);
        assert_eq!(sh.cols, 5);
    }

    #[test]
    fn test_empty_build() {
        let (sh, _) = grid(&[], 5.0);
        assert!(sh.is_empty());
        assert_eq!(sh.count_nearby(Position::ORIGIN, 100.0), 0);
    }
}
