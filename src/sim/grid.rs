//! Uniform-grid broad phase
//!
//! Buckets entity ids by the integer cells their bounds overlap. An item
//! spanning multiple cells appears in every one of them, so a query over any
//! bounds returns a superset of the true overlap set; exactness is the
//! narrow phase's job. This exists purely to keep pairwise collision work
//! O(local density) instead of O(n^2).
//!
//! The grid is rebuilt from scratch by the per-tick sweep that owns it; no
//! other code inserts or queries concurrently with that sweep.

use rustc_hash::FxHashMap;

use super::collision::Aabb;

/// Uniform-bucket spatial index over axis-aligned bounds
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f32,
    inv_cell_size: f32,
    buckets: FxHashMap<(i32, i32), Vec<u32>>,
}

impl SpatialGrid {
    /// Cell size is chosen once by the caller based on expected entity
    /// density; a non-positive value is a setup bug.
    pub fn new(cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "grid cell size must be positive");
        Self {
            cell_size,
            inv_cell_size: 1.0 / cell_size,
            buckets: FxHashMap::default(),
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Integer cell range covered by `bounds`, inclusive on both ends
    fn cell_range(&self, bounds: &Aabb) -> (i32, i32, i32, i32) {
        let x0 = (bounds.min.x * self.inv_cell_size).floor() as i32;
        let y0 = (bounds.min.y * self.inv_cell_size).floor() as i32;
        let x1 = (bounds.max.x * self.inv_cell_size).floor() as i32;
        let y1 = (bounds.max.y * self.inv_cell_size).floor() as i32;
        (x0, y0, x1, y1)
    }

    /// Append `id` to every bucket covered by `bounds`
    pub fn insert(&mut self, id: u32, bounds: &Aabb) {
        let (x0, y0, x1, y1) = self.cell_range(bounds);
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                self.buckets.entry((cx, cy)).or_default().push(id);
            }
        }
    }

    /// Union of all buckets covered by `bounds`, de-duplicated and sorted
    /// for deterministic iteration
    pub fn query(&self, bounds: &Aabb) -> Vec<u32> {
        let (x0, y0, x1, y1) = self.cell_range(bounds);
        let mut out = Vec::new();
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                if let Some(ids) = self.buckets.get(&(cx, cy)) {
                    out.extend_from_slice(ids);
                }
            }
        }
        out.sort_unstable();
        out.dedup();
        out
    }

    /// Empty every bucket in place, keeping allocations for the next rebuild
    pub fn clear(&mut self) {
        for bucket in self.buckets.values_mut() {
            bucket.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn unit_box(x: f32, y: f32) -> Aabb {
        Aabb::from_center_half(Vec2::new(x, y), Vec2::splat(5.0))
    }

    #[test]
    fn test_query_returns_only_local_items() {
        let mut grid = SpatialGrid::new(64.0);
        grid.insert(1, &unit_box(10.0, 10.0));
        grid.insert(2, &unit_box(20.0, 15.0));
        grid.insert(3, &unit_box(900.0, 900.0));
        grid.insert(4, &unit_box(-500.0, 300.0));

        let found = grid.query(&unit_box(15.0, 12.0));
        assert!(found.contains(&1));
        assert!(found.contains(&2));
        assert!(!found.contains(&3));
        assert!(!found.contains(&4));
    }

    #[test]
    fn test_item_spanning_cells_appears_in_all_of_them() {
        let mut grid = SpatialGrid::new(32.0);
        // Bounds spanning a 3x1 cell range
        let wide = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(90.0, 10.0));
        grid.insert(7, &wide);

        // Query each covered cell individually
        for x in [5.0, 40.0, 80.0] {
            let found = grid.query(&unit_box(x, 5.0));
            assert!(found.contains(&7), "missing id in cell at x={x}");
        }
    }

    #[test]
    fn test_query_deduplicates_spanning_items() {
        let mut grid = SpatialGrid::new(32.0);
        let wide = Aabb::new(Vec2::new(0.0, 0.0), Vec2::new(90.0, 10.0));
        grid.insert(7, &wide);

        // Query covering the same three cells must report the id once
        let found = grid.query(&wide);
        assert_eq!(found, vec![7]);
    }

    #[test]
    fn test_clear_empties_all_buckets() {
        let mut grid = SpatialGrid::new(64.0);
        grid.insert(1, &unit_box(0.0, 0.0));
        grid.insert(2, &unit_box(500.0, 500.0));
        grid.clear();
        assert!(grid.query(&unit_box(0.0, 0.0)).is_empty());
        assert!(grid.query(&unit_box(500.0, 500.0)).is_empty());
    }

    #[test]
    fn test_negative_coordinates() {
        let mut grid = SpatialGrid::new(64.0);
        grid.insert(9, &unit_box(-100.0, -100.0));
        assert!(grid.query(&unit_box(-100.0, -100.0)).contains(&9));
        assert!(grid.query(&unit_box(100.0, 100.0)).is_empty());
    }

    #[test]
    #[should_panic]
    fn test_zero_cell_size_panics() {
        let _ = SpatialGrid::new(0.0);
    }
}
