//! Core data models for the infinite grid.
//! Cells are addressed by integer world coordinates; the store only records
//! which of them currently hold a stone.

use std::collections::HashSet;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridCell {
    pub x: i32,
    pub y: i32,
}

impl GridCell {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Inclusive range of cell indices, as covered by a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub min_x: i32,
    pub max_x: i32,
    pub min_y: i32,
    pub max_y: i32,
}

impl CellRange {
    pub fn columns(&self) -> impl Iterator<Item = i32> {
        self.min_x..=self.max_x
    }

    pub fn rows(&self) -> impl Iterator<Item = i32> {
        self.min_y..=self.max_y
    }
}

/// Occupied cells for the current view session. Unbounded: any `i32` pair is valid.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GridStore {
    stones: HashSet<GridCell>,
}

impl GridStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip occupancy of `cell`. Returns whether the cell is occupied afterwards.
    pub fn toggle(&mut self, cell: GridCell) -> bool {
        if self.stones.remove(&cell) {
            false
        } else {
            self.stones.insert(cell);
            true
        }
    }

    pub fn contains(&self, cell: GridCell) -> bool {
        self.stones.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.stones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stones.is_empty()
    }

    /// Snapshot of occupied cells, sorted so drawing order is stable.
    pub fn all(&self) -> Vec<GridCell> {
        let mut cells: Vec<GridCell> = self.stones.iter().copied().collect();
        cells.sort_unstable();
        cells
    }

    pub fn clear(&mut self) {
        self.stones.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_occupancy() {
        let mut store = GridStore::new();
        let cell = GridCell::new(3, -7);
        assert!(store.toggle(cell));
        assert!(store.contains(cell));
        assert!(!store.toggle(cell));
        assert!(!store.contains(cell));
        assert!(store.is_empty());
    }

    #[test]
    fn cells_are_keyed_by_value() {
        let mut store = GridStore::new();
        store.toggle(GridCell::new(1, 2));
        store.toggle(GridCell { x: 1, y: 2 });
        assert_eq!(store.len(), 0);
        store.toggle(GridCell::new(1, 2));
        store.toggle(GridCell::new(2, 1));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn all_is_a_snapshot() {
        let mut store = GridStore::new();
        store.toggle(GridCell::new(5, 5));
        store.toggle(GridCell::new(-1, 0));
        let snap = store.all();
        store.toggle(GridCell::new(9, 9));
        assert_eq!(snap, vec![GridCell::new(-1, 0), GridCell::new(5, 5)]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn extreme_coordinates_are_accepted() {
        let mut store = GridStore::new();
        let far = GridCell::new(i32::MIN, i32::MAX);
        store.toggle(far);
        assert!(store.contains(far));
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn cell_range_bounds_are_inclusive() {
        let r = CellRange { min_x: -1, max_x: 1, min_y: 0, max_y: 2 };
        assert_eq!(r.columns().count(), 3);
        assert_eq!(r.rows().collect::<Vec<_>>(), vec![0, 1, 2]);
    }
}
