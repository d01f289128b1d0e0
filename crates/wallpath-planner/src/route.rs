//! Serpentine (boustrophedon) router.
//!
//! Rows are swept bottom to top. Even rows run left to right, odd rows
//! right to left, and blocked cells are skipped in place without
//! reversing the sweep. A single scan over the grid visits every free
//! cell exactly once in `O(rows * cols)` time.
//!
//! Consecutive points within a row are column-adjacent unless an
//! obstacle interrupts the run. Between rows the path may jump: the
//! router does not search for short transitions around obstacles at row
//! seams.

use crate::rasterize::BlockedSet;
use crate::types::{Cell, GridDimensions, Trajectory};

/// Horizontal sweep direction of one row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepDirection {
    /// Increasing column index.
    LeftToRight,
    /// Decreasing column index.
    RightToLeft,
}

impl SweepDirection {
    /// Direction of `row`: even rows left to right, odd rows right to left.
    #[must_use]
    pub const fn for_row(row: usize) -> Self {
        if row % 2 == 0 {
            Self::LeftToRight
        } else {
            Self::RightToLeft
        }
    }
}

/// Produce the serpentine visiting order over all free cells.
///
/// An all-blocked grid yields an empty trajectory.
#[must_use]
pub fn serpentine(dimensions: GridDimensions, blocked: &BlockedSet) -> Trajectory {
    let free = dimensions
        .rows
        .saturating_mul(dimensions.cols)
        .saturating_sub(blocked.len());
    let mut cells = Vec::with_capacity(free);

    for row in 0..dimensions.rows {
        let is_free = |&col: &usize| !blocked.contains(Cell::new(row, col));
        let to_cell = |col| Cell::new(row, col);
        match SweepDirection::for_row(row) {
            SweepDirection::LeftToRight => {
                cells.extend((0..dimensions.cols).filter(is_free).map(to_cell));
            }
            SweepDirection::RightToLeft => {
                cells.extend((0..dimensions.cols).rev().filter(is_free).map(to_cell));
            }
        }
    }

    Trajectory::new(cells)
}

/// Count consecutive trajectory points that are not grid-adjacent.
///
/// These are the places where the robot must travel without painting:
/// row seams and gaps left by obstacles.
#[must_use]
pub fn seam_jumps(trajectory: &Trajectory) -> usize {
    trajectory
        .cells()
        .windows(2)
        .filter(|pair| !pair[0].is_adjacent(pair[1]))
        .count()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::rasterize::rasterize;
    use crate::types::Obstacle;

    fn cells(pairs: &[(usize, usize)]) -> Vec<Cell> {
        pairs.iter().map(|&(r, c)| Cell::new(r, c)).collect()
    }

    #[test]
    fn direction_alternates_by_row() {
        assert_eq!(SweepDirection::for_row(0), SweepDirection::LeftToRight);
        assert_eq!(SweepDirection::for_row(1), SweepDirection::RightToLeft);
        assert_eq!(SweepDirection::for_row(2), SweepDirection::LeftToRight);
    }

    #[test]
    fn open_grid_zigzags() {
        let dims = GridDimensions { rows: 3, cols: 3 };
        let path = serpentine(dims, &BlockedSet::new(dims));
        assert_eq!(
            path.cells(),
            cells(&[
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 2),
                (1, 1),
                (1, 0),
                (2, 0),
                (2, 1),
                (2, 2),
            ])
        );
        assert_eq!(seam_jumps(&path), 0);
    }

    #[test]
    fn blocked_cells_are_skipped_in_place() {
        let dims = GridDimensions { rows: 2, cols: 4 };
        let mut blocked = BlockedSet::new(dims);
        blocked.insert(Cell::new(0, 1));
        blocked.insert(Cell::new(1, 2));
        let path = serpentine(dims, &blocked);
        assert_eq!(
            path.cells(),
            cells(&[(0, 0), (0, 2), (0, 3), (1, 3), (1, 1), (1, 0)])
        );
        assert_eq!(seam_jumps(&path), 2);
    }

    #[test]
    fn fully_blocked_row_does_not_flip_parity() {
        let dims = GridDimensions { rows: 3, cols: 2 };
        let mut blocked = BlockedSet::new(dims);
        blocked.insert(Cell::new(1, 0));
        blocked.insert(Cell::new(1, 1));
        let path = serpentine(dims, &blocked);
        // Row 2 still runs left to right.
        assert_eq!(path.cells(), cells(&[(0, 0), (0, 1), (2, 0), (2, 1)]));
    }

    #[test]
    fn all_blocked_yields_empty_path() {
        let dims = GridDimensions { rows: 2, cols: 2 };
        let blocked = rasterize(dims, 1.0, &[Obstacle::new(0.0, 0.0, 2.0, 2.0)]).unwrap();
        assert!(serpentine(dims, &blocked).is_empty());
    }

    #[test]
    fn visits_every_free_cell_exactly_once() {
        let dims = GridDimensions { rows: 17, cols: 23 };
        let blocked = rasterize(
            dims,
            0.1,
            &[
                Obstacle::new(0.3, 0.2, 0.45, 0.7),
                Obstacle::new(1.0, 1.1, 0.3, 0.25),
                Obstacle::new(0.5, 0.5, 0.6, 0.1),
                Obstacle::new(2.1, 1.5, 1.0, 1.0),
            ],
        )
        .unwrap();
        let path = serpentine(dims, &blocked);

        let visited: HashSet<Cell> = path.cells().iter().copied().collect();
        assert_eq!(visited.len(), path.len(), "trajectory repeats a cell");

        let expected: HashSet<Cell> = (0..dims.rows)
            .flat_map(|r| (0..dims.cols).map(move |c| Cell::new(r, c)))
            .filter(|&c| !blocked.contains(c))
            .collect();
        assert_eq!(visited, expected);
    }

    #[test]
    fn columns_are_monotonic_within_each_row() {
        let dims = GridDimensions { rows: 6, cols: 9 };
        let blocked = rasterize(dims, 1.0, &[Obstacle::new(3.0, 1.0, 2.0, 3.0)]).unwrap();
        let path = serpentine(dims, &blocked);
        for pair in path.cells().windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a.row != b.row {
                assert!(b.row > a.row, "rows must not go backwards");
                continue;
            }
            match SweepDirection::for_row(a.row) {
                SweepDirection::LeftToRight => assert!(b.col > a.col),
                SweepDirection::RightToLeft => assert!(b.col < a.col),
            }
        }
    }
}
