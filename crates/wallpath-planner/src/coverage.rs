//! Coverage reporter: summary metrics over grid, blocked set, and path.

use crate::rasterize::BlockedSet;
use crate::types::{CoverageMetadata, GridDimensions, Trajectory};

/// Percentage of free cells visited, guarding the all-blocked case.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn coverage_percentage(path_points: usize, free_cells: usize) -> f64 {
    if free_cells == 0 {
        0.0
    } else {
        100.0 * path_points as f64 / free_cells as f64
    }
}

/// Derive [`CoverageMetadata`] from the outputs of the earlier stages.
#[must_use]
pub fn coverage_metadata(
    dimensions: GridDimensions,
    cell_size: f64,
    blocked: &BlockedSet,
    trajectory: &Trajectory,
) -> CoverageMetadata {
    let total_cells = dimensions.rows.saturating_mul(dimensions.cols);
    let obstacle_cells = blocked.len();
    let free_cells = total_cells - obstacle_cells;
    let path_points = trajectory.len();
    debug_assert_eq!(path_points, free_cells, "trajectory must cover every free cell");

    let coverage_percentage = coverage_percentage(path_points, free_cells);
    log::info!(
        "planned {path_points} points over {}x{} grid ({obstacle_cells} blocked, {coverage_percentage:.1}% coverage)",
        dimensions.rows,
        dimensions.cols,
    );

    CoverageMetadata {
        total_cells,
        obstacle_cells,
        free_cells,
        path_points,
        coverage_percentage,
        grid_dimensions: dimensions,
        cell_size,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::rasterize::rasterize;
    use crate::route::serpentine;
    use crate::types::Obstacle;

    #[test]
    fn percentage_guards_zero_free_cells() {
        assert!(coverage_percentage(0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn percentage_of_full_coverage() {
        assert!((coverage_percentage(2473, 2473) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn percentage_of_partial_coverage() {
        assert!((coverage_percentage(1, 4) - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn counts_add_up() {
        let dims = GridDimensions { rows: 4, cols: 5 };
        let blocked = rasterize(dims, 1.0, &[Obstacle::new(1.0, 1.0, 2.0, 2.0)]).unwrap();
        let path = serpentine(dims, &blocked);
        let meta = coverage_metadata(dims, 1.0, &blocked, &path);
        assert_eq!(meta.total_cells, 20);
        assert_eq!(meta.obstacle_cells, 4);
        assert_eq!(meta.free_cells, 16);
        assert_eq!(meta.path_points, 16);
        assert_eq!(meta.obstacle_cells + meta.free_cells, meta.total_cells);
        assert!((meta.coverage_percentage - 100.0).abs() < f64::EPSILON);
        assert_eq!(meta.grid_dimensions, dims);
    }

    #[test]
    fn all_blocked_reports_zero_percent() {
        let dims = GridDimensions { rows: 2, cols: 2 };
        let blocked = rasterize(dims, 1.0, &[Obstacle::new(0.0, 0.0, 2.0, 2.0)]).unwrap();
        let path = serpentine(dims, &blocked);
        let meta = coverage_metadata(dims, 1.0, &blocked, &path);
        assert_eq!(meta.free_cells, 0);
        assert_eq!(meta.path_points, 0);
        assert!(meta.coverage_percentage.abs() < f64::EPSILON);
    }
}
