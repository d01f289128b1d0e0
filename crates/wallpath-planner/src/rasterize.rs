//! Obstacle rasterizer: map rectangular obstacles onto grid cells.
//!
//! Each obstacle covers the half-open region `[x, x + width) × [y, y + height)`.
//! Its cell span is `[floor(x / cell), ceil((x + width) / cell))` along
//! columns and likewise along rows, so every cell with nonzero overlap is
//! blocked and cells that merely touch an obstacle edge stay free. Spans
//! are clipped to the grid: an obstacle hanging over the wall edge only
//! blocks its in-bounds part.
//!
//! The [`BlockedSet`] is a boolean grid, so overlapping and duplicate
//! obstacles never inflate the blocked count.

use std::ops::Range;

use crate::grid::cell_quotient;
use crate::types::{Cell, GridDimensions, Obstacle, ObstacleDefect, PlannerError};

/// Set of grid cells covered by at least one obstacle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockedSet {
    dimensions: GridDimensions,
    blocked: Vec<bool>,
    count: usize,
}

impl BlockedSet {
    /// An empty set over a grid of the given size.
    #[must_use]
    pub fn new(dimensions: GridDimensions) -> Self {
        Self {
            dimensions,
            blocked: vec![false; dimensions.rows.saturating_mul(dimensions.cols)],
            count: 0,
        }
    }

    /// Grid size this set is defined over.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Number of distinct blocked cells.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns `true` if no cell is blocked.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns `true` if `cell` is blocked. Out-of-grid cells are never blocked.
    #[must_use]
    pub fn contains(&self, cell: Cell) -> bool {
        self.index(cell).is_some_and(|i| self.blocked[i])
    }

    /// Block `cell`. Returns `true` if it was not already blocked.
    ///
    /// Out-of-grid cells are ignored.
    pub fn insert(&mut self, cell: Cell) -> bool {
        let Some(i) = self.index(cell) else {
            return false;
        };
        if self.blocked[i] {
            false
        } else {
            self.blocked[i] = true;
            self.count += 1;
            true
        }
    }

    /// Block every cell of `footprint`. Returns the number newly blocked.
    pub fn insert_footprint(&mut self, footprint: &Footprint) -> usize {
        let mut added = 0;
        for row in footprint.rows.clone() {
            for col in footprint.cols.clone() {
                added += usize::from(self.insert(Cell::new(row, col)));
            }
        }
        added
    }

    /// Blocked cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = Cell> + '_ {
        let cols = self.dimensions.cols;
        self.blocked
            .iter()
            .enumerate()
            .filter(|&(_, &b)| b)
            .map(move |(i, _)| Cell::new(i / cols, i % cols))
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.dimensions
            .contains(cell)
            .then(|| cell.row * self.dimensions.cols + cell.col)
    }
}

/// Cell-index span covered by one obstacle, already clipped to the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Footprint {
    /// Half-open row range.
    pub rows: Range<usize>,
    /// Half-open column range.
    pub cols: Range<usize>,
    /// `true` if part of the obstacle lay outside the grid and was cut off.
    pub clipped: bool,
}

impl Footprint {
    /// Number of cells in the span.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.rows.len() * self.cols.len()
    }
}

/// Check a single obstacle's position and size.
///
/// # Errors
///
/// Returns [`PlannerError::InvalidObstacle`] carrying `index` if `width`
/// or `height` is not strictly positive and finite, or if `x` or `y` is
/// negative or not finite.
pub fn validate_obstacle(index: usize, obstacle: &Obstacle) -> Result<(), PlannerError> {
    let defect = if !(obstacle.width.is_finite() && obstacle.width > 0.0) {
        Some(ObstacleDefect::Width(obstacle.width))
    } else if !(obstacle.height.is_finite() && obstacle.height > 0.0) {
        Some(ObstacleDefect::Height(obstacle.height))
    } else if !(obstacle.x.is_finite() && obstacle.x >= 0.0) {
        Some(ObstacleDefect::X(obstacle.x))
    } else if !(obstacle.y.is_finite() && obstacle.y >= 0.0) {
        Some(ObstacleDefect::Y(obstacle.y))
    } else {
        None
    };
    defect.map_or(Ok(()), |defect| {
        Err(PlannerError::InvalidObstacle { index, defect })
    })
}

/// Validate every obstacle, reporting the first offender.
///
/// # Errors
///
/// See [`validate_obstacle`].
pub fn validate_obstacles(obstacles: &[Obstacle]) -> Result<(), PlannerError> {
    obstacles
        .iter()
        .enumerate()
        .try_for_each(|(i, o)| validate_obstacle(i, o))
}

/// Compute the clipped cell span of an already-validated obstacle.
#[must_use]
pub fn footprint(obstacle: &Obstacle, cell_size: f64, dimensions: GridDimensions) -> Footprint {
    let (rows, rows_clipped) = span(obstacle.y, obstacle.top(), cell_size, dimensions.rows);
    let (cols, cols_clipped) = span(obstacle.x, obstacle.right(), cell_size, dimensions.cols);
    Footprint {
        rows,
        cols,
        clipped: rows_clipped || cols_clipped,
    }
}

/// Map the physical interval `[start, end)` to a clipped index range.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn span(start: f64, end: f64, cell_size: f64, limit: usize) -> (Range<usize>, bool) {
    let bound = limit as f64;
    let first = cell_quotient(start, cell_size).floor();
    // A positive-length interval always overlaps the cell holding `start`,
    // even when snapping collapses the quotient.
    let last = cell_quotient(end, cell_size).ceil().max(first + 1.0);
    let clipped = last > bound;
    let first = first.min(bound) as usize;
    let last = last.min(bound) as usize;
    (first..last.max(first), clipped)
}

/// Rasterize all obstacles into a [`BlockedSet`].
///
/// # Errors
///
/// Returns [`PlannerError::InvalidObstacle`] for the first invalid
/// obstacle. Nothing is rasterized in that case.
pub fn rasterize(
    dimensions: GridDimensions,
    cell_size: f64,
    obstacles: &[Obstacle],
) -> Result<BlockedSet, PlannerError> {
    validate_obstacles(obstacles)?;
    Ok(mark_obstacles(dimensions, cell_size, obstacles).0)
}

/// Rasterize validated obstacles. Also returns how many were clipped.
pub(crate) fn mark_obstacles(
    dimensions: GridDimensions,
    cell_size: f64,
    obstacles: &[Obstacle],
) -> (BlockedSet, usize) {
    let mut blocked = BlockedSet::new(dimensions);
    let mut clipped = 0;
    for (i, obstacle) in obstacles.iter().enumerate() {
        let fp = footprint(obstacle, cell_size, dimensions);
        let added = blocked.insert_footprint(&fp);
        clipped += usize::from(fp.clipped);
        log::debug!(
            "obstacle {i}: rows {:?}, cols {:?}, {added} new cells{}",
            fp.rows,
            fp.cols,
            if fp.clipped { " (clipped)" } else { "" },
        );
    }
    (blocked, clipped)
}
