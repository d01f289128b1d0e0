//! Shared types for the wallpath coverage planner.
//!
//! Physical quantities are in meters with the origin at the lower-left
//! corner of the wall. Grid coordinates are `(row, col)` with row growing
//! with physical `y` and col growing with physical `x`.

use serde::{Deserialize, Serialize};

/// Physical extent of the wall to cover.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Workspace {
    /// Wall width in meters (extent along `x`).
    pub wall_width: f64,
    /// Wall height in meters (extent along `y`).
    pub wall_height: f64,
}

impl Workspace {
    /// Create a new workspace.
    #[must_use]
    pub const fn new(wall_width: f64, wall_height: f64) -> Self {
        Self {
            wall_width,
            wall_height,
        }
    }
}

/// An axis-aligned rectangular obstacle (window, door, fixture).
///
/// The obstacle occupies the half-open region
/// `[x, x + width) × [y, y + height)` in wall coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    /// Left edge in meters.
    pub x: f64,
    /// Bottom edge in meters.
    pub y: f64,
    /// Extent along `x` in meters.
    pub width: f64,
    /// Extent along `y` in meters.
    pub height: f64,
}

impl Obstacle {
    /// Create a new obstacle.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`), exclusive.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Top edge (`y + height`), exclusive.
    #[must_use]
    pub fn top(&self) -> f64 {
        self.y + self.height
    }
}

/// A single grid cell.
///
/// Serialized as a two-element array `[row, col]`, the shape consumed by
/// playback and storage collaborators.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(from = "[usize; 2]", into = "[usize; 2]")]
pub struct Cell {
    /// Row index, growing with physical `y`.
    pub row: usize,
    /// Column index, growing with physical `x`.
    pub col: usize,
}

impl Cell {
    /// Create a new cell.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Returns `true` if `other` shares an edge with this cell.
    #[must_use]
    pub const fn is_adjacent(self, other: Self) -> bool {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col) == 1
    }
}

impl From<[usize; 2]> for Cell {
    fn from([row, col]: [usize; 2]) -> Self {
        Self { row, col }
    }
}

impl From<Cell> for [usize; 2] {
    fn from(cell: Cell) -> Self {
        [cell.row, cell.col]
    }
}

/// Size of the discretized wall grid.
///
/// Derived from the workspace and cell size by
/// [`grid::build_grid`](crate::grid::build_grid); never stored apart from
/// a planning result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDimensions {
    /// Number of rows (`ceil(wall_height / cell_size)`).
    pub rows: usize,
    /// Number of columns (`ceil(wall_width / cell_size)`).
    pub cols: usize,
}

impl GridDimensions {
    /// Total number of cells, or `None` if `rows * cols` overflows.
    #[must_use]
    pub const fn cell_count(self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    /// Returns `true` if `cell` lies inside the grid.
    #[must_use]
    pub const fn contains(self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }
}

/// Ordered sequence of free cells visited by the robot.
///
/// Serialized as a plain array of `[row, col]` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trajectory(Vec<Cell>);

impl Trajectory {
    /// Create a trajectory from an ordered list of cells.
    #[must_use]
    pub const fn new(cells: Vec<Cell>) -> Self {
        Self(cells)
    }

    /// Returns `true` if the trajectory visits no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of cells visited.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// First visited cell, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Cell> {
        self.0.first()
    }

    /// Last visited cell, if any.
    #[must_use]
    pub fn last(&self) -> Option<&Cell> {
        self.0.last()
    }

    /// All visited cells in order.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.0
    }

    /// Consume the trajectory and return the underlying cells.
    #[must_use]
    pub fn into_cells(self) -> Vec<Cell> {
        self.0
    }
}

/// Summary metrics for one planning run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoverageMetadata {
    /// `rows * cols`.
    pub total_cells: usize,
    /// Number of distinct blocked cells.
    pub obstacle_cells: usize,
    /// `total_cells - obstacle_cells`.
    pub free_cells: usize,
    /// Length of the trajectory. Always equal to `free_cells`.
    pub path_points: usize,
    /// `100 * path_points / free_cells`, or `0.0` when nothing is free.
    pub coverage_percentage: f64,
    /// Grid size the trajectory is expressed in.
    pub grid_dimensions: GridDimensions,
    /// Cell side length in meters.
    pub cell_size: f64,
}

/// Planner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// Cell side length in meters.
    pub cell_size: f64,
}

impl PlannerConfig {
    /// Default cell side length: 0.1 m (10 cm), roughly one roller width.
    pub const DEFAULT_CELL_SIZE: f64 = 0.1;
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            cell_size: Self::DEFAULT_CELL_SIZE,
        }
    }
}

const fn default_cell_size() -> f64 {
    PlannerConfig::DEFAULT_CELL_SIZE
}

/// A planning request as handed over by the request layer.
///
/// `obstacles` defaults to empty and `cell_size` to
/// [`PlannerConfig::DEFAULT_CELL_SIZE`] when absent from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Wall width in meters.
    pub wall_width: f64,
    /// Wall height in meters.
    pub wall_height: f64,
    /// Rectangular obstacles; order is irrelevant and overlaps are allowed.
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    /// Cell side length in meters.
    #[serde(default = "default_cell_size")]
    pub cell_size: f64,
}

impl PlanRequest {
    /// Create a request using the default cell size.
    #[must_use]
    pub const fn new(workspace: Workspace, obstacles: Vec<Obstacle>) -> Self {
        Self {
            wall_width: workspace.wall_width,
            wall_height: workspace.wall_height,
            obstacles,
            cell_size: PlannerConfig::DEFAULT_CELL_SIZE,
        }
    }

    /// Replace the cell size.
    #[must_use]
    pub const fn with_cell_size(mut self, cell_size: f64) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// The wall extent of this request.
    #[must_use]
    pub const fn workspace(&self) -> Workspace {
        Workspace::new(self.wall_width, self.wall_height)
    }

    /// The planner configuration of this request.
    #[must_use]
    pub const fn config(&self) -> PlannerConfig {
        PlannerConfig {
            cell_size: self.cell_size,
        }
    }

    /// Reject obstacles that extend beyond the wall.
    ///
    /// The planner itself clips such obstacles to the grid. This check is
    /// for callers that want the stricter policy of refusing them outright.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::ObstacleOutOfBounds`] for the first
    /// obstacle whose right or top edge exceeds the wall.
    pub fn check_within_wall(&self) -> Result<(), PlannerError> {
        match self
            .obstacles
            .iter()
            .position(|o| o.right() > self.wall_width || o.top() > self.wall_height)
        {
            Some(index) => Err(PlannerError::ObstacleOutOfBounds {
                index,
                wall_width: self.wall_width,
                wall_height: self.wall_height,
            }),
            None => Ok(()),
        }
    }
}

/// Result of a planning run: the ordered path and its metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanResult {
    /// Serpentine order over every free cell.
    pub path: Trajectory,
    /// Coverage summary.
    pub metadata: CoverageMetadata,
}

/// What is wrong with a rejected obstacle.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ObstacleDefect {
    /// Width is zero, negative, or not finite.
    #[error("width {0} must be finite and greater than zero")]
    Width(f64),
    /// Height is zero, negative, or not finite.
    #[error("height {0} must be finite and greater than zero")]
    Height(f64),
    /// Left edge is negative or not finite.
    #[error("x {0} must be finite and non-negative")]
    X(f64),
    /// Bottom edge is negative or not finite.
    #[error("y {0} must be finite and non-negative")]
    Y(f64),
}

/// Errors that can occur while planning.
///
/// All variants are input-validation failures: the planner is
/// deterministic, so retrying the same request is pointless.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlannerError {
    /// A wall dimension or the cell size is non-positive or not finite, or
    /// their ratio yields a grid too large to index.
    #[error("invalid {name}: {value}")]
    InvalidDimension {
        /// Which input was rejected (`"wall_width"`, `"cell_size"`, ...).
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// An obstacle has a non-positive size or a negative position.
    #[error("invalid obstacle {index}: {defect}")]
    InvalidObstacle {
        /// Zero-based position in the request's obstacle list.
        index: usize,
        /// The offending field.
        defect: ObstacleDefect,
    },

    /// An obstacle extends beyond the wall (strict-bounds policy only).
    #[error("obstacle {index} extends beyond the {wall_width}x{wall_height} wall")]
    ObstacleOutOfBounds {
        /// Zero-based position in the request's obstacle list.
        index: usize,
        /// Wall width in meters.
        wall_width: f64,
        /// Wall height in meters.
        wall_height: f64,
    },
}
