//! Staged planner: advance step by step, inspecting each intermediate.
//!
//! [`crate::plan`] runs everything in one call. [`Planner`] lets the
//! caller drive execution one stage at a time:
//!
//! ```rust
//! # use wallpath_planner::{Obstacle, PlanRequest, Planner, PlannerError, Workspace};
//! # fn run() -> Result<(), PlannerError> {
//! let request = PlanRequest::new(
//!     Workspace::new(2.0, 1.0),
//!     vec![Obstacle::new(0.5, 0.5, 0.2, 0.2)],
//! );
//! let rasterized = Planner::new(request)
//!     .validate()?
//!     .build_grid()?
//!     .rasterize();
//! assert_eq!(rasterized.blocked().len(), 4);
//!
//! let result = rasterized.route().report().into_result();
//! assert_eq!(result.metadata.free_cells, 196);
//! # Ok(())
//! # }
//! ```
//!
//! Each stage method consumes `self` and returns the next state, so
//! stages cannot be skipped or reordered. Validation happens entirely in
//! the first step: no grid is built for a request that will be rejected.

use crate::diagnostics::StageMetrics;
use crate::rasterize::BlockedSet;
use crate::types::{GridDimensions, PlanRequest, PlanResult, PlannerError, Trajectory};
use crate::{coverage, grid, rasterize, route};

// ───────────────────────── Stage 0: Pending ──────────────────────────

/// Planner state before the request has been checked.
#[must_use = "planner stages are consumed by advancing; call .validate() to continue"]
pub struct Pending {
    request: PlanRequest,
}

impl Pending {
    /// The unchecked request.
    #[must_use]
    pub const fn request(&self) -> &PlanRequest {
        &self.request
    }

    /// Check wall dimensions, cell size, and every obstacle.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidDimension`] for a bad wall or cell
    /// size, then [`PlannerError::InvalidObstacle`] for the first bad
    /// obstacle.
    pub fn validate(self) -> Result<Validated, PlannerError> {
        grid::validate_workspace(self.request.workspace(), self.request.cell_size)?;
        rasterize::validate_obstacles(&self.request.obstacles)?;
        Ok(Validated {
            request: self.request,
        })
    }
}

// ───────────────────────── Stage 1: Validated ────────────────────────

/// Planner state after input validation.
#[must_use = "planner stages are consumed by advancing; call .build_grid() to continue"]
pub struct Validated {
    request: PlanRequest,
}

impl Validated {
    /// The validated request.
    #[must_use]
    pub const fn request(&self) -> &PlanRequest {
        &self.request
    }

    /// Discretize the wall.
    ///
    /// # Errors
    ///
    /// Returns [`PlannerError::InvalidDimension`] if the grid is too large
    /// to index.
    pub fn build_grid(self) -> Result<GridBuilt, PlannerError> {
        let dimensions = grid::build_grid(self.request.workspace(), self.request.cell_size)?;
        Ok(GridBuilt {
            request: self.request,
            dimensions,
        })
    }
}

// ───────────────────────── Stage 2: GridBuilt ────────────────────────

/// Planner state after the grid size is known.
#[must_use = "planner stages are consumed by advancing; call .rasterize() to continue"]
pub struct GridBuilt {
    request: PlanRequest,
    dimensions: GridDimensions,
}

impl GridBuilt {
    /// Grid size.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Mark every obstacle on the grid.
    pub fn rasterize(self) -> Rasterized {
        let (blocked, clipped_obstacles) = rasterize::mark_obstacles(
            self.dimensions,
            self.request.cell_size,
            &self.request.obstacles,
        );
        Rasterized {
            request: self.request,
            dimensions: self.dimensions,
            blocked,
            clipped_obstacles,
        }
    }
}

// ───────────────────────── Stage 3: Rasterized ───────────────────────

/// Planner state after obstacle rasterization.
#[must_use = "planner stages are consumed by advancing; call .route() to continue"]
pub struct Rasterized {
    request: PlanRequest,
    dimensions: GridDimensions,
    blocked: BlockedSet,
    clipped_obstacles: usize,
}

impl Rasterized {
    /// Cells covered by at least one obstacle.
    #[must_use]
    pub const fn blocked(&self) -> &BlockedSet {
        &self.blocked
    }

    /// Number of obstacles that extended past the grid and were clipped.
    #[must_use]
    pub const fn clipped_obstacles(&self) -> usize {
        self.clipped_obstacles
    }

    /// Compute the serpentine visiting order.
    pub fn route(self) -> Routed {
        let path = route::serpentine(self.dimensions, &self.blocked);
        Routed {
            cell_size: self.request.cell_size,
            dimensions: self.dimensions,
            blocked: self.blocked,
            path,
        }
    }
}

// ───────────────────────── Stage 4: Routed ───────────────────────────

/// Planner state after routing.
#[must_use = "planner stages are consumed by advancing; call .report() to continue"]
pub struct Routed {
    cell_size: f64,
    dimensions: GridDimensions,
    blocked: BlockedSet,
    path: Trajectory,
}

impl Routed {
    /// The serpentine trajectory.
    #[must_use]
    pub const fn path(&self) -> &Trajectory {
        &self.path
    }

    /// Derive coverage metrics.
    pub fn report(self) -> Reported {
        let metadata =
            coverage::coverage_metadata(self.dimensions, self.cell_size, &self.blocked, &self.path);
        Reported {
            path: self.path,
            metadata,
        }
    }
}

// ───────────────────────── Stage 5: Reported ─────────────────────────

/// Final planner state.
#[must_use = "call .into_result() to extract the PlanResult"]
pub struct Reported {
    path: Trajectory,
    metadata: crate::types::CoverageMetadata,
}

impl Reported {
    /// Coverage metrics.
    #[must_use]
    pub const fn metadata(&self) -> &crate::types::CoverageMetadata {
        &self.metadata
    }

    /// Consume the planner and return the result.
    #[must_use]
    pub fn into_result(self) -> PlanResult {
        PlanResult {
            path: self.path,
            metadata: self.metadata,
        }
    }
}

// ───────────────────────── PlanStage trait ───────────────────────────

/// Implemented by every stage that has done work, for uniform diagnostics.
pub trait PlanStage {
    /// Human-readable stage name.
    const NAME: &str;

    /// Metrics describing the work done to reach this stage.
    fn metrics(&self) -> StageMetrics;
}

impl PlanStage for Validated {
    const NAME: &str = "validate";

    fn metrics(&self) -> StageMetrics {
        StageMetrics::Validate {
            obstacle_count: self.request.obstacles.len(),
        }
    }
}

impl PlanStage for GridBuilt {
    const NAME: &str = "grid";

    fn metrics(&self) -> StageMetrics {
        StageMetrics::Grid {
            rows: self.dimensions.rows,
            cols: self.dimensions.cols,
            total_cells: self.dimensions.rows.saturating_mul(self.dimensions.cols),
        }
    }
}

impl PlanStage for Rasterized {
    const NAME: &str = "rasterize";

    fn metrics(&self) -> StageMetrics {
        StageMetrics::Rasterize {
            obstacle_count: self.request.obstacles.len(),
            clipped_obstacles: self.clipped_obstacles,
            blocked_cells: self.blocked.len(),
        }
    }
}

impl PlanStage for Routed {
    const NAME: &str = "route";

    fn metrics(&self) -> StageMetrics {
        StageMetrics::Route {
            path_points: self.path.len(),
            row_count: self.dimensions.rows,
            seam_jumps: route::seam_jumps(&self.path),
        }
    }
}

impl PlanStage for Reported {
    const NAME: &str = "report";

    fn metrics(&self) -> StageMetrics {
        StageMetrics::Report {
            coverage_percentage: self.metadata.coverage_percentage,
        }
    }
}

// ───────────────────── Planner entry point ───────────────────────────

/// Incremental coverage planner.
///
/// [`Planner::new`] stores the request without doing any work; chain the
/// stage methods to advance.
pub struct Planner;

impl Planner {
    /// Start a staged planning run.
    #[allow(clippy::new_ret_no_self)]
    pub const fn new(request: PlanRequest) -> Pending {
        Pending { request }
    }
}
