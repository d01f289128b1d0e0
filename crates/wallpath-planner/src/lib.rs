//! wallpath-planner: Pure coverage path planner (sans-IO).
//!
//! Plans a full-coverage path for a robot finishing a rectangular wall
//! with rectangular obstacles (windows, doors):
//! grid -> obstacle rasterization -> serpentine routing -> coverage report.
//!
//! This crate has **no I/O** and holds no state between calls. Every
//! function is a pure function of its inputs and may be called
//! concurrently from any thread without coordination. Log records go
//! through the `log` facade; installing a logger is the caller's job.

pub mod coverage;
pub mod diagnostics;
pub mod grid;
pub mod pipeline;
pub mod rasterize;
pub mod route;
pub mod types;

pub use diagnostics::{Clock, PlanDiagnostics, plan_with_diagnostics};
pub use pipeline::Planner;
pub use rasterize::BlockedSet;
pub use route::SweepDirection;
pub use types::{
    Cell, CoverageMetadata, GridDimensions, Obstacle, ObstacleDefect, PlanRequest, PlanResult,
    PlannerConfig, PlannerError, Trajectory, Workspace,
};

/// Plan a serpentine coverage path for a request.
///
/// # Steps
///
/// 1. Validate wall size, cell size, and obstacles
/// 2. Build the grid (ceiling division)
/// 3. Rasterize obstacles into a blocked-cell set
/// 4. Sweep rows in alternating directions over free cells
/// 5. Derive coverage metrics
///
/// # Errors
///
/// Returns [`PlannerError::InvalidDimension`] if the wall or cell size is
/// non-positive or non-finite. Returns [`PlannerError::InvalidObstacle`]
/// if an obstacle has a non-positive size or a negative position.
pub fn plan(request: &PlanRequest) -> Result<PlanResult, PlannerError> {
    run(request.clone())
}

/// Plan from separate workspace, obstacle, and configuration inputs.
///
/// # Errors
///
/// Same as [`plan`].
pub fn plan_workspace(
    workspace: Workspace,
    obstacles: &[Obstacle],
    config: PlannerConfig,
) -> Result<PlanResult, PlannerError> {
    run(PlanRequest::new(workspace, obstacles.to_vec()).with_cell_size(config.cell_size))
}

fn run(request: PlanRequest) -> Result<PlanResult, PlannerError> {
    Ok(Planner::new(request)
        .validate()?
        .build_grid()?
        .rasterize()
        .route()
        .report()
        .into_result())
}
