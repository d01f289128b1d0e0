//! Planner diagnostics: per-stage timing and counts.
//!
//! Time is read through the [`Clock`] trait so the planner never touches
//! a time source itself; the caller supplies one (the CLI uses
//! `std::time::Instant`, tests use a fake).
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::pipeline::{PlanStage, Planner};
use crate::types::{CoverageMetadata, PlanRequest, PlanResult, PlannerError};

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Source of monotonic time for diagnostics.
pub trait Clock {
    /// Opaque point in time.
    type Instant;

    /// The current instant.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// Diagnostics collected from a single planning run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanDiagnostics {
    /// Input validation.
    pub validate: StageDiagnostics,
    /// Grid construction.
    pub grid: StageDiagnostics,
    /// Obstacle rasterization.
    pub rasterize: StageDiagnostics,
    /// Serpentine routing.
    pub route: StageDiagnostics,
    /// Coverage reporting.
    pub report: StageDiagnostics,
    /// Wall-clock duration of the whole run (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Final coverage metrics.
    pub summary: CoverageMetadata,
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Input validation.
    Validate {
        /// Number of obstacles checked.
        obstacle_count: usize,
    },
    /// Grid construction.
    Grid {
        /// Grid rows.
        rows: usize,
        /// Grid columns.
        cols: usize,
        /// `rows * cols`.
        total_cells: usize,
    },
    /// Obstacle rasterization.
    Rasterize {
        /// Number of obstacles rasterized.
        obstacle_count: usize,
        /// Obstacles that extended past the grid and were clipped.
        clipped_obstacles: usize,
        /// Distinct blocked cells.
        blocked_cells: usize,
    },
    /// Serpentine routing.
    Route {
        /// Trajectory length.
        path_points: usize,
        /// Rows swept.
        row_count: usize,
        /// Consecutive points that are not grid-adjacent.
        seam_jumps: usize,
    },
    /// Coverage reporting.
    Report {
        /// Percentage of free cells visited.
        coverage_percentage: f64,
    },
}

/// Run the planner, timing every stage with `clock`.
///
/// # Errors
///
/// Same as [`crate::plan`].
pub fn plan_with_diagnostics<C: Clock>(
    request: PlanRequest,
    clock: &C,
) -> Result<(PlanResult, PlanDiagnostics), PlannerError> {
    let start = clock.now();

    let (validated, validate) = timed(clock, || Planner::new(request).validate())?;
    let (built, grid) = timed(clock, || validated.build_grid())?;
    let (rasterized, rasterize) = timed(clock, || Ok(built.rasterize()))?;
    let (routed, route) = timed(clock, || Ok(rasterized.route()))?;
    let (reported, report) = timed(clock, || Ok(routed.report()))?;

    let result = reported.into_result();
    let diagnostics = PlanDiagnostics {
        validate,
        grid,
        rasterize,
        route,
        report,
        total_duration: clock.elapsed(&start),
        summary: result.metadata,
    };
    Ok((result, diagnostics))
}

/// Run one stage transition and capture its duration and metrics.
fn timed<C: Clock, S: PlanStage>(
    clock: &C,
    step: impl FnOnce() -> Result<S, PlannerError>,
) -> Result<(S, StageDiagnostics), PlannerError> {
    let start = clock.now();
    let stage = step()?;
    let duration = clock.elapsed(&start);
    log::trace!("stage {} took {duration:?}", S::NAME);
    let metrics = stage.metrics();
    Ok((stage, StageDiagnostics { duration, metrics }))
}

impl PlanDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Planner Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Grid: {}x{} ({} cells at {} m)",
            self.summary.grid_dimensions.rows,
            self.summary.grid_dimensions.cols,
            self.summary.total_cells,
            self.summary.cell_size,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(72));

        let total_ms = duration_ms(self.total_duration);
        let stages = [
            ("Validate", &self.validate),
            ("Grid", &self.grid),
            ("Rasterize", &self.rasterize),
            ("Route", &self.route),
            ("Report", &self.report),
        ];
        for (name, diag) in stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.push(String::new());
        lines.push(format!(
            "Free cells: {}  |  Path points: {}  |  Coverage: {:.1}%",
            self.summary.free_cells, self.summary.path_points, self.summary.coverage_percentage,
        ));

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Validate { obstacle_count } => format!("{obstacle_count} obstacles"),
        StageMetrics::Grid {
            rows,
            cols,
            total_cells,
        } => format!("{rows}x{cols} = {total_cells} cells"),
        StageMetrics::Rasterize {
            obstacle_count,
            clipped_obstacles,
            blocked_cells,
        } => format!(
            "{obstacle_count} obstacles ({clipped_obstacles} clipped) -> {blocked_cells} blocked",
        ),
        StageMetrics::Route {
            path_points,
            row_count,
            seam_jumps,
        } => format!("{path_points} pts over {row_count} rows, {seam_jumps} jumps"),
        StageMetrics::Report {
            coverage_percentage,
        } => format!("{coverage_percentage:.1}% coverage"),
    }
}
