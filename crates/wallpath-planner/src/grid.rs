//! Grid builder: discretize the wall into square cells.
//!
//! The grid uses ceiling division so it always encloses the whole wall.
//! When a wall dimension is not a multiple of the cell size the last
//! row or column covers a partial physical strip; it is kept, not
//! trimmed.
//!
//! Cell count grows as `(wall_width * wall_height) / cell_size²`. Halving
//! the cell size quadruples the work and memory of every later stage, so
//! callers that accept untrusted sizes should bound
//! [`GridDimensions::cell_count`] before planning.

use crate::types::{GridDimensions, PlannerError, Workspace};

/// Relative tolerance used to snap near-integer cell quotients, in
/// units of `f64::EPSILON`.
///
/// `1.1 / 0.1` evaluates to `11.000000000000002`; without snapping its
/// ceiling would add a spurious twelfth column. The tolerance covers a
/// few rounding steps only, so a real partial cell is never snapped away.
pub const SNAP_ULPS: f64 = 4.0;

/// Largest cell count a grid may have. Cell buffers are `Vec`s, which
/// cannot exceed `isize::MAX` bytes.
pub const MAX_CELLS: usize = isize::MAX.unsigned_abs();

/// Check that `value` is finite and strictly positive.
///
/// # Errors
///
/// Returns [`PlannerError::InvalidDimension`] tagged with `name` otherwise.
pub fn validate_dimension(name: &'static str, value: f64) -> Result<f64, PlannerError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(PlannerError::InvalidDimension { name, value })
    }
}

/// Validate every dimensional input of a planning run.
///
/// # Errors
///
/// Returns [`PlannerError::InvalidDimension`] for the first rejected input,
/// checked in the order width, height, cell size.
pub fn validate_workspace(workspace: Workspace, cell_size: f64) -> Result<(), PlannerError> {
    validate_dimension("wall_width", workspace.wall_width)?;
    validate_dimension("wall_height", workspace.wall_height)?;
    validate_dimension("cell_size", cell_size)?;
    Ok(())
}

/// `length / cell_size`, snapped to the nearest integer when within
/// [`SNAP_ULPS`] rounding steps of it.
pub(crate) fn cell_quotient(length: f64, cell_size: f64) -> f64 {
    let quotient = length / cell_size;
    let nearest = quotient.round();
    if (quotient - nearest).abs() <= SNAP_ULPS * f64::EPSILON * nearest.abs().max(1.0) {
        nearest
    } else {
        quotient
    }
}

/// Compute the grid enclosing `workspace` at the given cell size.
///
/// `rows = ceil(wall_height / cell_size)`, `cols = ceil(wall_width / cell_size)`.
///
/// # Errors
///
/// Returns [`PlannerError::InvalidDimension`] if any input is non-positive
/// or non-finite, or if the resulting cell count exceeds [`MAX_CELLS`].
pub fn build_grid(workspace: Workspace, cell_size: f64) -> Result<GridDimensions, PlannerError> {
    validate_workspace(workspace, cell_size)?;

    let dimensions = GridDimensions {
        rows: cells_along("wall_height", workspace.wall_height, cell_size)?,
        cols: cells_along("wall_width", workspace.wall_width, cell_size)?,
    };

    if dimensions.cell_count().is_none_or(|count| count > MAX_CELLS) {
        #[allow(clippy::cast_precision_loss)]
        let value = dimensions.rows as f64 * dimensions.cols as f64;
        return Err(PlannerError::InvalidDimension {
            name: "grid cell count",
            value,
        });
    }

    log::debug!(
        "built {}x{} grid for {}x{} m wall at {} m cells",
        dimensions.rows,
        dimensions.cols,
        workspace.wall_width,
        workspace.wall_height,
        cell_size,
    );
    Ok(dimensions)
}

impl GridDimensions {
    /// Grid for `workspace` at `cell_size`; see [`build_grid`].
    ///
    /// Lets callers check the cell count against their own limit before
    /// committing to a planning run.
    ///
    /// # Errors
    ///
    /// Same as [`build_grid`].
    pub fn for_workspace(workspace: Workspace, cell_size: f64) -> Result<Self, PlannerError> {
        build_grid(workspace, cell_size)
    }
}

/// Number of cells needed to span `length`. Always at least one.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn cells_along(name: &'static str, length: f64, cell_size: f64) -> Result<usize, PlannerError> {
    let count = cell_quotient(length, cell_size).ceil();
    if !count.is_finite() || count >= usize::MAX as f64 {
        return Err(PlannerError::InvalidDimension {
            name,
            value: length,
        });
    }
    // A positive length smaller than the snap tolerance still occupies a cell.
    Ok((count as usize).max(1))
}
