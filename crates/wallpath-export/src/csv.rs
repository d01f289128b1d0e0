//! CSV waypoint export.
//!
//! One line per trajectory point: `index,row,col,x,y`, where `x`/`y` are
//! the physical coordinates of the cell centre in meters (origin at the
//! lower-left corner of the wall). The header line names the columns.
//!
//! This is a pure function with no I/O; it returns a `String`.

use std::fmt::Write;

use wallpath_planner::PlanResult;

/// Column header emitted as the first line.
pub const HEADER: &str = "index,row,col,x,y";

/// Serialize a planning result's trajectory as CSV.
///
/// Physical coordinates are formatted to 4 decimal places (0.1 mm).
///
/// # Examples
///
/// ```
/// use wallpath_planner::{PlanRequest, Workspace, plan};
/// use wallpath_export::to_csv;
///
/// let result = plan(&PlanRequest::new(Workspace::new(0.2, 0.1), vec![]))
///     .expect("valid request");
/// let csv = to_csv(&result);
/// assert_eq!(csv, "index,row,col,x,y\n0,0,0,0.0500,0.0500\n1,0,1,0.1500,0.0500\n");
/// ```
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn to_csv(result: &PlanResult) -> String {
    let cell_size = result.metadata.cell_size;
    let mut out = String::with_capacity((result.path.len() + 1) * 24);
    let _ = writeln!(out, "{HEADER}");
    for (i, cell) in result.path.cells().iter().enumerate() {
        let x = (cell.col as f64 + 0.5) * cell_size;
        let y = (cell.row as f64 + 0.5) * cell_size;
        let _ = writeln!(out, "{i},{},{},{x:.4},{y:.4}", cell.row, cell.col);
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use wallpath_planner::{Obstacle, PlanRequest, Workspace, plan};

    use super::*;

    #[test]
    fn header_only_for_empty_path() {
        let result = plan(&PlanRequest::new(
            Workspace::new(0.1, 0.1),
            vec![Obstacle::new(0.0, 0.0, 0.1, 0.1)],
        ))
        .unwrap();
        assert_eq!(to_csv(&result), "index,row,col,x,y\n");
    }

    #[test]
    fn one_line_per_point_in_path_order() {
        let result = plan(&PlanRequest::new(Workspace::new(0.2, 0.2), vec![]).with_cell_size(0.1))
            .unwrap();
        let csv = to_csv(&result);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[3], "2,1,1,0.1500,0.1500");
        assert_eq!(lines[4], "3,1,0,0.0500,0.1500");
    }

    #[test]
    fn coordinates_scale_with_cell_size() {
        let result =
            plan(&PlanRequest::new(Workspace::new(1.0, 0.5), vec![]).with_cell_size(0.5)).unwrap();
        let csv = to_csv(&result);
        assert!(csv.contains("1,0,1,0.7500,0.2500"));
    }
}
