//! SVG coverage preview.
//!
//! Renders a planning result as an SVG document built with the [`svg`]
//! crate: the wall outline, one square per blocked cell, the serpentine
//! path through cell centres, and start/end markers.
//!
//! The document uses one user unit per cell. Grid rows grow with
//! physical height, so rows are flipped to keep row 0 at the bottom of
//! the image.
//!
//! This is a pure function with no I/O; it returns a `String`.

use ::svg::Document;
use ::svg::node::element::path::Data;
use ::svg::node::element::{Circle, Description, Element, Group, Path, Rectangle, Title};
use ::svg::node::{Node, Text, Value};

use wallpath_planner::{Cell, GridDimensions, PlanResult, Trajectory};

/// Rendered size of one cell in pixels.
const CELL_PX: usize = 10;

/// Radius of the start/end markers in cells.
const MARKER_RADIUS: f64 = 0.35;

/// Metadata to embed in the SVG document.
///
/// All fields are optional. Text values are XML-escaped automatically by
/// the `svg` crate.
#[derive(Debug, Clone, Default)]
pub struct SvgMetadata<'a> {
    /// Document title, emitted as `<title>`.
    pub title: Option<&'a str>,

    /// Document description, emitted as `<desc>`.
    pub description: Option<&'a str>,

    /// Serialized plan request JSON, emitted inside a `<metadata>`
    /// element wrapped in a namespaced `<wallpath:request>` element, so
    /// the preview carries what is needed to re-plan it.
    pub request_json: Option<&'a str>,
}

/// Centre of `cell` in document coordinates.
#[allow(clippy::cast_precision_loss)]
fn cell_center(cell: Cell, rows: usize) -> (f64, f64) {
    (cell.col as f64 + 0.5, rows as f64 - cell.row as f64 - 0.5)
}

/// Build an SVG path `d` attribute through the centres of a trajectory's
/// cells.
///
/// Consecutive adjacent cells are joined with `L`. A transition between
/// non-adjacent cells (around an obstacle or across a row seam) is a
/// travel move and starts a new subpath with `M`. Returns an empty string
/// for trajectories with fewer than 2 cells.
///
/// # Examples
///
/// ```
/// use wallpath_planner::{Cell, Trajectory};
/// use wallpath_export::build_path_data;
///
/// let path = Trajectory::new(vec![Cell::new(0, 0), Cell::new(0, 1)]);
/// assert_eq!(build_path_data(&path, 2), "M0.5,1.5 L1.5,1.5");
/// ```
#[must_use]
pub fn build_path_data(trajectory: &Trajectory, rows: usize) -> String {
    let cells = trajectory.cells();
    if cells.len() < 2 {
        return String::new();
    }

    let mut data = Data::new().move_to(cell_center(cells[0], rows));
    for pair in cells.windows(2) {
        let next = cell_center(pair[1], rows);
        data = if pair[0].is_adjacent(pair[1]) {
            data.line_to(next)
        } else {
            data.move_to(next)
        };
    }
    String::from(Value::from(data))
}

/// Cells of the grid that the trajectory does not visit.
///
/// A planned trajectory covers every free cell, so these are exactly the
/// blocked cells.
fn unvisited_cells(trajectory: &Trajectory, dims: GridDimensions) -> Vec<Cell> {
    let mut visited = vec![false; dims.rows * dims.cols];
    for cell in trajectory.cells() {
        if dims.contains(*cell) {
            visited[cell.row * dims.cols + cell.col] = true;
        }
    }
    visited
        .iter()
        .enumerate()
        .filter(|&(_, &v)| !v)
        .map(|(i, _)| Cell::new(i / dims.cols, i % dims.cols))
        .collect()
}

/// Serialize a planning result into an SVG document string.
///
/// # Examples
///
/// ```
/// use wallpath_planner::{PlanRequest, Workspace, plan};
/// use wallpath_export::{SvgMetadata, to_svg};
///
/// let result = plan(&PlanRequest::new(Workspace::new(0.3, 0.2), vec![]))
///     .expect("valid request");
/// let metadata = SvgMetadata {
///     title: Some("test wall"),
///     ..SvgMetadata::default()
/// };
/// let svg = to_svg(&result, &metadata);
/// assert!(svg.contains("<title>test wall</title>"));
/// assert!(svg.contains(r#"viewBox="0 0 3 2""#));
/// ```
#[must_use]
pub fn to_svg(result: &PlanResult, metadata: &SvgMetadata<'_>) -> String {
    let dims = result.metadata.grid_dimensions;
    let (rows, cols) = (dims.rows, dims.cols);

    let mut doc = Document::new()
        .set("width", cols * CELL_PX)
        .set("height", rows * CELL_PX)
        .set("viewBox", (0, 0, cols, rows));

    if let Some(title) = metadata.title {
        doc = doc.add(Title::new(title));
    }

    if let Some(description) = metadata.description {
        doc = doc.add(Description::new().add(Text::new(description)));
    }

    if let Some(request_json) = metadata.request_json {
        let mut request_el = Element::new("wallpath:request");
        request_el.assign("xmlns:wallpath", "https://wallpath.dev/ns/1");
        request_el.append(Text::new(request_json));
        let mut metadata_el = Element::new("metadata");
        metadata_el.append(request_el);
        doc = doc.add(metadata_el);
    }

    // Wall background.
    doc = doc.add(
        Rectangle::new()
            .set("width", cols)
            .set("height", rows)
            .set("fill", "#f4f1ea"),
    );

    // Blocked cells.
    let mut blocked = Group::new().set("id", "obstacles").set("fill", "#555555");
    for cell in unvisited_cells(&result.path, dims) {
        blocked = blocked.add(
            Rectangle::new()
                .set("x", cell.col)
                .set("y", rows - 1 - cell.row)
                .set("width", 1)
                .set("height", 1),
        );
    }
    doc = doc.add(blocked);

    // Serpentine path.
    let d = build_path_data(&result.path, rows);
    if !d.is_empty() {
        doc = doc.add(
            Path::new()
                .set("id", "trajectory")
                .set("d", d)
                .set("fill", "none")
                .set("stroke", "#1f6fb2")
                .set("stroke-width", 0.2)
                .set("stroke-linejoin", "round"),
        );
    }

    // Start and end markers.
    for (id, cell, color) in [
        ("start", result.path.first(), "#2e9e44"),
        ("end", result.path.last(), "#c0392b"),
    ] {
        if let Some(&cell) = cell {
            let (cx, cy) = cell_center(cell, rows);
            doc = doc.add(
                Circle::new()
                    .set("id", id)
                    .set("cx", cx)
                    .set("cy", cy)
                    .set("r", MARKER_RADIUS)
                    .set("fill", color),
            );
        }
    }

    // The svg crate omits the XML declaration, so we prepend it.
    format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{doc}\n")
}
