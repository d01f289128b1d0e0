//! wallpath-export: Pure format serializers (sans-IO)
//!
//! Converts planning results into output formats: an SVG coverage
//! preview and a CSV waypoint listing.

pub mod csv;
pub mod svg;

pub use crate::csv::to_csv;
pub use crate::svg::{SvgMetadata, build_path_data, to_svg};
