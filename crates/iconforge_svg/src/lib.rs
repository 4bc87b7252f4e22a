//! SVG icon model for iconforge
//!
//! This crate reads the icon-asset subset of SVG (paths, polygons, polylines and
//! groups with flat styling) into a small shape tree that code generators consume.
//!
//! # Example
//!
//! ```ignore
//! use iconforge_svg::Document;
//!
//! let doc = Document::from_file("icons/edit.svg")?;
//! for path in doc.paths() {
//!     println!("{} commands, fill {}", path.commands.len(), path.fill);
//! }
//! ```

mod color;
mod document;
mod error;
mod path;
mod shape;
mod style;

pub use color::{normalize_color, parse_paint, Paint, ParsedColor, Rgb};
pub use document::{Document, ViewBox};
pub use error::SvgError;
pub use path::{parse_path_data, to_path_data, DrawingCommand, PathParser, Point};
pub use shape::{GroupShape, PathShape, Shape};
pub use style::{
    parse_declarations, FillRule, Inherited, ResolvedStyle, StyleResolver, StyleSource,
    Stylesheet,
};
