//! SVG error types

use std::io;
use thiserror::Error;

/// Errors that can occur when loading an SVG icon
#[derive(Error, Debug)]
pub enum SvgError {
    /// IO error when reading the file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// XML parsing error
    #[error("SVG parsing error: {0}")]
    Parse(String),

    /// The document parsed but its root element is not `<svg>`
    #[error("Root element is <{0}>, expected <svg>")]
    NotSvg(String),
}
