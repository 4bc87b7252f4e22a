//! Conversion error types

use std::io;
use std::path::PathBuf;

use iconforge_svg::SvgError;
use thiserror::Error;

/// Errors that fail the conversion of a single icon
#[derive(Error, Debug)]
pub enum ConvertError {
    /// IO error when reading the source file
    #[error("Failed to read {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The markup could not be read as an SVG icon
    #[error("Malformed SVG {}: {}", .path.display(), .source)]
    Malformed {
        path: PathBuf,
        #[source]
        source: SvgError,
    },
}
