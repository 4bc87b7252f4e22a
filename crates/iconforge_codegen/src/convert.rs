//! Single-file conversion pipeline
//!
//! Markup text in, one generated unit out. No state is shared between calls, so a batch
//! driver can run conversions in parallel.

use std::fs;
use std::path::{Path, PathBuf};

use iconforge_svg::Document;
use tracing::debug;

use crate::emit::{emit_icon, EmitOptions};
use crate::error::ConvertError;
use crate::ident::{to_identifier, Namespace};

/// The generated source for one icon
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedUnit {
    pub identifier: String,
    pub namespace: Namespace,
    /// Source file, relative to the input root
    pub source: PathBuf,
    pub text: String,
}

impl GeneratedUnit {
    /// `<namespace dirs>/<Identifier>.kt`, relative to the output root
    pub fn relative_output_path(&self) -> PathBuf {
        self.namespace
            .to_path()
            .join(format!("{}.kt", self.identifier))
    }
}

/// Convert markup already in memory.
///
/// `relative_path` is the source's path below the input root; it supplies both the
/// identifier (file stem) and the namespace (parent directories).
pub fn convert_source(
    source: &str,
    relative_path: &Path,
    options: &EmitOptions,
) -> Result<GeneratedUnit, ConvertError> {
    let stem = relative_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let namespace = Namespace::from_relative_path(relative_path);
    let identifier = to_identifier(&stem);

    let document = Document::from_str(source, &stem).map_err(|source| ConvertError::Malformed {
        path: relative_path.to_path_buf(),
        source,
    })?;
    debug!(
        file = %relative_path.display(),
        identifier = %identifier,
        shapes = document.shapes.len(),
        commands = document.command_count(),
        "Converted icon"
    );

    let package = namespace.package(&options.package);
    let text = emit_icon(&document, &identifier, &package, options.max_commands);

    Ok(GeneratedUnit {
        identifier,
        namespace,
        source: relative_path.to_path_buf(),
        text,
    })
}

/// Read and convert one file below `input_root`
pub fn convert_file(
    path: &Path,
    input_root: &Path,
    options: &EmitOptions,
) -> Result<GeneratedUnit, ConvertError> {
    let source = fs::read_to_string(path).map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let relative = path.strip_prefix(input_root).unwrap_or(path);
    convert_source(&source, relative, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M3 17.25V21h3.75L17.81 9.94l-3.75-3.75L3 17.25z"/></svg>"#;

    #[test]
    fn test_convert_nested_source() {
        let options = EmitOptions::default();
        let unit = convert_source(ICON, Path::new("actions/edit-pencil.svg"), &options).unwrap();

        assert_eq!(unit.identifier, "EditPencil");
        assert_eq!(unit.namespace, Namespace::new(["actions"]));
        assert_eq!(
            unit.relative_output_path(),
            Path::new("actions").join("EditPencil.kt")
        );
        assert!(unit.text.contains("package com.example.icons.actions\n"));
        assert!(unit.text.contains("val EditPencil: ImageVector"));
        assert!(unit.text.contains("verticalLineTo(21.00f)"));
    }

    #[test]
    fn test_malformed_source_is_an_error() {
        let options = EmitOptions::default();
        let err = convert_source("<svg", Path::new("bad.svg"), &options).unwrap_err();
        assert!(matches!(err, ConvertError::Malformed { .. }));
        assert!(err.to_string().contains("bad.svg"));

        let err = convert_source("<html/>", Path::new("page.svg"), &options).unwrap_err();
        assert!(matches!(err, ConvertError::Malformed { .. }));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let options = EmitOptions::default();
        let root = std::env::temp_dir();
        let err =
            convert_file(&root.join("iconforge-missing-file.svg"), &root, &options).unwrap_err();
        assert!(matches!(err, ConvertError::Io { .. }));
    }
}
