//! Input scanning and output directory handling

use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// How much of a file is sniffed for the `<svg` marker
const SNIFF_LEN: u64 = 1024;

/// Whether `path` looks like a convertible SVG file.
///
/// Requires an `.svg` extension (any case), a non-empty regular file, and `<svg`
/// somewhere in the first kilobyte.
pub fn is_svg_file(path: &Path) -> bool {
    let has_extension = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
    if !has_extension || !path.is_file() {
        return false;
    }

    let mut head = Vec::new();
    let read = fs::File::open(path).and_then(|file| file.take(SNIFF_LEN).read_to_end(&mut head));
    match read {
        Ok(0) => {
            warn!("Empty SVG file: {}", path.display());
            false
        }
        Ok(_) => {
            let found = String::from_utf8_lossy(&head)
                .to_lowercase()
                .contains("<svg");
            if !found {
                warn!("File does not appear to be SVG: {}", path.display());
            }
            found
        }
        Err(e) => {
            warn!("Cannot read {}: {}", path.display(), e);
            false
        }
    }
}

/// All SVG files below `root`, sorted by path
pub fn find_svg_files(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to scan {}", root.display()))?;
        if entry.file_type().is_file() && is_svg_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    files.sort();
    debug!("Found {} SVG files in {}", files.len(), root.display());
    Ok(files)
}

/// Remove everything inside `dir`, keeping `dir` itself
pub fn clean_output_directory(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Ok(());
    }

    for entry in WalkDir::new(dir).min_depth(1).contents_first(true) {
        let entry = entry.with_context(|| format!("Failed to scan {}", dir.display()))?;
        let path = entry.path();
        if entry.file_type().is_dir() {
            fs::remove_dir(path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        } else {
            fs::remove_file(path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
    }

    debug!("Cleaned output directory {}", dir.display());
    Ok(())
}

/// Write `contents` to `path`, creating parent directories
pub fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "iconforge-files-{}-{}",
            name,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_is_svg_file() {
        let dir = scratch("sniff");
        let good = dir.join("good.SVG");
        fs::write(&good, "<?xml version=\"1.0\"?>\n<SVG></SVG>").unwrap();
        let empty = dir.join("empty.svg");
        fs::write(&empty, "").unwrap();
        let html = dir.join("page.svg");
        fs::write(&html, "<html></html>").unwrap();
        let text = dir.join("notes.txt");
        fs::write(&text, "<svg/>").unwrap();

        assert!(is_svg_file(&good));
        assert!(!is_svg_file(&empty));
        assert!(!is_svg_file(&html));
        assert!(!is_svg_file(&text));
        assert!(!is_svg_file(&dir.join("missing.svg")));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_find_svg_files_sorted_and_recursive() {
        let dir = scratch("find");
        write_file(&dir.join("b.svg"), "<svg/>").unwrap();
        write_file(&dir.join("a.svg"), "<svg/>").unwrap();
        write_file(&dir.join("nested/deep/c.svg"), "<svg/>").unwrap();
        write_file(&dir.join("nested/readme.md"), "# icons").unwrap();

        let files = find_svg_files(&dir).unwrap();
        let relative: Vec<PathBuf> = files
            .iter()
            .map(|f| f.strip_prefix(&dir).unwrap().to_path_buf())
            .collect();
        assert_eq!(
            relative,
            vec![
                PathBuf::from("a.svg"),
                PathBuf::from("b.svg"),
                Path::new("nested").join("deep").join("c.svg"),
            ]
        );

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_clean_output_directory() {
        let dir = scratch("clean");
        write_file(&dir.join("Old.kt"), "old").unwrap();
        write_file(&dir.join("actions/Edit.kt"), "old").unwrap();

        clean_output_directory(&dir).unwrap();
        assert!(dir.exists());
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);

        clean_output_directory(&dir.join("missing")).unwrap();
        fs::remove_dir_all(&dir).unwrap();
    }
}
