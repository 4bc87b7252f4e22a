//! Batch conversion of an input directory tree

use anyhow::Result;
use iconforge_codegen::{
    convert_file, emit_icon_pack, EmitOptions, GeneratedUnit, IdentifierTable,
};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use crate::files::{clean_output_directory, find_svg_files, write_file};
use crate::report::ConversionReport;

/// Everything needed to convert one directory tree
#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub input: PathBuf,
    pub output: PathBuf,
    pub emit: EmitOptions,
    pub generate_index: bool,
    pub iconpack_name: String,
    pub clean: bool,
    /// Convert and report, but touch nothing on disk
    pub dry_run: bool,
}

/// Scan, convert in parallel, aggregate and write.
///
/// Per-file and icon-pack failures end up in the report; only scanning and cleaning
/// problems are returned as errors.
pub fn run(options: &BatchOptions) -> Result<ConversionReport> {
    if options.clean {
        if options.dry_run {
            info!("Would clean {}", options.output.display());
        } else {
            info!("Cleaning {}", options.output.display());
            clean_output_directory(&options.output)?;
        }
    }

    let files = find_svg_files(&options.input)?;
    info!(
        "Converting {} SVG files from {}",
        files.len(),
        options.input.display()
    );

    let results: Vec<_> = files
        .par_iter()
        .map(|path| convert_file(path, &options.input, &options.emit))
        .collect();

    let mut report = ConversionReport::new(files.len());
    let mut claimed: FxHashMap<PathBuf, PathBuf> = FxHashMap::default();
    let mut written: Vec<GeneratedUnit> = Vec::with_capacity(results.len());

    for result in results {
        let unit = match result {
            Ok(unit) => unit,
            Err(e) => {
                warn!("{}", e);
                report.record_failure(e.to_string());
                continue;
            }
        };

        let relative = unit.relative_output_path();
        if let Some(first) = claimed.get(&relative) {
            let message = format!(
                "{}: output {} is already generated from {}",
                unit.source.display(),
                relative.display(),
                first.display()
            );
            warn!("{}", message);
            report.record_failure(message);
            continue;
        }

        let target = options.output.join(&relative);
        if options.dry_run {
            debug!("Would write {}", target.display());
        } else if let Err(e) = write_file(&target, &unit.text) {
            warn!("{:#}", e);
            report.record_failure(format!("{}: {:#}", unit.source.display(), e));
            continue;
        }

        claimed.insert(relative, unit.source.clone());
        report.record_success(target);
        written.push(unit);
    }

    if options.generate_index && !written.is_empty() {
        let table = IdentifierTable::aggregate(
            written
                .iter()
                .map(|unit| (unit.identifier.as_str(), &unit.namespace)),
        );
        let pack_file = PathBuf::from(format!("{}.kt", options.iconpack_name));
        if let Some(first) = claimed.get(&pack_file) {
            let message = format!(
                "Icon pack {} collides with the icon generated from {}",
                pack_file.display(),
                first.display()
            );
            warn!("{}", message);
            report.record_failure(message);
        } else {
            let text = emit_icon_pack(&table, &options.emit.package, &options.iconpack_name);
            let target = options.output.join(&pack_file);
            if options.dry_run {
                info!("Would write icon pack {} ({} icons)", target.display(), table.len());
            } else if let Err(e) = write_file(&target, &text) {
                warn!("{:#}", e);
                report.record_failure(format!("{}: {:#}", pack_file.display(), e));
            } else {
                info!("Wrote icon pack {} ({} icons)", target.display(), table.len());
            }
        }
    }

    Ok(report)
}
