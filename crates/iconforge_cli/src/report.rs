//! Batch outcome and summary printing

use std::path::{Path, PathBuf};

// ANSI color codes
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
    pub const GRAY: &str = "\x1b[90m";
    pub const BOLD: &str = "\x1b[1m";
    pub const CYAN: &str = "\x1b[36m";
}

/// Counts, written files and errors for one batch
#[derive(Debug, Clone, Default)]
pub struct ConversionReport {
    pub total_files: usize,
    /// Generated unit files, in input order (planned paths on a dry run)
    pub outputs: Vec<PathBuf>,
    /// One message per failed file, in input order
    pub errors: Vec<String>,
}

impl ConversionReport {
    pub fn new(total_files: usize) -> Self {
        Self {
            total_files,
            ..Self::default()
        }
    }

    pub fn record_success(&mut self, output: PathBuf) {
        self.outputs.push(output);
    }

    pub fn record_failure(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
    }

    pub fn successful(&self) -> usize {
        self.outputs.len()
    }

    pub fn failed(&self) -> usize {
        self.errors.len()
    }

    /// Percentage of input files converted, 0 for an empty batch
    pub fn success_rate(&self) -> f64 {
        if self.total_files == 0 {
            return 0.0;
        }
        self.successful() as f64 / self.total_files as f64 * 100.0
    }

    /// 1 if anything failed, 2 if nothing was converted, 0 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.failed() > 0 {
            1
        } else if self.successful() == 0 {
            2
        } else {
            0
        }
    }

    pub fn print_summary(&self, output_dir: &Path, dry_run: bool) {
        println!();
        println!(
            "{}{}Conversion Summary{}",
            colors::BOLD,
            colors::CYAN,
            colors::RESET
        );
        println!("==================");
        println!("  Total files processed:  {}", self.total_files);
        println!(
            "  Successful conversions: {}{}{}",
            colors::GREEN,
            self.successful(),
            colors::RESET
        );
        let failed_color = if self.failed() > 0 {
            colors::RED
        } else {
            colors::GRAY
        };
        println!(
            "  Failed conversions:     {}{}{}",
            failed_color,
            self.failed(),
            colors::RESET
        );
        println!("  Success rate:           {:.1}%", self.success_rate());

        if !self.errors.is_empty() {
            println!();
            println!("{}Errors:{}", colors::BOLD, colors::RESET);
            for error in &self.errors {
                println!("  {}✗{} {}", colors::RED, colors::RESET, error);
            }
        }

        println!("────────────────────────────────────────");
        if dry_run {
            println!(
                "{}! Dry run:{} {} Kotlin files would be generated in {}",
                colors::YELLOW,
                colors::RESET,
                self.successful(),
                output_dir.display()
            );
        } else if self.successful() > 0 {
            println!(
                "{}{}✓ Generated {} Kotlin files in {}{}",
                colors::BOLD,
                colors::GREEN,
                self.successful(),
                output_dir.display(),
                colors::RESET
            );
        } else {
            println!(
                "{}{}✗ No icons were converted{}",
                colors::BOLD,
                colors::RED,
                colors::RESET
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_rate() {
        let mut report = ConversionReport::new(4);
        report.record_success(PathBuf::from("A.kt"));
        report.record_success(PathBuf::from("B.kt"));
        report.record_success(PathBuf::from("C.kt"));
        report.record_failure("bad.svg: Malformed");

        assert_eq!(report.successful(), 3);
        assert_eq!(report.failed(), 1);
        assert!((report.success_rate() - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_exit_codes() {
        let mut report = ConversionReport::new(1);
        report.record_success(PathBuf::from("A.kt"));
        assert_eq!(report.exit_code(), 0);

        report.record_failure("broken");
        assert_eq!(report.exit_code(), 1);

        let empty = ConversionReport::new(0);
        assert_eq!(empty.exit_code(), 2);
        assert_eq!(empty.success_rate(), 0.0);

        let mut all_failed = ConversionReport::new(1);
        all_failed.record_failure("broken");
        assert_eq!(all_failed.exit_code(), 1);
    }
}
