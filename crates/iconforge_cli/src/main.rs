//! iconforge CLI
//!
//! Convert directories of SVG icons into Jetpack Compose `ImageVector` Kotlin sources.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use iconforge_codegen::{to_identifier, EmitOptions};
use std::env;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod batch;
mod config;
mod files;
mod report;

use batch::BatchOptions;
use config::{validate_package_name, ConvertConfig, IconforgeConfig, CONFIG_FILE};

#[derive(Parser)]
#[command(name = "iconforge")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "SVG to Jetpack Compose ImageVector converter", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a directory of SVG files to Kotlin
    Convert(ConvertArgs),

    /// Write a default iconforge.toml
    Init {
        /// Directory to create the config in
        #[arg(default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(clap::Args)]
struct ConvertArgs {
    /// Input directory containing SVG files
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Output directory for generated Kotlin files
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Base Kotlin package (dashes are normalized, my-app -> my_app)
    #[arg(short, long)]
    package: Option<String>,

    /// Convert and report without writing files
    #[arg(long)]
    dry_run: bool,

    /// Remove existing files from the output directory first
    #[arg(long)]
    clean: bool,

    /// Also generate an icon pack object listing every icon
    #[arg(long)]
    generate_index: bool,

    /// Name of the icon pack object
    #[arg(long)]
    iconpack_name: Option<String>,

    /// Split paths longer than this into helper functions
    #[arg(long)]
    max_commands: Option<usize>,

    /// Config file (defaults to ./iconforge.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl ConvertArgs {
    /// Lay command-line values over the config file
    fn merge_into(self, mut config: ConvertConfig) -> ConvertConfig {
        if let Some(input) = self.input {
            config.input = Some(input);
        }
        if let Some(output) = self.output {
            config.output = Some(output);
        }
        if let Some(package) = self.package {
            config.package = package;
        }
        if let Some(name) = self.iconpack_name {
            config.iconpack_name = name;
        }
        if let Some(max) = self.max_commands {
            config.max_commands = max;
        }
        config.generate_index |= self.generate_index;
        config.clean |= self.clean;
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Convert(args) => {
            let code = cmd_convert(args)?;
            std::process::exit(code);
        }
        Commands::Init { dir } => cmd_init(&dir),
    }
}

fn load_config(path: Option<&Path>) -> Result<IconforgeConfig> {
    match path {
        Some(path) => {
            info!("Using config {}", path.display());
            IconforgeConfig::load(path)
        }
        None => {
            let cwd = env::current_dir().context("Failed to get current directory")?;
            Ok(IconforgeConfig::load_from_dir(&cwd)?.unwrap_or_default())
        }
    }
}

/// Check merged settings and turn them into batch options
fn batch_options(config: ConvertConfig, dry_run: bool) -> Result<BatchOptions> {
    let Some(input) = config.input else {
        anyhow::bail!("Input directory is required (use --input or set it in {})", CONFIG_FILE);
    };
    let Some(output) = config.output else {
        anyhow::bail!("Output directory is required (use --output or set it in {})", CONFIG_FILE);
    };
    if !input.exists() {
        anyhow::bail!("Input directory does not exist: {}", input.display());
    }
    if !input.is_dir() {
        anyhow::bail!("Input path is not a directory: {}", input.display());
    }
    if config.max_commands == 0 {
        anyhow::bail!("--max-commands must be at least 1");
    }

    let package = validate_package_name(&config.package)?;
    if package != config.package {
        info!("Normalized package name: {} -> {}", config.package, package);
    }
    let iconpack_name = to_identifier(&config.iconpack_name);
    if iconpack_name != config.iconpack_name {
        warn!("Icon pack name {} renamed to {}", config.iconpack_name, iconpack_name);
    }

    Ok(BatchOptions {
        input,
        output,
        emit: EmitOptions {
            package,
            max_commands: config.max_commands,
        },
        generate_index: config.generate_index,
        iconpack_name,
        clean: config.clean,
        dry_run,
    })
}

fn cmd_convert(args: ConvertArgs) -> Result<i32> {
    let dry_run = args.dry_run;
    let config = load_config(args.config.as_deref())?;
    let options = batch_options(args.merge_into(config.convert), dry_run)?;

    if dry_run {
        info!("Dry run: no files will be written");
    }
    info!(
        "Converting {} -> {} (package {})",
        options.input.display(),
        options.output.display(),
        options.emit.package
    );

    let report = batch::run(&options)?;
    report.print_summary(&options.output, dry_run);
    Ok(report.exit_code())
}

fn cmd_init(dir: &Path) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }

    let config = IconforgeConfig::new("svg", "generated");
    files::write_file(&path, &config.to_toml()?)?;

    info!("Created {}", path.display());
    info!("Next steps:");
    info!("  Edit the input/output paths in {}", CONFIG_FILE);
    info!("  iconforge convert");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: Option<&str>) -> ConvertArgs {
        ConvertArgs {
            input: input.map(PathBuf::from),
            output: None,
            package: None,
            dry_run: false,
            clean: false,
            generate_index: false,
            iconpack_name: None,
            max_commands: None,
            config: None,
        }
    }

    #[test]
    fn test_command_line_overrides_config() {
        let mut file = ConvertConfig {
            input: Some(PathBuf::from("from-file")),
            output: Some(PathBuf::from("out")),
            generate_index: true,
            ..ConvertConfig::default()
        };
        file.max_commands = 100;

        let mut cli = args(Some("from-cli"));
        cli.package = Some("com.acme".to_string());
        let merged = cli.merge_into(file);

        assert_eq!(merged.input, Some(PathBuf::from("from-cli")));
        assert_eq!(merged.output, Some(PathBuf::from("out")));
        assert_eq!(merged.package, "com.acme");
        assert_eq!(merged.max_commands, 100);
        assert!(merged.generate_index);
    }

    #[test]
    fn test_batch_options_validation() {
        let dir = std::env::temp_dir().join(format!("iconforge-main-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let missing_output = ConvertConfig {
            input: Some(dir.clone()),
            ..ConvertConfig::default()
        };
        assert!(batch_options(missing_output, false).is_err());

        let missing_input = ConvertConfig {
            input: Some(dir.join("nope")),
            output: Some(dir.join("out")),
            ..ConvertConfig::default()
        };
        assert!(batch_options(missing_input, false).is_err());

        let ok = ConvertConfig {
            input: Some(dir.clone()),
            output: Some(dir.join("out")),
            package: "com.my-app.Icons".to_string(),
            iconpack_name: "my icons".to_string(),
            ..ConvertConfig::default()
        };
        let options = batch_options(ok, true).unwrap();
        assert_eq!(options.emit.package, "com.my_app.icons");
        assert_eq!(options.iconpack_name, "MyIcons");
        assert!(options.dry_run);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_init_writes_loadable_config() {
        let dir = std::env::temp_dir().join(format!("iconforge-init-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        cmd_init(&dir).unwrap();
        let config = IconforgeConfig::load_from_dir(&dir).unwrap().unwrap();
        assert_eq!(config.convert.input, Some(PathBuf::from("svg")));
        assert!(cmd_init(&dir).is_err());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
