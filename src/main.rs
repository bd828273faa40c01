//! pvt-equil - PVT versus depth equilibration checks
//!
//! Computes the initial fluid state of every equilibrium region in a field
//! document, checks it for physical consistency and optionally writes
//! corrected depth trend tables.
//!
//! # Usage
//!
//! ```bash
//! # Check all active regions, human-readable report
//! pvt-equil check field.toml
//!
//! # Machine-readable report with a finer march
//! pvt-equil check field.toml --nodes 100 --json
//!
//! # Correct trends and write the corrected document
//! pvt-equil adjust field.toml --output field_adjusted.toml --saturate-goc
//! ```
//!
//! # Environment Variables
//!
//! - `PVT_EQUIL_CONFIG`: Path to a settings file, same as `--config` (default: `./pvt_equil.toml`)
//! - `RUST_LOG`: Logging level (default: info)

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};

use pvt_equil::{EquilConfig, Field, FieldInput, FieldReport};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "pvt-equil")]
#[command(about = "Black-oil PVT equilibration and consistency checks")]
#[command(version)]
struct CliArgs {
    /// Settings file; without it ./pvt_equil.toml or built-in defaults are used
    #[arg(long, global = true, value_name = "PATH", env = "PVT_EQUIL_CONFIG")]
    config: Option<PathBuf>,

    /// Depth intervals between structural top and bottom
    #[arg(long, global = true)]
    nodes: Option<usize>,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Compute and check every active equilibrium region
    Check {
        /// Field document (TOML, or JSON by extension)
        input: PathBuf,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Correct the depth trends, recompute and write the corrected document
    Adjust {
        /// Field document (TOML, or JSON by extension)
        input: PathBuf,
        /// Where to write the corrected document
        #[arg(short, long)]
        output: PathBuf,
        /// Also force saturation at the GOC when undersaturated there
        #[arg(long)]
        saturate_goc: bool,
    },
}

// ============================================================================
// Commands
// ============================================================================

fn load_settings(args: &CliArgs) -> Result<EquilConfig> {
    let mut config = match &args.config {
        Some(path) => EquilConfig::load_from_file(path)
            .with_context(|| format!("Failed to load settings from {}", path.display()))?,
        None => EquilConfig::load(),
    };
    if let Some(nodes) = args.nodes {
        config.integration.node_count = nodes;
    }
    if let SubCommand::Adjust { saturate_goc: true, .. } = args.command {
        config.correction.saturate_goc = true;
    }
    config.validate().context("Invalid settings")?;
    Ok(config)
}

fn load_field(path: &Path, config: &EquilConfig) -> Result<Field> {
    let input = FieldInput::load(path)
        .with_context(|| format!("Failed to read field input {}", path.display()))?;
    Field::from_input(input, config)
        .with_context(|| format!("Invalid field input {}", path.display()))
}

fn run_check(input: &Path, json: bool, config: &EquilConfig) -> Result<bool> {
    let field = load_field(input, config)?;
    let report = field.check(config);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        println!("{report}");
    }
    Ok(report.is_valid())
}

fn run_adjust(input: &Path, output: &Path, config: &EquilConfig) -> Result<bool> {
    let field = load_field(input, config)?;
    let adjustment = field.adjust(config).context("Trend correction failed")?;

    adjustment
        .field
        .to_input()
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(path = %output.display(), "Corrected trends written");

    print_comparison(&adjustment.before, &adjustment.after);
    let all_computed = adjustment.after.failed_regions().next().is_none();
    Ok(all_computed)
}

fn print_comparison(before: &FieldReport, after: &FieldReport) {
    println!("Before correction:");
    println!("{before}");
    println!();
    println!("After correction:");
    println!("{after}");
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();

    let outcome = load_settings(&args).and_then(|config| match &args.command {
        SubCommand::Check { input, json } => run_check(input, *json, &config),
        SubCommand::Adjust { input, output, .. } => run_adjust(input, output, &config),
    });

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            warn!("Field has failed regions or FATAL findings");
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    const FIELD: &str = r#"
[[pvt]]
pvtnum = 1
oil = [
    [50.0, 100.0, 1.20, 1.0],
    [50.0, 300.0, 1.16, 1.2],
    [100.0, 180.0, 1.30, 0.8],
    [100.0, 300.0, 1.27, 0.9],
]
gas = [
    [100.0, 0.00005, 0.020, 0.012],
    [100.0, 0.0, 0.0202, 0.011],
    [150.0, 0.00015, 0.012, 0.014],
    [150.0, 0.0, 0.0122, 0.013],
    [300.0, 0.00030, 0.006, 0.020],
    [300.0, 0.0, 0.0062, 0.019],
]

[pvt.densities]
oil = 850.0
gas = 0.9
water = 1000.0

[pvt.water]
p_ref = 200.0
bw_ref = 1.01
compressibility = 4.0e-5
visw_ref = 0.3

[[equil]]
eqlnum = 1
pvtnum = 1
ref_depth = 2000.0
ref_pressure = 200.0
owc = 2100.0
goc = 1950.0
top = 1900.0
bottom = 2200.0

[equil.trends]
kind = "ratio"
rsvd = [[1900.0, 80.0], [2200.0, 60.0]]
rvvd = [[1900.0, 0.0001], [2200.0, 0.0002]]
"#;

    #[test]
    fn test_config_flag_reads_environment() {
        let command = CliArgs::command();
        let config = command
            .get_arguments()
            .find(|a| a.get_id() == "config")
            .unwrap();
        assert_eq!(
            config.get_env(),
            Some(std::ffi::OsStr::new(pvt_equil::config::defaults::CONFIG_ENV_VAR))
        );
    }

    #[test]
    fn test_adjust_subcommand_flags() {
        let args = CliArgs::try_parse_from([
            "pvt-equil",
            "adjust",
            "field.toml",
            "-o",
            "out.toml",
            "--saturate-goc",
            "--nodes",
            "40",
        ])
        .unwrap();
        assert_eq!(args.nodes, Some(40));
        assert!(matches!(
            args.command,
            SubCommand::Adjust { saturate_goc: true, .. }
        ));
    }

    #[test]
    fn test_run_adjust_writes_reloadable_document() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("field.toml");
        let output = dir.path().join("adjusted.toml");
        std::fs::write(&input, FIELD).unwrap();

        let config = EquilConfig::default();
        assert!(run_adjust(&input, &output, &config).unwrap());

        let adjusted = FieldInput::load(&output).unwrap();
        assert_eq!(adjusted.equil.len(), 1);
        assert_eq!(adjusted.equil[0].trends.keywords(), ["RSVD", "RVVD"]);
        assert!(run_check(&output, false, &config).is_ok());
    }
}
