//! Lines Layout - Entry Point

use clap::Parser;
use std::io::{Read, Write};
use std::path::PathBuf;
use tracing::info;

use lines_layout::config::{self, CliOverrides};
use lines_layout::model::AppError;
use lines_layout::scenario::Scenario;

/// Lines Layout - replay a layout scenario and print the viewport as JSON
#[derive(Parser, Debug)]
#[command(name = "lines-layout")]
#[command(version)]
#[command(about = "Compute the vertical layout of a line scenario and print the viewport as JSON")]
pub struct Args {
    /// Path to a scenario JSON file (reads from stdin if not provided)
    pub scenario: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Default line height in pixels (at least 1)
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    pub line_height: Option<i64>,

    /// Padding above the first line in pixels
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    pub padding_top: Option<i64>,

    /// Padding below the last line in pixels
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    pub padding_bottom: Option<i64>,

    /// Pretty-print the JSON report
    #[arg(long)]
    pub pretty: bool,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            line_height: self.line_height,
            padding_top: self.padding_top,
            padding_bottom: self.padding_bottom,
        }
    }
}

fn load_scenario(path: Option<&PathBuf>) -> Result<Scenario, AppError> {
    match path {
        Some(path) => Ok(Scenario::from_path(path)?),
        None => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            Ok(Scenario::from_json(&text)?)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults → Config File → Env Vars → CLI Args
    let config = config::resolve(args.config.clone(), args.overrides()).map_err(AppError::from)?;

    lines_layout::logging::init(&config.log_file_path, &config.log_filter).map_err(AppError::from)?;

    info!(config = ?config, "Configuration loaded and resolved");

    let scenario = load_scenario(args.scenario.as_ref())?;
    let report = scenario.run(&config);

    info!(
        line_count = report.line_count,
        start_line_number = report.lines.start_line_number,
        end_line_number = report.lines.end_line_number,
        "Scenario evaluated"
    );

    let json = if args.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .map_err(AppError::from)?;

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}").map_err(AppError::from)?;

    Ok(())
}
