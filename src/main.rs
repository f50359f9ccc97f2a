mod analysis;
mod conditions;
mod report;

use analysis::{run_analysis, AnalysisSummary};
use clap::{Parser, ValueEnum};
use conditions::Problem;
use report::render_summary;
use serde::Serialize;
use std::error::Error;
use tracing_subscriber::EnvFilter;
use truss2d::TrussView;

/// Output formats understood by the CLI.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Human readable report.
    #[default]
    Text,
    /// Results plus plotting geometry as JSON.
    Json,
}

#[derive(Parser)]
#[command(name = "truss2d")]
#[command(version, about = "Direct stiffness analysis of planar trusses")]
struct Cli {
    /// Built-in problem to solve.
    #[arg(short, long, value_enum, default_value_t = Problem::Triangle)]
    problem: Problem,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Deformed-shape magnification as a percentage of the longest element.
    #[arg(short, long, default_value_t = 200)]
    magnification: u32,
}

/// JSON document combining results and plotting geometry.
#[derive(Serialize)]
struct JsonOutput {
    /// Analysis results.
    summary: AnalysisSummary,
    /// Geometry for a renderer.
    view: TrussView,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Supports and loads are part of each built-in problem. A planar truss
    // needs at least three independent restraints to be solvable, see
    // https://en.wikipedia.org/wiki/Statically_determinate.
    let mut truss = cli.problem.build()?;

    // Solve, then recover stresses and reactions from the displacements.
    let summary = run_analysis(&mut truss)?;

    match cli.format {
        Format::Text => println!("{}", render_summary(&summary)),
        Format::Json => {
            let output = JsonOutput {
                summary,
                view: TrussView::capture(&truss, cli.magnification),
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
