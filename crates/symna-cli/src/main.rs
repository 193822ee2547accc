//! symna command-line interface.

mod report;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use log::info;
use symna::{SimulationConfig, SolverConfig};

use crate::report::{Notation, Report, Request};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "symna")]
#[command(about = "Symbolic Modified Nodal Analysis of linear circuits", long_about = None)]
#[command(version)]
struct Cli {
    /// Input netlist file
    #[arg(value_name = "FILE")]
    netlist: PathBuf,

    /// Input node of the transfer function
    #[arg(short, long, requires = "output")]
    input: Option<String>,

    /// Output node of the transfer function
    #[arg(short, long, requires = "input")]
    output: Option<String>,

    /// Compute the unit-step response
    #[arg(long, requires = "input")]
    step: bool,

    /// Compute the frequency response
    #[arg(long, requires = "input")]
    bode: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Render expressions as LaTeX
    #[arg(long)]
    latex: bool,

    /// Add an equation fixing each current source's value
    #[arg(long)]
    pin_current_sources: bool,

    /// Samples of the step and frequency responses
    #[arg(long, value_name = "N")]
    points: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let output = run(&cli)?;
    io::stdout()
        .write_all(output.as_bytes())
        .context("Failed to write output")?;
    Ok(())
}

fn run(cli: &Cli) -> Result<String> {
    let content = fs::read_to_string(&cli.netlist)
        .with_context(|| format!("Failed to read netlist: {}", cli.netlist.display()))?;

    let config = SolverConfig {
        pin_current_sources: cli.pin_current_sources,
    };
    let analysis = symna::build(&content, config)
        .with_context(|| format!("Failed to load {}", cli.netlist.display()))?;

    let mut simulation = SimulationConfig::default();
    if let Some(points) = cli.points {
        if points == 0 {
            bail!("--points must be positive");
        }
        simulation.step_points = points;
        simulation.frequency_points = points;
    }

    let request = Request {
        nodes: cli.input.clone().zip(cli.output.clone()),
        step: cli.step,
        bode: cli.bode,
        notation: if cli.latex {
            Notation::Latex
        } else {
            Notation::Plain
        },
        simulation,
    };
    let report = Report::collect(&analysis, &request).context("Analysis failed")?;
    info!(
        "{} equations, {} unknowns solved",
        report.equations.len(),
        report.solution.len()
    );

    match cli.format {
        Format::Text => Ok(report.to_text()),
        Format::Json => {
            let mut json = serde_json::to_string_pretty(&report).context("Failed to encode report")?;
            json.push('\n');
            Ok(json)
        }
    }
}
