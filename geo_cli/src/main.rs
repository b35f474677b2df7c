//! # Shaftline CLI
//!
//! Command-line front end for `geo_core`: stresses at a depth, static pile
//! capacity, and the H-pile section table, all driven by JSON analysis files.
//!
//! Logging goes to stderr and is controlled with `RUST_LOG` (default `info`).

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use geo_core::calculations::CapacityMethod;
use geo_core::soil::StressValue;
use geo_core::tables::hpile;
use geo_core::units::Dimension;
use geo_core::{
    load_analysis, save_json, AnalysisInput, CalcResult, CapacityResult, Project, StressKind, UnitSystem,
};

const BIN_NAME: &str = "shaftline";

const RULE: &str = "═══════════════════════════════════════";

#[derive(Parser)]
#[command(name = BIN_NAME, version, about = "Soil stress and pile capacity calculator", long_about = None)]
struct Cli {
    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stress at a depth below grade
    Stress {
        /// Analysis file (JSON)
        file: PathBuf,

        /// Depth from grade (ft or m, negative above grade offshore)
        #[arg(short, long, allow_negative_numbers = true)]
        depth: f64,

        /// total, pore-water, effective or all
        #[arg(short, long, default_value = "effective")]
        kind: StressKind,
    },

    /// Axial capacity of the pile in the analysis file
    Capacity {
        /// Analysis file (JSON)
        file: PathBuf,

        /// Override the method named in the file (api or olson90)
        #[arg(short, long)]
        method: Option<CapacityMethod>,

        /// Also write the full result to this JSON file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the soil profile
    Layers {
        /// Analysis file (JSON)
        file: PathBuf,
    },

    /// List the tabulated H-pile sections
    Hpiles {
        /// Show metric (cm, cm²) properties
        #[arg(long)]
        metric: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command, cli.json) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(code = e.error_code(), "{}", e);
            if e.is_validation() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(command: Commands, json: bool) -> CalcResult<()> {
    match command {
        Commands::Stress { file, depth, kind } => stress(&file, depth, kind, json),
        Commands::Capacity { file, method, output } => capacity(&file, method, output.as_deref(), json),
        Commands::Layers { file } => {
            let profile = load_analysis(&file)?.build_profile()?;
            if json {
                print_json(&profile)
            } else {
                println!("{}", profile);
                Ok(())
            }
        }
        Commands::Hpiles { metric } => {
            let system = if metric { UnitSystem::Metric } else { UnitSystem::Imperial };
            let sections = hpile::names()
                .into_iter()
                .map(|name| hpile::lookup(name, system))
                .collect::<CalcResult<Vec<_>>>()?;
            if json {
                return print_json(&sections);
            }
            println!(
                "{:<10} {:>8} {:>10} {:>10} {:>10} {:>8}",
                "Section", "Area", "Perimeter", "Box area", "Box perim", "Depth"
            );
            for s in sections {
                println!(
                    "{:<10} {:>8.2} {:>10.2} {:>10.2} {:>10.2} {:>8.2}",
                    s.name, s.area, s.perimeter, s.box_area, s.box_perimeter, s.depth
                );
            }
            Ok(())
        }
    }
}

fn stress(file: &Path, depth: f64, kind: StressKind, json: bool) -> CalcResult<()> {
    let profile = load_analysis(file)?.build_profile()?;
    let value = profile.calculate_stress(depth, kind)?;
    if json {
        return print_json(&value);
    }

    let unit = profile.unit_system().unit(Dimension::Length);
    println!("{}", RULE);
    println!("  STRESS AT {} {}", depth, unit);
    println!("{}", RULE);
    match value {
        StressValue::Single(q) => println!("  {:<12} {:.4}", format!("{:?}:", kind), q),
        StressValue::All(s) => {
            println!("  {:<12} {:.4}", "Total:", s.total);
            println!("  {:<12} {:.4}", "Pore water:", s.pore_water);
            println!("  {:<12} {:.4}", "Effective:", s.effective);
        }
    }
    Ok(())
}

fn capacity(file: &Path, method: Option<CapacityMethod>, output: Option<&Path>, json: bool) -> CalcResult<()> {
    let input = load_analysis(file)?;
    let method = method.unwrap_or(input.method);
    info!(file = %file.display(), method = method.display_name(), "running capacity analysis");

    let project = input.build_project()?;
    let result = method.run(&project)?;

    if let Some(path) = output {
        save_json(&result, path)?;
        info!(path = %path.display(), "result written");
    }

    if json {
        print_json(&result)
    } else {
        print_capacity(&input, &project, &result);
        Ok(())
    }
}

fn print_capacity(input: &AnalysisInput, project: &Project, result: &CapacityResult) {
    let force = result.capacity().unit();
    println!("{}", RULE);
    println!("  PILE CAPACITY - {}", result.method.display_name().to_uppercase());
    println!("{}", RULE);
    println!();
    println!("{}", project);
    println!();
    println!(
        "{:>8} {:<11} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "z", "Density", "Shaft out", "Shaft in", "Toe plug", "Toe open", "Plugged", "Unplugged"
    );
    for r in &result.rows {
        println!(
            "{:>8.2} {:<11} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>10.2}",
            r.z,
            r.density.map_or("-", |d| d.display_name()),
            r.shaft_out,
            r.shaft_in,
            r.toe_plugged,
            r.toe_unplugged,
            r.total_plugged,
            r.total_unplugged
        );
    }
    println!();
    println!("{}", RULE);
    println!("  Plugged max:   {:.2} {}", result.plugged_max, force);
    if project.pile().is_open_ended() {
        println!("  Unplugged max: {:.2} {}", result.unplugged_max, force);
    }
    println!(
        "  CAPACITY:      {:.2} ({})",
        result.capacity(),
        if result.plugged { "plugged" } else { "unplugged" }
    );
    let length = project.unit_system().unit(Dimension::Length);
    println!("  Water table:   {} {}", input.water_table, length);
    println!("{}", RULE);
}

fn print_json<T: Serialize>(value: &T) -> CalcResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
