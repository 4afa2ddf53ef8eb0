//! aoc2020 - Command-line interface for running the Advent of Code 2020 solvers

mod cli;
mod config;
mod error;
mod inputs;
mod output;
mod runner;

// Import aoc-2020 to link the solver plugins
use aoc_2020 as _;

use aoc_framework::{RegistryBuilder, SolverError, SolverRegistry};
use clap::Parser;
use cli::Args;
use config::Config;
use error::CliError;
use log::LevelFilter;
use output::OutputFormatter;
use runner::Runner;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let config = Config::from_args(args)?;
    init_logging(config.log_level)?;

    // Build registry with tag filtering (only once)
    let registry = build_registry(&config.tags)?;
    log::info!("{} solver(s) registered", registry.len());
    if let Some(day) = config.day_filter
        && !registry.contains(day)
    {
        return Err(SolverError::NotFound(day).into());
    }

    let explicit_input = config
        .input_file
        .as_deref()
        .map(inputs::read_input_file)
        .transpose()?;
    let runner = Runner::new(registry, &config, explicit_input);

    let work_items = runner.collect_work_items();
    if work_items.is_empty() {
        println!("No solvers found matching the specified filters.");
        return Ok(());
    }
    let missing = runner.missing_inputs(&work_items);
    for (day, path) in &missing {
        log::warn!("day {:02}: no input at {}", day, path.display());
    }
    let work_items = runner.skip_missing(work_items, &missing);
    if work_items.is_empty() {
        println!("No input files found in {}.", config.input_dir.display());
        return Ok(());
    }

    let formatter = OutputFormatter::new(config.quiet);
    formatter.print_header(work_items.len());
    let mut results = Vec::new();
    runner.execute(&work_items, |result| {
        formatter.print_result(&result);
        results.push(result);
    });
    formatter.print_summary(&results);

    runner::into_outcome(results)?;
    Ok(())
}

/// Log to stderr so answers on stdout stay clean
fn init_logging(level: LevelFilter) -> Result<(), CliError> {
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;
    Ok(())
}

/// Build registry with tag filtering
fn build_registry(tags: &[String]) -> Result<SolverRegistry, CliError> {
    let builder = RegistryBuilder::new();

    let builder = if tags.is_empty() {
        builder.register_all_plugins()?
    } else {
        builder.register_solver_plugins(|plugin| {
            tags.iter().all(|tag| plugin.tags.contains(&tag.as_str()))
        })?
    };

    Ok(builder.build())
}
