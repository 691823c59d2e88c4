//! roster CLI - Staff Roster Optimizer
//!
//! Command-line interface for optimizing, generating and checking weekly rosters.

mod config;
mod report;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use roster_core::source::InMemorySource;
use roster_core::wire::{GenerateRequest, OptimizeRequest, OptimizeResponse};
use roster_core::{RosterProblem, SlotId, StaffId};
use roster_solver::options::MAX_SECONDS_ENV;
use roster_solver::{model, objective, RosterOptimizer, SolverOptions};

use crate::report::ExitCode;

#[derive(Parser)]
#[command(name = "roster")]
#[command(author, version, about = "Staff roster optimizer", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Solver configuration file (TOML)
    #[arg(long, global = true, env = "ROSTER_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Time bound per solve in seconds (overrides MAX_SOLVER_SECONDS)
    #[arg(long, global = true, value_name = "SECONDS")]
    max_seconds: Option<f64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Optimize one or more roster requests (solved in parallel)
    Optimize {
        /// Request files (JSON)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,

        /// Exit with failure when a slot stays unfilled
        #[arg(long)]
        strict: bool,
    },

    /// Generate a venue's week from a store file and optimize it
    Generate {
        /// Store file (JSON)
        #[arg(long, value_name = "FILE")]
        store: PathBuf,

        /// Venue id
        #[arg(long)]
        venue: String,

        /// Monday of the week (YYYY-MM-DD)
        #[arg(long, value_name = "DATE")]
        week_start: NaiveDate,

        /// Locked assignments, a JSON object of slot id to staff id
        #[arg(long, value_name = "FILE")]
        locks: Option<PathBuf>,

        /// Last approved assignments, a JSON object of slot id to staff id
        #[arg(long, value_name = "FILE")]
        approved: Option<PathBuf>,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pretty-print JSON
        #[arg(long)]
        pretty: bool,

        /// Exit with failure when a slot stays unfilled
        #[arg(long)]
        strict: bool,
    },

    /// Validate a request file and report the model without solving
    Check {
        /// Request file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .init();

    match run(cli) {
        Ok(code) => code.into(),
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::Failure.into()
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let env_seconds = std::env::var(MAX_SECONDS_ENV).ok();
    let options = config::load_options(cli.config.as_deref(), env_seconds.as_deref(), cli.max_seconds)?;

    match cli.command {
        Commands::Optimize {
            files,
            output,
            pretty,
            strict,
        } => cmd_optimize(options, &files, output.as_deref(), pretty, strict),
        Commands::Generate {
            store,
            venue,
            week_start,
            locks,
            approved,
            output,
            pretty,
            strict,
        } => {
            let mut request = GenerateRequest::new(venue, week_start);
            if let Some(path) = locks {
                request.locked_assignments = read_assignment_map(&path)?;
            }
            if let Some(path) = approved {
                request.last_approved_assignments = read_assignment_map(&path)?;
            }
            cmd_generate(options, &store, &request, output.as_deref(), pretty, strict)
        }
        Commands::Check { file } => cmd_check(&options, &file),
    }
}

fn read_problem(path: &Path) -> Result<RosterProblem> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let request: OptimizeRequest = serde_json::from_str(&text)
        .with_context(|| format!("malformed request in {}", path.display()))?;
    request
        .into_problem()
        .with_context(|| format!("invalid request in {}", path.display()))
}

fn read_assignment_map(path: &Path) -> Result<BTreeMap<SlotId, StaffId>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("expected an object of slot id to staff id in {}", path.display()))
}

fn write_json<T: Serialize>(value: &T, output: Option<&Path>, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    match output {
        Some(path) => std::fs::write(path, json + "\n")
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

/// One file of a batch run
#[derive(Serialize)]
struct BatchEntry {
    file: String,
    #[serde(flatten)]
    response: Option<OptimizeResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

fn cmd_optimize(
    options: SolverOptions,
    files: &[PathBuf],
    output: Option<&Path>,
    pretty: bool,
    strict: bool,
) -> Result<ExitCode> {
    let optimizer = RosterOptimizer::with_options(options);

    if let [file] = files {
        let problem = read_problem(file)?;
        let outcome = optimizer.optimize(&problem)?;
        eprint!("{}", report::render_summary(&file.display().to_string(), &outcome));
        write_json(&OptimizeResponse::from(&outcome), output, pretty)?;
        return Ok(ExitCode::from_outcome(&outcome, strict));
    }

    // Unreadable files are reported per entry; the rest are solved together
    let parsed: Vec<Result<RosterProblem>> = files.iter().map(|f| read_problem(f)).collect();
    let problems: Vec<RosterProblem> = parsed.iter().filter_map(|p| p.as_ref().ok().cloned()).collect();
    let mut solved = optimizer.optimize_batch(&problems).into_iter();

    let mut code = ExitCode::Success;
    let mut entries = Vec::with_capacity(files.len());
    for (file, problem) in files.iter().zip(parsed) {
        let label = file.display().to_string();
        let result = match problem {
            Ok(_) => solved
                .next()
                .context("batch returned fewer results than problems")?
                .map_err(anyhow::Error::from),
            Err(err) => Err(err),
        };
        let entry = match result {
            Ok(outcome) => {
                eprint!("{}", report::render_summary(&label, &outcome));
                code = code.combine(ExitCode::from_outcome(&outcome, strict));
                BatchEntry {
                    file: label,
                    response: Some(OptimizeResponse::from(&outcome)),
                    error: None,
                }
            }
            Err(err) => {
                eprintln!("{label}: error: {err:#}");
                code = ExitCode::Failure;
                BatchEntry {
                    file: label,
                    response: None,
                    error: Some(format!("{err:#}")),
                }
            }
        };
        entries.push(entry);
    }

    write_json(&entries, output, pretty)?;
    Ok(code)
}

fn cmd_generate(
    options: SolverOptions,
    store: &Path,
    request: &GenerateRequest,
    output: Option<&Path>,
    pretty: bool,
    strict: bool,
) -> Result<ExitCode> {
    let source = InMemorySource::from_path(store)
        .with_context(|| format!("failed to load store {}", store.display()))?;
    let optimizer = RosterOptimizer::with_options(options);

    let roster = optimizer.generate(&source, request)?;
    let label = format!("{} week of {}", roster.venue_id, roster.week_start);
    eprint!("{}", report::render_summary(&label, &roster.outcome));

    write_json(&roster.to_response(), output, pretty)?;
    Ok(ExitCode::from_outcome(&roster.outcome, strict))
}

fn cmd_check(options: &SolverOptions, file: &Path) -> Result<ExitCode> {
    let problem = read_problem(file)?;

    let (mut model, mut issues) = model::build_model(&problem, options);
    let (_, prior_issues) = objective::compose(&mut model, &problem, &options.weights)?;
    issues.extend(prior_issues);

    print!("{}", report::render_check(&file.display().to_string(), &problem, &model, &issues));
    Ok(ExitCode::Success)
}
