/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};

use beeplan::catalog::Catalog;
use beeplan::config::PlannerConfig;
use beeplan::report::{write_validation_report, SolutionDocument};
use beeplan::scheduler::{Planner, Strategy};

// ── CLI argument definition ───────────────────────────────────────────────────

/// BeePlan course timetabling engine.
///
/// Example:
///   beeplan --data data/ --strategy heuristic \
///           --output schedule.json --report validation.txt
#[derive(Debug, Parser)]
#[command(
    name = "beeplan",
    about = "BeePlan course timetabling – backtracking and greedy solvers",
    long_about = None,
)]
struct Cli {
    /// Directory holding courses (or curriculum), instructors and rooms files.
    #[arg(short = 'd', long = "data")]
    data: PathBuf,

    /// Path to the YAML planner configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Solving strategy: heuristic or exhaustive.
    #[arg(short = 's', long = "strategy", default_value = "heuristic")]
    strategy: String,

    /// Schedule only these course codes (comma separated).
    #[arg(long = "only", value_delimiter = ',')]
    only: Vec<String>,

    /// Refuse exhaustive runs over more courses than this.
    #[arg(long = "max-exhaustive-courses")]
    max_exhaustive_courses: Option<usize>,

    /// Write the solution JSON here instead of stdout.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Write the validation report (one violation per line) here.
    #[arg(short = 'r', long = "report")]
    report: Option<PathBuf>,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    info!(
        data     = %cli.data.display(),
        config   = ?cli.config,
        strategy = %cli.strategy,
        only     = ?cli.only,
        "Configuration"
    );

    // ── Parse strategy ────────────────────────────────────────────────────────
    let strategy: Strategy = match cli.strategy.parse() {
        Ok(s) => s,
        Err(e) => {
            error!("{}", e);
            process::exit(1);
        }
    };

    // ── Load planner configuration ────────────────────────────────────────────
    let config = match &cli.config {
        Some(path) => match PlannerConfig::load_from_file(path) {
            Ok(c) => c,
            Err(e) => {
                error!("Failed to load planner configuration: {:#}", e);
                process::exit(1);
            }
        },
        None => {
            warn!("No configuration file provided, using the default weekday calendar");
            PlannerConfig::new()
        }
    };

    // ── Load catalog ──────────────────────────────────────────────────────────
    let mut catalog = match Catalog::load_dir(&cli.data) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load catalog: {:#}", e);
            process::exit(1);
        }
    };

    if !cli.only.is_empty() {
        let missing = catalog.select_courses(&cli.only);
        for code in &missing {
            warn!(code = %code, "selected course not in catalog");
        }
        info!("Scheduling {} selected course(s)", catalog.courses.len());
    }

    // ── Plan ──────────────────────────────────────────────────────────────────
    let mut planner = Planner::new(Arc::new(config));
    if let Some(limit) = cli.max_exhaustive_courses {
        planner = planner.with_exhaustive_limit(limit);
    }

    let solution = match planner.plan(&catalog, strategy) {
        Ok(s) => s,
        Err(e) => {
            error!("Planning failed: {}", e);
            process::exit(1);
        }
    };

    for violation in &solution.violations {
        info!("  {}", violation);
    }

    // ── Write outputs ─────────────────────────────────────────────────────────
    let document = SolutionDocument::new(strategy, &solution);
    let written = match &cli.output {
        Some(path) => document.write_to(path),
        None => document.to_json().map(|json| println!("{}", json)),
    };
    if let Err(e) = written {
        error!("{:#}", e);
        process::exit(1);
    }

    if let Some(path) = &cli.report {
        if let Err(e) = write_validation_report(path, &solution.violations) {
            error!("{:#}", e);
            process::exit(1);
        }
    }
}
