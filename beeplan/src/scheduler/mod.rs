//! Course timetabling engine.
//!
//! [`Planner`] runs one of two solving strategies over a read-only
//! [`Catalog`] and returns a [`Solution`]: the filled [`ScheduleGrid`], the
//! violation list, and whether every course was placed.
//!
//! | Strategy | Solver | On failure |
//! |---|---|---|
//! | `exhaustive` | [`ExhaustiveSolver`], backtracking, first full assignment wins | `complete = false`, empty grid, no violations |
//! | `heuristic` | [`HeuristicSolver`], two greedy phases, never backtracks | partial grid plus one violation per unplaced course |
//!
//! Both solvers are stateless between runs: every call builds its own grid.
//!
//! # Example
//! ```rust,ignore
//! let planner = Planner::new(Arc::new(PlannerConfig::new())).with_exhaustive_limit(30);
//! let solution = planner.plan_named(&catalog, "heuristic")?;
//! ```

pub mod constraints;
pub mod error;
pub mod exhaustive;
pub mod heuristic;
pub mod soft;
pub mod violation;

pub use constraints::ConstraintChecker;
pub use error::{Conflict, SchedulerError};
pub use exhaustive::{ExhaustiveSolver, SearchOutcome, SearchStats};
pub use heuristic::HeuristicSolver;
pub use violation::{Violation, ViolationCategory};

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::config::PlannerConfig;
use crate::grid::ScheduleGrid;

// ── Solver interface ──────────────────────────────────────────────────────────

/// What every solving strategy returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub grid: ScheduleGrid,
    /// Diagnostics in discovery order.  Always empty for the exhaustive
    /// solver.
    pub violations: Vec<Violation>,
    /// `true` when every course in the catalog was placed.
    pub complete: bool,
}

/// A timetabling strategy.
pub trait Solver {
    fn name(&self) -> &'static str;

    fn solve(&self, catalog: &Catalog) -> Solution;
}

// ── Strategy selection ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    Exhaustive,
    #[default]
    Heuristic,
}

impl FromStr for Strategy {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exhaustive" => Ok(Strategy::Exhaustive),
            "heuristic" => Ok(Strategy::Heuristic),
            _ => Err(SchedulerError::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Exhaustive => write!(f, "exhaustive"),
            Strategy::Heuristic => write!(f, "heuristic"),
        }
    }
}

// ── Planner ───────────────────────────────────────────────────────────────────

/// Entry point of the engine.
///
/// Holds the shared configuration; all per-run state lives inside the solver
/// call, so one planner can serve any number of runs.
pub struct Planner {
    config: Arc<PlannerConfig>,
    /// Largest catalog the exhaustive strategy accepts.  `None` = unbounded.
    exhaustive_limit: Option<usize>,
}

impl Planner {
    pub fn new(config: Arc<PlannerConfig>) -> Self {
        Self {
            config,
            exhaustive_limit: None,
        }
    }

    /// Refuse exhaustive runs over more than `limit` courses.
    pub fn with_exhaustive_limit(mut self, limit: usize) -> Self {
        self.exhaustive_limit = Some(limit);
        self
    }

    /// Build the solver for `strategy`.
    pub fn solver_for(&self, strategy: Strategy) -> Box<dyn Solver> {
        match strategy {
            Strategy::Exhaustive => Box::new(ExhaustiveSolver::new(self.config.calendar.clone())),
            Strategy::Heuristic => Box::new(HeuristicSolver::new(Arc::clone(&self.config))),
        }
    }

    /// Run `strategy` over `catalog`.
    ///
    /// An incomplete schedule is not an error; check
    /// [`Solution::complete`].
    ///
    /// # Errors
    /// [`SchedulerError::TooManyCourses`] when the exhaustive strategy is
    /// asked to handle more courses than the configured limit.
    pub fn plan(&self, catalog: &Catalog, strategy: Strategy) -> Result<Solution, SchedulerError> {
        if strategy == Strategy::Exhaustive {
            if let Some(limit) = self.exhaustive_limit {
                if catalog.courses.len() > limit {
                    return Err(SchedulerError::TooManyCourses {
                        count: catalog.courses.len(),
                        limit,
                    });
                }
            }
        }

        let solver = self.solver_for(strategy);

        info!(
            strategy = solver.name(),
            courses = catalog.courses.len(),
            instructors = catalog.instructors.len(),
            rooms = catalog.rooms.len(),
            "=== Planner::plan() ==="
        );

        let solution = solver.solve(catalog);

        if solution.complete {
            info!(
                placed = solution.grid.placements().len(),
                "=== Planning complete ==="
            );
        } else {
            warn!(
                placed = solution.grid.placements().len(),
                violations = solution.violations.len(),
                "=== Planning finished with unplaced courses ==="
            );
        }

        Ok(solution)
    }

    /// [`plan`](Self::plan) with the strategy given by name.
    pub fn plan_named(&self, catalog: &Catalog, strategy: &str) -> Result<Solution, SchedulerError> {
        self.plan(catalog, strategy.parse()?)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
