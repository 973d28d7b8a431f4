/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Depth-first backtracking over `(day, hour, room)` triples.
//!
//! Course *i* is tried against every candidate in a fixed order (days outer,
//! hours middle, rooms inner).  The first candidate whose whole
//! `duration` block passes the [`ConstraintChecker`] is placed and the search
//! moves on to course *i + 1*; if that level runs dry, the placement of
//! course *i* is undone and its next candidate is tried.  The first complete
//! assignment wins.
//!
//! The recursion lives on an explicit stack of [`ChoicePoint`]s rather than
//! the call stack, so depth is bounded by the course count in heap memory
//! and the loop has one obvious place to poll for cancellation later.
//!
//! # Complexity
//! Worst case `(days × hours × rooms)^courses`.  There is no memoization and
//! no time limit; callers bound the input size (see
//! [`Planner::with_exhaustive_limit`](super::Planner::with_exhaustive_limit)).

use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::config::Calendar;
use crate::grid::{Occupant, Placement, ScheduleGrid};

use super::constraints::ConstraintChecker;
use super::{Solution, Solver};

// ── Search bookkeeping ────────────────────────────────────────────────────────

/// One level of the search: which course, where to resume, and what is
/// currently placed for it.
#[derive(Debug, Clone, Copy)]
struct ChoicePoint {
    course: usize,
    /// Flat index of the next candidate to try.
    next: usize,
    /// Placement made at this level, undone before trying `next`.
    placed: Option<Placement>,
}

impl ChoicePoint {
    fn new(course: usize) -> Self {
        Self {
            course,
            next: 0,
            placed: None,
        }
    }
}

/// Counters collected during one search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Placements made (accepted candidates).
    pub nodes: u64,
    /// Placements undone.
    pub backtracks: u64,
    /// Deepest stack level reached.
    pub max_depth: usize,
}

impl std::fmt::Display for SearchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} placements, {} backtracks, depth {}",
            self.nodes, self.backtracks, self.max_depth
        )
    }
}

/// Result of [`ExhaustiveSolver::search`].
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub grid: ScheduleGrid,
    pub success: bool,
    pub stats: SearchStats,
}

// ── ExhaustiveSolver ──────────────────────────────────────────────────────────

pub struct ExhaustiveSolver {
    calendar: Calendar,
}

impl ExhaustiveSolver {
    pub fn new(calendar: Calendar) -> Self {
        Self { calendar }
    }

    /// Place every course or report failure.
    ///
    /// On failure the grid is returned empty; there is no per-course
    /// diagnostic.
    pub fn solve(&self, catalog: &Catalog) -> (ScheduleGrid, bool) {
        let outcome = self.search(catalog);
        (outcome.grid, outcome.success)
    }

    /// [`solve`](Self::solve) plus search statistics.
    pub fn search(&self, catalog: &Catalog) -> SearchOutcome {
        let courses = &catalog.courses;
        let mut grid = ScheduleGrid::new(&self.calendar, &catalog.rooms);
        let mut stats = SearchStats::default();

        info!(
            courses = courses.len(),
            days = grid.day_count(),
            hours = grid.hour_count(),
            rooms = grid.room_count(),
            "=== ExhaustiveSolver::search() ==="
        );

        if courses.is_empty() {
            return SearchOutcome {
                grid,
                success: true,
                stats,
            };
        }

        let rooms = grid.room_count();
        let hours = grid.hour_count();
        let candidates = grid.day_count() * hours * rooms;
        let decode = |c: usize, duration: usize| {
            Placement::new(c / (hours * rooms), (c / rooms) % hours, c % rooms, duration)
        };

        let mut stack: Vec<ChoicePoint> = Vec::with_capacity(courses.len());
        stack.push(ChoicePoint::new(0));
        stats.max_depth = 1;

        while let Some(top) = stack.last_mut() {
            // Resumed after the deeper level failed: undo and move on.
            if let Some(prev) = top.placed.take() {
                grid.remove(&prev);
                stats.backtracks += 1;
            }

            let course = &courses[top.course];
            let found = (top.next..candidates).find_map(|c| {
                let p = decode(c, course.duration);
                ConstraintChecker::fits_block(course, &p, &grid).then_some((c, p))
            });

            match found {
                Some((c, placement)) => {
                    grid.place(&placement, Occupant::new(course, grid.room(placement.room)));
                    top.next = c + 1;
                    top.placed = Some(placement);
                    stats.nodes += 1;
                    let next_course = top.course + 1;

                    debug!(
                        course = %course.code,
                        day = placement.day,
                        hour = placement.hour,
                        room = %grid.room(placement.room).name,
                        depth = next_course,
                        "tentative placement"
                    );

                    if next_course == courses.len() {
                        info!(%stats, "✓ complete assignment found");
                        return SearchOutcome {
                            grid,
                            success: true,
                            stats,
                        };
                    }
                    stack.push(ChoicePoint::new(next_course));
                    stats.max_depth = stats.max_depth.max(stack.len());
                }
                None => {
                    stack.pop();
                }
            }
        }

        info!(%stats, "✗ search space exhausted without a complete assignment");
        SearchOutcome {
            grid,
            success: false,
            stats,
        }
    }
}

impl Solver for ExhaustiveSolver {
    fn name(&self) -> &'static str {
        "exhaustive"
    }

    fn solve(&self, catalog: &Catalog) -> Solution {
        let (grid, complete) = ExhaustiveSolver::solve(self, catalog);
        Solution {
            grid,
            violations: Vec::new(),
            complete,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Course, Room, RoomKind};
    use std::collections::{HashMap, HashSet};

    // ── Test helpers ──────────────────────────────────────────────────────────

    fn calendar(hours: &[&str]) -> Calendar {
        Calendar::new(
            vec!["Mon".into(), "Tue".into()],
            hours.iter().map(|h| h.to_string()).collect(),
            vec![],
        )
        .unwrap()
    }

    fn one_day(hours: &[&str]) -> Calendar {
        Calendar::new(
            vec!["Mon".into()],
            hours.iter().map(|h| h.to_string()).collect(),
            vec![],
        )
        .unwrap()
    }

    fn room(name: &str, kind: RoomKind, capacity: Option<u32>) -> Room {
        Room {
            name: name.into(),
            kind,
            capacity,
        }
    }

    fn course(code: &str, instructor: &str, duration: usize) -> Course {
        Course {
            code: code.into(),
            name: code.into(),
            instructor: Some(instructor.into()),
            duration,
            ..Default::default()
        }
    }

    fn mixed_catalog() -> Catalog {
        let mut courses = vec![
            course("CS101", "Dr.A", 2),
            course("CS102", "Dr.A", 1),
            course("CS201", "Dr.B", 3),
            course("CS202", "Dr.B", 1),
            course("CS301", "Dr.C", 2),
            course("CS102L", "Dr.A", 2),
        ];
        courses[0].year = Some(1);
        courses[1].year = Some(1);
        courses[2].year = Some(2);
        courses[3].year = Some(2);
        courses[5].is_lab = true;
        courses[5].student_count = Some(25);
        Catalog::new(
            courses,
            vec![],
            vec![
                room("R1", RoomKind::Theory, Some(40)),
                room("R2", RoomKind::Theory, None),
                room("L1", RoomKind::Lab, Some(30)),
            ],
        )
    }

    // ── Basic behaviour ───────────────────────────────────────────────────────

    #[test]
    fn single_course_goes_to_first_candidate() {
        let catalog = Catalog::new(
            vec![course("CS101", "Dr.A", 1)],
            vec![],
            vec![room("R1", RoomKind::Theory, Some(30))],
        );
        let (grid, ok) = ExhaustiveSolver::new(calendar(&["09", "10"])).solve(&catalog);
        assert!(ok);
        assert_eq!(grid.occupant(0, 0, 0).unwrap().course, "CS101");
        assert_eq!(grid.occupied_cells(), 1);
    }

    #[test]
    fn empty_catalog_succeeds_trivially() {
        let (grid, ok) = ExhaustiveSolver::new(calendar(&["09"])).solve(&Catalog::default());
        assert!(ok);
        assert_eq!(grid.occupied_cells(), 0);
    }

    #[test]
    fn no_rooms_fails() {
        let catalog = Catalog::new(vec![course("CS101", "Dr.A", 1)], vec![], vec![]);
        let (_, ok) = ExhaustiveSolver::new(calendar(&["09"])).solve(&catalog);
        assert!(!ok);
    }

    #[test]
    fn backtracks_out_of_a_blocking_first_choice() {
        // A lands in the big room first, which is the only room that can
        // seat B.  The search must move A to the small room.
        let mut a = course("A", "X", 2);
        a.student_count = Some(20);
        let mut b = course("B", "Y", 2);
        b.student_count = Some(80);
        let catalog = Catalog::new(
            vec![a, b],
            vec![],
            vec![
                room("BIG", RoomKind::Theory, Some(100)),
                room("SMALL", RoomKind::Theory, Some(30)),
            ],
        );

        let outcome = ExhaustiveSolver::new(one_day(&["09", "10"])).search(&catalog);
        assert!(outcome.success);
        assert_eq!(outcome.stats.backtracks, 1);
        assert_eq!(outcome.stats.nodes, 3);
        assert_eq!(outcome.stats.max_depth, 2);
        assert_eq!(outcome.grid.occupant(0, 0, 1).unwrap().course, "A");
        assert_eq!(outcome.grid.occupant(0, 1, 1).unwrap().course, "A");
        assert_eq!(outcome.grid.occupant(0, 0, 0).unwrap().course, "B");
    }

    #[test]
    fn infeasible_catalog_returns_false_and_empty_grid() {
        let catalog = Catalog::new(
            vec![course("A", "X", 2), course("B", "Y", 1)],
            vec![],
            vec![room("R1", RoomKind::Theory, None)],
        );
        let outcome = ExhaustiveSolver::new(one_day(&["09", "10"])).search(&catalog);
        assert!(!outcome.success);
        assert_eq!(outcome.grid.occupied_cells(), 0, "every placement undone");
        assert!(outcome.stats.backtracks >= 1);
    }

    #[test]
    fn course_longer_than_the_day_is_never_placed() {
        let catalog = Catalog::new(
            vec![course("A", "X", 3)],
            vec![],
            vec![room("R1", RoomKind::Theory, None)],
        );
        let (_, ok) = ExhaustiveSolver::new(calendar(&["09", "10"])).solve(&catalog);
        assert!(!ok);
    }

    // ── Laws ──────────────────────────────────────────────────────────────────

    #[test]
    fn result_respects_hard_constraints() {
        let catalog = mixed_catalog();
        let cal = calendar(&["09", "10", "11", "12"]);
        let (grid, ok) = ExhaustiveSolver::new(cal.clone()).solve(&catalog);
        assert!(ok);

        // Each course placed exactly once with its full duration.
        let placed = grid.placements();
        let mut seen = HashSet::new();
        for p in &placed {
            let c = catalog.course(&p.course).unwrap();
            assert!(seen.insert(p.course.clone()), "{} placed twice", p.course);
            assert_eq!(p.span, c.duration, "duration law for {}", p.course);
            assert!(p.placement.hour + c.duration <= cal.hour_count());
            // Room-type law
            assert_eq!(grid.room(p.placement.room).kind, c.room_kind());
        }
        assert_eq!(seen.len(), catalog.courses.len());

        // Instructor and year never doubled in a slot.
        for d in 0..grid.day_count() {
            for h in 0..grid.hour_count() {
                let mut instructors = HashSet::new();
                let mut years: HashMap<u32, &str> = HashMap::new();
                for occ in grid.slot_occupants(d, h) {
                    if let Some(i) = &occ.instructor {
                        assert!(instructors.insert(i.clone()), "instructor {i} doubled");
                    }
                    if let Some(y) = occ.year {
                        assert!(years.insert(y, &occ.course).is_none(), "year {y} doubled");
                    }
                }
            }
        }
    }

    #[test]
    fn identical_inputs_give_identical_grids() {
        let catalog = mixed_catalog();
        let cal = calendar(&["09", "10", "11", "12"]);
        let reference = ExhaustiveSolver::new(cal.clone()).solve(&catalog);
        for _ in 0..10 {
            let again = ExhaustiveSolver::new(cal.clone()).solve(&catalog);
            assert_eq!(again, reference);
        }
    }

    #[test]
    fn lab_course_lands_in_lab_room() {
        let mut lab = course("L", "X", 1);
        lab.is_lab = true;
        let catalog = Catalog::new(
            vec![lab],
            vec![],
            vec![
                room("R1", RoomKind::Theory, None),
                room("L1", RoomKind::Lab, None),
            ],
        );
        let (grid, ok) = ExhaustiveSolver::new(calendar(&["09"])).solve(&catalog);
        assert!(ok);
        assert!(grid.occupant(0, 0, 0).is_none());
        assert_eq!(grid.occupant(0, 0, 1).unwrap().course, "L");
    }

    #[test]
    fn solver_trait_reports_no_violations() {
        let catalog = mixed_catalog();
        let solver = ExhaustiveSolver::new(calendar(&["09", "10", "11", "12"]));
        let solution = Solver::solve(&solver, &catalog);
        assert!(solution.complete);
        assert!(solution.violations.is_empty());
        assert_eq!(solver.name(), "exhaustive");
    }
}
