/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Two-phase greedy timetabling.
//!
//! Phase 1 places theory courses in input order at the first acceptable
//! `(day, hour)`.  Phase 2 places each lab one or two slots after the start
//! of its linked theory course.  Nothing is ever moved once placed; a course
//! that finds no spot is left out and reported as a [`Violation`].
//!
//! # Slot acceptance (phase 1)
//! * every covered hour is in the instructor's availability and outside the
//!   exam block of the last day;
//! * the instructor's theory hours that day, *including this course's whole
//!   duration*, stay within the daily cap (`placed + duration <= cap`).  A
//!   course longer than the cap is therefore never placed, even on an empty
//!   day;
//! * the slot is empty ([`SlotSharing::Exclusive`]), or, with
//!   [`SlotSharing::SoftRule`], the instructor is free and the soft rule
//!   accepts every current occupant;
//! * a theory room that seats the course is free for every covered hour.
//!
//! A course that fails everywhere is reported with the furthest check any
//! candidate reached (see `Refusal`).

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Course, Instructor, Room, RoomKind};
use crate::config::{PlannerConfig, SlotSharing};
use crate::grid::{Occupant, Placement, ScheduleGrid};

use super::constraints::ConstraintChecker;
use super::soft;
use super::violation::{Violation, ViolationCategory};
use super::{Solution, Solver};

// ── Constants ─────────────────────────────────────────────────────────────────

/// Largest lab room (in seats) the greedy solver assigns labs to.  Rooms with
/// unknown capacity qualify.
pub const LAB_ROOM_CAPACITY_CEILING: u32 = 40;

/// Slots after the theory start at which a lab may begin, in preference order.
const LAB_OFFSETS: [usize; 2] = [1, 2];

/// Theory hours already placed per `(instructor, day)`.
type DailyLoad<'a> = HashMap<(&'a str, usize), u32>;

/// Why phase 1 refused a theory course, ordered by how far the best
/// candidate got.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Refusal {
    /// No covered hour set was inside availability and outside the exam block.
    Unavailable,
    /// Every day with availability was already at the daily cap.
    DailyCap,
    /// Available hours existed but their slots were refused.
    SlotTaken,
    /// Slots were acceptable but no theory room seating the course was free.
    NoRoom,
}

// ── HeuristicSolver ───────────────────────────────────────────────────────────

pub struct HeuristicSolver {
    config: Arc<PlannerConfig>,
}

impl HeuristicSolver {
    pub fn new(config: Arc<PlannerConfig>) -> Self {
        Self { config }
    }

    /// Place what fits and report the rest.
    ///
    /// The returned grid always has every day/hour/room cell, however few
    /// are filled.  Violations are in discovery order: all theory courses
    /// first, then all labs.
    pub fn generate(&self, catalog: &Catalog) -> (ScheduleGrid, Vec<Violation>) {
        let mut grid = ScheduleGrid::new(&self.config.calendar, &catalog.rooms);
        let mut violations = Vec::new();
        let mut load = DailyLoad::new();

        info!(
            courses = catalog.courses.len(),
            slot_sharing = ?self.config.slot_sharing,
            "=== HeuristicSolver::generate() ==="
        );

        // ── Phase 1: theory ───────────────────────────────────────────────────
        for course in catalog.courses.iter().filter(|c| !c.is_lab) {
            match self.place_theory(course, catalog, &mut grid, &mut load) {
                Ok(p) => debug!(
                    course = %course.code,
                    day = %grid.calendar().days()[p.day],
                    hour = %grid.calendar().hours()[p.hour],
                    room = %grid.room(p.room).name,
                    "theory placed"
                ),
                Err(v) => {
                    warn!(violation = %v, "theory course left unplaced");
                    violations.push(v);
                }
            }
        }

        // ── Phase 2: labs ─────────────────────────────────────────────────────
        for course in catalog.courses.iter().filter(|c| c.is_lab) {
            match self.place_lab(course, &mut grid) {
                Ok(p) => debug!(
                    course = %course.code,
                    day = %grid.calendar().days()[p.day],
                    hour = %grid.calendar().hours()[p.hour],
                    room = %grid.room(p.room).name,
                    "lab placed"
                ),
                Err(v) => {
                    warn!(violation = %v, "lab left unplaced");
                    violations.push(v);
                }
            }
        }

        info!(
            placed = grid.placements().len(),
            violations = violations.len(),
            "=== Heuristic generation complete ==="
        );

        (grid, violations)
    }

    // ── Phase 1 ───────────────────────────────────────────────────────────────

    fn place_theory<'a>(
        &self,
        course: &'a Course,
        catalog: &Catalog,
        grid: &mut ScheduleGrid,
        load: &mut DailyLoad<'a>,
    ) -> Result<Placement, Violation> {
        let instructor = resolve_instructor(course, catalog)?;
        let key_name = course.instructor.as_deref().unwrap_or_default();
        let calendar = &self.config.calendar;
        let duration = course.duration;
        let hours = calendar.hour_count();
        let needed = u32::try_from(duration).unwrap_or(u32::MAX);

        let mut refusal = Refusal::Unavailable;

        for day in 0..calendar.day_count() {
            let over_cap = load
                .get(&(key_name, day))
                .copied()
                .unwrap_or(0)
                .saturating_add(needed)
                > instructor.max_daily_theory_hours;

            for hour in 0..hours {
                if hour + duration > hours {
                    break;
                }
                let placement_hours = hour..hour + duration;

                let allowed = placement_hours.clone().all(|h| {
                    instructor.is_available(&calendar.days()[day], &calendar.hours()[h])
                        && !calendar.is_exam_block(day, h)
                });
                if !allowed {
                    continue;
                }
                if over_cap {
                    refusal = refusal.max(Refusal::DailyCap);
                    break;
                }

                if !placement_hours
                    .clone()
                    .all(|h| self.slot_accepts(course, day, h, grid))
                {
                    refusal = refusal.max(Refusal::SlotTaken);
                    continue;
                }

                let Some(room) = first_free_room(grid, day, placement_hours, |r| {
                    r.kind == RoomKind::Theory && r.seats(course.student_count)
                }) else {
                    refusal = refusal.max(Refusal::NoRoom);
                    continue;
                };

                let placement = Placement::new(day, hour, room, duration);
                grid.place(&placement, Occupant::new(course, grid.room(room)));
                *load.entry((key_name, day)).or_insert(0) += needed;
                return Ok(placement);
            }
        }

        let detail = match refusal {
            Refusal::Unavailable => format!("(no available hour for {})", instructor.name),
            Refusal::DailyCap => format!(
                "(daily theory cap of {} hours reached for {})",
                instructor.max_daily_theory_hours, instructor.name
            ),
            Refusal::SlotTaken => format!("(every available slot for {} is taken)", instructor.name),
            Refusal::NoRoom => match course.student_count {
                Some(students) => format!("(no free theory room seats {} students)", students),
                None => String::from("(no free theory room)"),
            },
        };
        Err(Violation::new(
            ViolationCategory::NoSlotForTheory,
            course.code.as_str(),
            detail,
        ))
    }

    /// Whether the `(day, hour)` slot may take `course` under the current
    /// slot-sharing policy.  Room choice is separate.
    fn slot_accepts(&self, course: &Course, day: usize, hour: usize, grid: &ScheduleGrid) -> bool {
        match self.config.slot_sharing {
            SlotSharing::Exclusive => grid.is_slot_empty(day, hour),
            SlotSharing::SoftRule => {
                if let Err(conflict) = ConstraintChecker::check_instructor_free(course, day, hour, grid)
                {
                    debug!(course = %course.code, day, hour, %conflict, "slot refused");
                    return false;
                }
                grid.slot_occupants(day, hour).all(|occupant| {
                    match soft::check_co_placement(course, occupant, &self.config.soft_rules) {
                        Ok(()) => true,
                        Err(conflict) => {
                            debug!(course = %course.code, day, hour, %conflict, "soft rule refused slot");
                            false
                        }
                    }
                })
            }
        }
    }

    // ── Phase 2 ───────────────────────────────────────────────────────────────

    fn place_lab(&self, course: &Course, grid: &mut ScheduleGrid) -> Result<Placement, Violation> {
        let Some(theory) = course.linked_theory.as_deref() else {
            return Err(Violation::new(
                ViolationCategory::LabWithoutLinkedTheory,
                course.code.as_str(),
                "",
            ));
        };

        let Some((day, start)) = grid.find_course_start(theory) else {
            return Err(Violation::new(
                ViolationCategory::LabCannotFindTheorySlot,
                course.code.as_str(),
                format!("(theory {} is not placed)", theory),
            ));
        };

        let qualifies = |r: &Room| {
            r.kind == RoomKind::Lab && r.capacity.map_or(true, |c| c <= LAB_ROOM_CAPACITY_CEILING)
        };
        if !grid.rooms().iter().any(qualifies) {
            return Err(Violation::new(
                ViolationCategory::NoSlotForLabAfterTheory,
                course.code.as_str(),
                format!("(no lab room with at most {} seats)", LAB_ROOM_CAPACITY_CEILING),
            ));
        }

        let hours = grid.hour_count();
        for offset in LAB_OFFSETS {
            let hour = start + offset;
            if hour + course.duration > hours {
                continue;
            }
            let lab_hours = hour..hour + course.duration;

            let slots_ok = lab_hours.clone().all(|h| match self.config.slot_sharing {
                SlotSharing::Exclusive => grid.is_slot_empty(day, h),
                // Never alongside the theory it follows.
                SlotSharing::SoftRule => grid.slot_occupants(day, h).all(|o| o.course != theory),
            });
            if !slots_ok {
                continue;
            }

            if let Some(room) = first_free_room(grid, day, lab_hours, qualifies) {
                let placement = Placement::new(day, hour, room, course.duration);
                grid.place(&placement, Occupant::new(course, grid.room(room)));
                return Ok(placement);
            }
        }

        Err(Violation::new(
            ViolationCategory::NoSlotForLabAfterTheory,
            course.code.as_str(),
            format!(
                "(theory {} starts {} {})",
                theory,
                grid.calendar().days()[day],
                grid.calendar().hours()[start]
            ),
        ))
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn resolve_instructor<'c>(course: &Course, catalog: &'c Catalog) -> Result<&'c Instructor, Violation> {
    match course.instructor.as_deref() {
        None => Err(Violation::new(
            ViolationCategory::UnknownInstructor,
            course.code.as_str(),
            "(no instructor given)",
        )),
        Some(name) => catalog.instructor(name).ok_or_else(|| {
            Violation::new(
                ViolationCategory::UnknownInstructor,
                course.code.as_str(),
                format!("({} is not in the instructor list)", name),
            )
        }),
    }
}

/// First room, in catalog order, matching `accept` whose cells are free for
/// every hour in `hours` on `day`.
fn first_free_room(
    grid: &ScheduleGrid,
    day: usize,
    hours: std::ops::Range<usize>,
    accept: impl Fn(&Room) -> bool,
) -> Option<usize> {
    (0..grid.room_count()).find(|&r| {
        accept(grid.room(r)) && hours.clone().all(|h| grid.is_cell_free(day, h, r))
    })
}

impl Solver for HeuristicSolver {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn solve(&self, catalog: &Catalog) -> Solution {
        let (grid, violations) = self.generate(catalog);
        Solution {
            complete: violations.is_empty(),
            grid,
            violations,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
