/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Hard constraints on a single `(course, day, hour, room)` candidate.
//!
//! Checks run in this order and stop at the first failure:
//!
//! | # | Check | Conflict |
//! |---|---|---|
//! | a | target cell unoccupied | `CellOccupied` |
//! | b | instructor not teaching elsewhere in the slot | `InstructorBusy` |
//! | c | no other course of the same year in the slot | `YearClash` |
//! | d | room kind matches the course's lab flag | `RoomKindMismatch` |
//! | e | room seats the students (skipped if either is unknown) | `CapacityExceeded` |
//!
//! The checker is stateless and never mutates the grid.

use crate::catalog::Course;
use crate::grid::{Placement, ScheduleGrid};

use super::error::Conflict;

pub struct ConstraintChecker;

impl ConstraintChecker {
    /// `true` if the candidate passes every hard constraint.
    pub fn fits(course: &Course, day: usize, hour: usize, room: usize, grid: &ScheduleGrid) -> bool {
        Self::check(course, day, hour, room, grid).is_ok()
    }

    /// Like [`fits`](Self::fits), but names the first failing check.
    pub fn check(
        course: &Course,
        day: usize,
        hour: usize,
        room: usize,
        grid: &ScheduleGrid,
    ) -> Result<(), Conflict> {
        let target = grid.room(room);

        // a. Cell occupancy
        if let Some(occupant) = grid.occupant(day, hour, room) {
            return Err(Conflict::CellOccupied {
                room: target.name.clone(),
                occupant: occupant.course.clone(),
            });
        }

        // b. Instructor clash across rooms
        Self::check_instructor_free(course, day, hour, grid)?;

        // c. Year-group clash across rooms
        if let Some(year) = course.year {
            if let Some(other) = grid
                .slot_occupants(day, hour)
                .find(|o| o.course != course.code && o.year == Some(year))
            {
                return Err(Conflict::YearClash {
                    year,
                    other: other.course.clone(),
                });
            }
        }

        // d. Room kind
        if target.kind != course.room_kind() {
            return Err(Conflict::RoomKindMismatch {
                room: target.name.clone(),
                required: course.room_kind(),
                actual: target.kind,
            });
        }

        // e. Capacity, permissive when either side is unknown
        if let (Some(capacity), Some(students)) = (target.capacity, course.student_count) {
            if students > capacity {
                return Err(Conflict::CapacityExceeded {
                    room: target.name.clone(),
                    capacity,
                    students,
                });
            }
        }

        Ok(())
    }

    /// Check (b) on its own: no other course taught by the same instructor
    /// occupies `(day, hour)` in any room.  A course without an instructor
    /// reference never clashes.
    pub fn check_instructor_free(
        course: &Course,
        day: usize,
        hour: usize,
        grid: &ScheduleGrid,
    ) -> Result<(), Conflict> {
        let Some(instructor) = course.instructor.as_deref() else {
            return Ok(());
        };
        match grid
            .slot_occupants(day, hour)
            .find(|o| o.course != course.code && o.instructor.as_deref() == Some(instructor))
        {
            Some(other) => Err(Conflict::InstructorBusy {
                instructor: instructor.to_string(),
                other: other.course.clone(),
            }),
            None => Ok(()),
        }
    }

    /// `true` if every hour of `placement` lies inside the calendar and
    /// passes [`fits`](Self::fits).
    pub fn fits_block(course: &Course, placement: &Placement, grid: &ScheduleGrid) -> bool {
        placement.hour + placement.duration <= grid.hour_count()
            && placement
                .hours()
                .all(|h| Self::fits(course, placement.day, h, placement.room, grid))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
