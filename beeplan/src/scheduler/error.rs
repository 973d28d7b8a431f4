/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the timetabling engine.
//!
//! Two types model the two failure layers:
//!
//! * [`Conflict`]: why one candidate cell was refused by the hard
//!   constraints (low-level, carries the clashing course or values).
//! * [`SchedulerError`]: top-level failure returned from
//!   [`Planner::plan()`](super::Planner::plan) before any solver runs.
//!
//! Neither solver returns an error: an unsolvable catalog is reported as a
//! boolean (backtracking) or as violations (greedy).

use thiserror::Error;

use crate::catalog::RoomKind;

// ── Hard-constraint conflicts ─────────────────────────────────────────────────

/// The first hard constraint a `(course, day, hour, room)` candidate fails.
///
/// Variants appear in the order the checks run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conflict {
    /// The target cell already holds a course.
    CellOccupied { room: String, occupant: String },

    /// The course's instructor teaches another course in the same slot.
    InstructorBusy { instructor: String, other: String },

    /// Another course of the same year group sits in the same slot.
    YearClash { year: u32, other: String },

    /// Lab course in a theory room or the other way round.
    RoomKindMismatch {
        room: String,
        required: RoomKind,
        actual: RoomKind,
    },

    /// More students than seats.
    CapacityExceeded {
        room: String,
        capacity: u32,
        students: u32,
    },
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Conflict::CellOccupied { room, occupant } => {
                write!(f, "room '{}' already holds {}", room, occupant)
            }

            Conflict::InstructorBusy { instructor, other } => {
                write!(f, "instructor '{}' already teaches {}", instructor, other)
            }

            Conflict::YearClash { year, other } => {
                write!(f, "year {} already has {} in this slot", year, other)
            }

            Conflict::RoomKindMismatch {
                room,
                required,
                actual,
            } => write!(
                f,
                "room '{}' is a {} room but the course needs a {} room",
                room, actual, required
            ),

            Conflict::CapacityExceeded {
                room,
                capacity,
                students,
            } => write!(
                f,
                "room '{}' seats {} but the course has {} students",
                room, capacity, students
            ),
        }
    }
}

// ── Top-level planner errors ──────────────────────────────────────────────────

/// Error returned by [`Planner`](super::Planner) before solving starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchedulerError {
    /// The strategy name is not recognised.
    #[error("unknown scheduling strategy: '{0}' (valid: exhaustive, heuristic)")]
    UnknownStrategy(String),

    /// The backtracking search was asked to handle more courses than the
    /// configured ceiling.  Its worst case is combinatorial, so callers
    /// bound it up front.
    #[error("exhaustive search refused: {count} courses exceed the limit of {limit}")]
    TooManyCourses { count: usize, limit: usize },
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_messages_name_the_clash() {
        let c = Conflict::InstructorBusy {
            instructor: "Dr.A".into(),
            other: "CS102".into(),
        };
        assert_eq!(c.to_string(), "instructor 'Dr.A' already teaches CS102");

        let c = Conflict::RoomKindMismatch {
            room: "L1".into(),
            required: RoomKind::Theory,
            actual: RoomKind::Lab,
        };
        assert_eq!(
            c.to_string(),
            "room 'L1' is a lab room but the course needs a theory room"
        );
    }

    #[test]
    fn scheduler_error_lists_valid_strategies() {
        let e = SchedulerError::UnknownStrategy("random".into());
        assert!(e.to_string().contains("exhaustive, heuristic"));
    }
}
