/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! The mutable timetable of one solving run.
//!
//! ```text
//! day ─┬─ hour ─┬─ room ──► Option<Occupant>
//!      │        └─ room ──► Option<Occupant>
//!      └─ hour ─ ...
//! ```
//!
//! Storage is one dense `Vec` indexed by `(day, hour, room)`; the solvers
//! only deal in indices.  Labels come from the [`Calendar`] and the room
//! list the grid was built with, and the serialized form uses exactly
//! those labels in that order.
//!
//! # Ownership model
//! A grid is created empty per run, mutated only by the solver that owns it,
//! and handed back by value inside a [`Solution`](crate::scheduler::Solution).
//! Two runs never share a grid.

use std::ops::Range;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::catalog::{Course, Room, RoomKind};
use crate::config::Calendar;

// ── Occupant ──────────────────────────────────────────────────────────────────

/// What a grid cell holds: the course plus the attributes constraint checks
/// read from co-occupants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occupant {
    pub course: String,
    pub room: String,
    #[serde(rename = "type")]
    pub kind: RoomKind,
    pub instructor: Option<String>,
    pub year: Option<u32>,
    pub elective: bool,
    pub department: String,
}

impl Occupant {
    pub fn new(course: &Course, room: &Room) -> Self {
        Self {
            course: course.code.clone(),
            room: room.name.clone(),
            kind: course.room_kind(),
            instructor: course.instructor.clone(),
            year: course.year,
            elective: course.elective,
            department: course.department.clone(),
        }
    }
}

// ── Placement ─────────────────────────────────────────────────────────────────

/// A course's block of `duration` contiguous hours in one room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub day: usize,
    pub hour: usize,
    pub room: usize,
    pub duration: usize,
}

impl Placement {
    pub fn new(day: usize, hour: usize, room: usize, duration: usize) -> Self {
        Self {
            day,
            hour,
            room,
            duration,
        }
    }

    /// Hour indices covered by this placement.
    pub fn hours(&self) -> Range<usize> {
        self.hour..self.hour + self.duration
    }
}

/// A placed course as found in the grid, with labels resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacedCourse {
    pub course: String,
    pub day: String,
    pub hour: String,
    pub room: String,
    /// Contiguous hours occupied from `hour` on.
    pub span: usize,
    #[serde(skip)]
    pub placement: Placement,
}

// ── ScheduleGrid ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleGrid {
    calendar: Calendar,
    rooms: Vec<Room>,
    cells: Vec<Option<Occupant>>,
}

impl ScheduleGrid {
    /// An empty grid with every `(day, hour, room)` cell present.
    pub fn new(calendar: &Calendar, rooms: &[Room]) -> Self {
        let len = calendar.day_count() * calendar.hour_count() * rooms.len();
        Self {
            calendar: calendar.clone(),
            rooms: rooms.to_vec(),
            cells: vec![None; len],
        }
    }

    pub fn calendar(&self) -> &Calendar {
        &self.calendar
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn room(&self, room: usize) -> &Room {
        &self.rooms[room]
    }

    pub fn day_count(&self) -> usize {
        self.calendar.day_count()
    }

    pub fn hour_count(&self) -> usize {
        self.calendar.hour_count()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    fn index(&self, day: usize, hour: usize, room: usize) -> usize {
        debug_assert!(day < self.day_count() && hour < self.hour_count() && room < self.room_count());
        (day * self.hour_count() + hour) * self.room_count() + room
    }

    // ── Reads ─────────────────────────────────────────────────────────────────

    pub fn occupant(&self, day: usize, hour: usize, room: usize) -> Option<&Occupant> {
        self.cells[self.index(day, hour, room)].as_ref()
    }

    pub fn is_cell_free(&self, day: usize, hour: usize, room: usize) -> bool {
        self.occupant(day, hour, room).is_none()
    }

    /// Every occupant of the `(day, hour)` slot, in room order.
    pub fn slot_occupants(&self, day: usize, hour: usize) -> impl Iterator<Item = &Occupant> {
        let rooms = self.room_count();
        let start = (day * self.hour_count() + hour) * rooms;
        self.cells[start..start + rooms].iter().flatten()
    }

    /// The first occupant of a slot.  In exclusive slot mode this is the
    /// only one.
    pub fn slot_occupant(&self, day: usize, hour: usize) -> Option<&Occupant> {
        self.slot_occupants(day, hour).next()
    }

    pub fn is_slot_empty(&self, day: usize, hour: usize) -> bool {
        self.slot_occupant(day, hour).is_none()
    }

    /// Number of occupied cells.
    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// `(day, hour)` of the first cell holding `code`, scanning days then
    /// hours in configured order.
    pub fn find_course_start(&self, code: &str) -> Option<(usize, usize)> {
        (0..self.day_count())
            .flat_map(|d| (0..self.hour_count()).map(move |h| (d, h)))
            .find(|&(d, h)| self.slot_occupants(d, h).any(|o| o.course == code))
    }

    /// Every placed course block, in day/hour/room order.
    pub fn placements(&self) -> Vec<PlacedCourse> {
        let mut out = Vec::new();
        for day in 0..self.day_count() {
            for hour in 0..self.hour_count() {
                for room in 0..self.room_count() {
                    let Some(occ) = self.occupant(day, hour, room) else {
                        continue;
                    };
                    let continues = hour > 0
                        && self
                            .occupant(day, hour - 1, room)
                            .is_some_and(|prev| prev.course == occ.course);
                    if continues {
                        continue;
                    }
                    let span = (hour..self.hour_count())
                        .take_while(|&h| {
                            self.occupant(day, h, room)
                                .is_some_and(|o| o.course == occ.course)
                        })
                        .count();
                    out.push(PlacedCourse {
                        course: occ.course.clone(),
                        day: self.calendar.days()[day].clone(),
                        hour: self.calendar.hours()[hour].clone(),
                        room: self.rooms[room].name.clone(),
                        span,
                        placement: Placement::new(day, hour, room, span),
                    });
                }
            }
        }
        out
    }

    // ── Writes ────────────────────────────────────────────────────────────────

    /// Write `occupant` into every cell of `placement`.
    ///
    /// The caller has already checked the cells; an hour past the end of the
    /// calendar is a logic error.
    pub fn place(&mut self, placement: &Placement, occupant: Occupant) {
        for hour in placement.hours() {
            let idx = self.index(placement.day, hour, placement.room);
            self.cells[idx] = Some(occupant.clone());
        }
    }

    /// Clear every cell of `placement`.
    pub fn remove(&mut self, placement: &Placement) {
        for hour in placement.hours() {
            let idx = self.index(placement.day, hour, placement.room);
            self.cells[idx] = None;
        }
    }
}

// ── Serialization ─────────────────────────────────────────────────────────────
//
// day → hour → room → occupant | null, in configured order.  Maps are
// written by hand so the order survives (a derived BTreeMap would sort).

impl Serialize for ScheduleGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.day_count()))?;
        for (day, label) in self.calendar.days().iter().enumerate() {
            map.serialize_entry(label, &DayView { grid: self, day })?;
        }
        map.end()
    }
}

struct DayView<'a> {
    grid: &'a ScheduleGrid,
    day: usize,
}

impl Serialize for DayView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.grid.hour_count()))?;
        for (hour, label) in self.grid.calendar.hours().iter().enumerate() {
            map.serialize_entry(
                label,
                &SlotView {
                    grid: self.grid,
                    day: self.day,
                    hour,
                },
            )?;
        }
        map.end()
    }
}

struct SlotView<'a> {
    grid: &'a ScheduleGrid,
    day: usize,
    hour: usize,
}

impl Serialize for SlotView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.grid.room_count()))?;
        for (room, r) in self.grid.rooms.iter().enumerate() {
            map.serialize_entry(&r.name, &self.grid.occupant(self.day, self.hour, room))?;
        }
        map.end()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
