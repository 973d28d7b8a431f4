/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Strict catalog records for one solving run.
//!
//! ```text
//! courses.json ──► RawCourse ──(Catalog::from_raw)──► Course ──► solvers
//!                  ↑ loose: "2", true, "True", 1          ↑ strict, defaults applied
//! ```
//!
//! Coercion happens exactly once, here.  Solvers never look at a raw value.
//! A catalog is read-only for the duration of a run; both solvers take
//! `&Catalog`.

pub mod raw;

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info, warn};

use raw::{
    coerce_bool, coerce_count, coerce_daily_cap, coerce_duration, coerce_label, either, RawCourse,
    RawInstructor, RawRoom,
};

// ── Room kind ─────────────────────────────────────────────────────────────────

/// Theory classroom or laboratory.  A course only ever goes into a room of
/// the matching kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomKind {
    #[default]
    Theory,
    Lab,
}

impl RoomKind {
    pub fn from_lab_flag(is_lab: bool) -> Self {
        if is_lab {
            RoomKind::Lab
        } else {
            RoomKind::Theory
        }
    }

    /// Parses `"theory"` / `"lab"` (any case).  Anything else is `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "theory" => Some(RoomKind::Theory),
            "lab" => Some(RoomKind::Lab),
            _ => None,
        }
    }
}

impl fmt::Display for RoomKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoomKind::Theory => write!(f, "theory"),
            RoomKind::Lab => write!(f, "lab"),
        }
    }
}

// ── Course ────────────────────────────────────────────────────────────────────

/// A course to be placed, with every field in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Course {
    /// Unique identifier, e.g. `"CENG301"`.
    pub code: String,
    pub name: String,
    /// Instructor reference.  `None` when the record had none.
    pub instructor: Option<String>,
    /// Year group.  Courses of the same year never share a slot in the
    /// backtracking solver.
    pub year: Option<u32>,
    /// Number of contiguous hour slots.  Always ≥ 1.
    pub duration: usize,
    pub is_lab: bool,
    pub elective: bool,
    /// Owning department; empty when unknown.
    pub department: String,
    /// Code of the theory course a lab follows.
    pub linked_theory: Option<String>,
    pub student_count: Option<u32>,
}

impl Course {
    /// The room kind this course requires.
    pub fn room_kind(&self) -> RoomKind {
        RoomKind::from_lab_flag(self.is_lab)
    }

    fn from_raw(raw: RawCourse, position: usize) -> Self {
        let code = coerce_label(raw.code.as_ref()).unwrap_or_else(|| {
            let fallback = format!("COURSE#{}", position + 1);
            warn!(position, code = %fallback, "course record has no code");
            fallback
        });

        // Explicit flag first, then the `type` label, then theory.
        let is_lab = coerce_bool(either(&raw.is_lab, &raw.is_lab_camel))
            .or_else(|| {
                coerce_label(raw.kind.as_ref())
                    .and_then(|k| RoomKind::from_label(&k))
                    .map(|k| k == RoomKind::Lab)
            })
            .unwrap_or(false);

        Self {
            name: coerce_label(raw.name.as_ref()).unwrap_or_else(|| code.clone()),
            code,
            instructor: coerce_label(either(&raw.instructor, &raw.instructor_id)),
            year: coerce_count(raw.year.as_ref()),
            duration: coerce_duration(raw.duration.as_ref()),
            is_lab,
            elective: coerce_bool(raw.elective.as_ref()).unwrap_or(false),
            department: coerce_label(either(&raw.department, &raw.dept)).unwrap_or_default(),
            linked_theory: coerce_label(either(&raw.linked_theory, &raw.linked_theory_camel)),
            student_count: coerce_count(either(&raw.student_count, &raw.student_count_camel)),
        }
    }
}

// ── Instructor ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instructor {
    pub name: String,
    /// Day label → hour labels the instructor declared as available.
    pub availability: BTreeMap<String, BTreeSet<String>>,
    pub max_daily_theory_hours: u32,
}

impl Instructor {
    /// `true` if `hour` on `day` is in the declared availability.
    pub fn is_available(&self, day: &str, hour: &str) -> bool {
        self.availability
            .get(day)
            .is_some_and(|hours| hours.contains(hour))
    }

    fn from_raw(raw: RawInstructor, position: usize) -> Self {
        let name = coerce_label(either(&raw.name, &raw.id)).unwrap_or_else(|| {
            let fallback = format!("INSTRUCTOR#{}", position + 1);
            warn!(position, name = %fallback, "instructor record has no name");
            fallback
        });

        let availability: BTreeMap<String, BTreeSet<String>> = raw
            .availability
            .into_iter()
            .map(|(day, hours)| {
                let hours: BTreeSet<String> = hours.iter().filter_map(|h| h.as_label()).collect();
                (day.trim().to_string(), hours)
            })
            .collect();

        Self {
            name,
            availability,
            max_daily_theory_hours: coerce_daily_cap(either(
                &raw.max_daily_theory_hours,
                &raw.max_daily_theory_hours_camel,
            )),
        }
    }
}

// ── Room ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub name: String,
    pub kind: RoomKind,
    /// Seats.  `None` means unknown and is treated permissively.
    pub capacity: Option<u32>,
}

impl Room {
    /// Capacity check; passes whenever either side is unknown.
    pub fn seats(&self, students: Option<u32>) -> bool {
        match (self.capacity, students) {
            (Some(capacity), Some(students)) => capacity >= students,
            _ => true,
        }
    }

    fn from_raw(raw: RawRoom) -> Self {
        let kind = coerce_label(raw.kind.as_ref())
            .and_then(|k| RoomKind::from_label(&k))
            .or_else(|| {
                coerce_bool(either(&raw.is_lab, &raw.is_lab_camel)).map(RoomKind::from_lab_flag)
            })
            .unwrap_or_default();

        Self {
            name: coerce_label(raw.name.as_ref()).unwrap_or_else(|| String::from("Unknown")),
            kind,
            capacity: coerce_count(raw.capacity.as_ref()),
        }
    }
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// The read-only course/instructor/room input of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Catalog {
    pub courses: Vec<Course>,
    pub instructors: Vec<Instructor>,
    pub rooms: Vec<Room>,
}

impl Catalog {
    pub fn new(courses: Vec<Course>, instructors: Vec<Instructor>, rooms: Vec<Room>) -> Self {
        Self {
            courses,
            instructors,
            rooms,
        }
    }

    /// Normalize raw records into strict ones.  Never fails: every
    /// unparseable value falls back to its documented default.
    pub fn from_raw(
        courses: Vec<RawCourse>,
        instructors: Vec<RawInstructor>,
        rooms: Vec<RawRoom>,
    ) -> Self {
        let catalog = Self {
            courses: courses
                .into_iter()
                .enumerate()
                .map(|(i, c)| Course::from_raw(c, i))
                .collect(),
            instructors: instructors
                .into_iter()
                .enumerate()
                .map(|(i, r)| Instructor::from_raw(r, i))
                .collect(),
            rooms: rooms.into_iter().map(Room::from_raw).collect(),
        };

        for code in duplicates(catalog.courses.iter().map(|c| c.code.as_str())) {
            warn!(code = %code, "duplicate course code in catalog");
        }
        // Room names key the serialized grid; a repeat hides one room there.
        for name in duplicates(catalog.rooms.iter().map(|r| r.name.as_str())) {
            warn!(room = %name, "duplicate room name in catalog");
        }

        catalog
    }

    /// Reads `courses` (or `curriculum`), `instructors` and `rooms` from
    /// `dir`.  Each may be `.json`, `.yaml` or `.yml`; each file holds a
    /// list of records.
    ///
    /// # Errors
    /// Returns an error if a file is missing, unreadable, or not a list of
    /// records.  Odd field values are not errors.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        info!("Loading catalog from: {}", dir.display());

        let courses: Vec<RawCourse> = read_records(dir, &["courses", "curriculum"])?;
        let instructors: Vec<RawInstructor> = read_records(dir, &["instructors"])?;
        let rooms: Vec<RawRoom> = read_records(dir, &["rooms"])?;

        let catalog = Self::from_raw(courses, instructors, rooms);

        info!(
            courses = catalog.courses.len(),
            instructors = catalog.instructors.len(),
            rooms = catalog.rooms.len(),
            "catalog loaded"
        );

        Ok(catalog)
    }

    pub fn course(&self, code: &str) -> Option<&Course> {
        self.courses.iter().find(|c| c.code == code)
    }

    pub fn instructor(&self, name: &str) -> Option<&Instructor> {
        self.instructors.iter().find(|i| i.name == name)
    }

    /// Keep only the courses named in `codes`, preserving catalog order.
    ///
    /// Returns the requested codes that matched no course.
    pub fn select_courses(&mut self, codes: &[String]) -> Vec<String> {
        let wanted: HashSet<&str> = codes.iter().map(String::as_str).collect();
        self.courses.retain(|c| wanted.contains(c.code.as_str()));

        let present: HashSet<&str> = self.courses.iter().map(|c| c.code.as_str()).collect();
        let missing: Vec<String> = codes
            .iter()
            .filter(|c| !present.contains(c.as_str()))
            .cloned()
            .collect();

        debug!(
            kept = self.courses.len(),
            missing = ?missing,
            "course selection applied"
        );
        missing
    }
}

/// Every name that occurs more than once, once per repeat, in input order.
fn duplicates<'a>(names: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    names.filter(|n| !seen.insert(*n)).collect()
}

// ── File helpers ──────────────────────────────────────────────────────────────

const EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

fn find_file(dir: &Path, stems: &[&str]) -> Option<PathBuf> {
    stems.iter().find_map(|stem| {
        EXTENSIONS
            .iter()
            .map(|ext| dir.join(format!("{stem}.{ext}")))
            .find(|p| p.is_file())
    })
}

fn read_records<T: DeserializeOwned>(dir: &Path, stems: &[&str]) -> Result<Vec<T>> {
    let path = find_file(dir, stems).with_context(|| {
        format!(
            "No {} file (.json/.yaml/.yml) in {}",
            stems.join(" or "),
            dir.display()
        )
    })?;

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Cannot open catalog file: {}", path.display()))?;

    let records: Vec<T> = if path.extension().is_some_and(|e| e == "json") {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON file: {}", path.display()))?
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?
    };

    debug!(file = %path.display(), records = records.len(), "catalog file read");
    Ok(records)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
