/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Loosely typed catalog records, exactly as an external loader hands them
//! over.
//!
//! Catalog files are written by hand, so the same field shows up as `2`,
//! `"2"` or `"two"`, and flags as `true`, `"True"` or `1`.  These types
//! accept all of that; [`Catalog::from_raw`](super::Catalog::from_raw)
//! turns them into strict records once, using the `coerce_*` helpers below.
//! Nothing here ever fails on a field value.

use std::collections::BTreeMap;

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};
use tracing::warn;

// ── Loose scalar ──────────────────────────────────────────────────────────────

/// A scalar field whose type is not trusted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum Loose {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Lists, maps or anything else; always coerces to the default.
    Other(IgnoredAny),
}

impl Loose {
    /// Non-negative integer view.  Integral floats and numeric text are
    /// accepted; everything else is `None`.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Loose::Int(v) => u32::try_from(*v).ok(),
            Loose::Float(v) if v.fract() == 0.0 && *v >= 0.0 && *v <= u32::MAX as f64 => {
                Some(*v as u32)
            }
            Loose::Text(s) => s.trim().parse::<u32>().ok(),
            _ => None,
        }
    }

    /// Boolean view: `true`/`false` in any case, or the integers 0 and 1.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Loose::Bool(b) => Some(*b),
            Loose::Int(0) => Some(false),
            Loose::Int(1) => Some(true),
            Loose::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Label view used for names and hour labels.  Integers render in
    /// decimal so `9` and `"9"` are the same hour.
    pub fn as_label(&self) -> Option<String> {
        match self {
            Loose::Text(s) => Some(s.trim().to_string()),
            Loose::Int(v) => Some(v.to_string()),
            Loose::Float(v) => Some(v.to_string()),
            Loose::Bool(_) | Loose::Other(_) => None,
        }
    }
}

// ── Coercion helpers ──────────────────────────────────────────────────────────

/// Default duration, in hour slots.
pub const DEFAULT_DURATION: usize = 1;

/// Default cap on an instructor's theory hours per day.
pub const DEFAULT_MAX_DAILY_THEORY_HOURS: u32 = 4;

/// Duration in slots; zero, negative and unparseable values become 1.
pub fn coerce_duration(value: Option<&Loose>) -> usize {
    value
        .and_then(Loose::as_u32)
        .filter(|&d| d > 0)
        .map(|d| d as usize)
        .unwrap_or(DEFAULT_DURATION)
}

pub fn coerce_bool(value: Option<&Loose>) -> Option<bool> {
    value.and_then(Loose::as_bool)
}

pub fn coerce_count(value: Option<&Loose>) -> Option<u32> {
    value.and_then(Loose::as_u32)
}

pub fn coerce_daily_cap(value: Option<&Loose>) -> u32 {
    value
        .and_then(Loose::as_u32)
        .filter(|&c| c > 0)
        .unwrap_or(DEFAULT_MAX_DAILY_THEORY_HOURS)
}

/// Label with surrounding whitespace removed; empty labels count as absent.
pub fn coerce_label(value: Option<&Loose>) -> Option<String> {
    value.and_then(Loose::as_label).filter(|s| !s.is_empty())
}

// ── Raw records ───────────────────────────────────────────────────────────────
//
// Alternative spellings are separate fields so a record carrying both never
// fails as a duplicate.  The snake_case spelling wins; see [`either`].

/// `primary` unless it is absent or null, otherwise `fallback`.
pub fn either<'a>(primary: &'a Option<Loose>, fallback: &'a Option<Loose>) -> Option<&'a Loose> {
    primary.as_ref().or(fallback.as_ref())
}

/// Course record as found in `courses.{json,yaml}`.
#[derive(Debug, Default, Deserialize)]
pub struct RawCourse {
    pub code: Option<Loose>,
    pub name: Option<Loose>,
    pub instructor: Option<Loose>,
    #[serde(alias = "instructorId")]
    pub instructor_id: Option<Loose>,
    pub year: Option<Loose>,
    pub duration: Option<Loose>,
    pub is_lab: Option<Loose>,
    #[serde(rename = "isLab")]
    pub is_lab_camel: Option<Loose>,
    #[serde(rename = "type")]
    pub kind: Option<Loose>,
    pub elective: Option<Loose>,
    pub department: Option<Loose>,
    pub dept: Option<Loose>,
    pub student_count: Option<Loose>,
    #[serde(rename = "studentCount")]
    pub student_count_camel: Option<Loose>,
    pub linked_theory: Option<Loose>,
    #[serde(rename = "linkedTheory")]
    pub linked_theory_camel: Option<Loose>,
}

/// Instructor record as found in `instructors.{json,yaml}`.
#[derive(Debug, Default, Deserialize)]
pub struct RawInstructor {
    pub name: Option<Loose>,
    pub id: Option<Loose>,
    /// Day label → hour labels.  Never fails; see [`lenient_availability`].
    #[serde(default, deserialize_with = "lenient_availability")]
    pub availability: BTreeMap<String, Vec<Loose>>,
    pub max_daily_theory_hours: Option<Loose>,
    #[serde(rename = "maxDailyTheoryHours")]
    pub max_daily_theory_hours_camel: Option<Loose>,
}

/// Room record as found in `rooms.{json,yaml}`.
#[derive(Debug, Default, Deserialize)]
pub struct RawRoom {
    pub name: Option<Loose>,
    #[serde(rename = "type")]
    pub kind: Option<Loose>,
    pub is_lab: Option<Loose>,
    #[serde(rename = "isLab")]
    pub is_lab_camel: Option<Loose>,
    pub capacity: Option<Loose>,
}

// ── Availability ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum AvailabilityShape {
    Days(BTreeMap<String, DayHours>),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DayHours {
    List(Vec<Loose>),
    Single(Loose),
}

/// Reads `availability` in whatever shape it arrives:
///
/// * `null` or a non-map value: no availability;
/// * a day mapped to a single label: that one hour;
/// * a day mapped to anything else that is not a list: the day is dropped.
fn lenient_availability<'de, D>(deserializer: D) -> Result<BTreeMap<String, Vec<Loose>>, D::Error>
where
    D: Deserializer<'de>,
{
    let days = match Option::<AvailabilityShape>::deserialize(deserializer)? {
        Some(AvailabilityShape::Days(days)) => days,
        Some(AvailabilityShape::Other(_)) => {
            warn!("instructor availability is not a day map, treating it as empty");
            return Ok(BTreeMap::new());
        }
        None => return Ok(BTreeMap::new()),
    };

    Ok(days
        .into_iter()
        .filter_map(|(day, hours)| match hours {
            DayHours::List(hours) => Some((day, hours)),
            DayHours::Single(hour) if hour.as_label().is_some() => Some((day, vec![hour])),
            DayHours::Single(_) => {
                warn!(day = %day, "availability entry is neither a list nor an hour label, dropped");
                None
            }
        })
        .collect())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
