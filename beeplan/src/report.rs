/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Output documents of a planning run.
//!
//! * the solution document, JSON: strategy, completeness, the grid
//!   (`day → hour → room → occupant|null`), a flat placement list and the
//!   violations;
//! * the validation report, plain text: one violation per line in
//!   discovery order, or `No violations found.`

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use crate::grid::{PlacedCourse, ScheduleGrid};
use crate::scheduler::{Solution, Strategy, Violation};

/// Text of an empty validation report.
pub const NO_VIOLATIONS: &str = "No violations found.";

#[derive(Debug, Serialize)]
pub struct SolutionDocument<'a> {
    pub strategy: String,
    pub complete: bool,
    pub grid: &'a ScheduleGrid,
    pub placements: Vec<PlacedCourse>,
    pub violations: Vec<ViolationEntry<'a>>,
}

/// A violation with its rendered message next to the structured fields.
#[derive(Debug, Serialize)]
pub struct ViolationEntry<'a> {
    #[serde(flatten)]
    pub violation: &'a Violation,
    pub message: String,
}

impl<'a> SolutionDocument<'a> {
    pub fn new(strategy: Strategy, solution: &'a Solution) -> Self {
        Self {
            strategy: strategy.to_string(),
            complete: solution.complete,
            grid: &solution.grid,
            placements: solution.grid.placements(),
            violations: solution
                .violations
                .iter()
                .map(|v| ViolationEntry {
                    violation: v,
                    message: v.to_string(),
                })
                .collect(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize solution")
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = self.to_json()?;
        fs::write(path, json + "\n")
            .with_context(|| format!("Cannot write solution file: {}", path.display()))?;
        info!("Solution written to: {}", path.display());
        Ok(())
    }
}

/// The validation report text, newline-terminated.
pub fn validation_report(violations: &[Violation]) -> String {
    if violations.is_empty() {
        return format!("{NO_VIOLATIONS}\n");
    }
    violations.iter().map(|v| format!("{v}\n")).collect()
}

pub fn write_validation_report(path: &Path, violations: &[Violation]) -> Result<()> {
    fs::write(path, validation_report(violations))
        .with_context(|| format!("Cannot write validation report: {}", path.display()))?;
    info!(
        violations = violations.len(),
        "Validation report written to: {}",
        path.display()
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Course, Room, RoomKind};
    use crate::config::Calendar;
    use crate::grid::{Occupant, Placement};
    use crate::scheduler::ViolationCategory;
    use tempfile::TempDir;

    fn solution() -> Solution {
        let cal = Calendar::new(vec!["Mon".into()], vec!["09".into(), "10".into()], vec![]).unwrap();
        let room = Room {
            name: "R1".into(),
            kind: RoomKind::Theory,
            capacity: None,
        };
        let mut grid = ScheduleGrid::new(&cal, std::slice::from_ref(&room));
        let course = Course {
            code: "CS101".into(),
            duration: 1,
            ..Default::default()
        };
        grid.place(&Placement::new(0, 1, 0, 1), Occupant::new(&course, &room));
        Solution {
            grid,
            violations: vec![
                Violation::new(ViolationCategory::NoSlotForTheory, "CS102", "(no available hour for Dr.B)"),
                Violation::new(ViolationCategory::LabWithoutLinkedTheory, "CS102L", ""),
            ],
            complete: false,
        }
    }

    // ── Validation report ─────────────────────────────────────────────────────

    #[test]
    fn report_lists_violations_in_order() {
        let text = validation_report(&solution().violations);
        assert_eq!(
            text,
            "No slot for theory: CS102 (no available hour for Dr.B)\nLab without linked theory: CS102L\n"
        );
    }

    #[test]
    fn empty_report_says_so() {
        assert_eq!(validation_report(&[]), "No violations found.\n");
    }

    #[test]
    fn report_is_written_to_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("validation.txt");
        write_validation_report(&path, &solution().violations).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.starts_with("No slot for theory: CS102"));
    }

    #[test]
    fn unwritable_report_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("validation.txt");
        assert!(write_validation_report(&path, &[]).is_err());
    }

    // ── Solution document ─────────────────────────────────────────────────────

    #[test]
    fn solution_document_shape() {
        let solution = solution();
        let doc = SolutionDocument::new(Strategy::Heuristic, &solution);
        let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();

        assert_eq!(value["strategy"], "heuristic");
        assert_eq!(value["complete"], false);
        assert!(value["grid"]["Mon"]["09"]["R1"].is_null());
        assert_eq!(value["grid"]["Mon"]["10"]["R1"]["course"], "CS101");
        assert_eq!(value["placements"][0]["hour"], "10");
        assert_eq!(value["violations"][0]["category"], "NoSlotForTheory");
        assert_eq!(value["violations"][0]["course"], "CS102");
        assert_eq!(
            value["violations"][1]["message"],
            "Lab without linked theory: CS102L"
        );
    }

    #[test]
    fn solution_document_is_written_to_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("solution.json");
        let solution = solution();
        SolutionDocument::new(Strategy::Exhaustive, &solution)
            .write_to(&path)
            .unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["strategy"], "exhaustive");
    }
}
