/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Violation diagnostics produced by the greedy solver.
//!
//! A violation renders as `"<Category>: <code> <detail>"`.  The category and
//! the course code are also kept as fields so callers never parse text.
//! The list is append-only and stays in discovery order.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ViolationCategory {
    /// A theory course found no acceptable `(day, hour)`.
    NoSlotForTheory,
    /// The instructor reference is missing or names nobody in the catalog.
    UnknownInstructor,
    /// A lab course has no `linked_theory`.
    LabWithoutLinkedTheory,
    /// The linked theory course was never placed.
    LabCannotFindTheorySlot,
    /// Neither slot after the theory was usable, or no lab room qualifies.
    NoSlotForLabAfterTheory,
}

impl ViolationCategory {
    pub fn label(self) -> &'static str {
        match self {
            ViolationCategory::NoSlotForTheory => "No slot for theory",
            ViolationCategory::UnknownInstructor => "Unknown instructor",
            ViolationCategory::LabWithoutLinkedTheory => "Lab without linked theory",
            ViolationCategory::LabCannotFindTheorySlot => "Lab cannot find theory slot",
            ViolationCategory::NoSlotForLabAfterTheory => "No slot for lab after theory",
        }
    }
}

impl fmt::Display for ViolationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub category: ViolationCategory,
    /// Code of the offending course.
    pub course: String,
    pub detail: String,
}

impl Violation {
    pub fn new(
        category: ViolationCategory,
        course: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            category,
            course: course.into(),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.detail.is_empty() {
            write!(f, "{}: {}", self.category, self.course)
        } else {
            write!(f, "{}: {} {}", self.category, self.course, self.detail)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_is_category_code_detail() {
        let v = Violation::new(
            ViolationCategory::NoSlotForTheory,
            "CS101",
            "(no available hour for Dr.A)",
        );
        assert_eq!(v.to_string(), "No slot for theory: CS101 (no available hour for Dr.A)");
    }

    #[test]
    fn display_without_detail() {
        let v = Violation::new(ViolationCategory::LabWithoutLinkedTheory, "CS101L", "");
        assert_eq!(v.to_string(), "Lab without linked theory: CS101L");
    }

    #[test]
    fn category_serializes_as_variant_name() {
        let v = Violation::new(ViolationCategory::UnknownInstructor, "X", "d");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["category"], "UnknownInstructor");
        assert_eq!(json["course"], "X");
    }
}
