/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Soft elective/year rule of the greedy solver.
//!
//! Only consulted when a candidate slot already holds a course.  Two
//! combinations are refused, in either direction:
//!
//! 1. a mandatory course of the protected year with an elective;
//! 2. two electives from two different competing departments.
//!
//! Every other pairing is allowed.  The rule does not look at rooms.

use std::fmt;

use crate::catalog::Course;
use crate::config::SoftRules;
use crate::grid::Occupant;

/// Which soft rule refused a co-placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SoftConflict {
    MandatoryWithElective { mandatory: String, elective: String },
    CompetingElectives { first: String, second: String },
}

impl fmt::Display for SoftConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SoftConflict::MandatoryWithElective {
                mandatory,
                elective,
            } => write!(f, "mandatory {} must not share a slot with elective {}", mandatory, elective),
            SoftConflict::CompetingElectives { first, second } => write!(
                f,
                "electives {} and {} belong to competing departments",
                first, second
            ),
        }
    }
}

/// The attributes the rule compares.
struct Profile<'a> {
    code: &'a str,
    year: Option<u32>,
    elective: bool,
    department: &'a str,
}

impl<'a> From<&'a Course> for Profile<'a> {
    fn from(c: &'a Course) -> Self {
        Self {
            code: &c.code,
            year: c.year,
            elective: c.elective,
            department: &c.department,
        }
    }
}

impl<'a> From<&'a Occupant> for Profile<'a> {
    fn from(o: &'a Occupant) -> Self {
        Self {
            code: &o.course,
            year: o.year,
            elective: o.elective,
            department: &o.department,
        }
    }
}

fn is_protected(p: &Profile<'_>, rules: &SoftRules) -> bool {
    !p.elective && p.year == Some(rules.protected_year)
}

/// `Ok(())` if `candidate` may share a slot with `occupant`.
pub fn check_co_placement(
    candidate: &Course,
    occupant: &Occupant,
    rules: &SoftRules,
) -> Result<(), SoftConflict> {
    let a = Profile::from(candidate);
    let b = Profile::from(occupant);

    if is_protected(&a, rules) && b.elective {
        return Err(SoftConflict::MandatoryWithElective {
            mandatory: a.code.to_string(),
            elective: b.code.to_string(),
        });
    }
    if is_protected(&b, rules) && a.elective {
        return Err(SoftConflict::MandatoryWithElective {
            mandatory: b.code.to_string(),
            elective: a.code.to_string(),
        });
    }

    if a.elective
        && b.elective
        && a.department != b.department
        && rules.is_competing_department(a.department)
        && rules.is_competing_department(b.department)
    {
        return Err(SoftConflict::CompetingElectives {
            first: a.code.to_string(),
            second: b.code.to_string(),
        });
    }

    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Room, RoomKind};

    fn course(code: &str, year: Option<u32>, elective: bool, dept: &str) -> Course {
        Course {
            code: code.into(),
            year,
            elective,
            department: dept.into(),
            duration: 1,
            ..Default::default()
        }
    }

    fn allows(candidate: &Course, occupant: &Course, rules: &SoftRules) -> bool {
        check_co_placement(candidate, &occupant_of(occupant), rules).is_ok()
    }

    fn occupant_of(c: &Course) -> Occupant {
        let room = Room {
            name: "R1".into(),
            kind: RoomKind::Theory,
            capacity: None,
        };
        Occupant::new(c, &room)
    }

    #[test]
    fn year3_mandatory_rejects_elective_both_ways() {
        let rules = SoftRules::default();
        let mandatory = course("M", Some(3), false, "CENG");
        let elective = course("E", Some(4), true, "CENG");

        let err = check_co_placement(&mandatory, &occupant_of(&elective), &rules).unwrap_err();
        assert_eq!(
            err,
            SoftConflict::MandatoryWithElective {
                mandatory: "M".into(),
                elective: "E".into()
            }
        );
        let err = check_co_placement(&elective, &occupant_of(&mandatory), &rules).unwrap_err();
        assert!(matches!(err, SoftConflict::MandatoryWithElective { ref mandatory, .. } if mandatory == "M"));
    }

    #[test]
    fn other_years_may_share_with_electives() {
        let rules = SoftRules::default();
        let mandatory = course("M", Some(2), false, "CENG");
        let elective = course("E", Some(4), true, "CENG");
        assert!(allows(&mandatory, &elective, &rules));
    }

    #[test]
    fn competing_department_electives_are_rejected() {
        let rules = SoftRules::default();
        let a = course("E1", Some(4), true, "CENG");
        let b = course("E2", Some(4), true, "SENG");
        assert!(matches!(
            check_co_placement(&a, &occupant_of(&b), &rules),
            Err(SoftConflict::CompetingElectives { .. })
        ));
    }

    #[test]
    fn same_department_or_outside_electives_may_share() {
        let rules = SoftRules::default();
        let a = course("E1", Some(4), true, "CENG");
        let b = course("E2", Some(4), true, "CENG");
        let c = course("E3", Some(4), true, "MATH");
        assert!(allows(&a, &b, &rules));
        assert!(allows(&a, &c, &rules));
    }

    #[test]
    fn mandatory_courses_may_share_with_each_other() {
        let rules = SoftRules::default();
        let a = course("M1", Some(3), false, "CENG");
        let b = course("M2", Some(3), false, "CENG");
        assert!(allows(&a, &b, &rules));
    }

    #[test]
    fn protected_year_is_configurable() {
        let rules = SoftRules {
            protected_year: 2,
            ..SoftRules::default()
        };
        let mandatory = course("M", Some(2), false, "CENG");
        let elective = course("E", Some(4), true, "CENG");
        assert!(!allows(&mandatory, &elective, &rules));
    }
}
