//! Planner configuration loading and management.
//!
//! A [`PlannerConfig`] is an explicit, immutable value passed to every
//! solving run.  It carries the day/hour vocabulary ([`Calendar`]), the
//! soft elective/year rules and the slot-sharing policy of the greedy
//! solver.
//!
//! The expected YAML structure is (every section is optional):
//! ```yaml
//! calendar:
//!   days: [Monday, Tuesday, Wednesday, Thursday, Friday]
//!   hours: ["08:30", "09:30", "10:30", "11:30", "12:30", "13:30", "14:30", "15:30", "16:30"]
//!   exam_block: ["13:30", "14:30"]
//! soft_rules:
//!   protected_year: 3
//!   competing_departments: [CENG, SENG]
//! slot_sharing: exclusive
//! ```

use std::collections::HashSet;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// ── Defaults ──────────────────────────────────────────────────────────────────

const DEFAULT_DAYS: [&str; 5] = ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"];

const DEFAULT_HOURS: [&str; 9] = [
    "08:30", "09:30", "10:30", "11:30", "12:30", "13:30", "14:30", "15:30", "16:30",
];

/// Hours reserved for the exam block on the last configured day.
const DEFAULT_EXAM_BLOCK: [&str; 2] = ["13:30", "14:30"];

const DEFAULT_PROTECTED_YEAR: u32 = 3;

const DEFAULT_COMPETING_DEPARTMENTS: [&str; 2] = ["CENG", "SENG"];

fn to_strings(labels: &[&str]) -> Vec<String> {
    labels.iter().map(|s| s.to_string()).collect()
}

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Default, Deserialize)]
struct PlannerConfigFile {
    #[serde(default)]
    calendar: Option<CalendarEntry>,
    #[serde(default)]
    soft_rules: Option<SoftRulesEntry>,
    #[serde(default)]
    slot_sharing: Option<SlotSharing>,
}

#[derive(Debug, Deserialize)]
struct CalendarEntry {
    days: Option<Vec<String>>,
    hours: Option<Vec<String>>,
    exam_block: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SoftRulesEntry {
    protected_year: Option<u32>,
    competing_departments: Option<Vec<String>>,
}

// ── Calendar ──────────────────────────────────────────────────────────────────

/// The ordered day and hour vocabulary of one run.
///
/// Grid keys are exactly these labels, in this order.  Solvers work with
/// indices into `days` / `hours`; labels only appear at the edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Calendar {
    days: Vec<String>,
    hours: Vec<String>,
    /// Hour labels unavailable for theory placement on the final day.
    exam_block: Vec<String>,
}

impl Calendar {
    /// Build a calendar, rejecting empty or duplicated vocabularies.
    ///
    /// Exam-block labels that are not part of `hours` are ignored.
    pub fn new(days: Vec<String>, hours: Vec<String>, exam_block: Vec<String>) -> Result<Self> {
        if days.is_empty() {
            bail!("calendar must declare at least one day");
        }
        if hours.is_empty() {
            bail!("calendar must declare at least one hour");
        }
        if let Some(dup) = first_duplicate(&days) {
            bail!("calendar day '{}' is declared twice", dup);
        }
        if let Some(dup) = first_duplicate(&hours) {
            bail!("calendar hour '{}' is declared twice", dup);
        }
        Ok(Self {
            days,
            hours,
            exam_block,
        })
    }

    pub fn days(&self) -> &[String] {
        &self.days
    }

    pub fn hours(&self) -> &[String] {
        &self.hours
    }

    pub fn exam_block(&self) -> &[String] {
        &self.exam_block
    }

    pub fn day_count(&self) -> usize {
        self.days.len()
    }

    pub fn hour_count(&self) -> usize {
        self.hours.len()
    }

    /// Position of `day` in the configured order.
    pub fn day_index(&self, day: &str) -> Option<usize> {
        self.days.iter().position(|d| d == day)
    }

    /// Position of `hour` in the configured order.
    pub fn hour_index(&self, hour: &str) -> Option<usize> {
        self.hours.iter().position(|h| h == hour)
    }

    /// `true` when `(day, hour)` falls into the exam block, which only
    /// exists on the last configured day.
    pub fn is_exam_block(&self, day: usize, hour: usize) -> bool {
        day + 1 == self.days.len()
            && self
                .hours
                .get(hour)
                .is_some_and(|label| self.exam_block.iter().any(|e| e == label))
    }
}

impl Default for Calendar {
    fn default() -> Self {
        Self {
            days: to_strings(&DEFAULT_DAYS),
            hours: to_strings(&DEFAULT_HOURS),
            exam_block: to_strings(&DEFAULT_EXAM_BLOCK),
        }
    }
}

fn first_duplicate(labels: &[String]) -> Option<&str> {
    let mut seen = HashSet::new();
    labels
        .iter()
        .find(|l| !seen.insert(l.as_str()))
        .map(|l| l.as_str())
}

// ── Soft rules ────────────────────────────────────────────────────────────────

/// Parameters of the soft elective/year conflict rule used by the greedy
/// solver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SoftRules {
    /// Mandatory courses of this year must not share a slot with an elective.
    pub protected_year: u32,
    /// Electives from two different departments of this set must not share
    /// a slot.
    pub competing_departments: Vec<String>,
}

impl SoftRules {
    pub fn is_competing_department(&self, department: &str) -> bool {
        !department.is_empty() && self.competing_departments.iter().any(|d| d == department)
    }
}

impl Default for SoftRules {
    fn default() -> Self {
        Self {
            protected_year: DEFAULT_PROTECTED_YEAR,
            competing_departments: to_strings(&DEFAULT_COMPETING_DEPARTMENTS),
        }
    }
}

// ── Slot sharing ──────────────────────────────────────────────────────────────

/// How the greedy solver treats a `(day, hour)` slot that already holds a
/// course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotSharing {
    /// One occupant per slot; an occupied slot is never considered.
    #[default]
    Exclusive,
    /// A theory course may join an occupied slot in a different room when
    /// the soft-conflict rule accepts every current occupant and the
    /// instructor is free.
    SoftRule,
}

// ── PlannerConfig ─────────────────────────────────────────────────────────────

/// Everything a solving run needs besides the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlannerConfig {
    pub calendar: Calendar,
    pub soft_rules: SoftRules,
    pub slot_sharing: SlotSharing,
}

impl PlannerConfig {
    /// Creates the default configuration (weekday calendar, exclusive slots).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `path` as YAML.  Missing sections and fields keep their
    /// defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be opened, the YAML is
    /// structurally invalid, or the resulting calendar is rejected by
    /// [`Calendar::new`].
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading planner configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid configuration file: {}", path.display()))
    }

    /// Parses a YAML document; see [`load_from_file`](Self::load_from_file).
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not to a mapping.
        let file: PlannerConfigFile = if content.trim().is_empty() {
            PlannerConfigFile::default()
        } else {
            serde_yaml::from_str(content).context("Failed to parse YAML")?
        };

        let defaults = Calendar::default();
        let calendar = match file.calendar {
            Some(entry) => Calendar::new(
                entry.days.unwrap_or(defaults.days),
                entry.hours.unwrap_or(defaults.hours),
                entry.exam_block.unwrap_or(defaults.exam_block),
            )?,
            None => defaults,
        };

        let default_rules = SoftRules::default();
        let soft_rules = match file.soft_rules {
            Some(entry) => SoftRules {
                protected_year: entry.protected_year.unwrap_or(default_rules.protected_year),
                competing_departments: entry
                    .competing_departments
                    .unwrap_or(default_rules.competing_departments),
            },
            None => default_rules,
        };

        let config = Self {
            calendar,
            soft_rules,
            slot_sharing: file.slot_sharing.unwrap_or_default(),
        };

        debug!(
            days = ?config.calendar.days(),
            hours = ?config.calendar.hours(),
            exam_block = ?config.calendar.exam_block(),
            protected_year = config.soft_rules.protected_year,
            competing = ?config.soft_rules.competing_departments,
            sharing = ?config.slot_sharing,
            "planner configuration parsed"
        );

        Ok(config)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    /// Helper: write a YAML string to a temp file and return it.
    fn yaml_tempfile(content: &str) -> NamedTempFile {
        let mut f = NamedTempFile::new().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    fn labels(v: &[&str]) -> Vec<String> {
        to_strings(v)
    }

    // ── Calendar ──────────────────────────────────────────────────────────────

    #[test]
    fn default_calendar_is_weekdays() {
        let cal = Calendar::default();
        assert_eq!(cal.day_count(), 5);
        assert_eq!(cal.days()[0], "Monday");
        assert_eq!(cal.days()[4], "Friday");
        assert_eq!(cal.hours()[0], "08:30");
        assert_eq!(cal.hour_count(), 9);
    }

    #[test]
    fn exam_block_only_applies_to_last_day() {
        let cal = Calendar::default();
        let h = cal.hour_index("13:30").unwrap();
        assert!(cal.is_exam_block(4, h));
        assert!(!cal.is_exam_block(0, h));
        assert!(!cal.is_exam_block(4, 0));
    }

    #[test]
    fn calendar_rejects_empty_days() {
        assert!(Calendar::new(vec![], labels(&["09:00"]), vec![]).is_err());
    }

    #[test]
    fn calendar_rejects_empty_hours() {
        assert!(Calendar::new(labels(&["Mon"]), vec![], vec![]).is_err());
    }

    #[test]
    fn calendar_rejects_duplicate_labels() {
        let err = Calendar::new(labels(&["Mon", "Mon"]), labels(&["09:00"]), vec![]).unwrap_err();
        assert!(err.to_string().contains("Mon"));
        assert!(Calendar::new(labels(&["Mon"]), labels(&["9", "9"]), vec![]).is_err());
    }

    #[test]
    fn index_lookups_follow_configured_order() {
        let cal = Calendar::new(labels(&["B", "A"]), labels(&["2", "1"]), vec![]).unwrap();
        assert_eq!(cal.day_index("A"), Some(1));
        assert_eq!(cal.hour_index("2"), Some(0));
        assert_eq!(cal.day_index("Z"), None);
    }

    // ── SoftRules ─────────────────────────────────────────────────────────────

    #[test]
    fn competing_department_ignores_empty_name() {
        let rules = SoftRules::default();
        assert!(rules.is_competing_department("CENG"));
        assert!(!rules.is_competing_department(""));
        assert!(!rules.is_competing_department("MATH"));
    }

    // ── PlannerConfig: load_from_file ─────────────────────────────────────────

    #[test]
    fn load_full_yaml() {
        let yaml = r#"
calendar:
  days: [Mon, Tue]
  hours: ["09:00", "10:00", "11:00"]
  exam_block: ["11:00"]
soft_rules:
  protected_year: 4
  competing_departments: [EE, ME]
slot_sharing: soft_rule
"#;
        let f = yaml_tempfile(yaml);
        let cfg = PlannerConfig::load_from_file(f.path()).unwrap();

        assert_eq!(cfg.calendar.days(), labels(&["Mon", "Tue"]).as_slice());
        assert_eq!(cfg.calendar.hour_count(), 3);
        assert!(cfg.calendar.is_exam_block(1, 2));
        assert_eq!(cfg.soft_rules.protected_year, 4);
        assert_eq!(cfg.soft_rules.competing_departments, labels(&["EE", "ME"]));
        assert_eq!(cfg.slot_sharing, SlotSharing::SoftRule);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let f = yaml_tempfile("calendar:\n  days: [Mon]\n");
        let cfg = PlannerConfig::load_from_file(f.path()).unwrap();

        assert_eq!(cfg.calendar.day_count(), 1);
        assert_eq!(cfg.calendar.hours(), Calendar::default().hours());
        assert_eq!(cfg.soft_rules, SoftRules::default());
        assert_eq!(cfg.slot_sharing, SlotSharing::Exclusive);
    }

    #[test]
    fn empty_file_is_default_config() {
        let f = yaml_tempfile("");
        let cfg = PlannerConfig::load_from_file(f.path()).unwrap();
        assert_eq!(cfg, PlannerConfig::default());
    }

    #[test]
    fn missing_file_returns_error() {
        let result = PlannerConfig::load_from_file(Path::new("/nonexistent/path/planner.yaml"));
        assert!(result.is_err());
    }

    #[test]
    fn malformed_yaml_returns_error() {
        let f = yaml_tempfile("this is: not: valid: yaml: content:::");
        assert!(PlannerConfig::load_from_file(f.path()).is_err());
    }

    #[test]
    fn invalid_calendar_in_file_returns_error() {
        let f = yaml_tempfile("calendar:\n  days: []\n");
        let err = PlannerConfig::load_from_file(f.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("at least one day"));
    }

    #[test]
    fn unknown_slot_sharing_returns_error() {
        let f = yaml_tempfile("slot_sharing: sometimes\n");
        assert!(PlannerConfig::load_from_file(f.path()).is_err());
    }
}
