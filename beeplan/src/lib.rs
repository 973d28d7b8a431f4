/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! BeePlan – university course timetabling engine
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── config/         – calendar, soft rules, slot sharing (YAML)
//! ├── catalog/        – course / instructor / room records and coercion
//! ├── grid            – day × hour × room timetable
//! ├── scheduler/      – constraint checker, exhaustive and greedy solvers
//! └── report          – JSON solution document, validation report
//! ```

pub mod catalog;
pub mod config;
pub mod grid;
pub mod report;
pub mod scheduler;
