//! Core engine for the campus placement portal.
//!
//! Matches students to recruitment drives based on eligibility criteria and
//! keeps one persistent eligibility-and-response record per (student, drive)
//! pair, re-synchronizing those records whenever a drive's criteria change.

pub mod config;
pub mod drives;
pub mod error;
pub mod telemetry;
