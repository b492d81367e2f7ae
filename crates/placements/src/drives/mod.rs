//! Drive lifecycle, criteria evaluation, and eligibility-record
//! reconciliation for the placement portal.
//!
//! The invariant the module maintains: a record exists for a
//! (student, drive) pair iff the student satisfied the drive's criteria at
//! the last evaluation. Drive updates re-evaluate and converge the record
//! table through a remove/retain/add reconciliation plan without ever
//! duplicating a pair.

pub mod domain;
pub mod eligibility;
pub mod reconcile;
pub mod repository;
pub mod roster;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Department, Drive, DriveChanges, DriveId, DriveSubmission, DriveSummary, EligibilityCriteria,
    EligibilityRecord, ResponseDecision, ResponseStatus, StudentAttributes, StudentId, UserRole,
};
pub use eligibility::{eligible_students, is_eligible, validate_criteria, CriteriaViolation};
pub use reconcile::{plan, ReconciliationPlan};
pub use repository::{DriveStore, EligibilityRecordStore, RepositoryError, StudentDirectory};
pub use roster::{parse_roster, RosterError};
pub use router::drive_router;
pub use service::{
    DriveCreated, DrivePlacementService, DriveServiceError, DriveUpdateOutcome, SeenOutcome,
};
