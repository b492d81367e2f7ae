use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::domain::{
    Drive, DriveChanges, DriveId, DriveSubmission, DriveSummary, EligibilityCriteria,
    EligibilityRecord, ResponseDecision, ResponseStatus, StudentAttributes, StudentId,
};
use super::eligibility::{eligible_students, is_eligible, validate_criteria, CriteriaViolation};
use super::reconcile;
use super::repository::{DriveStore, EligibilityRecordStore, RepositoryError, StudentDirectory};

/// Service composing the drive catalog, the eligibility record store, and the
/// student directory: drive lifecycle orchestration on the admin side,
/// response state transitions on the student side.
pub struct DrivePlacementService<D, E, S> {
    drives: Arc<D>,
    records: Arc<E>,
    directory: Arc<S>,
}

static DRIVE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_drive_id() -> DriveId {
    let id = DRIVE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    DriveId(format!("drive-{id:06}"))
}

/// Result of registering a drive: the persisted drive plus seeding counters.
/// Individual seed failures are tolerated and reported, never fatal.
#[derive(Debug, Clone)]
pub struct DriveCreated {
    pub drive: Drive,
    pub seeded: usize,
    pub failed: usize,
}

/// Result of a drive update. `updated == false` means the payload matched the
/// stored drive value-for-value and nothing was touched.
#[derive(Debug, Clone)]
pub struct DriveUpdateOutcome {
    pub drive: Drive,
    pub updated: bool,
    pub criteria_changed: bool,
    pub removed: usize,
    pub reset: usize,
    pub added: usize,
    pub failed: usize,
}

impl DriveUpdateOutcome {
    fn unchanged(drive: Drive) -> Self {
        Self {
            drive,
            updated: false,
            criteria_changed: false,
            removed: 0,
            reset: 0,
            added: 0,
            failed: 0,
        }
    }
}

/// Outcome of a student viewing a drive, distinguishing "updated" from
/// "nothing to update".
#[derive(Debug, Clone)]
pub struct SeenOutcome {
    pub changed: bool,
    pub record: Option<EligibilityRecord>,
}

/// Error raised by the placement service.
#[derive(Debug, thiserror::Error)]
pub enum DriveServiceError {
    #[error(transparent)]
    Criteria(#[from] CriteriaViolation),
    #[error("drive submission invalid: {0}")]
    InvalidSubmission(String),
    #[error("drive not found")]
    DriveNotFound,
    #[error("student not found")]
    StudentNotFound,
    #[error("eligibility record not found")]
    RecordNotFound,
    #[error("no students satisfy the drive criteria")]
    NoEligibleCandidates,
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl<D, E, S> DrivePlacementService<D, E, S>
where
    D: DriveStore + 'static,
    E: EligibilityRecordStore + 'static,
    S: StudentDirectory + 'static,
{
    pub fn new(drives: Arc<D>, records: Arc<E>, directory: Arc<S>) -> Self {
        Self {
            drives,
            records,
            directory,
        }
    }

    /// Register a drive and seed one record per eligible student.
    ///
    /// A drive matching zero students is invalid input and is not persisted.
    pub fn create_drive(
        &self,
        submission: DriveSubmission,
    ) -> Result<DriveCreated, DriveServiceError> {
        if submission.company_name.trim().is_empty() {
            return Err(DriveServiceError::InvalidSubmission(
                "company_name is required".to_string(),
            ));
        }
        if submission.job_title.trim().is_empty() {
            return Err(DriveServiceError::InvalidSubmission(
                "job_title is required".to_string(),
            ));
        }
        validate_criteria(&submission.criteria)?;

        let population = self.directory.list_students()?;
        let eligible = eligible_students(&submission.criteria, &population);
        if eligible.is_empty() {
            return Err(DriveServiceError::NoEligibleCandidates);
        }

        let now = Utc::now();
        let drive = Drive {
            drive_id: next_drive_id(),
            company_name: submission.company_name,
            company_website: submission.company_website,
            job_title: submission.job_title,
            job_description: submission.job_description,
            expected_compensation: submission.expected_compensation,
            venue: submission.venue,
            date_of_drive: submission.date_of_drive,
            criteria: submission.criteria,
            created_at: now,
            updated_at: now,
        };
        self.drives.insert(drive.clone())?;

        let (seeded, failed) = self.seed_records(&drive.drive_id, &eligible);
        info!(
            drive = %drive.drive_id.0,
            company = %drive.company_name,
            seeded,
            failed,
            "registered drive"
        );

        Ok(DriveCreated {
            drive,
            seeded,
            failed,
        })
    }

    /// Apply allow-listed changes to a drive and converge its eligibility
    /// records onto the effective next criteria.
    ///
    /// Re-running the same update is idempotent: an unchanged payload reports
    /// `updated: false` and touches nothing, and recomputation from current
    /// state always yields the same reconciliation buckets.
    pub fn update_drive(
        &self,
        drive_id: &DriveId,
        changes: &DriveChanges,
    ) -> Result<DriveUpdateOutcome, DriveServiceError> {
        let current = self
            .drives
            .fetch(drive_id)?
            .ok_or(DriveServiceError::DriveNotFound)?;

        let mut next = current.overlay(changes);
        validate_criteria(&next.criteria)?;

        let criteria_changed = next.criteria != current.criteria;
        if !current.content_differs(&next) {
            return Ok(DriveUpdateOutcome::unchanged(current));
        }

        next.updated_at = Utc::now();
        self.drives.update(next.clone())?;

        let existing_records = self.records.list_for_drive(drive_id)?;

        let mut outcome = DriveUpdateOutcome {
            drive: next.clone(),
            updated: true,
            criteria_changed,
            removed: 0,
            reset: 0,
            added: 0,
            failed: 0,
        };

        if !criteria_changed {
            // Content-only edit: membership is untouched, but every record is
            // flagged so respondents re-confirm against the new details.
            for record in existing_records {
                match self.reset_record(record) {
                    Ok(()) => outcome.reset += 1,
                    Err(error) => {
                        outcome.failed += 1;
                        warn!(drive = %drive_id.0, %error, "failed to flag record after drive edit");
                    }
                }
            }
        } else {
            let existing: BTreeSet<StudentId> = existing_records
                .iter()
                .map(|record| record.student_id.clone())
                .collect();
            let population = self.directory.list_students()?;
            let desired = eligible_students(&next.criteria, &population);
            let plan = reconcile::plan(&existing, &desired);

            for student in &plan.removed {
                match self.records.delete(student, drive_id) {
                    Ok(()) => outcome.removed += 1,
                    Err(error) => {
                        outcome.failed += 1;
                        warn!(drive = %drive_id.0, student = %student.0, %error, "failed to remove stale record");
                    }
                }
            }

            let by_student: HashMap<StudentId, EligibilityRecord> = existing_records
                .into_iter()
                .map(|record| (record.student_id.clone(), record))
                .collect();
            for student in &plan.stayed {
                let Some(record) = by_student.get(student).cloned() else {
                    continue;
                };
                match self.reset_record(record) {
                    Ok(()) => outcome.reset += 1,
                    Err(error) => {
                        outcome.failed += 1;
                        warn!(drive = %drive_id.0, student = %student.0, %error, "failed to reset retained record");
                    }
                }
            }

            let (added, add_failed) = self.seed_records(drive_id, &plan.added);
            outcome.added = added;
            outcome.failed += add_failed;
        }

        info!(
            drive = %drive_id.0,
            criteria_changed,
            removed = outcome.removed,
            reset = outcome.reset,
            added = outcome.added,
            failed = outcome.failed,
            "updated drive"
        );

        Ok(outcome)
    }

    /// Evaluate criteria against the live population without persisting
    /// anything: the admin-side "who would qualify" preview.
    pub fn preview_eligible(
        &self,
        criteria: &EligibilityCriteria,
    ) -> Result<Vec<StudentAttributes>, DriveServiceError> {
        validate_criteria(criteria)?;
        let population = self.directory.list_students()?;
        Ok(population
            .into_iter()
            .filter(|student| is_eligible(criteria, student))
            .collect())
    }

    /// Admin listing of every drive with participation counters.
    pub fn list_drives(&self) -> Result<Vec<DriveSummary>, DriveServiceError> {
        let drives = self.drives.list()?;
        let mut summaries = Vec::with_capacity(drives.len());
        for drive in drives {
            let records = self.records.list_for_drive(&drive.drive_id)?;
            let eligible_count = records.len();
            let responded_count = records
                .iter()
                .filter(|record| record.status != ResponseStatus::Unseen)
                .count();
            summaries.push(DriveSummary {
                drive,
                eligible_count,
                responded_count,
            });
        }
        Ok(summaries)
    }

    /// Student viewed the drive: `unseen` advances to `seen` and the
    /// drive-updated flag clears. A `willing`/`not willing` status never
    /// regresses. Missing record is a no-op, not an error.
    pub fn mark_seen(
        &self,
        student_id: &StudentId,
        drive_id: &DriveId,
    ) -> Result<SeenOutcome, DriveServiceError> {
        self.require_student(student_id)?;

        let Some(mut record) = self.records.fetch(student_id, drive_id)? else {
            return Ok(SeenOutcome {
                changed: false,
                record: None,
            });
        };

        let mut changed = false;
        if record.status == ResponseStatus::Unseen {
            record.status = ResponseStatus::Seen;
            changed = true;
        }
        if record.drive_updated {
            record.drive_updated = false;
            changed = true;
        }
        if changed {
            record.updated_at = Utc::now();
            self.records.update(record.clone())?;
        }

        Ok(SeenOutcome {
            changed,
            record: Some(record),
        })
    }

    /// Record the student's decision. Valid from any current status, and a
    /// prior response may be changed while the record exists. Responding never
    /// deletes a record; removal belongs to the update path alone.
    pub fn respond(
        &self,
        student_id: &StudentId,
        drive_id: &DriveId,
        decision: ResponseDecision,
    ) -> Result<EligibilityRecord, DriveServiceError> {
        self.require_student(student_id)?;

        let mut record = self
            .records
            .fetch(student_id, drive_id)?
            .ok_or(DriveServiceError::RecordNotFound)?;

        record.status = decision.status();
        record.updated_at = Utc::now();
        self.records.update(record.clone())?;
        Ok(record)
    }

    /// Records for a student, newest first, optionally filtered by status.
    pub fn list_eligible(
        &self,
        student_id: &StudentId,
        status: Option<ResponseStatus>,
    ) -> Result<Vec<EligibilityRecord>, DriveServiceError> {
        self.require_student(student_id)?;

        let mut records = self.records.list_for_student(student_id, status)?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    fn require_student(&self, student_id: &StudentId) -> Result<(), DriveServiceError> {
        self.directory
            .find(student_id)?
            .map(|_| ())
            .ok_or(DriveServiceError::StudentNotFound)
    }

    /// Insert fresh records for a set of students. A duplicate-key conflict
    /// means a concurrent seeder already converged the pair and counts as
    /// seeded; other per-item failures are logged and counted, never fatal.
    fn seed_records(&self, drive_id: &DriveId, students: &BTreeSet<StudentId>) -> (usize, usize) {
        let now = Utc::now();
        let mut seeded = 0;
        let mut failed = 0;
        for student in students {
            let record = EligibilityRecord::fresh(student.clone(), drive_id.clone(), now);
            match self.records.insert(record) {
                Ok(()) => seeded += 1,
                Err(RepositoryError::Conflict) => {
                    seeded += 1;
                    warn!(drive = %drive_id.0, student = %student.0, "record already present, skipping seed");
                }
                Err(error) => {
                    failed += 1;
                    warn!(drive = %drive_id.0, student = %student.0, %error, "failed to seed record");
                }
            }
        }
        (seeded, failed)
    }

    fn reset_record(&self, mut record: EligibilityRecord) -> Result<(), RepositoryError> {
        record.status = ResponseStatus::Unseen;
        record.drive_updated = true;
        record.updated_at = Utc::now();
        self.records.update(record)
    }
}
