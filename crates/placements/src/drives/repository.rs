use super::domain::{
    Drive, DriveId, EligibilityRecord, ResponseStatus, StudentAttributes, StudentId,
};

/// Error enumeration for storage failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Drive catalog contract consumed by the lifecycle service.
pub trait DriveStore: Send + Sync {
    fn insert(&self, drive: Drive) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &DriveId) -> Result<Option<Drive>, RepositoryError>;
    fn update(&self, drive: Drive) -> Result<(), RepositoryError>;
    fn list(&self) -> Result<Vec<Drive>, RepositoryError>;
}

/// Keyed table of (student, drive) response records.
///
/// Implementations enforce the composite-key uniqueness invariant: `insert`
/// for an existing pair fails with `Conflict` rather than producing a second
/// row, so concurrent seeders racing on the same pair converge to one record.
pub trait EligibilityRecordStore: Send + Sync {
    fn insert(&self, record: EligibilityRecord) -> Result<(), RepositoryError>;
    fn fetch(
        &self,
        student: &StudentId,
        drive: &DriveId,
    ) -> Result<Option<EligibilityRecord>, RepositoryError>;
    /// Replace the record for the pair; `NotFound` if absent.
    fn update(&self, record: EligibilityRecord) -> Result<(), RepositoryError>;
    fn delete(&self, student: &StudentId, drive: &DriveId) -> Result<(), RepositoryError>;
    fn list_for_drive(&self, drive: &DriveId) -> Result<Vec<EligibilityRecord>, RepositoryError>;
    fn list_for_student(
        &self,
        student: &StudentId,
        status: Option<ResponseStatus>,
    ) -> Result<Vec<EligibilityRecord>, RepositoryError>;
}

/// Externally-owned student population. The directory only supplies
/// attributes; all filtering belongs to the criteria evaluator.
pub trait StudentDirectory: Send + Sync {
    fn find(&self, id: &StudentId) -> Result<Option<StudentAttributes>, RepositoryError>;
    fn list_students(&self) -> Result<Vec<StudentAttributes>, RepositoryError>;
}
