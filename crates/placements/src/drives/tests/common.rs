use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;

use crate::drives::domain::{
    Department, Drive, DriveId, DriveSubmission, EligibilityCriteria, EligibilityRecord,
    ResponseStatus, StudentAttributes, StudentId, UserRole,
};
use crate::drives::repository::{
    DriveStore, EligibilityRecordStore, RepositoryError, StudentDirectory,
};
use crate::drives::service::DrivePlacementService;

pub(super) fn student(id: &str, dept: &str, gpa: f64, offers: u8) -> StudentAttributes {
    StudentAttributes {
        student_id: StudentId(id.to_string()),
        name: format!("Student {id}"),
        role: UserRole::Student,
        department: Some(Department::new(dept)),
        gpa,
        active_offers: offers,
    }
}

/// A, B, C mirror the canonical reconciliation scenario; the admin and the
/// offer-holder exist to exercise the candidate predicate.
pub(super) fn population() -> Vec<StudentAttributes> {
    vec![
        student("stu-a", "CSE", 8.5, 0),
        student("stu-b", "CSE", 7.0, 0),
        student("stu-c", "ECE", 9.0, 0),
        student("stu-d", "MECH", 9.2, 1),
        StudentAttributes {
            student_id: StudentId("adm-1".to_string()),
            name: "Placement Officer".to_string(),
            role: UserRole::Admin,
            department: Some(Department::new("CSE")),
            gpa: 9.0,
            active_offers: 0,
        },
    ]
}

pub(super) fn criteria(departments: &[&str], min_gpa: f64) -> EligibilityCriteria {
    EligibilityCriteria {
        departments: departments.iter().map(|dept| Department::new(dept)).collect(),
        min_gpa,
    }
}

pub(super) fn submission(criteria: EligibilityCriteria) -> DriveSubmission {
    DriveSubmission {
        company_name: "Orion Systems".to_string(),
        company_website: Some("https://orion.example".to_string()),
        job_title: "Graduate Engineer".to_string(),
        job_description: Some("Platform engineering role".to_string()),
        expected_compensation: 1_200_000,
        venue: Some("Main Auditorium".to_string()),
        date_of_drive: Utc.with_ymd_and_hms(2026, 9, 15, 9, 0, 0).unwrap(),
        criteria,
    }
}

pub(super) type TestService =
    DrivePlacementService<MemoryDriveStore, MemoryRecordStore, MemoryDirectory>;

pub(super) fn build_service() -> (
    TestService,
    Arc<MemoryDriveStore>,
    Arc<MemoryRecordStore>,
    Arc<MemoryDirectory>,
) {
    let drives = Arc::new(MemoryDriveStore::default());
    let records = Arc::new(MemoryRecordStore::default());
    let directory = Arc::new(MemoryDirectory::new(population()));
    let service = DrivePlacementService::new(drives.clone(), records.clone(), directory.clone());
    (service, drives, records, directory)
}

pub(super) fn record_students(records: &[EligibilityRecord]) -> BTreeSet<StudentId> {
    records
        .iter()
        .map(|record| record.student_id.clone())
        .collect()
}

pub(super) fn student_ids(ids: &[&str]) -> BTreeSet<StudentId> {
    ids.iter().map(|id| StudentId(id.to_string())).collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

#[derive(Default)]
pub(super) struct MemoryDriveStore {
    drives: Mutex<HashMap<DriveId, Drive>>,
}

impl DriveStore for MemoryDriveStore {
    fn insert(&self, drive: Drive) -> Result<(), RepositoryError> {
        let mut guard = self.drives.lock().expect("drive mutex poisoned");
        if guard.contains_key(&drive.drive_id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(drive.drive_id.clone(), drive);
        Ok(())
    }

    fn fetch(&self, id: &DriveId) -> Result<Option<Drive>, RepositoryError> {
        let guard = self.drives.lock().expect("drive mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, drive: Drive) -> Result<(), RepositoryError> {
        let mut guard = self.drives.lock().expect("drive mutex poisoned");
        if !guard.contains_key(&drive.drive_id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(drive.drive_id.clone(), drive);
        Ok(())
    }

    fn list(&self) -> Result<Vec<Drive>, RepositoryError> {
        let guard = self.drives.lock().expect("drive mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

#[derive(Default)]
pub(super) struct MemoryRecordStore {
    records: Mutex<HashMap<(StudentId, DriveId), EligibilityRecord>>,
}

impl EligibilityRecordStore for MemoryRecordStore {
    fn insert(&self, record: EligibilityRecord) -> Result<(), RepositoryError> {
        let key = (record.student_id.clone(), record.drive_id.clone());
        let mut guard = self.records.lock().expect("record mutex poisoned");
        if guard.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(key, record);
        Ok(())
    }

    fn fetch(
        &self,
        student: &StudentId,
        drive: &DriveId,
    ) -> Result<Option<EligibilityRecord>, RepositoryError> {
        let guard = self.records.lock().expect("record mutex poisoned");
        Ok(guard.get(&(student.clone(), drive.clone())).cloned())
    }

    fn update(&self, record: EligibilityRecord) -> Result<(), RepositoryError> {
        let key = (record.student_id.clone(), record.drive_id.clone());
        let mut guard = self.records.lock().expect("record mutex poisoned");
        if !guard.contains_key(&key) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(key, record);
        Ok(())
    }

    fn delete(&self, student: &StudentId, drive: &DriveId) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("record mutex poisoned");
        guard
            .remove(&(student.clone(), drive.clone()))
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn list_for_drive(&self, drive: &DriveId) -> Result<Vec<EligibilityRecord>, RepositoryError> {
        let guard = self.records.lock().expect("record mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.drive_id == drive)
            .cloned()
            .collect())
    }

    fn list_for_student(
        &self,
        student: &StudentId,
        status: Option<ResponseStatus>,
    ) -> Result<Vec<EligibilityRecord>, RepositoryError> {
        let guard = self.records.lock().expect("record mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| &record.student_id == student)
            .filter(|record| status.map_or(true, |wanted| record.status == wanted))
            .cloned()
            .collect())
    }
}

pub(super) struct MemoryDirectory {
    students: Vec<StudentAttributes>,
}

impl MemoryDirectory {
    pub(super) fn new(students: Vec<StudentAttributes>) -> Self {
        Self { students }
    }
}

impl StudentDirectory for MemoryDirectory {
    fn find(&self, id: &StudentId) -> Result<Option<StudentAttributes>, RepositoryError> {
        Ok(self
            .students
            .iter()
            .find(|student| &student.student_id == id)
            .cloned())
    }

    fn list_students(&self) -> Result<Vec<StudentAttributes>, RepositoryError> {
        Ok(self.students.clone())
    }
}

/// Record store whose inserts fail for one chosen student, for exercising
/// partial-failure tolerance in bulk seeding.
pub(super) struct FlakyRecordStore {
    pub(super) inner: MemoryRecordStore,
    pub(super) fail_for: StudentId,
}

impl EligibilityRecordStore for FlakyRecordStore {
    fn insert(&self, record: EligibilityRecord) -> Result<(), RepositoryError> {
        if record.student_id == self.fail_for {
            return Err(RepositoryError::Unavailable("record shard offline".to_string()));
        }
        self.inner.insert(record)
    }

    fn fetch(
        &self,
        student: &StudentId,
        drive: &DriveId,
    ) -> Result<Option<EligibilityRecord>, RepositoryError> {
        self.inner.fetch(student, drive)
    }

    fn update(&self, record: EligibilityRecord) -> Result<(), RepositoryError> {
        self.inner.update(record)
    }

    fn delete(&self, student: &StudentId, drive: &DriveId) -> Result<(), RepositoryError> {
        self.inner.delete(student, drive)
    }

    fn list_for_drive(&self, drive: &DriveId) -> Result<Vec<EligibilityRecord>, RepositoryError> {
        self.inner.list_for_drive(drive)
    }

    fn list_for_student(
        &self,
        student: &StudentId,
        status: Option<ResponseStatus>,
    ) -> Result<Vec<EligibilityRecord>, RepositoryError> {
        self.inner.list_for_student(student, status)
    }
}
