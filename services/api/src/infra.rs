use metrics_exporter_prometheus::PrometheusHandle;
use placements::drives::{
    parse_roster, Drive, DriveId, DriveStore, EligibilityRecord, EligibilityRecordStore,
    RepositoryError, ResponseStatus, StudentAttributes, StudentDirectory, StudentId,
};
use placements::error::AppError;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Built-in roster used when no CSV is supplied, mirroring the shape of the
/// registrar export.
const SAMPLE_ROSTER: &str = "\
User ID,Name,Role,Department,CGPA,Current Offers
stu-101,Ananya Rao,student,CSE,8.7,0
stu-102,Rohit Menon,student,CSE,7.6,0
stu-103,Priya Nair,student,ECE,9.1,0
stu-104,Arjun Shetty,student,EEE,8.2,0
stu-105,Kavya Pillai,student,MECH,8.9,1
adm-001,Placement Officer,admin,,0,0
";

pub(crate) fn load_directory(
    roster_path: Option<&Path>,
) -> Result<InMemoryStudentDirectory, AppError> {
    let students = match roster_path {
        Some(path) => parse_roster(File::open(path)?)?,
        None => parse_roster(SAMPLE_ROSTER.as_bytes())?,
    };
    Ok(InMemoryStudentDirectory::new(students))
}

#[derive(Default)]
pub(crate) struct InMemoryDriveCatalog {
    drives: Mutex<HashMap<DriveId, Drive>>,
}

impl DriveStore for InMemoryDriveCatalog {
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
pub(crate) struct InMemoryEligibilityTable {
    records: Mutex<HashMap<(StudentId, DriveId), EligibilityRecord>>,
}

impl EligibilityRecordStore for InMemoryEligibilityTable {
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

pub(crate) struct InMemoryStudentDirectory {
    students: Vec<StudentAttributes>,
}

impl InMemoryStudentDirectory {
    pub(crate) fn new(students: Vec<StudentAttributes>) -> Self {
        Self { students }
    }

    pub(crate) fn len(&self) -> usize {
        self.students.len()
    }
}

impl StudentDirectory for InMemoryStudentDirectory {
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
