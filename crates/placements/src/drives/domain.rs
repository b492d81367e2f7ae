use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for registered students.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

/// Identifier wrapper for recruitment drives.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DriveId(pub String);

/// Canonicalized department code. Matching is case-insensitive because every
/// value is upper-cased on construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String")]
pub struct Department(String);

impl Department {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Department {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

/// Portal roles; only students participate in eligibility evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Student,
}

/// Read-only student snapshot supplied by the directory collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAttributes {
    pub student_id: StudentId,
    pub name: String,
    pub role: UserRole,
    pub department: Option<Department>,
    pub gpa: f64,
    pub active_offers: u8,
}

/// Eligibility criteria attached to a drive: qualifying departments plus a
/// minimum grade-point threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityCriteria {
    pub departments: BTreeSet<Department>,
    pub min_gpa: f64,
}

/// A recruitment opportunity with eligibility criteria and descriptive
/// metadata. Descriptive fields are opaque to the reconciliation core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drive {
    pub drive_id: DriveId,
    pub company_name: String,
    pub company_website: Option<String>,
    pub job_title: String,
    pub job_description: Option<String>,
    pub expected_compensation: u32,
    pub venue: Option<String>,
    pub date_of_drive: DateTime<Utc>,
    pub criteria: EligibilityCriteria,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Drive {
    /// Overlay allow-listed partial changes onto this drive, producing the
    /// effective next state. `company_name` is immutable and never touched.
    pub fn overlay(&self, changes: &DriveChanges) -> Drive {
        let mut next = self.clone();
        if let Some(value) = &changes.company_website {
            next.company_website = Some(value.clone());
        }
        if let Some(value) = &changes.job_title {
            next.job_title = value.clone();
        }
        if let Some(value) = &changes.job_description {
            next.job_description = Some(value.clone());
        }
        if let Some(value) = changes.expected_compensation {
            next.expected_compensation = value;
        }
        if let Some(value) = &changes.venue {
            next.venue = Some(value.clone());
        }
        if let Some(value) = changes.date_of_drive {
            next.date_of_drive = value;
        }
        if let Some(departments) = &changes.departments {
            next.criteria.departments = departments.clone();
        }
        if let Some(min_gpa) = changes.min_gpa {
            next.criteria.min_gpa = min_gpa;
        }
        next
    }

    /// Value-equality over every updatable field; dates compare by instant.
    pub fn content_differs(&self, other: &Drive) -> bool {
        self.company_website != other.company_website
            || self.job_title != other.job_title
            || self.job_description != other.job_description
            || self.expected_compensation != other.expected_compensation
            || self.venue != other.venue
            || self.date_of_drive != other.date_of_drive
            || self.criteria != other.criteria
    }
}

/// Administrator payload registering a new drive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveSubmission {
    pub company_name: String,
    #[serde(default)]
    pub company_website: Option<String>,
    pub job_title: String,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub expected_compensation: u32,
    #[serde(default)]
    pub venue: Option<String>,
    pub date_of_drive: DateTime<Utc>,
    pub criteria: EligibilityCriteria,
}

/// Allow-listed partial update for an existing drive.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriveChanges {
    #[serde(default)]
    pub company_website: Option<String>,
    #[serde(default)]
    pub job_title: Option<String>,
    #[serde(default)]
    pub job_description: Option<String>,
    #[serde(default)]
    pub expected_compensation: Option<u32>,
    #[serde(default)]
    pub venue: Option<String>,
    #[serde(default)]
    pub date_of_drive: Option<DateTime<Utc>>,
    #[serde(default)]
    pub departments: Option<BTreeSet<Department>>,
    #[serde(default)]
    pub min_gpa: Option<f64>,
}

/// Per-record response lifecycle: `unseen -> seen -> {willing, not willing}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Unseen,
    Seen,
    Willing,
    #[serde(rename = "not willing")]
    NotWilling,
}

impl ResponseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ResponseStatus::Unseen => "unseen",
            ResponseStatus::Seen => "seen",
            ResponseStatus::Willing => "willing",
            ResponseStatus::NotWilling => "not willing",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "unseen" => Some(ResponseStatus::Unseen),
            "seen" => Some(ResponseStatus::Seen),
            "willing" => Some(ResponseStatus::Willing),
            "not willing" | "not_willing" => Some(ResponseStatus::NotWilling),
            _ => None,
        }
    }
}

/// A student's answer to a drive they qualify for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseDecision {
    Willing,
    #[serde(rename = "not willing")]
    NotWilling,
}

impl ResponseDecision {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "willing" => Some(ResponseDecision::Willing),
            "not willing" | "not_willing" => Some(ResponseDecision::NotWilling),
            _ => None,
        }
    }

    pub const fn status(self) -> ResponseStatus {
        match self {
            ResponseDecision::Willing => ResponseStatus::Willing,
            ResponseDecision::NotWilling => ResponseStatus::NotWilling,
        }
    }
}

/// The central entity: one row per (student, drive) pair tracking visibility
/// and response. The pair is the composite natural key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EligibilityRecord {
    pub student_id: StudentId,
    pub drive_id: DriveId,
    pub status: ResponseStatus,
    /// Set when the drive changed since the student last viewed it while
    /// remaining eligible; cleared only by the mark-seen transition.
    pub drive_updated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EligibilityRecord {
    /// Fresh record seeded the instant a student becomes eligible.
    pub fn fresh(student_id: StudentId, drive_id: DriveId, at: DateTime<Utc>) -> Self {
        Self {
            student_id,
            drive_id,
            status: ResponseStatus::Unseen,
            drive_updated: false,
            created_at: at,
            updated_at: at,
        }
    }
}

/// Admin-facing drive listing entry with participation counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DriveSummary {
    pub drive: Drive,
    pub eligible_count: usize,
    /// Records whose status moved past `unseen`.
    pub responded_count: usize,
}
