use std::io::Read;

use serde::{Deserialize, Deserializer};

use super::domain::{Department, StudentAttributes, StudentId, UserRole};

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("failed to read roster: {0}")]
    Csv(#[from] csv::Error),
    #[error("roster row {row}: {message}")]
    InvalidRow { row: usize, message: String },
}

/// Parse a student roster export into directory attributes.
///
/// Expected header: `User ID,Name,Role,Department,CGPA,Current Offers`.
pub fn parse_roster<R: Read>(reader: R) -> Result<Vec<StudentAttributes>, RosterError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut students = Vec::new();

    for (index, record) in csv_reader.deserialize::<RosterRow>().enumerate() {
        let row = record?;
        students.push(row.into_attributes(index + 1)?);
    }

    Ok(students)
}

#[derive(Debug, Deserialize)]
struct RosterRow {
    #[serde(rename = "User ID")]
    user_id: String,
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Role", default, deserialize_with = "empty_string_as_none")]
    role: Option<String>,
    #[serde(
        rename = "Department",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    department: Option<String>,
    #[serde(rename = "CGPA", default)]
    cgpa: f64,
    #[serde(rename = "Current Offers", default)]
    current_offers: u8,
}

impl RosterRow {
    fn into_attributes(self, row: usize) -> Result<StudentAttributes, RosterError> {
        if self.user_id.is_empty() {
            return Err(RosterError::InvalidRow {
                row,
                message: "missing user id".to_string(),
            });
        }

        let role = match self.role.as_deref() {
            Some("admin") => UserRole::Admin,
            Some("student") | None => UserRole::Student,
            Some(other) => {
                return Err(RosterError::InvalidRow {
                    row,
                    message: format!("unknown role '{other}'"),
                })
            }
        };

        Ok(StudentAttributes {
            student_id: StudentId(self.user_id),
            name: self.name,
            role,
            department: self.department.as_deref().map(Department::new),
            gpa: self.cgpa,
            active_offers: self.current_offers,
        })
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.trim().is_empty()))
}
