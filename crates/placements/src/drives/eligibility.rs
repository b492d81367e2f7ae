use std::collections::BTreeSet;

use super::domain::{EligibilityCriteria, StudentAttributes, StudentId, UserRole};

/// Validation errors raised for malformed eligibility criteria.
#[derive(Debug, thiserror::Error)]
pub enum CriteriaViolation {
    #[error("criteria must include at least one qualifying department")]
    EmptyDepartments,
    #[error("minimum GPA must be a finite non-negative number (found {found})")]
    InvalidMinimumGpa { found: f64 },
}

pub fn validate_criteria(criteria: &EligibilityCriteria) -> Result<(), CriteriaViolation> {
    if criteria.departments.is_empty() {
        return Err(CriteriaViolation::EmptyDepartments);
    }
    if !criteria.min_gpa.is_finite() || criteria.min_gpa < 0.0 {
        return Err(CriteriaViolation::InvalidMinimumGpa {
            found: criteria.min_gpa,
        });
    }
    Ok(())
}

/// Whether a single student satisfies the drive criteria. Students holding an
/// active offer are not candidates.
pub fn is_eligible(criteria: &EligibilityCriteria, student: &StudentAttributes) -> bool {
    student.role == UserRole::Student
        && student.active_offers == 0
        && student.gpa >= criteria.min_gpa
        && student
            .department
            .as_ref()
            .is_some_and(|dept| criteria.departments.contains(dept))
}

/// Pure evaluation of a drive's criteria against the student population.
///
/// Returns the exact set of eligible identities; an empty set is a valid
/// result, distinct from any failure. Safe to call repeatedly and
/// concurrently — no side effects.
pub fn eligible_students(
    criteria: &EligibilityCriteria,
    population: &[StudentAttributes],
) -> BTreeSet<StudentId> {
    population
        .iter()
        .filter(|student| is_eligible(criteria, student))
        .map(|student| student.student_id.clone())
        .collect()
}
