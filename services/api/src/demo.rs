use crate::infra::{load_directory, InMemoryDriveCatalog, InMemoryEligibilityTable};
use chrono::{Duration, Utc};
use clap::Args;
use placements::drives::{
    Department, DriveChanges, DrivePlacementService, DriveSubmission, EligibilityCriteria,
    ResponseDecision, StudentId,
};
use placements::error::AppError;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// CSV roster used to hydrate the student directory
    #[arg(long)]
    pub(crate) roster: Option<PathBuf>,
}

/// Scripted walkthrough of the drive lifecycle against in-memory stores:
/// create a drive, collect a response, edit content, then widen criteria.
pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let directory = Arc::new(load_directory(args.roster.as_deref())?);
    let drives = Arc::new(InMemoryDriveCatalog::default());
    let records = Arc::new(InMemoryEligibilityTable::default());
    let service = DrivePlacementService::new(drives, records, directory);

    let criteria = EligibilityCriteria {
        departments: [Department::new("CSE")].into_iter().collect(),
        min_gpa: 7.5,
    };

    println!("== Preview ==");
    let preview = service.preview_eligible(&criteria)?;
    println!(
        "criteria CSE / 7.5 matches {} student(s): {:?}",
        preview.len(),
        preview
            .iter()
            .map(|student| student.student_id.0.as_str())
            .collect::<Vec<_>>()
    );

    let submission = DriveSubmission {
        company_name: "Orion Systems".to_owned(),
        company_website: Some("https://orion.example".to_owned()),
        job_title: "Graduate Engineer".to_owned(),
        job_description: Some("Backend platform team".to_owned()),
        expected_compensation: 1_200_000,
        venue: Some("Main Auditorium".to_owned()),
        date_of_drive: Utc::now() + Duration::days(14),
        criteria,
    };

    println!("\n== Create ==");
    let created = service.create_drive(submission)?;
    let drive_id = created.drive.drive_id.clone();
    println!(
        "created {} with {} eligibility record(s) ({} failed)",
        drive_id.0, created.seeded, created.failed
    );

    let responder = StudentId("stu-101".to_owned());
    println!("\n== Respond ==");
    service.mark_seen(&responder, &drive_id)?;
    let record = service.respond(&responder, &drive_id, ResponseDecision::Willing)?;
    println!("{} is now '{}'", responder.0, record.status.label());

    println!("\n== Content edit ==");
    let outcome = service.update_drive(
        &drive_id,
        &DriveChanges {
            venue: Some("Seminar Hall B".to_owned()),
            ..DriveChanges::default()
        },
    )?;
    println!(
        "venue change reset {} record(s); criteria changed: {}",
        outcome.reset, outcome.criteria_changed
    );

    println!("\n== Widen criteria ==");
    let outcome = service.update_drive(
        &drive_id,
        &DriveChanges {
            departments: Some(
                [Department::new("CSE"), Department::new("ECE")]
                    .into_iter()
                    .collect(),
            ),
            ..DriveChanges::default()
        },
    )?;
    println!(
        "removed {}, reset {}, added {} record(s)",
        outcome.removed, outcome.reset, outcome.added
    );

    println!("\n== Summary ==");
    for summary in service.list_drives()? {
        println!(
            "{}: {} eligible, {} responded",
            summary.drive.company_name, summary.eligible_count, summary.responded_count
        );
    }

    Ok(())
}
