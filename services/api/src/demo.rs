use crate::infra::{
    InMemoryAccountDirectory, InMemoryApplicationStore, InMemoryIdentityProvider, InMemoryJobStore,
    InMemoryProfileStore, MailEvent,
};
use alumnet::board::accounts::{
    AccountDirectory, AccountRecord, AccountService, Credentials, RegistrationForm, Role,
};
use alumnet::board::applications::{
    ApplicationForm, CvRef, JobApplicationService, ReviewDecision,
};
use alumnet::board::attachment::AttachmentError;
use alumnet::board::jobs::{JobBoardService, JobControls, JobDraft, JobId};
use alumnet::board::profiles::{PictureRef, ProfileService, WizardInput};
use alumnet::error::AppError;
use chrono::{Duration, Utc};
use clap::Args;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Listing duration for the demo posting, in days
    #[arg(long, default_value_t = 14)]
    pub(crate) duration_days: u32,
    /// Path stamped on the demo CV reference; the content type is guessed
    /// from the extension
    #[arg(long, default_value = "resume.pdf")]
    pub(crate) cv: PathBuf,
    /// Stop after the application is submitted, skipping the admin review
    #[arg(long)]
    pub(crate) skip_review: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ExportArgs {
    /// Write the CSV here instead of standard output
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Path stamped on the seeded CV references; the content type is
    /// guessed from the extension
    #[arg(long, default_value = "resume.pdf")]
    pub(crate) cv: PathBuf,
}

const ADMIN_EMAIL: &str = "admin@alumni.example";
const ADMIN_PASSWORD: &str = "demo-admin-pass";
const MEMBER_EMAIL: &str = "dana@alumni.example";
const MEMBER_PASSWORD: &str = "demo-member-pass";

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Alumni job-board demo");
    if let Err(err) = walk_board(&args) {
        println!("Demo aborted: {err}");
    }
    Ok(())
}

/// Seed a few records against the same in-memory ports the server wires,
/// then render the admin export. The hosted collections are out of reach
/// from the CLI, so the export surface is exercised on seeded data.
pub(crate) fn run_applications_export(args: ExportArgs) -> Result<(), AppError> {
    let bytes = match render_export(&args.cv) {
        Ok(bytes) => bytes,
        Err(err) => {
            println!("Export aborted: {err}");
            return Ok(());
        }
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &bytes)?;
            println!("Wrote {} byte(s) to {}", bytes.len(), path.display());
        }
        None => std::io::stdout().write_all(&bytes)?,
    }
    Ok(())
}

struct DemoBoard {
    provider: Arc<InMemoryIdentityProvider>,
    accounts: AccountService<InMemoryIdentityProvider, InMemoryAccountDirectory>,
    profiles: ProfileService<InMemoryProfileStore, InMemoryAccountDirectory>,
    jobs: JobBoardService<InMemoryJobStore>,
    applications: JobApplicationService<InMemoryApplicationStore>,
}

/// Wire the in-memory ports and seed the admin account the way server
/// startup does.
fn seeded_board() -> Result<DemoBoard, Box<dyn std::error::Error>> {
    let provider = Arc::new(InMemoryIdentityProvider::default());
    let directory = Arc::new(InMemoryAccountDirectory::default());

    let admin_id = provider.register_verified(ADMIN_EMAIL, ADMIN_PASSWORD)?;
    directory.upsert(AccountRecord {
        id: admin_id,
        email: ADMIN_EMAIL.to_string(),
        role: Role::Admin,
        profile_completed: true,
    })?;

    Ok(DemoBoard {
        provider: provider.clone(),
        accounts: AccountService::new(provider, directory.clone()),
        profiles: ProfileService::new(Arc::new(InMemoryProfileStore::default()), directory),
        jobs: JobBoardService::new(Arc::new(InMemoryJobStore::default())),
        applications: JobApplicationService::new(Arc::new(InMemoryApplicationStore::default())),
    })
}

fn walk_board(args: &DemoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let board = seeded_board()?;

    println!("\nRegistration");
    let receipt = board.accounts.register(RegistrationForm {
        email: MEMBER_EMAIL.to_string(),
        password: MEMBER_PASSWORD.to_string(),
        confirm_password: MEMBER_PASSWORD.to_string(),
    })?;
    println!("- {}", receipt.message);
    println!("- next screen: {}", receipt.next.path());
    for event in board.provider.outbox() {
        match event {
            MailEvent::Verification { email } => println!("- mail: verification -> {email}"),
            MailEvent::PasswordReset { email } => println!("- mail: password reset -> {email}"),
        }
    }

    match board.accounts.login(member_credentials()) {
        Err(err) => println!("- login before verification refused: {err}"),
        Ok(_) => println!("- login before verification unexpectedly succeeded"),
    }

    // Stand-in for the emailed verification link being clicked.
    board.provider.mark_verified(MEMBER_EMAIL);
    let member = board.accounts.login(member_credentials())?;
    println!("- verified login lands on: {}", member.next.path());

    println!("\nProfile wizard");
    for input in wizard_inputs()? {
        let progress = board.profiles.apply_step(&member.session.account_id, input)?;
        match progress.next {
            Some(route) => println!(
                "- step {} ({}) -> {}",
                progress.step.number(),
                progress.step.label(),
                route.path()
            ),
            None => println!("- step {} ({})", progress.step.number(), progress.step.label()),
        }
    }
    let member = board.accounts.login(member_credentials())?;
    println!("- next login lands on: {}", member.next.path());

    println!("\nJob posting (admin)");
    let admin = board.accounts.login(admin_credentials())?;
    let now = Utc::now();
    let posted = board
        .jobs
        .post(&admin.account, demo_draft(args.duration_days), now)?;
    println!(
        "- posted {} ({}), expires {}",
        posted.title,
        posted.id.0,
        posted.expires_at.format("%Y-%m-%d")
    );
    // A second posting whose window already closed, to show the sweep.
    board
        .jobs
        .post(&admin.account, stale_draft(), now - Duration::days(3))?;

    let listing = board.jobs.active(now)?;
    println!(
        "- active listing: {} job(s), {} expired record(s) swept",
        listing.jobs.len(),
        listing.swept
    );
    for job in &listing.jobs {
        println!("  - {} | {} | posted {}", job.id.0, job.title, job.posted_label());
    }
    let controls = JobControls::for_role(member.account.role);
    println!(
        "- member controls: can_post={} can_apply={}",
        controls.can_post, controls.can_apply
    );

    println!("\nApplication (alumni)");
    let cv = cv_reference(&args.cv)?;
    println!("- CV reference {} ({})", cv.url, cv.content_type);
    let submitted = board.applications.submit(
        &member.session,
        application_form(posted.id.clone(), Some(cv)),
    )?;
    println!(
        "- submitted {} -> status {}",
        submitted.id.0,
        submitted.status.label()
    );

    if args.skip_review {
        return Ok(());
    }

    println!("\nReview (admin)");
    let queue = board.applications.pending_review(&admin.account)?;
    println!("- pending queue: {} application(s)", queue.len());
    let decided = board
        .applications
        .decide(&admin.account, &submitted.id, ReviewDecision::Approve)?;
    println!("- {} -> {}", decided.id.0, decided.status.label());
    let queue = board.applications.pending_review(&admin.account)?;
    println!("- pending queue after the decision: {} application(s)", queue.len());

    println!("\nApplicant status");
    match board.applications.status_for(&member.session)? {
        Some(record) => {
            let view = record.status_view();
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        None => println!("- no application on file"),
    }

    Ok(())
}

fn render_export(cv_path: &Path) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let board = seeded_board()?;

    board.accounts.register(RegistrationForm {
        email: MEMBER_EMAIL.to_string(),
        password: MEMBER_PASSWORD.to_string(),
        confirm_password: MEMBER_PASSWORD.to_string(),
    })?;
    board.provider.mark_verified(MEMBER_EMAIL);
    let member = board.accounts.login(member_credentials())?;
    let admin = board.accounts.login(admin_credentials())?;

    let now = Utc::now();
    let first = board
        .jobs
        .post(&admin.account, demo_draft(14), now)?;
    let second = board.jobs.post(
        &admin.account,
        JobDraft {
            title: "Alumni Relations Lead".to_string(),
            description: "Coordinate mentorship pairings and reunion events.".to_string(),
            salary: "58000".to_string(),
            duration_days: 30,
        },
        now,
    )?;

    let cv = cv_reference(cv_path)?;
    let submitted = board
        .applications
        .submit(&member.session, application_form(first.id, Some(cv.clone())))?;
    board
        .applications
        .submit(&member.session, application_form(second.id, Some(cv)))?;
    board
        .applications
        .decide(&admin.account, &submitted.id, ReviewDecision::Approve)?;

    Ok(board.applications.export_csv(&admin.account)?)
}

fn member_credentials() -> Credentials {
    Credentials {
        email: MEMBER_EMAIL.to_string(),
        password: MEMBER_PASSWORD.to_string(),
    }
}

fn admin_credentials() -> Credentials {
    Credentials {
        email: ADMIN_EMAIL.to_string(),
        password: ADMIN_PASSWORD.to_string(),
    }
}

fn wizard_inputs() -> Result<Vec<WizardInput>, AttachmentError> {
    Ok(vec![
        WizardInput::Personal {
            name: "Dana Reyes".to_string(),
            birth_date: "04/11/1994".to_string(),
            email: MEMBER_EMAIL.to_string(),
        },
        WizardInput::Location {
            city: "Lisbon".to_string(),
            country: "Portugal".to_string(),
        },
        WizardInput::Education {
            degree: "MSc Software Engineering".to_string(),
            school: "IST".to_string(),
        },
        WizardInput::Picture {
            picture: Some(PictureRef::new("https://cdn.example/dana.png", "image/png")?),
        },
        WizardInput::VerifyEmail,
        WizardInput::WorkAndSkills {
            occupation: "Backend Engineer".to_string(),
            skills: "Rust, SQL".to_string(),
        },
        WizardInput::Done,
    ])
}

fn demo_draft(duration_days: u32) -> JobDraft {
    JobDraft {
        title: "Platform Engineer".to_string(),
        description: "Own the deployment pipeline for the alumni portal.".to_string(),
        salary: "65000".to_string(),
        duration_days,
    }
}

fn stale_draft() -> JobDraft {
    JobDraft {
        title: "Archived Posting".to_string(),
        description: "Listed for a single day, several days ago.".to_string(),
        salary: "52000".to_string(),
        duration_days: 1,
    }
}

fn application_form(job_id: JobId, cv: Option<CvRef>) -> ApplicationForm {
    ApplicationForm {
        job_id,
        applicant_name: "Dana Reyes".to_string(),
        applicant_email: MEMBER_EMAIL.to_string(),
        cover_letter: "I kept the alumni portal running for three years.".to_string(),
        cv,
    }
}

fn cv_reference(path: &Path) -> Result<CvRef, AttachmentError> {
    let guessed = mime_guess::from_path(path).first_or_octet_stream();
    CvRef::new(path.display().to_string(), guessed.essence_str())
}
