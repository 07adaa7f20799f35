use crate::infra::{development_store, DevIdentityProvider};
use clap::Args;
use lar_margaridas::error::AppError;
use lar_margaridas::session::SessionObserver;
use lar_margaridas::workflows::catalog::{CatalogService, CourseEnrollmentWorkflow};
use lar_margaridas::workflows::notice::Notice;
use lar_margaridas::workflows::volunteers::{
    FormView, Specialty, VolunteerApplicationDraft, VolunteerApplicationWorkflow, VolunteerForm,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// User id the demo signs in as
    #[arg(long, default_value = "voluntaria-demo")]
    pub(crate) user: String,
    /// Specialty code submitted with the application
    #[arg(long, default_value = "informatics", value_parser = parse_specialty)]
    pub(crate) specialty: Specialty,
    /// Print each step as a JSON line instead of text
    #[arg(long)]
    pub(crate) json: bool,
    /// Skip the catalog and course enrollment portion of the demo
    #[arg(long)]
    pub(crate) skip_catalog: bool,
}

#[derive(Debug, Serialize)]
struct DemoStep<'a> {
    step: &'a str,
    view: String,
    notice: Option<&'a Notice>,
}

struct Printer {
    json: bool,
}

impl Printer {
    fn step(&self, step: &str, view: FormView, notice: Option<&Notice>) -> Result<(), AppError> {
        if self.json {
            let line = serde_json::to_string(&DemoStep {
                step,
                view: format!("{view:?}"),
                notice,
            })
            .map_err(|err| AppError::Io(std::io::Error::other(err)))?;
            println!("{line}");
            return Ok(());
        }

        println!("== {step}");
        println!("   view: {view:?}");
        if let Some(notice) = notice {
            println!(
                "   [{:?}] {}: {}",
                notice.tone, notice.title, notice.description
            );
        }
        Ok(())
    }

    fn line(&self, text: impl AsRef<str>) {
        if !self.json {
            println!("   {}", text.as_ref());
        }
    }
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let printer = Printer { json: args.json };
    let store = Arc::new(development_store());
    let identity = DevIdentityProvider;
    let observer = SessionObserver::new();
    let workflow = VolunteerApplicationWorkflow::new(store.clone());
    let mut form = VolunteerForm::attach(&observer);

    printer.step("page opened", form.view(), None)?;

    observer.hydrate(&identity, None).await;
    let notice = form.submit(&workflow).await;
    printer.step("submitted while signed out", form.view(), Some(&notice))?;

    let token = format!("dev:{}", args.user);
    observer.hydrate(&identity, Some(&token)).await;
    let notice = form.submit(&workflow).await;
    printer.step("submitted an empty form", form.view(), Some(&notice))?;

    *form.draft_mut() = sample_draft(args.specialty);
    let notice = form.submit(&workflow).await;
    printer.step("submitted a complete form", form.view(), Some(&notice))?;
    printer.line(format!("draft cleared: {}", form.draft() == &VolunteerApplicationDraft::default()));

    *form.draft_mut() = sample_draft(args.specialty);
    let notice = form.submit(&workflow).await;
    printer.step("submitted the same application again", form.view(), Some(&notice))?;

    if args.skip_catalog {
        return Ok(());
    }

    let catalog = CatalogService::new(store.clone());
    let highlights = catalog.highlights().await;
    printer.line(format!(
        "highlights: {} announcement(s), {} project(s), {} course(s)",
        highlights.announcements.len(),
        highlights.projects.len(),
        highlights.courses.len()
    ));

    let enrollment = CourseEnrollmentWorkflow::new(store);
    let session = observer.current();
    for course in highlights
        .courses
        .iter()
        .filter(|course| course.accepts_enrollment())
    {
        for attempt in ["enrolled in", "enrolled again in"] {
            let outcome = enrollment.enroll(&course.id, &session).await;
            let step = format!("{attempt} {}", course.title);
            printer.step(&step, form.view(), Some(&outcome.notice()))?;
        }
    }

    Ok(())
}

fn sample_draft(specialty: Specialty) -> VolunteerApplicationDraft {
    VolunteerApplicationDraft::new(
        specialty.code(),
        "Sábados pela manhã",
        "Três anos ensinando informática para adultos em um centro comunitário",
    )
}

fn parse_specialty(raw: &str) -> Result<Specialty, String> {
    Specialty::from_code(raw.trim()).ok_or_else(|| {
        let known: Vec<_> = Specialty::ALL.iter().map(|specialty| specialty.code()).collect();
        format!("unknown specialty '{raw}', expected one of: {}", known.join(", "))
    })
}
