//! Project, course and announcement listings plus course enrollment.

pub mod domain;
pub mod enrollment;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    Announcement, Course, CourseEnrollment, CourseStatus, EnrollmentOutcome, EnrollmentStatus,
    HighlightSection, Highlights, Project, ProjectStatus,
};
pub use enrollment::CourseEnrollmentWorkflow;
pub use router::{catalog_router, CatalogRoutes};
pub use service::CatalogService;
