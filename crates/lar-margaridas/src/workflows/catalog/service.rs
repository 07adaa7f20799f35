use std::sync::Arc;

use tracing::{debug, warn};

use super::domain::{Announcement, Course, HighlightSection, Highlights, Project};
use crate::store::{list_as, tables, ListQuery, RecordStore, StoreError};

const HIGHLIGHT_LIMIT: usize = 3;

/// Read-only listings backing the projects, courses and home pages.
pub struct CatalogService<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for CatalogService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> CatalogService<S>
where
    S: RecordStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn projects(&self) -> Result<Vec<Project>, StoreError> {
        let query = ListQuery::table(tables::PROJECTS).newest_first();
        list_as(self.store.as_ref(), &query).await
    }

    pub async fn courses(&self) -> Result<Vec<Course>, StoreError> {
        let query = ListQuery::table(tables::COURSES).newest_first();
        list_as(self.store.as_ref(), &query).await
    }

    /// Latest active announcements, active projects and open courses. Each
    /// section is fetched independently and degrades on its own.
    pub async fn highlights(&self) -> Highlights {
        let announcements = ListQuery::table(tables::ANNOUNCEMENTS)
            .eq("active", true)
            .newest_first()
            .limit(HIGHLIGHT_LIMIT);
        let projects = ListQuery::table(tables::PROJECTS)
            .eq("status", "active")
            .newest_first()
            .limit(HIGHLIGHT_LIMIT);
        let courses = ListQuery::table(tables::COURSES)
            .eq("status", "open")
            .newest_first()
            .limit(HIGHLIGHT_LIMIT);

        let store = self.store.as_ref();
        let (announcements, projects, courses) = tokio::join!(
            list_as::<Announcement, S>(store, &announcements),
            list_as::<Project, S>(store, &projects),
            list_as::<Course, S>(store, &courses),
        );

        let mut unavailable = Vec::new();
        let announcements = section(
            HighlightSection::Announcements,
            announcements,
            &mut unavailable,
        );
        let projects = section(HighlightSection::Projects, projects, &mut unavailable);
        let courses = section(HighlightSection::Courses, courses, &mut unavailable);

        debug!(
            announcements = announcements.len(),
            projects = projects.len(),
            courses = courses.len(),
            unavailable = unavailable.len(),
            "home highlights loaded"
        );

        Highlights {
            announcements,
            projects,
            courses,
            unavailable,
        }
    }
}

fn section<T>(
    name: HighlightSection,
    rows: Result<Vec<T>, StoreError>,
    unavailable: &mut Vec<HighlightSection>,
) -> Vec<T> {
    rows.unwrap_or_else(|error| {
        warn!(section = ?name, code = ?error.code, %error, "highlight section unavailable");
        unavailable.push(name);
        Vec::new()
    })
}
