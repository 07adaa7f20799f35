use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::session::UserId;

/// Lifecycle of a community project. Unrecognised values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProjectStatus {
    Active,
    Completed,
    Planned,
    Other(String),
}

impl ProjectStatus {
    pub fn code(&self) -> &str {
        match self {
            ProjectStatus::Active => "active",
            ProjectStatus::Completed => "completed",
            ProjectStatus::Planned => "planned",
            ProjectStatus::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ProjectStatus::Active => "Ativo",
            ProjectStatus::Completed => "Concluído",
            ProjectStatus::Planned => "Planejado",
            ProjectStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for ProjectStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "active" => Self::Active,
            "completed" => Self::Completed,
            "planned" => Self::Planned,
            _ => Self::Other(value),
        }
    }
}

impl From<ProjectStatus> for String {
    fn from(value: ProjectStatus) -> Self {
        value.code().to_string()
    }
}

/// Enrollment state of a course. Unrecognised values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CourseStatus {
    Open,
    Full,
    Closed,
    Other(String),
}

impl CourseStatus {
    pub fn code(&self) -> &str {
        match self {
            CourseStatus::Open => "open",
            CourseStatus::Full => "full",
            CourseStatus::Closed => "closed",
            CourseStatus::Other(raw) => raw,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CourseStatus::Open => "Aberto",
            CourseStatus::Full => "Lotado",
            CourseStatus::Closed => "Encerrado",
            CourseStatus::Other(raw) => raw,
        }
    }
}

impl From<String> for CourseStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "open" => Self::Open,
            "full" => Self::Full,
            "closed" => Self::Closed,
            _ => Self::Other(value),
        }
    }
}

impl From<CourseStatus> for String {
    fn from(value: CourseStatus) -> Self {
        value.code().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub status: Option<ProjectStatus>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub duration: Option<String>,
    #[serde(default)]
    pub instructor: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub max_participants: Option<i32>,
    #[serde(default)]
    pub current_participants: Option<i32>,
    #[serde(default)]
    pub status: Option<CourseStatus>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Course {
    /// Whether the site offers the enroll button for this course.
    pub fn accepts_enrollment(&self) -> bool {
        matches!(self.status, Some(CourseStatus::Open))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Announcement {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HighlightSection {
    Announcements,
    Projects,
    Courses,
}

/// Home page teaser lists. A section whose query failed is left empty and
/// named in `unavailable`; the other sections still render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Highlights {
    pub announcements: Vec<Announcement>,
    pub projects: Vec<Project>,
    pub courses: Vec<Course>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub unavailable: Vec<HighlightSection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    Pending,
}

/// Insert payload for `course_enrollments`; `enrolled_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseEnrollment {
    pub course_id: String,
    pub user_id: UserId,
    pub status: EnrollmentStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrollmentOutcome {
    Enrolled,
    AuthRequired,
    AlreadyEnrolled,
    RemoteError(String),
}

impl EnrollmentOutcome {
    pub const fn label(&self) -> &'static str {
        match self {
            EnrollmentOutcome::Enrolled => "enrolled",
            EnrollmentOutcome::AuthRequired => "auth_required",
            EnrollmentOutcome::AlreadyEnrolled => "already_enrolled",
            EnrollmentOutcome::RemoteError(_) => "remote_error",
        }
    }
}
