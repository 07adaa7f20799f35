use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{CourseEnrollment, EnrollmentOutcome, EnrollmentStatus};
use crate::session::{AccessToken, SessionSnapshot};
use crate::store::{tables, RecordStore, StoreError};
use crate::workflows::notice::Notice;

/// Course signup. A unique violation from the store means the user is already enrolled.
pub struct CourseEnrollmentWorkflow<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for CourseEnrollmentWorkflow<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> CourseEnrollmentWorkflow<S>
where
    S: RecordStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn enroll(&self, course_id: &str, session: &SessionSnapshot) -> EnrollmentOutcome {
        let Some(user_id) = session.user_id() else {
            return EnrollmentOutcome::AuthRequired;
        };

        let enrollment = CourseEnrollment {
            course_id: course_id.to_string(),
            user_id: user_id.clone(),
            status: EnrollmentStatus::Pending,
        };

        match self.insert(&enrollment, session.access_token()).await {
            Ok(()) => {
                info!(%user_id, %course_id, "course enrollment stored");
                EnrollmentOutcome::Enrolled
            }
            Err(error) if error.is_unique_violation() => {
                info!(%user_id, %course_id, "user already enrolled in course");
                EnrollmentOutcome::AlreadyEnrolled
            }
            Err(error) => {
                warn!(%user_id, %course_id, code = ?error.code, %error, "course enrollment rejected by store");
                EnrollmentOutcome::RemoteError(error.message)
            }
        }
    }

    async fn insert(
        &self,
        enrollment: &CourseEnrollment,
        access_token: Option<&AccessToken>,
    ) -> Result<(), StoreError> {
        let payload = serde_json::to_value(enrollment)
            .map_err(|err| StoreError::new(format!("unable to encode enrollment: {err}")))?;
        self.store
            .insert(tables::COURSE_ENROLLMENTS, payload, access_token)
            .await?;
        Ok(())
    }
}

impl EnrollmentOutcome {
    pub fn notice(&self) -> Notice {
        match self {
            EnrollmentOutcome::Enrolled => Notice::info(
                "Inscrição realizada!",
                "Você foi inscrito no curso com sucesso",
            ),
            EnrollmentOutcome::AuthRequired => Notice::destructive(
                "Login necessário",
                "Você precisa estar logado para se inscrever em um curso",
            ),
            EnrollmentOutcome::AlreadyEnrolled => {
                Notice::destructive("Já inscrito", "Você já está inscrito neste curso")
            }
            EnrollmentOutcome::RemoteError(message) => {
                Notice::destructive("Erro ao inscrever", message.clone())
            }
        }
    }
}
