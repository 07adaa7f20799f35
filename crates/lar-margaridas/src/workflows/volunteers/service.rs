use std::sync::Arc;

use tracing::{info, warn};

use super::domain::{SubmissionOutcome, VolunteerApplicationDraft, VolunteerRecord};
use super::validation::{check, FieldError};
use crate::session::{AccessToken, SessionSnapshot};
use crate::store::{tables, RecordStore, StoreError};

/// Drives a single volunteer application from draft to stored record.
///
/// Holds no per-submission state: every call reads the session once, validates,
/// and makes at most one insert. Concurrent calls are independent.
pub struct VolunteerApplicationWorkflow<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for VolunteerApplicationWorkflow<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> VolunteerApplicationWorkflow<S>
where
    S: RecordStore + ?Sized,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Validate without submitting.
    pub fn validate(&self, draft: &VolunteerApplicationDraft) -> Vec<FieldError> {
        super::validation::validate(draft)
    }

    pub async fn submit(
        &self,
        draft: &VolunteerApplicationDraft,
        session: &SessionSnapshot,
    ) -> SubmissionOutcome {
        let Some(user_id) = session.user_id() else {
            info!(resolved = session.is_resolved(), "volunteer application requires login");
            return SubmissionOutcome::AuthRequired;
        };

        let valid = match check(draft) {
            Ok(valid) => valid,
            Err(errors) => {
                info!(%user_id, errors = errors.len(), "volunteer application failed validation");
                return SubmissionOutcome::ValidationFailed(errors);
            }
        };

        let record = VolunteerRecord {
            user_id: user_id.clone(),
            specialty: valid.specialty,
            availability: valid.availability,
            experience: valid.experience,
            approved: false,
            created_at: None,
            updated_at: None,
        };

        match self.insert(record, session.access_token()).await {
            Ok(()) => {
                info!(%user_id, specialty = valid.specialty.code(), "volunteer application stored");
                SubmissionOutcome::Success
            }
            Err(error) => {
                warn!(%user_id, code = ?error.code, %error, "volunteer application rejected by store");
                SubmissionOutcome::RemoteError(error.message)
            }
        }
    }

    async fn insert(
        &self,
        record: VolunteerRecord,
        access_token: Option<&AccessToken>,
    ) -> Result<(), StoreError> {
        let payload = serde_json::to_value(&record)
            .map_err(|err| StoreError::new(format!("unable to encode application: {err}")))?;
        self.store
            .insert(tables::VOLUNTEERS, payload, access_token)
            .await?;
        Ok(())
    }
}
