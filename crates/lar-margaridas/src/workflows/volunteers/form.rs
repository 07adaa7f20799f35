use std::sync::{Arc, Mutex};

use super::domain::{SubmissionOutcome, VolunteerApplicationDraft};
use super::service::VolunteerApplicationWorkflow;
use crate::session::{SessionObserver, SessionSnapshot, Subscription};
use crate::store::RecordStore;
use crate::workflows::notice::Notice;

/// What the signup page should render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormView {
    /// Session not resolved yet.
    Pending,
    LoginPrompt,
    Editable { submitting: bool },
}

/// Page-side state of the signup form: the draft, the mirrored session and
/// the in-flight flag. Detaches from the observer when dropped.
pub struct VolunteerForm {
    draft: VolunteerApplicationDraft,
    session: Arc<Mutex<SessionSnapshot>>,
    submitting: bool,
    _subscription: Subscription,
}

impl VolunteerForm {
    pub fn attach(observer: &SessionObserver) -> Self {
        let session = Arc::new(Mutex::new(observer.current()));
        let mirror = Arc::clone(&session);
        let subscription = observer.subscribe(move |snapshot| {
            *mirror
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()) = snapshot.clone();
        });

        Self {
            draft: VolunteerApplicationDraft::default(),
            session,
            submitting: false,
            _subscription: subscription,
        }
    }

    pub fn draft(&self) -> &VolunteerApplicationDraft {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut VolunteerApplicationDraft {
        &mut self.draft
    }

    pub fn session(&self) -> SessionSnapshot {
        self.session
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn view(&self) -> FormView {
        match self.session() {
            SessionSnapshot::Unknown => FormView::Pending,
            SessionSnapshot::Anonymous => FormView::LoginPrompt,
            SessionSnapshot::Authenticated(_) => FormView::Editable {
                submitting: self.submitting,
            },
        }
    }

    /// Submit the current draft. The draft is cleared only when the store accepted it.
    pub async fn submit<S>(&mut self, workflow: &VolunteerApplicationWorkflow<S>) -> Notice
    where
        S: RecordStore + ?Sized,
    {
        let session = self.session();
        self.submitting = true;
        let outcome = workflow.submit(&self.draft, &session).await;
        self.submitting = false;

        if outcome == SubmissionOutcome::Success {
            self.draft.clear();
        }

        outcome.notice()
    }
}

impl SubmissionOutcome {
    pub fn notice(&self) -> Notice {
        match self {
            SubmissionOutcome::Success => Notice::info(
                "Candidatura enviada!",
                "Sua candidatura está em análise. Entraremos em contato em breve.",
            ),
            SubmissionOutcome::AuthRequired => Notice::destructive(
                "Login necessário",
                "Você precisa estar logado para se candidatar como voluntário",
            ),
            SubmissionOutcome::ValidationFailed(errors) => Notice::destructive(
                "Erro de validação",
                errors.first().map(|error| error.message()).unwrap_or_default(),
            ),
            SubmissionOutcome::RemoteError(message) => {
                Notice::destructive("Erro ao enviar candidatura", message.clone())
            }
        }
    }
}
