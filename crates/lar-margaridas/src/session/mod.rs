//! Mirror of the external identity provider's notion of the current actor.

pub mod identity;
mod observer;

use serde::{Deserialize, Serialize};

pub use identity::{
    bearer_token, snapshot_from_headers, IdentityError, IdentityProvider, SupabaseIdentity,
};
pub use observer::{SessionObserver, Subscription};

/// Opaque identifier assigned by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bearer token the identity provider verified. Forwarded on writes so the
/// hosted store applies its row-level policies to the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(<redacted>)")
    }
}

/// An authenticated actor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub user_id: UserId,
    #[serde(skip)]
    pub access_token: Option<AccessToken>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: UserId(user_id.into()),
            access_token: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(AccessToken::new(token));
        self
    }
}

/// Last known session state. `Unknown` lasts until the first resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionSnapshot {
    #[default]
    Unknown,
    Anonymous,
    Authenticated(Session),
}

impl SessionSnapshot {
    pub fn from_session(session: Option<Session>) -> Self {
        match session {
            Some(session) => Self::Authenticated(session),
            None => Self::Anonymous,
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        match self {
            SessionSnapshot::Authenticated(session) => Some(&session.user_id),
            SessionSnapshot::Unknown | SessionSnapshot::Anonymous => None,
        }
    }

    pub fn access_token(&self) -> Option<&AccessToken> {
        match self {
            SessionSnapshot::Authenticated(session) => session.access_token.as_ref(),
            SessionSnapshot::Unknown | SessionSnapshot::Anonymous => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self, SessionSnapshot::Unknown)
    }
}
