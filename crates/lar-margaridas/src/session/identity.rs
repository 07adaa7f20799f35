use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{Session, SessionSnapshot};
use crate::config::SupabaseConfig;

/// Resolves access tokens issued by the external identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(None)` when the provider does not recognise the token.
    async fn session_for_token(&self, access_token: &str)
        -> Result<Option<Session>, IdentityError>;
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity provider unreachable: {0}")]
    Transport(String),
    #[error("identity provider answered with status {status}")]
    Unexpected { status: u16 },
    #[error("identity provider returned an unreadable user: {0}")]
    Decode(String),
}

/// Supabase GoTrue adapter backed by `GET /auth/v1/user`.
#[derive(Clone)]
pub struct SupabaseIdentity {
    client: Client,
    auth_url: String,
    api_key: String,
}

#[derive(Deserialize)]
struct GoTrueUser {
    id: String,
}

impl SupabaseIdentity {
    pub fn new(client: Client, config: &SupabaseConfig) -> Self {
        Self {
            client,
            auth_url: config.auth_url(),
            api_key: config.anon_key.clone(),
        }
    }
}

#[async_trait]
impl IdentityProvider for SupabaseIdentity {
    async fn session_for_token(
        &self,
        access_token: &str,
    ) -> Result<Option<Session>, IdentityError> {
        let response = self
            .client
            .get(format!("{}/user", self.auth_url))
            .header("apikey", &self.api_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|err| IdentityError::Transport(err.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                debug!("access token rejected by identity provider");
                Ok(None)
            }
            status if status.is_success() => {
                let user: GoTrueUser = response
                    .json()
                    .await
                    .map_err(|err| IdentityError::Decode(err.to_string()))?;
                Ok(Some(Session::new(user.id)))
            }
            status => Err(IdentityError::Unexpected {
                status: status.as_u16(),
            }),
        }
    }
}

/// Extract the bearer token from an `Authorization` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Resolve the session of an inbound request, keeping the verified token on it.
/// Never fails: unknown tokens and provider outages both yield `Anonymous`.
pub async fn snapshot_from_headers<I>(identity: &I, headers: &HeaderMap) -> SessionSnapshot
where
    I: IdentityProvider + ?Sized,
{
    let Some(token) = bearer_token(headers) else {
        return SessionSnapshot::Anonymous;
    };

    match identity.session_for_token(token).await {
        Ok(session) => {
            SessionSnapshot::from_session(session.map(|session| session.with_access_token(token)))
        }
        Err(error) => {
            warn!(%error, "unable to resolve request session");
            SessionSnapshot::Anonymous
        }
    }
}
