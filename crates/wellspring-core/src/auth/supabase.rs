//! Supabase (GoTrue) auth client -- email/password accounts over REST.
//!
//! Endpoints used, relative to the project URL:
//!
//! | Operation      | Request                                   |
//! |----------------|-------------------------------------------|
//! | sign in        | `POST auth/v1/token?grant_type=password`   |
//! | refresh        | `POST auth/v1/token?grant_type=refresh_token` |
//! | sign up        | `POST auth/v1/signup`                      |
//! | password reset | `POST auth/v1/recover`                     |
//! | sign out       | `POST auth/v1/logout`                      |
//! | restore        | `GET auth/v1/user`                         |
//!
//! Every request carries the project's anon key in the `apikey` header.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Mutex;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use url::Url;

use super::session_store::SessionStore;
use super::traits::{AuthProvider, AuthSession, AuthSignal, AuthState, SignUpOutcome, User};
use crate::error::AuthError;

#[derive(Debug, Deserialize)]
struct GoTrueUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Value,
}

impl From<GoTrueUser> for User {
    fn from(u: GoTrueUser) -> Self {
        let full_name = u
            .user_metadata
            .get("full_name")
            .and_then(Value::as_str)
            .map(str::to_string);
        User {
            id: u.id,
            email: u.email.unwrap_or_default(),
            full_name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GoTrueSession {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: GoTrueUser,
}

impl From<GoTrueSession> for AuthSession {
    fn from(s: GoTrueSession) -> Self {
        let expires_at = s
            .expires_at
            .or_else(|| s.expires_in.map(|secs| Utc::now().timestamp() + secs));
        AuthSession {
            access_token: s.access_token,
            refresh_token: s.refresh_token,
            expires_at,
            user: s.user.into(),
        }
    }
}

pub struct SupabaseAuth {
    client: Client,
    base: Url,
    anon_key: String,
    redirect_to: Option<String>,
    store: Box<dyn SessionStore>,
    session: Mutex<Option<AuthSession>>,
    signal: AuthSignal,
}

impl SupabaseAuth {
    /// # Errors
    /// Returns [`AuthError::Unavailable`] if `project_url` is not a valid URL.
    pub fn new(
        project_url: &str,
        anon_key: &str,
        redirect_to: Option<String>,
        store: Box<dyn SessionStore>,
    ) -> Result<Self, AuthError> {
        let mut base = Url::parse(project_url)
            .map_err(|e| AuthError::Unavailable(format!("invalid auth url '{project_url}': {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client: Client::new(),
            base,
            anon_key: anon_key.to_string(),
            redirect_to: redirect_to.filter(|r| !r.is_empty()),
            store,
            session: Mutex::new(None),
            signal: AuthSignal::new(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        self.base
            .join(path)
            .map_err(|e| AuthError::Unavailable(e.to_string()))
    }

    fn with_redirect(&self, mut url: Url) -> Url {
        if let Some(redirect) = &self.redirect_to {
            url.query_pairs_mut().append_pair("redirect_to", redirect);
        }
        url
    }

    fn post(&self, url: Url) -> RequestBuilder {
        self.client.post(url).header("apikey", &self.anon_key)
    }

    fn access_token(&self) -> Option<String> {
        self.session
            .lock()
            .ok()
            .and_then(|s| s.as_ref().map(|s| s.access_token.clone()))
    }

    fn adopt(&self, session: AuthSession) -> User {
        if let Err(e) = self.store.save(&session) {
            warn!(error = %e, "failed to persist auth session");
        }
        let user = session.user.clone();
        if let Ok(mut slot) = self.session.lock() {
            *slot = Some(session);
        }
        self.signal.signed_in(user.clone());
        user
    }

    fn forget(&self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "failed to clear stored auth session");
        }
        if let Ok(mut slot) = self.session.lock() {
            *slot = None;
        }
        self.signal.signed_out();
    }

    async fn fetch_user(&self, access_token: &str) -> Result<User, AuthError> {
        let resp = self
            .client
            .get(self.endpoint("auth/v1/user")?)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        let user: GoTrueUser = resp.json().await?;
        Ok(user.into())
    }

    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, AuthError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut()
            .append_pair("grant_type", "refresh_token");
        let resp = self
            .post(url)
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        let session: GoTrueSession = resp.json().await?;
        Ok(session.into())
    }

    async fn restore_session(&self, stored: AuthSession) -> Result<Option<User>, AuthError> {
        if stored.is_expired(Utc::now().timestamp()) {
            let Some(refresh_token) = stored.refresh_token.as_deref() else {
                debug!("stored session expired without refresh token");
                self.forget();
                return Ok(None);
            };
            return match self.refresh(refresh_token).await {
                Ok(session) => Ok(Some(self.adopt(session))),
                Err(AuthError::Rejected { .. }) => {
                    self.forget();
                    Ok(None)
                }
                Err(e) => Err(e),
            };
        }
        match self.fetch_user(&stored.access_token).await {
            Ok(user) => {
                let session = AuthSession { user, ..stored };
                Ok(Some(self.adopt(session)))
            }
            Err(AuthError::Rejected { .. }) => {
                self.forget();
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl AuthProvider for SupabaseAuth {
    fn name(&self) -> &str {
        "supabase"
    }

    fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.signal.subscribe()
    }

    async fn restore(&self) -> Result<Option<User>, AuthError> {
        let stored = match self.store.load() {
            Ok(stored) => stored,
            Err(e) => {
                warn!(error = %e, "could not read stored auth session");
                None
            }
        };
        let result = match stored {
            Some(session) => self.restore_session(session).await,
            None => Ok(None),
        };
        if result.is_err() {
            self.signal.signed_out();
        }
        self.signal.loaded();
        result
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let mut url = self.endpoint("auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", "password");
        let resp = self
            .post(url)
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        let session: GoTrueSession = resp.json().await?;
        info!(email, "signed in");
        Ok(self.adopt(session.into()))
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<SignUpOutcome, AuthError> {
        let url = self.with_redirect(self.endpoint("auth/v1/signup")?);
        let resp = self
            .post(url)
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "full_name": display_name },
            }))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        let body: Value = resp.json().await?;
        if body.get("access_token").is_some() {
            let session: GoTrueSession = serde_json::from_value(body)
                .map_err(|e| AuthError::Unavailable(e.to_string()))?;
            info!(email, "account created and signed in");
            return Ok(SignUpOutcome::SignedIn(self.adopt(session.into())));
        }
        info!(email, "account created, awaiting confirmation");
        Ok(SignUpOutcome::ConfirmationRequired)
    }

    async fn request_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let url = self.with_redirect(self.endpoint("auth/v1/recover")?);
        let resp = self.post(url).json(&json!({ "email": email })).send().await?;
        if !resp.status().is_success() {
            return Err(rejection(resp).await);
        }
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let Some(token) = self.access_token() else {
            self.forget();
            return Ok(());
        };
        let resp = self
            .post(self.endpoint("auth/v1/logout")?)
            .bearer_auth(&token)
            .send()
            .await?;
        let status = resp.status();
        // A token the server no longer knows is as good as signed out.
        let already_gone = matches!(
            status,
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::NOT_FOUND
        );
        if !status.is_success() && !already_gone {
            return Err(rejection(resp).await);
        }
        self.forget();
        info!("signed out");
        Ok(())
    }
}

/// Turn an error response into a rejection carrying the server's message.
async fn rejection(resp: Response) -> AuthError {
    let status = resp.status().as_u16();
    let body: Value = resp.json().await.unwrap_or(Value::Null);
    let message = ["msg", "error_description", "message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"));
    AuthError::Rejected {
        status: Some(status),
        message,
    }
}
