//! Authentication client for the remote auth service.
//!
//! Every operation resolves to a structured [`AuthOutcome`] -- bad
//! credentials, validation failures, and network errors all surface as
//! `success: false` with a message, never as a panic or a raw transport
//! error. On success the session token and user record are persisted to
//! the injected blob store so the session survives restarts.

use jotter_core::storage::BlobStore;
use jotter_core::types::DbId;
use serde::{Deserialize, Serialize};

/// Blob-store key holding the session token.
pub const TOKEN_KEY: &str = "notes_app_token";

/// Blob-store key holding the cached user record.
pub const USER_KEY: &str = "notes_app_user";

const REGISTER_PATH: &str = "/api/auth/register";
const LOGIN_PATH: &str = "/api/auth/login";
const ME_PATH: &str = "/api/auth/me";

/// Public user record as returned by the auth service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: DbId,
    pub username: String,
    pub email: String,
}

/// Result of an authentication operation.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub success: bool,
    pub user: Option<UserProfile>,
    pub message: Option<String>,
}

impl AuthOutcome {
    fn ok(user: UserProfile) -> Self {
        Self {
            success: true,
            user: Some(user),
            message: None,
        }
    }

    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            user: None,
            message: Some(message.into()),
        }
    }
}

/// Successful `{ user, token }` body from register and login.
#[derive(Debug, Deserialize)]
struct AuthPayload {
    user: UserProfile,
    token: String,
}

/// `{ user }` body from the current-session endpoint.
#[derive(Debug, Deserialize)]
struct MeBody {
    user: UserProfile,
}

/// `{ "message": ... }` body carried by error responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the remote authentication service.
///
/// `base_url` is the service root (e.g. `http://localhost:5000`); the
/// `/api/auth/*` paths are appended per request.
pub struct AuthClient<S: BlobStore> {
    base_url: String,
    http: reqwest::Client,
    session: S,
}

impl<S: BlobStore> AuthClient<S> {
    pub fn new(base_url: impl Into<String>, session: S) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            http: reqwest::Client::new(),
            session,
        }
    }

    /// The stored session token, if any.
    pub fn token(&self) -> Option<String> {
        match self.session.get(TOKEN_KEY) {
            Ok(token) => token,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read session token");
                None
            }
        }
    }

    /// The locally cached user record, if any. A corrupt cache is
    /// treated as absent.
    pub fn cached_user(&self) -> Option<UserProfile> {
        let blob = self.session.get(USER_KEY).ok().flatten()?;
        serde_json::from_str(&blob).ok()
    }

    /// Attach the stored session token as a Bearer header, if present.
    pub fn bearer(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Create an account. On success the session is stored locally.
    pub async fn signup(&mut self, username: &str, email: &str, password: &str) -> AuthOutcome {
        let body = serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        });
        self.post_auth(REGISTER_PATH, body).await
    }

    /// Authenticate with email + password. On success the session is
    /// stored locally.
    pub async fn login(&mut self, email: &str, password: &str) -> AuthOutcome {
        let body = serde_json::json!({
            "email": email,
            "password": password,
        });
        self.post_auth(LOGIN_PATH, body).await
    }

    /// Drop the stored session. Purely local; the token simply expires
    /// server-side.
    pub fn logout(&mut self) {
        if let Err(e) = self.session.remove(TOKEN_KEY) {
            tracing::warn!(error = %e, "failed to remove session token");
        }
        if let Err(e) = self.session.remove(USER_KEY) {
            tracing::warn!(error = %e, "failed to remove cached user");
        }
    }

    /// Look up the current session's user on the server.
    pub async fn current_user(&self) -> AuthOutcome {
        if self.token().is_none() {
            return AuthOutcome::failed("Not logged in");
        }

        let url = format!("{}{ME_PATH}", self.base_url);
        let response = match self.bearer(self.http.get(&url)).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "current-user request failed");
                return AuthOutcome::failed(format!("Network error: {e}"));
            }
        };

        if !response.status().is_success() {
            return AuthOutcome::failed(error_message(response).await);
        }
        match response.json::<MeBody>().await {
            Ok(body) => AuthOutcome::ok(body.user),
            Err(e) => {
                tracing::warn!(error = %e, "malformed current-user response");
                AuthOutcome::failed("Malformed server response")
            }
        }
    }

    async fn post_auth(&mut self, path: &str, body: serde_json::Value) -> AuthOutcome {
        let url = format!("{}{path}", self.base_url);
        let response = match self.http.post(&url).json(&body).send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, path, "auth request failed");
                return AuthOutcome::failed(format!("Network error: {e}"));
            }
        };

        if !response.status().is_success() {
            return AuthOutcome::failed(error_message(response).await);
        }
        match response.json::<AuthPayload>().await {
            Ok(payload) => self.store_session(payload),
            Err(e) => {
                tracing::warn!(error = %e, path, "malformed auth response");
                AuthOutcome::failed("Malformed server response")
            }
        }
    }

    /// Persist the token and user record. Storage failures are logged
    /// but do not fail the outcome: the in-memory session is still live.
    fn store_session(&mut self, payload: AuthPayload) -> AuthOutcome {
        if let Err(e) = self.session.set(TOKEN_KEY, &payload.token) {
            tracing::warn!(error = %e, "failed to persist session token");
        }
        match serde_json::to_string(&payload.user) {
            Ok(blob) => {
                if let Err(e) = self.session.set(USER_KEY, &blob) {
                    tracing::warn!(error = %e, "failed to persist user record");
                }
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize user record"),
        }
        AuthOutcome::ok(payload.user)
    }
}

/// Extract the server's `{ "message": ... }` from an error response,
/// falling back to the HTTP status.
async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.message)
        .unwrap_or_else(|| format!("Request failed with status {status}"))
}
