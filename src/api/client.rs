//! The authenticated HTTP client
//!
//! Two policies apply to every call: the current session's token rides
//! along as a bearer credential, and a 401 from any endpoint outside the
//! auth surface clears the session and signals the caller to return to the
//! login entry point. A 401 from the auth surface itself (a failed login,
//! a bad registration) is propagated untouched; clearing there would bounce
//! the user back to the login screen in a loop.

use crate::api::types::{
    AuthResponse, ErrorBody, HistoryEntry, HistoryResponse, LoginRequest, PredictionResult,
    RegisterRequest,
};
use crate::config::ClientConfig;
use crate::error::{DetectError, Result};
use crate::session::{Session, SessionStore, User};
use log::{debug, warn};
use reqwest::multipart;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;

/// Client for the detection API
///
/// Cloning is cheap; clones share the underlying connection pool and the
/// session store.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: ClientConfig,
    sessions: SessionStore,
}

impl ApiClient {
    /// Create a client from a configuration and a session store
    pub fn new(config: ClientConfig, sessions: SessionStore) -> Result<Self> {
        config.validate()?;

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(agent) = &config.user_agent {
            builder = builder.user_agent(agent.clone());
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            config,
            sessions,
        })
    }

    /// The session store this client reads and maintains
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Whether a path belongs to the authentication surface
    ///
    /// Auth endpoints are exempt from the 401-clears-session policy.
    fn is_auth_endpoint(path: &str) -> bool {
        path.contains("/auth/")
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.sessions.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(DetectError::from);
        }

        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
            .map(|body| body.error)
            .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

        if status == StatusCode::UNAUTHORIZED && !Self::is_auth_endpoint(path) {
            warn!("session rejected on {}; clearing session", path);
            self.sessions.clear();
            return Err(DetectError::SessionExpired);
        }

        Err(DetectError::server(status.as_u16(), message))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        debug!("GET {}", path);
        let request = self.authorize(self.http.get(self.config.endpoint(path)));
        let response = request.send().await?;
        self.handle_response(path, response).await
    }

    /// Authenticate with username and password
    ///
    /// On success the session is installed in the store and returned.
    /// A 401 here means bad credentials, not an expired session; no
    /// existing session is touched.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let path = "/auth/login";
        debug!("POST {}", path);
        let response = self
            .http
            .post(self.config.endpoint(path))
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        let auth: AuthResponse = self.handle_response(path, response).await?;
        let session = Session::new(auth.token, auth.user);
        self.sessions.set(session.clone());
        Ok(session)
    }

    /// Register a new account; installs the returned session on success
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<Session> {
        let path = "/auth/register";
        debug!("POST {}", path);
        let response = self
            .http
            .post(self.config.endpoint(path))
            .json(&RegisterRequest {
                username,
                email,
                password,
            })
            .send()
            .await?;

        let auth: AuthResponse = self.handle_response(path, response).await?;
        let session = Session::new(auth.token, auth.user);
        self.sessions.set(session.clone());
        Ok(session)
    }

    /// Identity of the currently authenticated user
    pub async fn me(&self) -> Result<User> {
        self.get_json("/auth/me").await
    }

    /// Drop the local session; purely client-side
    pub fn logout(&self) {
        self.sessions.clear();
    }

    /// Submit a media file for classification
    ///
    /// The file rides in a multipart form under the `file` field. This call
    /// runs to completion or error; there is no mid-flight cancellation.
    pub async fn predict(&self, file_name: &str, bytes: Vec<u8>) -> Result<PredictionResult> {
        if file_name.is_empty() {
            return Err(DetectError::invalid_parameter(
                "file_name",
                "File name must not be empty",
            ));
        }

        let path = "/predict";
        debug!("POST {} ({} bytes)", path, bytes.len());
        let part = multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = multipart::Form::new().part("file", part);

        let request = self.authorize(self.http.post(self.config.endpoint(path)).multipart(form));
        let response = request.send().await?;
        self.handle_response(path, response).await
    }

    /// Submit a file from the filesystem for classification
    pub async fn predict_path(&self, path: &Path) -> Result<PredictionResult> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .ok_or_else(|| {
                DetectError::invalid_parameter("path", "Path has no file name component")
            })?;
        let bytes = tokio::fs::read(path).await?;
        self.predict(&name, bytes).await
    }

    /// The authenticated user's recent predictions, newest first
    pub async fn history(&self) -> Result<Vec<HistoryEntry>> {
        let response: HistoryResponse = self.get_json("/history").await?;
        Ok(response.predictions)
    }

    /// Model evaluation metrics (accuracy, confusion matrix, ROC, loss
    /// history); free-form JSON consumed by the dashboard layer
    pub async fn metrics(&self) -> Result<serde_json::Value> {
        self.get_json("/metrics").await
    }

    /// Static descriptive content about the detection pipeline
    pub async fn how_it_works(&self) -> Result<serde_json::Value> {
        self.get_json("/how-it-works").await
    }
}
