//! HTTP client for the middleware's secure user endpoints.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::account::UserProfile;
use crate::config::MiddlewareConfig;
use crate::error::PersistenceError;

use super::{ApiResponse, PersistenceService};

/// Header carrying the deployment API key.
const API_KEY_HEADER: &str = "x-api-key";

/// Reqwest-backed [`PersistenceService`] implementation.
pub struct MiddlewareClient {
    base_url: String,
    api_key: Option<String>,
    client: reqwest::Client,
}

impl MiddlewareClient {
    pub fn new(config: &MiddlewareConfig) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/secure/{path}", self.base_url)
    }

    fn authorize(
        &self,
        request: reqwest::RequestBuilder,
        token: &SecretString,
    ) -> reqwest::RequestBuilder {
        let request = request.bearer_auth(token.expose_secret());
        match &self.api_key {
            Some(key) => request.header(API_KEY_HEADER, key),
            None => request,
        }
    }

    /// Send the request and decode the middleware envelope.
    ///
    /// The body is parsed regardless of the HTTP status so that not-found
    /// style outcomes reach callers as a non-success envelope rather than
    /// a transport error.
    async fn dispatch(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiResponse<UserProfile>, PersistenceError> {
        let response = request
            .send()
            .await
            .map_err(|e| PersistenceError::Http(e.to_string()))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PersistenceError::Http(e.to_string()))?;

        serde_json::from_str(&body).map_err(|_| {
            let preview: String = body.chars().take(200).collect();
            PersistenceError::InvalidResponse(format!("HTTP {status}: {preview}"))
        })
    }
}

#[async_trait]
impl PersistenceService for MiddlewareClient {
    async fn fetch_user(
        &self,
        key_field: &str,
        key_value: &str,
        token: &SecretString,
    ) -> Result<ApiResponse<UserProfile>, PersistenceError> {
        let request = self
            .client
            .get(self.endpoint("user"))
            .query(&[(key_field, key_value)]);
        self.dispatch(self.authorize(request, token)).await
    }

    async fn add_user(
        &self,
        token: &SecretString,
        user: &UserProfile,
    ) -> Result<ApiResponse<UserProfile>, PersistenceError> {
        let request = self.client.post(self.endpoint("user")).json(user);
        self.dispatch(self.authorize(request, token)).await
    }

    async fn update_user(
        &self,
        token: &SecretString,
        user: &UserProfile,
    ) -> Result<ApiResponse<UserProfile>, PersistenceError> {
        let request = self.client.put(self.endpoint("user")).json(user);
        self.dispatch(self.authorize(request, token)).await
    }
}
