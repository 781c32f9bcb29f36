//! Middleware persistence API: wire envelope, service trait, HTTP client.
//!
//! The trip planner stores user accounts behind a small REST middleware.
//! Every endpoint answers with the same envelope: an application-level
//! `status` string plus an optional payload or message. `"success"` is
//! the only status that signals a usable result; anything else (not
//! found, validation error, expired token) is a non-success outcome the
//! caller branches on.

mod client;

pub use client::MiddlewareClient;

use async_trait::async_trait;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::account::UserProfile;
use crate::error::PersistenceError;

/// Lookup key for fetching a user by identity-provider subject.
pub const AUTH0_USER_ID_FIELD: &str = "auth0UserId";

/// The status value signalling a successful operation.
pub const STATUS_SUCCESS: &str = "success";

/// Envelope returned by every middleware endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn is_success(&self) -> bool {
        self.status == STATUS_SUCCESS
    }

    /// Envelope carrying a successful payload.
    pub fn success(data: T) -> Self {
        Self {
            status: STATUS_SUCCESS.to_string(),
            data: Some(data),
            message: None,
        }
    }

    /// Envelope for a non-success outcome.
    pub fn failure(status: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Async seam over the middleware user endpoints.
///
/// Consumed as `Arc<dyn PersistenceService>` so tests can substitute an
/// in-process fake for the HTTP client.
#[async_trait]
pub trait PersistenceService: Send + Sync {
    /// Look up a user record by `key_field == key_value`.
    async fn fetch_user(
        &self,
        key_field: &str,
        key_value: &str,
        token: &SecretString,
    ) -> Result<ApiResponse<UserProfile>, PersistenceError>;

    /// Create a user record.
    async fn add_user(
        &self,
        token: &SecretString,
        user: &UserProfile,
    ) -> Result<ApiResponse<UserProfile>, PersistenceError>;

    /// Replace an existing user record.
    async fn update_user(
        &self,
        token: &SecretString,
        user: &UserProfile,
    ) -> Result<ApiResponse<UserProfile>, PersistenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_parses_with_data() {
        let json = serde_json::json!({
            "status": "success",
            "data": {
                "auth0UserId": "abc",
                "email": "a@b.com",
                "isEmailVerified": true,
                "hasConsentedToTerms": true,
                "storeTripHistory": false,
                "notificationChannel": "sms",
                "phoneNumber": "555-0100",
                "savedLocations": [
                    {"address": "1 Home Rd", "icon": "home", "type": "home"}
                ],
                "recentLocations": []
            }
        });
        let response: ApiResponse<UserProfile> = serde_json::from_value(json).unwrap();
        assert!(response.is_success());
        let profile = response.data.unwrap();
        assert_eq!(profile.auth0_user_id, "abc");
        assert_eq!(profile.saved_locations.len(), 1);
    }

    #[test]
    fn non_success_envelope_parses_without_data() {
        let json = serde_json::json!({
            "status": "not_found",
            "message": "No user with that id"
        });
        let response: ApiResponse<UserProfile> = serde_json::from_value(json).unwrap();
        assert!(!response.is_success());
        assert!(response.data.is_none());
        assert_eq!(response.message.as_deref(), Some("No user with that id"));
    }

    #[test]
    fn constructors_set_the_discriminant() {
        let ok: ApiResponse<()> = ApiResponse::success(());
        assert!(ok.is_success());
        let err: ApiResponse<()> = ApiResponse::failure("error", "boom");
        assert!(!err.is_success());
        assert_eq!(err.message.as_deref(), Some("boom"));
    }
}
