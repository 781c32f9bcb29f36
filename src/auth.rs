//! Auth collaborator seam.
//!
//! The application shell owns the Auth0 login round-trip; the account core
//! only reads the resulting credential and claims through [`AuthContext`].

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Identity-provider claims for the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    /// Opaque subject identifier.
    pub sub: String,
    pub email: String,
    #[serde(default)]
    pub email_verified: bool,
}

/// Read-only view of the shell's auth state.
///
/// An access token is typically not available right away after login, so
/// callers poll [`AuthContext::access_token`] until one appears.
pub trait AuthContext: Send + Sync {
    /// The current bearer token, if one has been issued yet.
    fn access_token(&self) -> Option<SecretString>;

    /// Claims for the signed-in user, if known.
    fn user(&self) -> Option<AuthUser>;
}
