//! Account data acquisition: wait for a credential, then fetch or
//! initialize the user's profile.
//!
//! The shell's auth context usually has no access token yet when the
//! account screen mounts, so resolution starts by polling for one with a
//! backed-off delay and a hard attempt cap. The poll loop returns the
//! token before any asynchronous work begins, so the middleware lookup is
//! issued at most once per activation however many ticks it took.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use secrecy::SecretString;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace};

use crate::auth::AuthContext;
use crate::config::AcquisitionConfig;
use crate::error::AcquisitionError;
use crate::middleware::{AUTH0_USER_ID_FIELD, PersistenceService};

use super::model::UserProfile;

/// Result of a completed acquisition.
#[derive(Debug, Clone, PartialEq)]
pub struct Acquired {
    /// True when the middleware had no record for this user.
    pub is_new_account: bool,
    /// The fetched record, or synthesized defaults for a new account.
    pub profile: UserProfile,
}

/// Resolves the session's user profile, once per activation.
pub struct AccountResolver {
    config: AcquisitionConfig,
    auth: Arc<dyn AuthContext>,
    service: Arc<dyn PersistenceService>,
}

impl AccountResolver {
    pub fn new(
        config: AcquisitionConfig,
        auth: Arc<dyn AuthContext>,
        service: Arc<dyn PersistenceService>,
    ) -> Self {
        Self {
            config,
            auth,
            service,
        }
    }

    /// Wait for a credential, then look up the user's record, falling back
    /// to synthesized defaults when the middleware has none.
    ///
    /// Lookup failures are terminal for the session; there is no automatic
    /// retry.
    pub async fn resolve(&self, cancel: &AtomicBool) -> Result<Acquired, AcquisitionError> {
        let token = self.wait_for_token(cancel).await?;
        let user = self.auth.user().ok_or(AcquisitionError::MissingClaims)?;

        match self
            .service
            .fetch_user(AUTH0_USER_ID_FIELD, &user.sub, &token)
            .await
        {
            Ok(response) if response.is_success() => {
                let profile = response.data.ok_or(AcquisitionError::MissingProfileData)?;
                debug!(user = %user.sub, "Found existing account");
                Ok(Acquired {
                    is_new_account: false,
                    profile,
                })
            }
            Ok(response) => {
                debug!(
                    user = %user.sub,
                    status = %response.status,
                    "No account on record; starting with defaults"
                );
                Ok(Acquired {
                    is_new_account: true,
                    profile: UserProfile::for_new_user(&user),
                })
            }
            Err(e) => Err(AcquisitionError::Lookup(e)),
        }
    }

    /// Poll the auth context until a token appears, doubling the delay up
    /// to `max_interval`. Gives up after `max_poll_attempts` checks.
    async fn wait_for_token(&self, cancel: &AtomicBool) -> Result<SecretString, AcquisitionError> {
        let mut delay = self.config.poll_interval;
        for attempt in 1..=self.config.max_poll_attempts {
            if cancel.load(Ordering::Relaxed) {
                return Err(AcquisitionError::Cancelled);
            }
            if let Some(token) = self.auth.access_token() {
                return Ok(token);
            }
            trace!(attempt, "Access token not yet available");
            if attempt < self.config.max_poll_attempts {
                tokio::time::sleep(delay).await;
                delay = (delay * 2).min(self.config.max_interval);
            }
        }
        Err(AcquisitionError::TokenTimeout {
            attempts: self.config.max_poll_attempts,
        })
    }
}

/// Run resolution in the background.
///
/// Returns the join handle and a cancel flag; set the flag when the owning
/// screen is torn down before resolution completes, so no poll loop
/// outlives its screen.
pub fn spawn_resolver(
    resolver: AccountResolver,
) -> (JoinHandle<Result<Acquired, AcquisitionError>>, Arc<AtomicBool>) {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    let handle = tokio::spawn(async move {
        info!("Account acquisition started");
        resolver.resolve(&flag).await
    });
    (handle, cancel)
}
