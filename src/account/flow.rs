//! Account flow orchestration.
//!
//! Ties acquisition, the wizard session, persistence, navigation and
//! notices together for the lifetime of one account screen. Every
//! asynchronous failure is converted into a [`Notice`] here; none
//! propagate further up.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use tracing::warn;

use crate::auth::AuthContext;
use crate::config::AcquisitionConfig;
use crate::middleware::PersistenceService;
use crate::ui::{Navigator, Notice, NoticeSender};

use super::acquisition::AccountResolver;
use super::wizard::WizardSession;

/// Collaborators for [`AccountFlow`].
pub struct FlowDeps {
    pub auth: Arc<dyn AuthContext>,
    pub service: Arc<dyn PersistenceService>,
    pub navigator: Arc<dyn Navigator>,
    pub notices: NoticeSender,
}

/// How activation ended.
#[derive(Debug)]
pub enum Activation {
    /// Profile resolved; show the wizard or the review screen.
    Session(WizardSession),
    /// Returning user with the skip flag set; already routed away.
    Redirected,
    /// Acquisition failed; a notice was sent and the screen stays
    /// unresolved until the user reloads.
    Failed,
}

/// Orchestrates one account screen's lifetime.
pub struct AccountFlow {
    resolver: AccountResolver,
    auth: Arc<dyn AuthContext>,
    service: Arc<dyn PersistenceService>,
    navigator: Arc<dyn Navigator>,
    notices: NoticeSender,
    /// Pre-auth destination to return to on exit.
    original_url: String,
    /// Route returning users straight back instead of showing the wizard.
    skip_if_existing: bool,
}

impl AccountFlow {
    pub fn new(
        config: AcquisitionConfig,
        deps: FlowDeps,
        original_url: impl Into<String>,
        skip_if_existing: bool,
    ) -> Self {
        let resolver =
            AccountResolver::new(config, Arc::clone(&deps.auth), Arc::clone(&deps.service));
        Self {
            resolver,
            auth: deps.auth,
            service: deps.service,
            navigator: deps.navigator,
            notices: deps.notices,
            original_url: original_url.into(),
            skip_if_existing,
        }
    }

    /// Resolve the profile and decide what to show.
    pub async fn activate(&self, cancel: &AtomicBool) -> Activation {
        let acquired = match self.resolver.resolve(cancel).await {
            Ok(acquired) => acquired,
            Err(e) => {
                warn!("Account acquisition failed: {e}");
                self.notify(Notice::AcquisitionFailed {
                    message: e.to_string(),
                });
                return Activation::Failed;
            }
        };

        if !acquired.is_new_account && self.skip_if_existing {
            // Returning user who didn't ask for the wizard: send them back
            // to wherever they were headed before the login round-trip.
            self.navigator.route_to(&self.original_url);
            return Activation::Redirected;
        }

        let session = if acquired.is_new_account {
            WizardSession::for_new_account(acquired.profile)
        } else {
            WizardSession::for_existing_account(acquired.profile)
        };
        Activation::Session(session)
    }

    /// Persist the session's profile. Returns whether the save succeeded;
    /// the session's edits are untouched either way so a retry needs no
    /// re-entry.
    pub async fn save(&self, session: &WizardSession) -> bool {
        let Some(token) = self.auth.access_token() else {
            self.notify(Notice::SaveFailed {
                message: "No access token available".to_string(),
            });
            return false;
        };

        let result = if session.is_new_account() {
            self.service.add_user(&token, session.profile()).await
        } else {
            self.service.update_user(&token, session.profile()).await
        };

        match result {
            Ok(response) if response.is_success() => {
                self.notify(Notice::PreferencesSaved);
                true
            }
            Ok(response) => {
                let message = response
                    .message
                    .unwrap_or_else(|| format!("Save rejected with status {}", response.status));
                warn!(%message, "Middleware rejected the account save");
                self.notify(Notice::SaveFailed { message });
                false
            }
            Err(e) => {
                warn!("Account save failed: {e}");
                self.notify(Notice::SaveFailed {
                    message: e.to_string(),
                });
                false
            }
        }
    }

    /// Terminal action: save, and leave the screen only when the save
    /// worked, keeping a failed save's edits around for a retry.
    pub async fn save_and_exit(&self, session: &WizardSession) -> bool {
        let saved = self.save(session).await;
        if saved {
            self.exit();
        }
        saved
    }

    /// Leave without saving.
    pub fn exit(&self) {
        self.navigator.route_to(&self.original_url);
    }

    fn notify(&self, notice: Notice) {
        // Notices are best-effort; the shell may have dropped the receiver.
        let _ = self.notices.send(notice);
    }
}

// Exercised end to end, with in-process collaborators, in
// tests/account_flow.rs.
