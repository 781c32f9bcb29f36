//! Shell collaborator seams: navigation, notices, presentation hooks.

use std::sync::Arc;

use tokio::sync::mpsc;

/// Imperative navigation, owned by the application shell.
pub trait Navigator: Send + Sync {
    fn route_to(&self, path: &str);
}

/// User-facing outcome of an account operation.
///
/// Delivered over a channel and rendered by the shell's notification
/// surface instead of a blocking dialog, so outcomes are inspectable in
/// tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    PreferencesSaved,
    AcquisitionFailed { message: String },
    SaveFailed { message: String },
}

pub type NoticeSender = mpsc::UnboundedSender<Notice>;
pub type NoticeReceiver = mpsc::UnboundedReceiver<Notice>;

/// Channel pair connecting the account flow to the notification surface.
pub fn notice_channel() -> (NoticeSender, NoticeReceiver) {
    mpsc::unbounded_channel()
}

/// Presentation-mode hooks applied while the account screen is visible.
///
/// The shell decides what these do; the web shell toggles a class on the
/// document root.
pub trait ChromeHooks: Send + Sync {
    fn apply(&self);
    fn release(&self);
}

/// Holds the presentation mode for a scope.
///
/// Releases on drop, so early exits cannot leave the shell stuck in
/// account mode.
pub struct ChromeModeGuard {
    hooks: Arc<dyn ChromeHooks>,
}

impl ChromeModeGuard {
    pub fn engage(hooks: Arc<dyn ChromeHooks>) -> Self {
        hooks.apply();
        Self { hooks }
    }
}

impl Drop for ChromeModeGuard {
    fn drop(&mut self) {
        self.hooks.release();
    }
}
