//! Account setup: the wizard, profile acquisition, and the flow binding
//! them.
//!
//! A screen's session begins by acquiring the user's profile: wait for
//! the auth credential, then fetch the middleware record or synthesize
//! defaults for a first-time user. New accounts then walk the pane
//! wizard; returning users get a flat review screen. Edits stay in
//! memory until the single terminal save.

pub mod acquisition;
pub mod flow;
pub mod model;
pub mod wizard;

pub use acquisition::{AccountResolver, Acquired, spawn_resolver};
pub use flow::{AccountFlow, Activation, FlowDeps};
pub use model::{Location, LocationKind, NotificationChannel, UserProfile};
pub use wizard::{Effect, PaneId, REVIEW_PANES, WizardEvent, WizardSession, canonical_locations};
