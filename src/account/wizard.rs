//! Wizard pane graph and session state.
//!
//! The new-account flow walks a linear chain of panes with a single
//! conditional edge out of the notifications pane; the existing-account
//! flow reuses the same pane content as a flat review list with no
//! traversal and no gating. Edits apply to the in-memory profile
//! immediately and are never reverted by backward navigation; nothing is
//! persisted until the terminal save action.

use serde::{Deserialize, Serialize};

use super::model::{Location, LocationKind, NotificationChannel, UserProfile};

/// A configuration pane in the account wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaneId {
    Terms,
    Notifications,
    VerifyPhone,
    Places,
    Finish,
}

impl PaneId {
    /// Pane heading shown by the shell.
    pub fn title(self) -> &'static str {
        match self {
            Self::Terms => "Create a new account",
            Self::Notifications => "Notification preferences",
            Self::VerifyPhone => "Verify your phone",
            Self::Places => "Add your locations",
            Self::Finish => "Account setup complete!",
        }
    }

    /// Successor in the new-account chain.
    ///
    /// The notifications pane is the only conditional edge: it leads to
    /// phone verification when SMS is the selected channel at call time.
    pub fn next(self, channel: NotificationChannel) -> Option<PaneId> {
        match self {
            Self::Terms => Some(Self::Notifications),
            Self::Notifications => Some(if channel == NotificationChannel::Sms {
                Self::VerifyPhone
            } else {
                Self::Places
            }),
            Self::VerifyPhone => Some(Self::Places),
            Self::Places => Some(Self::Finish),
            Self::Finish => None,
        }
    }

    /// Predecessor, if not at the start of the chain.
    pub fn prev(self) -> Option<PaneId> {
        match self {
            Self::Terms => None,
            Self::Notifications => Some(Self::Terms),
            Self::VerifyPhone => Some(Self::Notifications),
            Self::Places => Some(Self::Notifications),
            Self::Finish => Some(Self::Places),
        }
    }
}

impl std::fmt::Display for PaneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Terms => "terms",
            Self::Notifications => "notifications",
            Self::VerifyPhone => "verifyPhone",
            Self::Places => "places",
            Self::Finish => "finish",
        };
        write!(f, "{s}")
    }
}

/// Panes shown, in order, on the existing-account review screen.
pub const REVIEW_PANES: [PaneId; 3] = [PaneId::Terms, PaneId::Notifications, PaneId::Places];

/// Outcome of applying an event to a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// State updated in place; the displayed pane is unchanged.
    None,
    /// The displayed pane changed.
    Moved(PaneId),
    /// Forward navigation was blocked by the active pane's gate.
    Blocked,
    /// The terminal pane was active: the caller should save and exit.
    SaveAndExit,
}

/// Edits and navigation the shell feeds into a session.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    Next,
    Back,
    SetConsent(bool),
    SetTripHistoryOptIn(bool),
    SetNotificationChannel(NotificationChannel),
    SetPhoneNumber(String),
    AddLocation(String),
    SetLocationAddress { index: usize, address: String },
}

/// Ephemeral per-screen wizard state.
#[derive(Debug, Clone)]
pub struct WizardSession {
    active_pane: PaneId,
    is_new_account: bool,
    profile: UserProfile,
}

impl WizardSession {
    /// Session for a first-time user, starting at the terms pane.
    pub fn for_new_account(profile: UserProfile) -> Self {
        Self {
            active_pane: PaneId::Terms,
            is_new_account: true,
            profile,
        }
    }

    /// Session for a returning user (flat review list, no traversal).
    pub fn for_existing_account(profile: UserProfile) -> Self {
        Self {
            active_pane: PaneId::Terms,
            is_new_account: false,
            profile,
        }
    }

    pub fn active_pane(&self) -> PaneId {
        self.active_pane
    }

    pub fn is_new_account(&self) -> bool {
        self.is_new_account
    }

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Consume the session, keeping the edited profile.
    pub fn into_profile(self) -> UserProfile {
        self.profile
    }

    /// Validation gate for the active pane. The shell disables its Next
    /// control while this is true; [`Self::advance`] blocks regardless.
    pub fn next_disabled(&self) -> bool {
        match self.active_pane {
            PaneId::Terms => !self.profile.has_consented_to_terms,
            // Verification codes are not checked yet; the pane stays gated.
            PaneId::VerifyPhone => true,
            _ => false,
        }
    }

    /// Move forward, or request the terminal save when at the end of the
    /// chain. Gated panes block silently.
    pub fn advance(&mut self) -> Effect {
        if self.next_disabled() {
            return Effect::Blocked;
        }
        match self.active_pane.next(self.profile.notification_channel) {
            Some(next) => {
                self.active_pane = next;
                Effect::Moved(next)
            }
            None => Effect::SaveAndExit,
        }
    }

    /// Move back one pane. No-op at the start of the chain. Only the
    /// displayed pane changes; prior edits stay applied.
    pub fn retreat(&mut self) -> Option<PaneId> {
        let prev = self.active_pane.prev()?;
        self.active_pane = prev;
        Some(prev)
    }

    /// Apply one event. Edits return [`Effect::None`]; navigation returns
    /// the transition outcome.
    pub fn apply(&mut self, event: WizardEvent) -> Effect {
        match event {
            WizardEvent::Next => self.advance(),
            WizardEvent::Back => match self.retreat() {
                Some(pane) => Effect::Moved(pane),
                None => Effect::None,
            },
            WizardEvent::SetConsent(consented) => {
                self.set_consent(consented);
                Effect::None
            }
            WizardEvent::SetTripHistoryOptIn(opt_in) => {
                self.set_trip_history_opt_in(opt_in);
                Effect::None
            }
            WizardEvent::SetNotificationChannel(channel) => {
                self.set_notification_channel(channel);
                Effect::None
            }
            WizardEvent::SetPhoneNumber(number) => {
                self.set_phone_number(number);
                Effect::None
            }
            WizardEvent::AddLocation(raw) => {
                self.add_location(&raw);
                Effect::None
            }
            WizardEvent::SetLocationAddress { index, address } => {
                self.update_location_address(index, &address);
                Effect::None
            }
        }
    }

    pub fn set_consent(&mut self, consented: bool) {
        self.profile.has_consented_to_terms = consented;
    }

    pub fn set_trip_history_opt_in(&mut self, opt_in: bool) {
        self.profile.store_trip_history = opt_in;
    }

    pub fn set_notification_channel(&mut self, channel: NotificationChannel) {
        self.profile.notification_channel = channel;
    }

    pub fn set_phone_number(&mut self, number: impl Into<String>) {
        self.profile.phone_number = number.into();
    }

    /// Append a custom location if the trimmed text is non-empty.
    ///
    /// Returns whether an entry was added. The calling surface clears its
    /// input either way so the next place can be typed.
    pub fn add_location(&mut self, raw: &str) -> bool {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return false;
        }
        self.profile.saved_locations.push(Location::custom(trimmed));
        true
    }

    /// Change one entry of the effective list (home, work, then customs)
    /// and re-derive the canonical saved order.
    ///
    /// Editing a placeholder home/work with non-empty text creates the
    /// entry; emptying an address drops the entry. Out-of-range indices
    /// are ignored.
    pub fn update_location_address(&mut self, index: usize, address: &str) {
        let mut effective = self.profile.effective_locations();
        let Some(slot) = effective.get_mut(index) else {
            return;
        };
        slot.address = if address.is_empty() {
            None
        } else {
            Some(address.to_string())
        };
        self.profile.saved_locations = canonical_locations(effective);
    }
}

/// Re-derive the canonical saved-location order: the first home with a
/// non-empty address, then the first such work, then the custom entries
/// with non-empty addresses in their prior relative order.
///
/// Applying this twice without further edits yields the same list.
pub fn canonical_locations(locations: Vec<Location>) -> Vec<Location> {
    let home = locations
        .iter()
        .find(|loc| loc.kind == LocationKind::Home && !loc.has_empty_address())
        .cloned();
    let work = locations
        .iter()
        .find(|loc| loc.kind == LocationKind::Work && !loc.has_empty_address())
        .cloned();

    let mut canonical = Vec::with_capacity(locations.len());
    canonical.extend(home);
    canonical.extend(work);
    canonical.extend(
        locations
            .into_iter()
            .filter(|loc| loc.kind == LocationKind::Custom && !loc.has_empty_address()),
    );
    canonical
}
