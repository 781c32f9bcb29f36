//! User profile and saved-location models, in the middleware wire shape.

use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;

/// How the user wants to hear about their monitored trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Email,
    Sms,
    None,
}

impl NotificationChannel {
    /// All selectable channels, in display order.
    pub const ALL: [NotificationChannel; 3] = [Self::Email, Self::Sms, Self::None];

    /// Label for pickers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Email => "Email",
            Self::Sms => "SMS",
            Self::None => "Don't notify me",
        }
    }
}

impl Default for NotificationChannel {
    fn default() -> Self {
        Self::Email
    }
}

impl std::fmt::Display for NotificationChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Email => "email",
            Self::Sms => "sms",
            Self::None => "none",
        };
        write!(f, "{s}")
    }
}

/// Category of a saved place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Home,
    Work,
    Custom,
}

/// A saved or recently used place.
///
/// At most one home and one work entry are treated as canonical; when
/// duplicates exist the first match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub address: Option<String>,
    pub icon: String,
    #[serde(rename = "type")]
    pub kind: LocationKind,
}

impl Location {
    /// A user-added place.
    pub fn custom(address: impl Into<String>) -> Self {
        Self {
            address: Some(address.into()),
            icon: "map-marker".to_string(),
            kind: LocationKind::Custom,
        }
    }

    /// Placeholder home entry shown while no home is saved.
    pub fn empty_home() -> Self {
        Self {
            address: None,
            icon: "home".to_string(),
            kind: LocationKind::Home,
        }
    }

    /// Placeholder work entry shown while no work is saved.
    pub fn empty_work() -> Self {
        Self {
            address: None,
            icon: "briefcase".to_string(),
            kind: LocationKind::Work,
        }
    }

    /// Whether the address is missing or blank.
    pub fn has_empty_address(&self) -> bool {
        self.address.as_deref().is_none_or(str::is_empty)
    }
}

/// One person's saved trip-planning preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Identity-provider subject id; immutable once set.
    pub auth0_user_id: String,
    pub email: String,
    #[serde(default)]
    pub is_email_verified: bool,
    /// Mandatory for new accounts.
    #[serde(default)]
    pub has_consented_to_terms: bool,
    /// Opt-in.
    #[serde(default)]
    pub store_trip_history: bool,
    #[serde(default)]
    pub notification_channel: NotificationChannel,
    /// Only relevant when the channel is SMS.
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub saved_locations: Vec<Location>,
    /// Maintained by the trip planner itself, not editable here.
    #[serde(default)]
    pub recent_locations: Vec<Location>,
}

impl UserProfile {
    /// Starting profile for a user the middleware has no record of.
    pub fn for_new_user(user: &AuthUser) -> Self {
        Self {
            auth0_user_id: user.sub.clone(),
            email: user.email.clone(),
            is_email_verified: user.email_verified,
            // User must agree to terms.
            has_consented_to_terms: false,
            // User must opt in.
            store_trip_history: false,
            notification_channel: NotificationChannel::Email,
            phone_number: String::new(),
            saved_locations: Vec::new(),
            recent_locations: Vec::new(),
        }
    }

    /// The canonical home entry, if any.
    pub fn home(&self) -> Option<&Location> {
        self.saved_locations
            .iter()
            .find(|loc| loc.kind == LocationKind::Home)
    }

    /// The canonical work entry, if any.
    pub fn work(&self) -> Option<&Location> {
        self.saved_locations
            .iter()
            .find(|loc| loc.kind == LocationKind::Work)
    }

    /// Display list for the places pane: home and work first (placeholders
    /// while unset), then the custom entries in saved order.
    pub fn effective_locations(&self) -> Vec<Location> {
        let home = self.home().cloned().unwrap_or_else(Location::empty_home);
        let work = self.work().cloned().unwrap_or_else(Location::empty_work);
        let mut list = vec![home, work];
        list.extend(
            self.saved_locations
                .iter()
                .filter(|loc| loc.kind == LocationKind::Custom)
                .cloned(),
        );
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims() -> AuthUser {
        AuthUser {
            sub: "abc".to_string(),
            email: "a@b.com".to_string(),
            email_verified: true,
        }
    }

    #[test]
    fn new_user_profile_has_expected_defaults() {
        let profile = UserProfile::for_new_user(&claims());
        assert_eq!(profile.auth0_user_id, "abc");
        assert_eq!(profile.email, "a@b.com");
        assert!(profile.is_email_verified);
        assert!(!profile.has_consented_to_terms);
        assert!(!profile.store_trip_history);
        assert_eq!(profile.notification_channel, NotificationChannel::Email);
        assert!(profile.phone_number.is_empty());
        assert!(profile.saved_locations.is_empty());
        assert!(profile.recent_locations.is_empty());
    }

    #[test]
    fn profile_serializes_in_wire_shape() {
        let profile = UserProfile::for_new_user(&claims());
        let value = serde_json::to_value(&profile).unwrap();
        let object = value.as_object().unwrap();
        for key in [
            "auth0UserId",
            "email",
            "isEmailVerified",
            "hasConsentedToTerms",
            "storeTripHistory",
            "notificationChannel",
            "phoneNumber",
            "savedLocations",
            "recentLocations",
        ] {
            assert!(object.contains_key(key), "missing wire field {key}");
        }
        assert_eq!(value["notificationChannel"], "email");
    }

    #[test]
    fn profile_deserializes_with_missing_optionals() {
        let profile: UserProfile = serde_json::from_value(serde_json::json!({
            "auth0UserId": "abc",
            "email": "a@b.com"
        }))
        .unwrap();
        assert!(!profile.has_consented_to_terms);
        assert_eq!(profile.notification_channel, NotificationChannel::Email);
        assert!(profile.saved_locations.is_empty());
    }

    #[test]
    fn location_uses_type_wire_field() {
        let location = Location::custom("123 Main St");
        let value = serde_json::to_value(&location).unwrap();
        assert_eq!(value["type"], "custom");
        assert_eq!(value["icon"], "map-marker");
        assert_eq!(value["address"], "123 Main St");
    }

    #[test]
    fn channel_serde_uses_lowercase_names() {
        for (channel, wire) in [
            (NotificationChannel::Email, "\"email\""),
            (NotificationChannel::Sms, "\"sms\""),
            (NotificationChannel::None, "\"none\""),
        ] {
            assert_eq!(serde_json::to_string(&channel).unwrap(), wire);
            let parsed: NotificationChannel = serde_json::from_str(wire).unwrap();
            assert_eq!(parsed, channel);
        }
    }

    #[test]
    fn display_matches_serde() {
        for channel in NotificationChannel::ALL {
            let display = format!("{channel}");
            let json = serde_json::to_string(&channel).unwrap();
            assert_eq!(format!("\"{display}\""), json);
        }
    }

    #[test]
    fn empty_address_detection() {
        assert!(Location::empty_home().has_empty_address());
        let mut location = Location::custom("somewhere");
        assert!(!location.has_empty_address());
        location.address = Some(String::new());
        assert!(location.has_empty_address());
    }

    #[test]
    fn effective_locations_pads_home_and_work() {
        let mut profile = UserProfile::for_new_user(&claims());
        profile.saved_locations = vec![Location::custom("123 Main St")];

        let effective = profile.effective_locations();
        assert_eq!(effective.len(), 3);
        assert_eq!(effective[0].kind, LocationKind::Home);
        assert!(effective[0].has_empty_address());
        assert_eq!(effective[1].kind, LocationKind::Work);
        assert_eq!(effective[2].address.as_deref(), Some("123 Main St"));
    }

    #[test]
    fn first_home_wins_when_duplicated() {
        let mut profile = UserProfile::for_new_user(&claims());
        let mut first = Location::empty_home();
        first.address = Some("1 First Ave".to_string());
        let mut second = Location::empty_home();
        second.address = Some("2 Second Ave".to_string());
        profile.saved_locations = vec![first, second];

        let effective = profile.effective_locations();
        assert_eq!(effective[0].address.as_deref(), Some("1 First Ave"));
        // The duplicate is not part of the effective list.
        assert_eq!(effective.len(), 2);
    }
}
