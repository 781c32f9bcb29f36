use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use anyhow::Context;
use secrecy::SecretString;
use tokio::io::{AsyncBufReadExt, BufReader};

use trip_account::account::{
    AccountFlow, Activation, FlowDeps, NotificationChannel, PaneId, REVIEW_PANES, WizardSession,
    wizard::Effect,
};
use trip_account::auth::{AuthContext, AuthUser};
use trip_account::config::{AcquisitionConfig, MiddlewareConfig, PersistenceConfig};
use trip_account::middleware::MiddlewareClient;
use trip_account::ui::{ChromeHooks, ChromeModeGuard, Navigator, Notice, notice_channel};

/// Auth context backed by environment variables, for driving the flow
/// against a live middleware from a terminal.
struct EnvAuth {
    token: Option<String>,
    user: AuthUser,
}

impl EnvAuth {
    fn from_env() -> anyhow::Result<Self> {
        let user = AuthUser {
            sub: std::env::var("TRIP_ACCOUNT_USER_SUB")
                .context("TRIP_ACCOUNT_USER_SUB not set")?,
            email: std::env::var("TRIP_ACCOUNT_USER_EMAIL")
                .context("TRIP_ACCOUNT_USER_EMAIL not set")?,
            email_verified: std::env::var("TRIP_ACCOUNT_EMAIL_VERIFIED")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),
        };
        Ok(Self {
            token: std::env::var("TRIP_ACCOUNT_ACCESS_TOKEN").ok(),
            user,
        })
    }
}

impl AuthContext for EnvAuth {
    fn access_token(&self) -> Option<SecretString> {
        self.token.clone().map(SecretString::from)
    }

    fn user(&self) -> Option<AuthUser> {
        Some(self.user.clone())
    }
}

struct PrintNavigator;

impl Navigator for PrintNavigator {
    fn route_to(&self, path: &str) {
        eprintln!("Navigating to {path}");
    }
}

struct LogChrome;

impl ChromeHooks for LogChrome {
    fn apply(&self) {
        tracing::debug!("Entered account presentation mode");
    }

    fn release(&self) {
        tracing::debug!("Left account presentation mode");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // Middleware settings come from a persistence config file when one is
    // provided, falling back to direct env vars.
    let middleware = match std::env::var("TRIP_ACCOUNT_CONFIG") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
            let persistence: PersistenceConfig =
                serde_json::from_str(&raw).with_context(|| format!("parsing {path}"))?;
            persistence
                .middleware_config()
                .cloned()
                .context("persistence config does not enable the otp_middleware strategy")?
        }
        Err(_) => MiddlewareConfig {
            api_base_url: std::env::var("TRIP_ACCOUNT_MIDDLEWARE_URL")
                .context("TRIP_ACCOUNT_MIDDLEWARE_URL not set")?,
            api_key: std::env::var("TRIP_ACCOUNT_API_KEY").ok(),
        },
    };
    let original_url =
        std::env::var("TRIP_ACCOUNT_ORIGINAL_URL").unwrap_or_else(|_| "/".to_string());
    let skip_if_existing = std::env::var("TRIP_ACCOUNT_SKIP_IF_EXISTING")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    eprintln!("trip-account v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Middleware: {}", middleware.api_base_url);
    eprintln!("   Return URL: {original_url}\n");

    let auth: Arc<dyn AuthContext> = Arc::new(EnvAuth::from_env()?);
    let service = Arc::new(MiddlewareClient::new(&middleware));
    let navigator = Arc::new(PrintNavigator);
    let (notices, mut notice_rx) = notice_channel();

    // Render notices as they arrive.
    tokio::spawn(async move {
        while let Some(notice) = notice_rx.recv().await {
            match notice {
                Notice::PreferencesSaved => eprintln!("Your preferences have been saved."),
                Notice::AcquisitionFailed { message } => {
                    eprintln!("Could not load your account: {message}");
                }
                Notice::SaveFailed { message } => {
                    eprintln!("Could not save your preferences: {message}");
                }
            }
        }
    });

    let flow = AccountFlow::new(
        AcquisitionConfig::default(),
        FlowDeps {
            auth,
            service,
            navigator,
            notices,
        },
        original_url,
        skip_if_existing,
    );

    let _chrome = ChromeModeGuard::engage(Arc::new(LogChrome));

    let cancel = AtomicBool::new(false);
    let mut session = match flow.activate(&cancel).await {
        Activation::Session(session) => session,
        Activation::Redirected | Activation::Failed => return Ok(()),
    };

    eprintln!(
        "Commands: next, back, consent on|off, history on|off, \
         channel email|sms|none, phone <number>, add <address>, \
         edit <n> <address>, save, quit\n"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        render(&session);
        eprint!("> ");
        let Some(line) = lines.next_line().await? else {
            break;
        };
        let line = line.trim();
        let (command, rest) = line.split_once(' ').unwrap_or((line, ""));

        match command {
            "next" => match session.advance() {
                Effect::Blocked => eprintln!("Complete this step first."),
                Effect::Moved(_) | Effect::None => {}
                Effect::SaveAndExit => {
                    if flow.save_and_exit(&session).await {
                        break;
                    }
                }
            },
            "back" => {
                session.retreat();
            }
            "consent" => session.set_consent(rest == "on"),
            "history" => session.set_trip_history_opt_in(rest == "on"),
            "channel" => match rest {
                "email" => session.set_notification_channel(NotificationChannel::Email),
                "sms" => session.set_notification_channel(NotificationChannel::Sms),
                "none" => session.set_notification_channel(NotificationChannel::None),
                other => eprintln!("Unknown channel: {other}"),
            },
            "phone" => session.set_phone_number(rest),
            "add" => {
                session.add_location(rest);
            }
            "edit" => match rest.split_once(' ') {
                Some((index, address)) => match index.parse::<usize>() {
                    Ok(index) => session.update_location_address(index, address.trim()),
                    Err(_) => eprintln!("Usage: edit <n> <address>"),
                },
                None => eprintln!("Usage: edit <n> <address>"),
            },
            "save" => {
                flow.save(&session).await;
            }
            "quit" => {
                flow.exit();
                break;
            }
            "" => {}
            other => eprintln!("Unknown command: {other}"),
        }
    }

    Ok(())
}

fn render(session: &WizardSession) {
    if session.is_new_account() {
        let pane = session.active_pane();
        eprintln!("\n== {} ==", pane.title());
        render_pane(session, pane);
    } else {
        eprintln!("\n== My Account ==");
        for pane in REVIEW_PANES {
            eprintln!("-- {} --", pane.title());
            render_pane(session, pane);
        }
    }
}

fn render_pane(session: &WizardSession, pane: PaneId) {
    let profile = session.profile();
    match pane {
        PaneId::Terms => {
            eprintln!(
                "[{}] I have read and consent to the Terms of Service.",
                mark(profile.has_consented_to_terms)
            );
            eprintln!(
                "[{}] Optional: store my planned trips to improve transit service.",
                mark(profile.store_trip_history)
            );
        }
        PaneId::Notifications => {
            for channel in NotificationChannel::ALL {
                let selected = if channel == profile.notification_channel {
                    '*'
                } else {
                    ' '
                };
                eprintln!("({selected}) {}", channel.label());
            }
            if profile.notification_channel == NotificationChannel::Sms {
                eprintln!("Phone for SMS notifications: {}", profile.phone_number);
            }
        }
        PaneId::VerifyPhone => {
            eprintln!(
                "Check your phone's SMS app for a verification code. \
                 (Verification is not available yet.)"
            );
        }
        PaneId::Places => {
            for (index, location) in profile.effective_locations().iter().enumerate() {
                let address = location.address.as_deref().unwrap_or("<unset>");
                eprintln!("{index}: [{}] {address}", location.icon);
            }
        }
        PaneId::Finish => {
            eprintln!("You are ready to start planning your trips.");
        }
    }
}

fn mark(checked: bool) -> char {
    if checked { 'x' } else { ' ' }
}
