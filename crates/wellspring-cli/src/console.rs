//! Terminal plumbing shared by the commands.

use std::time::Duration;

use tokio::time::Instant;
use wellspring_core::auth::{provider_from_config, KeyringSessionStore};
use wellspring_core::notify::{Notification, Notifier, Severity};
use wellspring_core::{App, Config, Event};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Prints notifications to stderr, keeping stdout for events.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => eprintln!("* {}: {}", notification.title, notification.description),
            Severity::Destructive => {
                eprintln!("! {}: {}", notification.title, notification.description)
            }
        }
    }
}

/// One-line JSON per event.
pub fn print_event(event: &Event) -> CliResult {
    println!("{}", serde_json::to_string(event)?);
    Ok(())
}

pub fn runtime() -> CliResult<tokio::runtime::Runtime> {
    Ok(tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?)
}

/// Build the app from the user's configuration.
pub fn build_app(config: &Config) -> CliResult<App> {
    let store = KeyringSessionStore::new("session");
    let provider = provider_from_config(&config.auth, Box::new(store))?;
    Ok(App::new(provider, Box::new(ConsoleNotifier), config)?)
}

/// Milliseconds since a fixed origin, the timebase for core timers.
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    origin: Instant,
}

impl Clock {
    pub fn start() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    pub fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    pub fn instant(&self, at_ms: u64) -> Instant {
        self.origin + Duration::from_millis(at_ms)
    }

    /// Sleep until `at_ms`, or forever when there is nothing to wait for.
    pub async fn sleep_until(&self, at_ms: Option<u64>) {
        match at_ms {
            Some(at) => tokio::time::sleep_until(self.instant(at)).await,
            None => std::future::pending::<()>().await,
        }
    }
}
