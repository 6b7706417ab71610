// Shared application state
// One immutable state value per process, handed to every connection task.
// The mailer is chosen once at startup and injected, rather than each
// handler reaching into ambient configuration.

use std::sync::Arc;

use super::Config;
use crate::email::sendgrid::SendGridMailer;
use crate::email::{LogMailer, Mailer};

pub struct AppState {
    pub config: Config,
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let mailer: Arc<dyn Mailer> = match config.email.sendgrid_api_key.clone() {
            Some(key) => Arc::new(SendGridMailer::new(key)),
            None => Arc::new(LogMailer),
        };
        Self { config, mailer }
    }

    #[cfg(test)]
    pub fn with_mailer(config: Config, mailer: Arc<dyn Mailer>) -> Self {
        Self { config, mailer }
    }
}
