use lettre::Address;
use log::info;

use crate::config::CheckConfig;
use crate::email::{compose, send, Mailer};
use crate::error::Result;
use crate::fetch::PageSource;
use crate::watch::should_notify;

/// How a run ended when nothing went wrong
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NotMatched,
    Sent { recipients: Vec<Address> },
}

/// Fetch once, test once, and send at most one alert.
/// The first error ends the run.
pub fn run(config: &CheckConfig, source: &dyn PageSource, mailer: &dyn Mailer) -> Result<Outcome> {
    let body = source.fetch(&config.target)?;

    if !should_notify(&body, &config.watch_string) {
        return Ok(Outcome::NotMatched);
    }

    info!("{:?} FOUND in {}", config.watch_string, config.url);
    let message = compose(config);
    send(config, &message, mailer)?;

    Ok(Outcome::Sent {
        recipients: config.to_addresses.clone(),
    })
}
