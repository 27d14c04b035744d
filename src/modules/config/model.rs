use std::fmt;
use std::time::Duration;

use lettre::Address;
use reqwest::Url;

/// Raw flag values exactly as they arrived on the command line
#[derive(Debug, Clone, Default)]
pub struct RawParams {
    pub url: String,
    pub warn: String,
    pub from: String,
    pub to: String,
    pub smtp: String,
    pub username: String,
    pub password: String,
    pub timeout: String,
}

/// How the SMTP relay is approached
#[derive(Clone, PartialEq, Eq)]
pub enum AuthMode {
    None,
    Plain { username: String, password: String },
}

// Keep the password out of debug output
impl fmt::Debug for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthMode::None => write!(f, "None"),
            AuthMode::Plain { username, .. } => f
                .debug_struct("Plain")
                .field("username", username)
                .field("password", &"***")
                .finish(),
        }
    }
}

/// A validated relay address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpAddress {
    pub host: String,
    pub port: u16,
    /// The value as the user typed it, used in diagnostics
    pub raw: String,
}

impl fmt::Display for SmtpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

/// Fully validated settings for one run. Built once, then only borrowed.
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// The URL as the user wrote it; alerts quote this verbatim
    pub url: String,
    /// The same URL, parsed for fetching
    pub target: Url,
    pub watch_string: String,
    pub from_address: Address,
    pub to_addresses: Vec<Address>,
    pub smtp_server: SmtpAddress,
    pub auth: AuthMode,
    pub fetch_timeout: Duration,
}

impl CheckConfig {
    /// Recipients joined the way the To header shows them
    pub fn recipients_display(&self) -> String {
        self.to_addresses
            .iter()
            .map(Address::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    }
}
