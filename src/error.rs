use thiserror::Error;

/// Every way a single watch run can stop early
#[derive(Debug, Error)]
pub enum WatchError {
    /// A required flag was empty or absent
    #[error("The -{0} parameter is required")]
    MissingParameter(&'static str),
    /// The -smtp value is not a usable host:port pair
    #[error("The -smtp parameter must have format host:port: {0}")]
    InvalidSmtpAddress(String),
    /// A -from or -to entry is not a valid mailbox address
    #[error("The -{flag} parameter contains an invalid email address {address:?}: {reason}")]
    InvalidEmailAddress {
        flag: &'static str,
        address: String,
        reason: String,
    },
    /// The -url value is not an absolute http(s) URL
    #[error("The -url parameter must be an absolute http or https URL: {0}")]
    InvalidUrl(String),
    /// The -timeout value is not a positive number of seconds
    #[error("The -timeout parameter must be a positive number of seconds: {0}")]
    InvalidTimeout(String),
    #[error("Failed to get the URL {url}: {reason}")]
    FetchError { url: String, reason: String },
    #[error("Error sending message from {from} to {to} via {server}: {reason}")]
    SendError {
        from: String,
        to: String,
        server: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, WatchError>;
