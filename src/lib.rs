// First, declare the modules folder itself
mod error;
mod modules;

// Re-export everything from modules for easier access
pub use modules::{cli, config, email, fetch, runner, utils, watch};

// Re-export commonly used types
pub use error::{Result, WatchError};
pub use modules::config::CheckConfig;
pub use modules::email::EmailMessage;
pub use modules::runner::{run, Outcome};

// Constants
pub const DEFAULT_SMTP_SERVER: &str = "gmail-smtp-in.l.google.com:25";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 5;
