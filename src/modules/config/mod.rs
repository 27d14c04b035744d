pub mod model;
pub mod validate;

pub use model::{AuthMode, CheckConfig, RawParams, SmtpAddress};
pub use validate::{parse_smtp_address, resolve_auth, split_recipients, validate};
