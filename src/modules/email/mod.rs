pub mod compose;
pub mod smtp;

pub use compose::{compose, compose_at, EmailMessage};
pub use smtp::{build_envelope, send, Mailer, SmtpMailer, SEND_TIMEOUT};
