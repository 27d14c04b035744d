use chrono::{DateTime, FixedOffset, Local};

use crate::config::CheckConfig;
use crate::utils::time::format_mail_date;

const CRLF: &str = "\r\n";

/// A plain-text alert, kept as ordered header pairs plus a body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl EmailMessage {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Wire form: CRLF-terminated headers, one blank line, then the body
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.headers {
            out.push_str(name);
            out.push_str(": ");
            out.push_str(value);
            out.push_str(CRLF);
        }
        out.push_str(CRLF);
        out.push_str(&self.body);
        out.push_str(CRLF);
        out
    }
}

pub fn subject_line(watch_string: &str, url: &str) -> String {
    format!("WARNING! {} found in {}", watch_string, url)
}

pub fn body_line(watch_string: &str, url: &str) -> String {
    format!("Found {} in {}", watch_string, url)
}

/// Build the alert for a match, dated now
pub fn compose(config: &CheckConfig) -> EmailMessage {
    compose_at(config, Local::now().into())
}

/// Build the alert for a match with an explicit Date
pub fn compose_at(config: &CheckConfig, date: DateTime<FixedOffset>) -> EmailMessage {
    let url = config.url.as_str();
    let watch = config.watch_string.as_str();

    let headers = vec![
        ("From".to_string(), config.from_address.to_string()),
        ("To".to_string(), config.recipients_display()),
        ("Date".to_string(), format_mail_date(&date)),
        ("Subject".to_string(), subject_line(watch, url)),
        ("MIME-Version".to_string(), "1.0".to_string()),
        (
            "Content-Type".to_string(),
            "text/plain; charset=\"utf-8\"".to_string(),
        ),
    ];

    EmailMessage {
        headers,
        body: body_line(watch, url),
    }
}
