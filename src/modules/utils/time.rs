use chrono::{DateTime, FixedOffset};

/// RFC 5322 date-time, e.g. `Fri, 01 Jan 2021 12:30:00 +0100`
pub fn format_mail_date(date: &DateTime<FixedOffset>) -> String {
    date.format("%a, %d %b %Y %H:%M:%S %z").to_string()
}
