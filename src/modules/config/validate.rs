use std::time::Duration;

use lettre::Address;
use log::{debug, warn};
use reqwest::Url;

use super::model::{AuthMode, CheckConfig, RawParams, SmtpAddress};
use crate::error::{Result, WatchError};
use crate::DEFAULT_FETCH_TIMEOUT_SECS;

/// Turn raw flag values into a config that is safe to act on.
/// Nothing here touches the network.
pub fn validate(raw: &RawParams) -> Result<CheckConfig> {
    // Whitespace is a legitimate thing to watch for
    if raw.warn.is_empty() {
        return Err(WatchError::MissingParameter("warn"));
    }
    require("to", &raw.to)?;
    require("from", &raw.from)?;
    require("url", &raw.url)?;

    let target = parse_url(&raw.url)?;
    let smtp_server = parse_smtp_address(&raw.smtp)?;

    let from_address = parse_address("from", raw.from.trim())?;
    let to_addresses = split_recipients(&raw.to)
        .into_iter()
        .filter(|addr| !addr.is_empty())
        .map(|addr| parse_address("to", &addr))
        .collect::<Result<Vec<_>>>()?;
    if to_addresses.is_empty() {
        return Err(WatchError::MissingParameter("to"));
    }

    let fetch_timeout = parse_timeout(&raw.timeout)?;
    let auth = resolve_auth(&raw.username, &raw.password);

    debug!(
        "Validated config: url={}, recipients={}, smtp={}, auth={:?}",
        target,
        to_addresses.len(),
        smtp_server,
        auth
    );

    Ok(CheckConfig {
        url: raw.url.trim().to_string(),
        target,
        watch_string: raw.warn.clone(),
        from_address,
        to_addresses,
        smtp_server,
        auth,
        fetch_timeout,
    })
}

fn require(flag: &'static str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WatchError::MissingParameter(flag));
    }
    Ok(())
}

fn parse_address(flag: &'static str, value: &str) -> Result<Address> {
    value
        .parse::<Address>()
        .map_err(|e| WatchError::InvalidEmailAddress {
            flag,
            address: value.to_string(),
            reason: e.to_string(),
        })
}

/// Split a comma-separated recipient list, trimming every entry.
/// Empty entries are kept so the caller decides what to do with them.
pub fn split_recipients(to: &str) -> Vec<String> {
    to.split(',').map(|addr| addr.trim().to_string()).collect()
}

fn parse_url(value: &str) -> Result<Url> {
    let url = Url::parse(value.trim()).map_err(|e| WatchError::InvalidUrl(e.to_string()))?;
    match url.scheme() {
        "http" | "https" if url.has_host() => Ok(url),
        "http" | "https" => Err(WatchError::InvalidUrl(format!("{} has no host", value))),
        other => Err(WatchError::InvalidUrl(format!(
            "unsupported scheme {}",
            other
        ))),
    }
}

/// Parse `host:port`, accepting `[v6]:port` and well-known service names
pub fn parse_smtp_address(value: &str) -> Result<SmtpAddress> {
    let invalid = |reason: &str| WatchError::InvalidSmtpAddress(format!("{}: {}", value, reason));

    let (host, port) = if let Some(rest) = value.strip_prefix('[') {
        let (host, after) = rest
            .split_once(']')
            .ok_or_else(|| invalid("missing ']' in address"))?;
        let port = after
            .strip_prefix(':')
            .ok_or_else(|| invalid("missing port in address"))?;
        (host, port)
    } else {
        let (host, port) = value
            .rsplit_once(':')
            .ok_or_else(|| invalid("missing port in address"))?;
        if host.contains(':') {
            return Err(invalid("too many colons in address"));
        }
        (host, port)
    };

    if host.is_empty() {
        return Err(invalid("missing host"));
    }
    if port.is_empty() {
        return Err(invalid("missing port in address"));
    }

    let port = resolve_port(port).ok_or_else(|| invalid("unknown port"))?;

    Ok(SmtpAddress {
        host: host.to_string(),
        port,
        raw: value.to_string(),
    })
}

fn resolve_port(port: &str) -> Option<u16> {
    if port.bytes().all(|b| b.is_ascii_digit()) {
        return port.parse().ok();
    }
    match port.to_ascii_lowercase().as_str() {
        "smtp" => Some(25),
        "submission" => Some(587),
        "smtps" | "submissions" => Some(465),
        _ => None,
    }
}

fn parse_timeout(value: &str) -> Result<Duration> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS));
    }
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(WatchError::InvalidTimeout(value.to_string())),
    }
}

/// Plain auth only when both halves are present. One half alone is not an
/// error, but it is worth a warning.
pub fn resolve_auth(username: &str, password: &str) -> AuthMode {
    match (username.is_empty(), password.is_empty()) {
        (false, false) => AuthMode::Plain {
            username: username.to_string(),
            password: password.to_string(),
        },
        (true, true) => AuthMode::None,
        (false, true) => {
            warn!("-username given without -password; sending without authentication");
            AuthMode::None
        }
        (true, false) => {
            warn!("-password given without -username; sending without authentication");
            AuthMode::None
        }
    }
}
