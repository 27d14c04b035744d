use std::time::Duration;

use lettre::address::Envelope;
use lettre::transport::smtp::authentication::{Credentials, Mechanism};
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::transport::smtp::PoolConfig;
use lettre::{Address, SmtpTransport, Transport};
use log::{debug, info};

use super::compose::EmailMessage;
use crate::config::{AuthMode, CheckConfig, SmtpAddress};
use crate::error::{Result, WatchError};
use crate::utils::logging::format_sensitive;

/// Upper bound on any single SMTP exchange
pub const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Hands a finished message to a relay. The envelope, not the headers,
/// decides who receives it.
pub trait Mailer {
    fn deliver(&self, envelope: &Envelope, raw: &[u8]) -> std::result::Result<(), String>;
}

/// Relay-backed mailer, authenticated only when `AuthMode::Plain` is set.
/// The transport is only built when there is something to deliver.
pub struct SmtpMailer {
    server: SmtpAddress,
    auth: AuthMode,
}

impl SmtpMailer {
    pub fn new(server: &SmtpAddress, auth: &AuthMode) -> Self {
        Self {
            server: server.clone(),
            auth: auth.clone(),
        }
    }

    fn transport(&self) -> std::result::Result<SmtpTransport, String> {
        // Upgrade with STARTTLS when offered, plain text otherwise
        let tls_parameters = TlsParameters::new(self.server.host.clone())
            .map_err(|e| format!("Failed to build TLS parameters: {}", e))?;

        let mut builder = SmtpTransport::builder_dangerous(self.server.host.as_str())
            .port(self.server.port)
            .tls(Tls::Opportunistic(tls_parameters))
            .pool_config(PoolConfig::new().max_size(1))
            .timeout(Some(SEND_TIMEOUT));

        if let AuthMode::Plain { username, password } = &self.auth {
            debug!(
                "Using PLAIN auth as {} against {}",
                format_sensitive(username),
                self.server.host
            );
            builder = builder
                .credentials(Credentials::new(username.clone(), password.clone()))
                .authentication(vec![Mechanism::Plain]);
        }

        Ok(builder.build())
    }
}

impl Mailer for SmtpMailer {
    fn deliver(&self, envelope: &Envelope, raw: &[u8]) -> std::result::Result<(), String> {
        self.transport()?
            .send_raw(envelope, raw)
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

/// Envelope built from the parsed recipient list, never from the To header
pub fn build_envelope(
    from: &Address,
    recipients: &[Address],
) -> std::result::Result<Envelope, String> {
    Envelope::new(Some(from.clone()), recipients.to_vec())
        .map_err(|e| format!("Invalid envelope: {}", e))
}

/// One delivery attempt for an already composed message
pub fn send(config: &CheckConfig, message: &EmailMessage, mailer: &dyn Mailer) -> Result<()> {
    let send_error = |reason: String| WatchError::SendError {
        from: config.from_address.to_string(),
        to: config.recipients_display(),
        server: config.smtp_server.to_string(),
        reason,
    };

    let envelope = build_envelope(&config.from_address, &config.to_addresses).map_err(send_error)?;
    let raw = message.render();
    debug!("Outgoing message:\n{}", raw);

    mailer
        .deliver(&envelope, raw.as_bytes())
        .map_err(send_error)?;

    info!(
        "Email sent from {} to {} via {}",
        config.from_address,
        config.recipients_display(),
        config.smtp_server
    );
    Ok(())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use reqwest::Url;
    use std::cell::RefCell;

    /// Records every delivery instead of talking to a relay
    #[derive(Default)]
    pub(crate) struct RecordingMailer {
        pub sent: RefCell<Vec<(Option<String>, Vec<String>, String)>>,
        pub fail_with: Option<String>,
    }

    impl Mailer for RecordingMailer {
        fn deliver(&self, envelope: &Envelope, raw: &[u8]) -> std::result::Result<(), String> {
            if let Some(reason) = &self.fail_with {
                return Err(reason.clone());
            }
            self.sent.borrow_mut().push((
                envelope.from().map(|a| a.to_string()),
                envelope.to().iter().map(|a| a.to_string()).collect(),
                String::from_utf8_lossy(raw).into_owned(),
            ));
            Ok(())
        }
    }

    pub(crate) fn config(to: &[&str]) -> CheckConfig {
        CheckConfig {
            url: "http://example.com".to_string(),
            target: Url::parse("http://example.com").unwrap(),
            watch_string: "world".to_string(),
            from_address: "watch@example.com".parse().unwrap(),
            to_addresses: to.iter().map(|s| s.parse().unwrap()).collect(),
            smtp_server: SmtpAddress {
                host: "localhost".to_string(),
                port: 2525,
                raw: "localhost:2525".to_string(),
            },
            auth: AuthMode::None,
            fetch_timeout: Duration::from_secs(5),
        }
    }

    fn message() -> EmailMessage {
        EmailMessage {
            headers: vec![("Subject".to_string(), "hi".to_string())],
            body: "body".to_string(),
        }
    }

    #[test]
    fn test_envelope_matches_recipient_list() {
        let config = config(&["a@example.com", "b@example.com", "c@example.com"]);
        let mailer = RecordingMailer::default();

        send(&config, &message(), &mailer).unwrap();

        let sent = mailer.sent.borrow();
        assert_eq!(sent.len(), 1);
        let (from, to, raw) = &sent[0];
        assert_eq!(from.as_deref(), Some("watch@example.com"));
        assert_eq!(to, &["a@example.com", "b@example.com", "c@example.com"]);
        assert_eq!(raw, "Subject: hi\r\n\r\nbody\r\n");
    }

    #[test]
    fn test_transport_failure_is_send_error() {
        let config = config(&["a@example.com", "b@example.com"]);
        let mailer = RecordingMailer {
            fail_with: Some("connection refused".to_string()),
            ..RecordingMailer::default()
        };

        match send(&config, &message(), &mailer) {
            Err(WatchError::SendError {
                from,
                to,
                server,
                reason,
            }) => {
                assert_eq!(from, "watch@example.com");
                assert_eq!(to, "a@example.com, b@example.com");
                assert_eq!(server, "localhost:2525");
                assert_eq!(reason, "connection refused");
            }
            other => panic!("expected SendError, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_envelope_is_send_error_without_delivery() {
        let config = config(&[]);
        let mailer = RecordingMailer::default();

        assert!(matches!(
            send(&config, &message(), &mailer),
            Err(WatchError::SendError { .. })
        ));
        assert!(mailer.sent.borrow().is_empty());
    }

    fn local_server(port: u16) -> SmtpAddress {
        SmtpAddress {
            host: "127.0.0.1".to_string(),
            port,
            raw: format!("127.0.0.1:{}", port),
        }
    }

    #[test]
    fn test_smtp_transport_builds_with_and_without_auth() {
        let server = local_server(2525);
        assert!(SmtpMailer::new(&server, &AuthMode::None).transport().is_ok());
        let auth = AuthMode::Plain {
            username: "user".to_string(),
            password: "secret".to_string(),
        };
        assert!(SmtpMailer::new(&server, &auth).transport().is_ok());
    }

    #[test]
    fn test_smtp_failure_surfaces_on_delivery() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        // Construction never touches the relay
        let mailer = SmtpMailer::new(&local_server(port), &AuthMode::None);

        let config = config(&["a@example.com"]);
        let envelope = build_envelope(&config.from_address, &config.to_addresses).unwrap();
        assert!(mailer.deliver(&envelope, b"Subject: hi\r\n\r\nbody\r\n").is_err());
    }
}
