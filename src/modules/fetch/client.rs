use std::io::Read;
use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Url;

use crate::error::{Result, WatchError};

/// Some servers turn away the default reqwest agent
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Largest body we are willing to hold in memory
pub const MAX_BODY_BYTES: u64 = 4 * 1024 * 1024;

/// Anything that can hand back the text behind a URL
pub trait PageSource {
    fn fetch(&self, url: &Url) -> Result<String>;
}

/// Single-attempt blocking HTTP GET
pub struct HttpFetcher {
    client: Client,
    max_body: u64,
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_USER_AGENT));
    headers.insert(ACCEPT, HeaderValue::from_static("text/html,*/*;q=0.8"));
    headers
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(default_headers())
            .build()
            .map_err(|e| WatchError::FetchError {
                url: String::new(),
                reason: format!("failed to build HTTP client: {}", e),
            })?;
        Ok(Self {
            client,
            max_body: MAX_BODY_BYTES,
        })
    }

    /// Override the body cap
    pub fn with_max_body(mut self, max_body: u64) -> Self {
        self.max_body = max_body;
        self
    }
}

impl PageSource for HttpFetcher {
    fn fetch(&self, url: &Url) -> Result<String> {
        let fail = |reason: String| WatchError::FetchError {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| fail(e.to_string()))?;

        // Status is deliberately not checked; error pages are searched too
        debug!("GET {} returned {}", url, response.status());

        let mut body = Vec::new();
        response
            .take(self.max_body + 1)
            .read_to_end(&mut body)
            .map_err(|e| fail(format!("failed to read body: {}", e)))?;

        if body.len() as u64 > self.max_body {
            return Err(fail(format!(
                "body exceeds {} bytes",
                self.max_body
            )));
        }

        debug!("Read {} bytes from {}", body.len(), url);
        Ok(String::from_utf8_lossy(&body).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serve one canned response and report the request head back
    fn serve_once(status: &str, body: &str) -> (Url, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                head.push_str(&line);
            }
            let mut stream = stream;
            stream.write_all(response.as_bytes()).unwrap();
            tx.send(head).unwrap();
        });

        let url = Url::parse(&format!("http://{}/page", addr)).unwrap();
        (url, rx)
    }

    #[test]
    fn test_fetch_returns_body_and_sends_user_agent() {
        let (url, rx) = serve_once("200 OK", "hello world");
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let body = fetcher.fetch(&url).unwrap();
        assert_eq!(body, "hello world");

        let head = rx.recv().unwrap().to_lowercase();
        assert!(head.starts_with("get /page"));
        assert!(head.contains(&BROWSER_USER_AGENT.to_lowercase()));
    }

    #[test]
    fn test_fetch_ignores_error_status() {
        let (url, _rx) = serve_once("500 Internal Server Error", "maintenance: world");
        let fetcher = HttpFetcher::new(Duration::from_secs(5)).unwrap();

        let body = fetcher.fetch(&url).unwrap();
        assert_eq!(body, "maintenance: world");
    }

    #[test]
    fn test_fetch_rejects_oversized_body() {
        let (url, _rx) = serve_once("200 OK", "0123456789");
        let fetcher = HttpFetcher::new(Duration::from_secs(5))
            .unwrap()
            .with_max_body(4);

        assert!(matches!(
            fetcher.fetch(&url),
            Err(WatchError::FetchError { .. })
        ));
    }

    #[test]
    fn test_fetch_connection_refused() {
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap()
        };
        let url = Url::parse(&format!("http://{}/", addr)).unwrap();
        let fetcher = HttpFetcher::new(Duration::from_secs(2)).unwrap();

        match fetcher.fetch(&url) {
            Err(WatchError::FetchError { url: failed, .. }) => {
                assert_eq!(failed, url.to_string())
            }
            other => panic!("expected FetchError, got {:?}", other),
        }
    }
}
