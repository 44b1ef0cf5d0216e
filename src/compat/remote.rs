//! Remote compatibility lookup
//!
//! One blocking HTTP GET per identifier pair against the lookup service:
//!
//! ```text
//! GET <endpoint>?view=search&vendor_id=10de&device_id=1c82
//! ```
//!
//! Every failure is reported as a [`LookupOutcome`] variant instead of an
//! error, so the resolver decides what to do with an explicit `match`.

use std::fmt;
use std::io;
use std::time::Duration;

use super::classifier::{KeywordClassifier, ResponseClassifier};
use crate::logic::normalize::DeviceIds;
use crate::types::Compatibility;

/// Default lookup endpoint
pub const DEFAULT_ENDPOINT: &str = "https://linux-hardware.org/";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Tagged result of one remote lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    /// The service answered; the tier may still be `Unknown`
    Found(Compatibility),
    /// No answer within the timeout
    TimedOut,
    /// Connection, DNS or TLS failure
    Unreachable(String),
    /// The service answered with a status other than 200
    Rejected(u16),
    /// The response body could not be read
    Malformed(String),
    /// Remote lookups are turned off for this run
    Disabled,
}

impl fmt::Display for LookupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Found(tier) => write!(f, "found ({})", tier),
            Self::TimedOut => write!(f, "timed out"),
            Self::Unreachable(reason) => write!(f, "unreachable: {}", reason),
            Self::Rejected(status) => write!(f, "rejected with HTTP {}", status),
            Self::Malformed(reason) => write!(f, "malformed response: {}", reason),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// A source the resolver can ask about one identifier pair.
pub trait CompatibilitySource {
    fn lookup(&self, ids: &DeviceIds) -> LookupOutcome;
}

impl<T: CompatibilitySource + ?Sized> CompatibilitySource for Box<T> {
    fn lookup(&self, ids: &DeviceIds) -> LookupOutcome {
        (**self).lookup(ids)
    }
}

/// HTTP lookup against the remote compatibility service.
pub struct HttpSource<C: ResponseClassifier = KeywordClassifier> {
    endpoint: String,
    agent: ureq::Agent,
    classifier: C,
}

impl HttpSource<KeywordClassifier> {
    /// Source with the keyword classifier.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        Self::with_classifier(endpoint, timeout, KeywordClassifier)
    }
}

impl<C: ResponseClassifier> HttpSource<C> {
    pub fn with_classifier(endpoint: impl Into<String>, timeout: Duration, classifier: C) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            endpoint: endpoint.into(),
            agent,
            classifier,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl<C: ResponseClassifier> CompatibilitySource for HttpSource<C> {
    fn lookup(&self, ids: &DeviceIds) -> LookupOutcome {
        tracing::debug!("Remote lookup for {} at {}", ids, self.endpoint);

        let response = self
            .agent
            .get(&self.endpoint)
            .query("view", "search")
            .query("vendor_id", ids.vendor_id())
            .query("device_id", ids.device_id())
            .call();

        match response {
            Ok(response) if response.status() == 200 => match response.into_string() {
                Ok(body) => LookupOutcome::Found(self.classifier.classify(&body)),
                Err(e) if is_timeout_io(&e) => LookupOutcome::TimedOut,
                Err(e) => LookupOutcome::Malformed(e.to_string()),
            },
            Ok(response) => LookupOutcome::Rejected(response.status()),
            Err(ureq::Error::Status(status, _)) => LookupOutcome::Rejected(status),
            Err(ureq::Error::Transport(transport)) => {
                if is_timeout(&transport) {
                    LookupOutcome::TimedOut
                } else {
                    LookupOutcome::Unreachable(transport.to_string())
                }
            }
        }
    }
}

fn is_timeout_io(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock)
}

/// Walk the transport error's source chain looking for an I/O timeout.
fn is_timeout(transport: &ureq::Transport) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> =
        std::error::Error::source(transport);
    while let Some(err) = source {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if is_timeout_io(io_err) {
                return true;
            }
        }
        source = err.source();
    }
    false
}

/// Source used with `--offline`: never touches the network.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSource;

impl CompatibilitySource for OfflineSource {
    fn lookup(&self, _ids: &DeviceIds) -> LookupOutcome {
        LookupOutcome::Disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned HTTP response on a local port and return its URL.
    fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let n = stream.read(&mut buf).unwrap();
            let request = String::from_utf8_lossy(&buf[..n]).into_owned();
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            request
        });
        (url, handle)
    }

    fn ids() -> DeviceIds {
        DeviceIds::new("10de", "1c82").unwrap()
    }

    #[test]
    fn test_lookup_classifies_body() {
        let (url, server) = serve_once("200 OK", "<td>Status: works</td>");
        let source = HttpSource::new(url, Duration::from_secs(5));
        assert_eq!(source.lookup(&ids()), LookupOutcome::Found(Compatibility::Works));

        let request = server.join().unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.contains("view=search"));
        assert!(request_line.contains("vendor_id=10de"));
        assert!(request_line.contains("device_id=1c82"));
    }

    #[test]
    fn test_lookup_non_200_is_rejected() {
        let (url, server) = serve_once("404 Not Found", "gone");
        let source = HttpSource::new(url, Duration::from_secs(5));
        assert_eq!(source.lookup(&ids()), LookupOutcome::Rejected(404));
        server.join().unwrap();
    }

    #[test]
    fn test_lookup_non_200_success_is_rejected() {
        let (url, server) = serve_once("204 No Content", "");
        let source = HttpSource::new(url, Duration::from_secs(5));
        assert_eq!(source.lookup(&ids()), LookupOutcome::Rejected(204));
        server.join().unwrap();
    }

    #[test]
    fn test_lookup_closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        drop(listener);

        let source = HttpSource::new(url, Duration::from_secs(5));
        assert!(matches!(source.lookup(&ids()), LookupOutcome::Unreachable(_)));
    }

    #[test]
    fn test_lookup_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}/", listener.local_addr().unwrap());
        let server = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_millis(800));
            drop(stream);
        });

        let source = HttpSource::new(url, Duration::from_millis(200));
        assert_eq!(source.lookup(&ids()), LookupOutcome::TimedOut);
        server.join().unwrap();
    }

    #[test]
    fn test_offline_source_is_disabled() {
        assert_eq!(OfflineSource.lookup(&ids()), LookupOutcome::Disabled);
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(LookupOutcome::Rejected(503).to_string(), "rejected with HTTP 503");
        assert_eq!(
            LookupOutcome::Found(Compatibility::Partial).to_string(),
            "found (partial)"
        );
    }
}
