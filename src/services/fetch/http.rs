use super::backend::ChildrenBackend;
use async_trait::async_trait;
use std::io;
use std::time::Duration;

/// HTTP backend using blocking `ureq` requests on the tokio blocking pool
#[derive(Debug, Clone)]
pub struct HttpBackend {
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    fn get_blocking(url: &str, timeout: Duration) -> io::Result<String> {
        let response = ureq::get(url)
            .set("Accept", "text/xml")
            .timeout(timeout)
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) => {
                    io::Error::other(format!("GET {url} returned status {code}"))
                }
                ureq::Error::Transport(transport) => {
                    io::Error::new(transport_error_kind(&transport), transport.to_string())
                }
            })?;

        response.into_string()
    }
}

/// Timeouts keep their own kind; any other transport failure means the
/// server could not be reached.
fn transport_error_kind(transport: &ureq::Transport) -> io::ErrorKind {
    let source_kind = std::error::Error::source(transport)
        .and_then(|source| source.downcast_ref::<io::Error>())
        .map(io::Error::kind);

    match source_kind {
        Some(io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => io::ErrorKind::TimedOut,
        _ => io::ErrorKind::ConnectionRefused,
    }
}

impl Default for HttpBackend {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

#[async_trait]
impl ChildrenBackend for HttpBackend {
    async fn get(&self, url: &str) -> io::Result<String> {
        let url = url.to_string();
        let timeout = self.timeout;

        tokio::task::spawn_blocking(move || Self::get_blocking(&url, timeout))
            .await
            .map_err(|e| io::Error::other(format!("Request task failed: {e}")))?
    }
}
