use async_trait::async_trait;
use std::io;

/// Async backend for the GET requests issued by the tree
///
/// This trait abstracts the transport so the tree can be driven by a real
/// HTTP server, an in-memory site, or a test double. Implementations return
/// the raw response body; parsing happens in the `FetchManager`.
#[async_trait]
pub trait ChildrenBackend: Send + Sync {
    /// Fetch the body of `url`
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be retrieved (connection
    /// failure, non-success status, timeout, unknown URL, etc.)
    async fn get(&self, url: &str) -> io::Result<String>;
}
