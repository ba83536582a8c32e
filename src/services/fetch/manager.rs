use super::backend::ChildrenBackend;
use crate::model::{parse_children_document, ChildrenDocument};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};

/// Type alias for pending document requests map
type PendingRequests = Arc<Mutex<HashMap<String, Vec<oneshot::Sender<io::Result<ChildrenDocument>>>>>>;

/// Manages tree document requests with de-duplication
///
/// The FetchManager sits between the tree session and the backend:
/// - Concurrent requests for the same URL share one backend request
/// - Response bodies are parsed into `ChildrenDocument`s
/// - Failures are logged once, here
pub struct FetchManager {
    backend: Arc<dyn ChildrenBackend>,
    /// Map of URL -> list of channels waiting for the result
    pending: PendingRequests,
}

impl fmt::Debug for FetchManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchManager")
            .field("backend", &"<dyn ChildrenBackend>")
            .field("pending", &"<mutex>")
            .finish()
    }
}

impl FetchManager {
    /// Create a new fetch manager with the given backend
    pub fn new(backend: Arc<dyn ChildrenBackend>) -> Self {
        Self {
            backend,
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Fetch and parse the document at `url`
    ///
    /// If multiple requests for the same URL are made concurrently, only one
    /// backend request is performed and all requesters receive the result.
    pub async fn fetch_document(&self, url: &str) -> io::Result<ChildrenDocument> {
        let (rx, should_execute) = {
            let mut pending = self.pending.lock().await;
            let (tx, rx) = oneshot::channel();

            if let Some(senders) = pending.get_mut(url) {
                senders.push(tx);
                (rx, false)
            } else {
                pending.insert(url.to_string(), vec![tx]);
                (rx, true)
            }
        };

        if should_execute {
            let result = self.load(url).await;

            let mut pending = self.pending.lock().await;
            if let Some(senders) = pending.remove(url) {
                for sender in senders {
                    let _ = sender.send(
                        result
                            .as_ref()
                            .map(|doc| doc.clone())
                            .map_err(|e| io::Error::new(e.kind(), e.to_string())),
                    );
                }
            }
        }

        rx.await
            .unwrap_or_else(|_| Err(io::Error::other("Request cancelled")))
    }

    async fn load(&self, url: &str) -> io::Result<ChildrenDocument> {
        tracing::info!("GET {}", url);

        let body = match self.backend.get(url).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Request for {} failed: {}", url, e);
                return Err(e);
            }
        };
        tracing::debug!("Response from {} ({} bytes)", url, body.len());

        parse_children_document(&body).inspect_err(|e| {
            tracing::warn!("Malformed document from {}: {}", url, e);
        })
    }
}

impl Clone for FetchManager {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            pending: Arc::clone(&self.pending),
        }
    }
}
