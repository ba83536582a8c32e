use super::backend::ChildrenBackend;
use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::RwLock;

/// In-memory backend serving fixed bodies by URL
///
/// Useful for demos and tests. Unknown URLs fail with `NotFound`, which the
/// tree treats like any other failed request.
#[derive(Debug, Default)]
pub struct StaticBackend {
    documents: RwLock<HashMap<String, String>>,
}

impl StaticBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of `insert`
    pub fn with_document(self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.insert(url, body);
        self
    }

    /// Serve `body` for `url`, replacing any previous body
    pub fn insert(&self, url: impl Into<String>, body: impl Into<String>) {
        if let Ok(mut documents) = self.documents.write() {
            documents.insert(url.into(), body.into());
        }
    }

    /// Stop serving `url`
    pub fn remove(&self, url: &str) {
        if let Ok(mut documents) = self.documents.write() {
            documents.remove(url);
        }
    }
}

#[async_trait]
impl ChildrenBackend for StaticBackend {
    async fn get(&self, url: &str) -> io::Result<String> {
        let documents = self
            .documents
            .read()
            .map_err(|_| io::Error::other("document table poisoned"))?;

        documents
            .get(url)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("No document for {url}")))
    }
}
