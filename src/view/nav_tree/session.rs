use super::node::NodeId;
use super::render::{RenderedRow, TreeRenderer};
use super::tree::{FetchRequest, LoadOutcome, NavigationTree, ToggleOutcome};
use crate::config::TreeConfig;
use crate::model::ChildrenDocument;
use crate::services::fetch::{ChildrenBackend, FetchManager};
use std::io;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Result of a background fetch, delivered back to the session
#[derive(Debug)]
pub struct FetchCompletion {
    /// Root load the request belongs to
    pub generation: u64,
    pub node: NodeId,
    pub result: io::Result<ChildrenDocument>,
}

/// What the tree container currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionStatus {
    /// No root loaded yet
    Empty,
    /// The tree is available
    Ready,
    /// The root could not be loaded; the message replaces the tree
    Unavailable(String),
}

/// Navigation tree session for one page
///
/// Owns the tree, its settings and the fetch machinery. Event handlers call
/// `click()`, which never blocks: a needed fetch runs as a tokio task and
/// reports back over a channel. Completions are applied by
/// `next_completion()` or `process_completions()`, so the tree is only ever
/// mutated through `&mut self`.
///
/// `click()` spawns onto the current tokio runtime and must be called from
/// within one.
pub struct TreeSession {
    config: TreeConfig,
    fetcher: FetchManager,
    tree: Option<NavigationTree>,
    status: SessionStatus,
    /// Bumped on every root load so late completions can be recognised
    generation: u64,
    /// Fetches of the current generation not yet applied
    pending: usize,
    completion_tx: mpsc::UnboundedSender<FetchCompletion>,
    completion_rx: mpsc::UnboundedReceiver<FetchCompletion>,
}

impl TreeSession {
    pub fn new(config: TreeConfig, backend: Arc<dyn ChildrenBackend>) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        Self {
            config,
            fetcher: FetchManager::new(backend),
            tree: None,
            status: SessionStatus::Empty,
            generation: 0,
            pending: 0,
            completion_tx,
            completion_rx,
        }
    }

    /// Load the branch leading to `page_url` and replace the current tree
    ///
    /// Fetches still in flight for the previous tree are ignored when they
    /// complete.
    pub async fn load_root(&mut self, page_url: &str) -> &SessionStatus {
        self.generation += 1;
        self.pending = 0;

        let url = self.config.single_branch_url(page_url);
        let result = self
            .fetcher
            .fetch_document(&url)
            .await
            .and_then(|document| NavigationTree::from_branch(&document, self.config.clone()));

        match result {
            Ok(tree) => {
                tracing::info!("Loaded tree with {} nodes from {}", tree.node_count(), url);
                self.tree = Some(tree);
                self.status = SessionStatus::Ready;
            }
            Err(e) => {
                tracing::warn!("Unable to load tree root from {}: {}", url, e);
                self.tree = None;
                self.status = SessionStatus::Unavailable(self.config.unavailable_message.clone());
            }
        }

        &self.status
    }

    /// Handle a click on the expand affordance of the node at `path`
    ///
    /// Returns None when no tree is loaded or the path is unknown.
    pub fn click(&mut self, path: &str) -> Option<ToggleOutcome> {
        let id = self.tree.as_ref()?.get_node_by_path(path)?.id;
        self.toggle(id)
    }

    /// Handle a click on the expand affordance of a node
    pub fn toggle(&mut self, id: NodeId) -> Option<ToggleOutcome> {
        let outcome = self.tree.as_mut()?.toggle_expansion(id)?;

        if let ToggleOutcome::FetchStarted(request) = &outcome {
            self.spawn_fetch(request.clone());
        }

        Some(outcome)
    }

    fn spawn_fetch(&mut self, request: FetchRequest) {
        let fetcher = self.fetcher.clone();
        let tx = self.completion_tx.clone();
        let generation = self.generation;
        self.pending += 1;

        tokio::spawn(async move {
            let result = fetcher.fetch_document(&request.url).await;
            let _ = tx.send(FetchCompletion {
                generation,
                node: request.node,
                result,
            });
        });
    }

    /// Apply a completed fetch to the tree
    pub fn apply_completion(&mut self, completion: FetchCompletion) -> LoadOutcome {
        if completion.generation != self.generation {
            tracing::debug!("Dropping completion for {} from an old tree", completion.node);
            return LoadOutcome::Stale;
        }
        self.pending = self.pending.saturating_sub(1);

        let Some(tree) = self.tree.as_mut() else {
            return LoadOutcome::Stale;
        };

        match completion.result {
            Ok(document) => {
                let outcome = tree.finish_loading(completion.node, &document.collections);
                if outcome == LoadOutcome::Empty {
                    if let Some(node) = tree.get_node(completion.node) {
                        tracing::warn!("No children returned for {}", node.path);
                    }
                }
                outcome
            }
            Err(_) => tree.abort_loading(completion.node),
        }
    }

    /// Wait for the next fetch of the current tree and apply it
    ///
    /// Returns None immediately when nothing is in flight.
    pub async fn next_completion(&mut self) -> Option<LoadOutcome> {
        while self.pending > 0 {
            let completion = self.completion_rx.recv().await?;
            if completion.generation != self.generation {
                continue;
            }
            return Some(self.apply_completion(completion));
        }
        None
    }

    /// Apply every completion that is already available, without waiting
    pub fn process_completions(&mut self) -> Vec<LoadOutcome> {
        let mut outcomes = Vec::new();
        while let Ok(completion) = self.completion_rx.try_recv() {
            outcomes.push(self.apply_completion(completion));
        }
        outcomes
    }

    /// Number of fetches of the current tree still in flight
    pub fn pending_fetches(&self) -> usize {
        self.pending
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    pub fn tree(&self) -> Option<&NavigationTree> {
        self.tree.as_ref()
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Presentation rows of the current tree
    pub fn rows(&self) -> Vec<RenderedRow> {
        self.tree.as_ref().map(TreeRenderer::rows).unwrap_or_default()
    }

    /// Plain-text rendering of the tree container
    pub fn render_text(&self) -> String {
        match (&self.status, &self.tree) {
            (SessionStatus::Unavailable(message), _) => format!("{message}\n"),
            (_, Some(tree)) => TreeRenderer::render_text(tree),
            (_, None) => String::new(),
        }
    }
}
