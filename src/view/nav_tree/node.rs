use crate::model::CollectionDescriptor;
use std::fmt;

/// Unique identifier for a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Represents a collection in the navigation tree
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Unique identifier
    pub id: NodeId,
    /// Hierarchical key, also the URL prefix of the collection
    pub path: String,
    /// Display name
    pub name: String,
    /// Icon URL, empty when the server has none
    pub icon_url: String,
    /// Number of items reported by the server
    pub length: Option<u64>,
    /// Whether this is the collection currently being viewed
    pub selected: bool,
    /// Parent node ID (None for root)
    pub parent: Option<NodeId>,
    /// Child node IDs, in server order
    pub children: Vec<NodeId>,
    /// Whether the children are shown
    pub expanded: bool,
    /// Whether the children have been fetched
    pub load_state: LoadState,
}

impl TreeNode {
    /// Create a new collapsed, unloaded node from a descriptor
    pub fn new(
        id: NodeId,
        path: String,
        descriptor: &CollectionDescriptor,
        parent: Option<NodeId>,
    ) -> Self {
        Self {
            id,
            path,
            name: descriptor.name.clone(),
            icon_url: descriptor.icon_url.clone(),
            length: descriptor.length,
            selected: descriptor.selected,
            parent,
            children: Vec::new(),
            expanded: false,
            load_state: LoadState::NotLoaded,
        }
    }

    /// Check if this node is expanded
    pub fn is_expanded(&self) -> bool {
        self.expanded
    }

    /// Check if the children of this node have been fetched
    pub fn is_loaded(&self) -> bool {
        self.load_state == LoadState::Loaded
    }

    /// Check if a fetch is in flight (the placeholder is shown)
    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    /// The server reported an empty collection, so expansion is disabled
    ///
    /// A node that already holds children is never disabled.
    pub fn is_disabled(&self) -> bool {
        self.length == Some(0) && self.children.is_empty()
    }
}

/// Load state of a node's children
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Children never fetched, or the last fetch failed
    NotLoaded,
    /// A fetch is in flight
    Loading,
    /// Children fetched
    Loaded,
}
