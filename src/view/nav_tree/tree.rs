use super::node::{LoadState, NodeId, TreeNode};
use crate::config::TreeConfig;
use crate::model::{ChildrenDocument, CollectionDescriptor};
use std::collections::HashMap;
use std::io;

/// Navigation tree with lazy loading support
///
/// The tree starts with the branch described by a single-branch document.
/// Collections outside that branch are only fetched when expanded. The tree
/// itself performs no I/O: `toggle_expansion()` hands out a `FetchRequest`
/// and the caller reports back through `finish_loading()` or
/// `abort_loading()`.
#[derive(Debug)]
pub struct NavigationTree {
    /// All nodes indexed by ID
    nodes: HashMap<NodeId, TreeNode>,
    /// Path to node ID mapping for quick lookups
    path_to_node: HashMap<String, NodeId>,
    /// Root node ID
    root_id: NodeId,
    /// Next node ID to assign
    next_id: usize,
    /// Base URL of the site, from the root collection
    base_url: String,
    /// Settings, with the document's template overrides applied
    config: TreeConfig,
}

/// Result of clicking the expand affordance of a node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Loaded children are now shown
    Expanded,
    /// Loaded children are now hidden
    Collapsed,
    /// Children must be fetched; the placeholder is shown
    FetchStarted(FetchRequest),
    /// A fetch for this node is already in flight
    AlreadyLoading,
    /// The collection is empty, expansion is disabled
    Disabled,
}

/// A fetch the caller must perform on behalf of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub node: NodeId,
    pub url: String,
}

/// Result of completing a fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Children attached and revealed
    Loaded(usize),
    /// The server returned no collections; the node stays retryable
    Empty,
    /// The request failed; the node stays retryable
    Failed,
    /// The node is unknown or no longer loading
    Stale,
}

impl NavigationTree {
    /// Build a tree from a single-branch document
    ///
    /// # Errors
    ///
    /// Returns an error if the document has no `isroot` collection.
    pub fn from_branch(document: &ChildrenDocument, mut config: TreeConfig) -> io::Result<Self> {
        let root = document.root_collection().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                "branch document has no root collection",
            )
        })?;

        if let Some(template) = &document.title_template {
            config.title_template = template.clone();
        }
        if let Some(message) = &document.loading_message {
            config.loading_message = message.clone();
        }

        let base_url = root.base_url.clone().unwrap_or_default();
        let root_id = NodeId(0);
        let root_node = TreeNode::new(root_id, base_url.clone(), root, None);

        let mut tree = Self {
            nodes: HashMap::from([(root_id, root_node)]),
            path_to_node: HashMap::from([(base_url.clone(), root_id)]),
            root_id,
            next_id: 1,
            base_url,
            config,
        };

        if !root.children.is_empty() {
            tree.add_branch(root_id, &root.children);
            tree.mark_loaded_and_expanded(root_id);
        }

        Ok(tree)
    }

    /// Get the root node ID
    pub fn root_id(&self) -> NodeId {
        self.root_id
    }

    /// Base URL of the site
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Effective settings of this tree
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(&id)
    }

    fn get_node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(&id)
    }

    /// Get a node by path
    pub fn get_node_by_path(&self, path: &str) -> Option<&TreeNode> {
        self.path_to_node
            .get(path)
            .and_then(|id| self.get_node(*id))
    }

    /// Get number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Toggle the expansion of a node
    ///
    /// Loaded nodes flip between expanded and collapsed without touching
    /// their children. Unloaded nodes switch to `Loading` and return the
    /// request to perform. Returns None for an unknown node.
    pub fn toggle_expansion(&mut self, id: NodeId) -> Option<ToggleOutcome> {
        let node = self.get_node(id)?;
        tracing::trace!("toggle_expansion {}", node.path);

        if node.is_disabled() {
            return Some(ToggleOutcome::Disabled);
        }

        let outcome = match node.load_state {
            LoadState::Loaded => self.refresh_expansion(id),
            LoadState::Loading => ToggleOutcome::AlreadyLoading,
            LoadState::NotLoaded => {
                let url = self.config.children_url(&node.path);
                if let Some(node) = self.get_node_mut(id) {
                    node.load_state = LoadState::Loading;
                }
                ToggleOutcome::FetchStarted(FetchRequest { node: id, url })
            }
        };

        Some(outcome)
    }

    fn refresh_expansion(&mut self, id: NodeId) -> ToggleOutcome {
        let Some(node) = self.get_node_mut(id) else {
            return ToggleOutcome::Collapsed;
        };

        node.expanded = !node.expanded;
        if node.expanded {
            tracing::trace!("show_children {} ({})", node.path, node.children.len());
            ToggleOutcome::Expanded
        } else {
            tracing::trace!("hide_children {} ({})", node.path, node.children.len());
            ToggleOutcome::Collapsed
        }
    }

    /// Attach fetched children to a loading node and reveal them
    ///
    /// Only the direct children are attached. Collections nested inside a
    /// children document are ignored, so every new child is fetched on its
    /// own first expansion. An empty list leaves the node collapsed and
    /// retryable.
    pub fn finish_loading(&mut self, id: NodeId, children: &[CollectionDescriptor]) -> LoadOutcome {
        if !self.get_node(id).is_some_and(|n| n.is_loading()) {
            return LoadOutcome::Stale;
        }

        if children.is_empty() {
            self.reset_loading(id);
            return LoadOutcome::Empty;
        }

        for descriptor in children {
            self.add_node(descriptor, id);
        }
        self.mark_loaded_and_expanded(id);
        LoadOutcome::Loaded(children.len())
    }

    /// Remove the placeholder of a loading node after a failed fetch
    pub fn abort_loading(&mut self, id: NodeId) -> LoadOutcome {
        if !self.get_node(id).is_some_and(|n| n.is_loading()) {
            return LoadOutcome::Stale;
        }

        self.reset_loading(id);
        LoadOutcome::Failed
    }

    fn reset_loading(&mut self, id: NodeId) {
        if let Some(node) = self.get_node_mut(id) {
            node.load_state = LoadState::NotLoaded;
            node.expanded = false;
        }
    }

    fn mark_loaded_and_expanded(&mut self, id: NodeId) {
        if let Some(node) = self.get_node_mut(id) {
            node.load_state = LoadState::Loaded;
            node.expanded = true;
        }
    }

    /// Add descriptors (and any nested descriptors) under `parent`
    ///
    /// Nested descriptors come from single-branch documents; the nodes that
    /// receive them count as loaded and expanded.
    fn add_branch(&mut self, parent: NodeId, descriptors: &[CollectionDescriptor]) {
        for descriptor in descriptors {
            let Some(id) = self.add_node(descriptor, parent) else {
                continue;
            };

            if !descriptor.children.is_empty() {
                self.add_branch(id, &descriptor.children);
                self.mark_loaded_and_expanded(id);
            }
        }
    }

    /// Add a new node to the tree
    fn add_node(&mut self, descriptor: &CollectionDescriptor, parent: NodeId) -> Option<NodeId> {
        let parent_path = &self.get_node(parent)?.path;
        let path = format!("{}{}/", parent_path, descriptor.name);

        let id = NodeId(self.next_id);
        self.next_id += 1;

        if self.path_to_node.contains_key(&path) {
            tracing::warn!("Duplicate tree path {}, keeping the first node", path);
        } else {
            self.path_to_node.insert(path.clone(), id);
        }

        self.nodes
            .insert(id, TreeNode::new(id, path, descriptor, Some(parent)));
        if let Some(parent_node) = self.get_node_mut(parent) {
            parent_node.children.push(id);
        }

        Some(id)
    }

    /// Check if every ancestor of the node is expanded
    pub fn is_visible(&self, id: NodeId) -> bool {
        let Some(node) = self.get_node(id) else {
            return false;
        };

        let mut current = node.parent;
        while let Some(parent_id) = current {
            match self.get_node(parent_id) {
                Some(parent) if parent.is_expanded() => current = parent.parent,
                _ => return false,
            }
        }
        true
    }

    /// Get all visible nodes in tree order
    pub fn get_visible_nodes(&self) -> Vec<NodeId> {
        let mut visible = Vec::new();
        self.collect_visible_recursive(self.root_id, &mut visible);
        visible
    }

    fn collect_visible_recursive(&self, id: NodeId, visible: &mut Vec<NodeId>) {
        visible.push(id);

        if let Some(node) = self.get_node(id) {
            if node.is_expanded() {
                for &child_id in &node.children {
                    self.collect_visible_recursive(child_id, visible);
                }
            }
        }
    }

    /// Get the parent chain for a node (from root to node)
    pub fn get_ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = Some(id);

        while let Some(node_id) = current {
            ancestors.push(node_id);
            current = self.get_node(node_id).and_then(|n| n.parent);
        }

        ancestors.reverse();
        ancestors
    }

    /// Get the depth of a node (root is 0)
    pub fn get_depth(&self, id: NodeId) -> usize {
        self.get_ancestors(id).len().saturating_sub(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::parse_children_document;

    const BRANCH: &str = r#"<?xml version="1.0" ?>
        <children title_tpl="Holds ${num}" loading_msg="Wait...">
          <collection name="[top]" baseURL="http://host/" length="3" icon_url="" isroot="">
            <collection name="a" length="1" icon_url="">
              <collection name="b" length="0" icon_url="">selected</collection>
            </collection>
            <collection name="c" length="2" icon_url=""/>
            <collection name="d" length="0" icon_url=""/>
          </collection>
        </children>"#;

    fn create_test_tree() -> NavigationTree {
        let document = parse_children_document(BRANCH).unwrap();
        NavigationTree::from_branch(&document, TreeConfig::default()).unwrap()
    }

    fn id_of(tree: &NavigationTree, path: &str) -> NodeId {
        tree.get_node_by_path(path).unwrap().id
    }

    fn descriptors(names: &[&str]) -> Vec<CollectionDescriptor> {
        names
            .iter()
            .map(|name| CollectionDescriptor::new(*name).with_length(1))
            .collect()
    }

    #[test]
    fn test_branch_construction() {
        let tree = create_test_tree();

        assert_eq!(tree.node_count(), 5);
        assert_eq!(tree.base_url(), "http://host/");

        let root = tree.get_node(tree.root_id()).unwrap();
        assert_eq!(root.path, "http://host/");
        assert!(root.is_loaded());
        assert!(root.is_expanded());

        let a = tree.get_node_by_path("http://host/a/").unwrap();
        assert!(a.is_expanded());
        assert!(a.is_loaded());

        let b = tree.get_node_by_path("http://host/a/b/").unwrap();
        assert!(b.selected);
        assert!(b.is_disabled());

        let c = tree.get_node_by_path("http://host/c/").unwrap();
        assert!(!c.is_loaded());
        assert!(!c.is_expanded());
    }

    #[test]
    fn test_document_overrides_templates() {
        let tree = create_test_tree();
        assert_eq!(tree.config().title_template, "Holds ${num}");
        assert_eq!(tree.config().loading_message, "Wait...");
    }

    #[test]
    fn test_branch_without_root_is_an_error() {
        let document =
            parse_children_document(r#"<children><collection name="x"/></children>"#).unwrap();
        let err = NavigationTree::from_branch(&document, TreeConfig::default()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_toggle_unloaded_starts_fetch() {
        let mut tree = create_test_tree();
        let c = id_of(&tree, "http://host/c/");

        let outcome = tree.toggle_expansion(c).unwrap();

        assert_eq!(
            outcome,
            ToggleOutcome::FetchStarted(FetchRequest {
                node: c,
                url: "http://host/c/@@children.xml".to_string(),
            })
        );
        assert!(tree.get_node(c).unwrap().is_loading());
    }

    #[test]
    fn test_second_toggle_while_loading_is_noop() {
        let mut tree = create_test_tree();
        let c = id_of(&tree, "http://host/c/");

        tree.toggle_expansion(c);
        assert_eq!(tree.toggle_expansion(c), Some(ToggleOutcome::AlreadyLoading));
        assert!(tree.get_node(c).unwrap().is_loading());
    }

    #[test]
    fn test_finish_loading_attaches_children_in_order() {
        let mut tree = create_test_tree();
        let c = id_of(&tree, "http://host/c/");
        tree.toggle_expansion(c);

        let outcome = tree.finish_loading(c, &descriptors(&["z", "x", "y"]));

        assert_eq!(outcome, LoadOutcome::Loaded(3));
        let node = tree.get_node(c).unwrap();
        assert!(node.is_loaded());
        assert!(node.is_expanded());

        let names: Vec<_> = node
            .children
            .iter()
            .map(|&id| tree.get_node(id).unwrap().name.as_str())
            .collect();
        assert_eq!(names, vec!["z", "x", "y"]);
        assert!(node.children.iter().all(|&id| tree.is_visible(id)));
        assert_eq!(
            tree.get_node(node.children[0]).unwrap().path,
            "http://host/c/z/"
        );
    }

    #[test]
    fn test_finish_loading_ignores_nested_collections() {
        let mut tree = create_test_tree();
        let c = id_of(&tree, "http://host/c/");
        tree.toggle_expansion(c);

        let mut x = CollectionDescriptor::new("x").with_length(5);
        x.children.push(CollectionDescriptor::new("y"));
        assert_eq!(tree.finish_loading(c, &[x]), LoadOutcome::Loaded(1));

        let x = id_of(&tree, "http://host/c/x/");
        let node = tree.get_node(x).unwrap();
        assert!(node.children.is_empty());
        assert!(!node.is_loaded());
        assert!(!node.is_expanded());
        assert!(tree.get_node_by_path("http://host/c/x/y/").is_none());

        assert_eq!(
            tree.toggle_expansion(x),
            Some(ToggleOutcome::FetchStarted(FetchRequest {
                node: x,
                url: "http://host/c/x/@@children.xml".to_string(),
            }))
        );
    }

    #[test]
    fn test_empty_result_keeps_node_retryable() {
        let mut tree = create_test_tree();
        let c = id_of(&tree, "http://host/c/");
        tree.toggle_expansion(c);

        assert_eq!(tree.finish_loading(c, &[]), LoadOutcome::Empty);

        let node = tree.get_node(c).unwrap();
        assert_eq!(node.load_state, LoadState::NotLoaded);
        assert!(!node.is_expanded());
        assert!(node.children.is_empty());

        // Retry issues a new fetch
        assert!(matches!(
            tree.toggle_expansion(c),
            Some(ToggleOutcome::FetchStarted(_))
        ));
    }

    #[test]
    fn test_abort_loading_keeps_node_retryable() {
        let mut tree = create_test_tree();
        let c = id_of(&tree, "http://host/c/");
        tree.toggle_expansion(c);

        assert_eq!(tree.abort_loading(c), LoadOutcome::Failed);
        assert_eq!(tree.get_node(c).unwrap().load_state, LoadState::NotLoaded);
    }

    #[test]
    fn test_completion_for_idle_node_is_stale() {
        let mut tree = create_test_tree();
        let c = id_of(&tree, "http://host/c/");

        assert_eq!(tree.finish_loading(c, &descriptors(&["x"])), LoadOutcome::Stale);
        assert_eq!(tree.abort_loading(c), LoadOutcome::Stale);
        assert_eq!(tree.finish_loading(NodeId(999), &[]), LoadOutcome::Stale);
        assert!(tree.get_node(c).unwrap().children.is_empty());
    }

    #[test]
    fn test_toggle_loaded_node_only_changes_visibility() {
        let mut tree = create_test_tree();
        let root = tree.root_id();
        let a = id_of(&tree, "http://host/a/");
        let b = id_of(&tree, "http://host/a/b/");
        let count = tree.node_count();

        assert_eq!(tree.toggle_expansion(a), Some(ToggleOutcome::Collapsed));
        assert!(!tree.is_visible(b));
        assert_eq!(tree.node_count(), count);

        assert_eq!(tree.toggle_expansion(a), Some(ToggleOutcome::Expanded));
        assert!(tree.is_visible(b));

        // Collapsing the root hides every descendant
        tree.toggle_expansion(root);
        assert_eq!(tree.get_visible_nodes(), vec![root]);
        assert!(!tree.is_visible(b));

        // Expanding it again restores the previous expansion state below it
        tree.toggle_expansion(root);
        assert_eq!(tree.get_visible_nodes().len(), 5);
    }

    #[test]
    fn test_disabled_node_ignores_toggle() {
        let mut tree = create_test_tree();
        let d = id_of(&tree, "http://host/d/");

        assert_eq!(tree.toggle_expansion(d), Some(ToggleOutcome::Disabled));
        assert_eq!(tree.get_node(d).unwrap().load_state, LoadState::NotLoaded);
    }

    #[test]
    fn test_unknown_node_toggle() {
        let mut tree = create_test_tree();
        assert_eq!(tree.toggle_expansion(NodeId(999)), None);
    }

    #[test]
    fn test_visible_nodes_in_tree_order() {
        let tree = create_test_tree();
        let paths: Vec<_> = tree
            .get_visible_nodes()
            .into_iter()
            .map(|id| tree.get_node(id).unwrap().path.clone())
            .collect();

        assert_eq!(
            paths,
            vec![
                "http://host/",
                "http://host/a/",
                "http://host/a/b/",
                "http://host/c/",
                "http://host/d/",
            ]
        );
    }

    #[test]
    fn test_get_ancestors_and_depth() {
        let tree = create_test_tree();
        let a = id_of(&tree, "http://host/a/");
        let b = id_of(&tree, "http://host/a/b/");

        assert_eq!(tree.get_ancestors(b), vec![tree.root_id(), a, b]);
        assert_eq!(tree.get_depth(tree.root_id()), 0);
        assert_eq!(tree.get_depth(b), 2);
    }

    #[test]
    fn test_duplicate_names_keep_first_path() {
        let mut tree = create_test_tree();
        let c = id_of(&tree, "http://host/c/");
        tree.toggle_expansion(c);

        tree.finish_loading(c, &descriptors(&["x", "x"]));

        let first = tree.get_node(c).unwrap().children[0];
        assert_eq!(tree.get_node_by_path("http://host/c/x/").unwrap().id, first);
        assert_eq!(tree.get_node(c).unwrap().children.len(), 2);
    }
}
