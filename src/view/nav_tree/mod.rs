// Navigation tree module for lazily loaded collection hierarchies
//
// This module provides a tree of server-side collections. The initial
// branch is loaded eagerly from a single-branch document; every other
// collection is only fetched when first expanded.

pub mod node;
pub mod render;
pub mod session;
pub mod tree;

pub use node::{LoadState, NodeId, TreeNode};
pub use render::{ExpandIcon, NodePresentation, RenderedRow, TreeRenderer};
pub use session::{FetchCompletion, SessionStatus, TreeSession};
pub use tree::{FetchRequest, LoadOutcome, NavigationTree, ToggleOutcome};
