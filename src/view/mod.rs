//! View layer
//!
//! This module contains the presentation state behind the page widgets:
//! the lazily loaded navigation tree, the row search filter, collapsible
//! panels, the depth-indexed row tree and the set and property form
//! controls.

pub mod nav_tree;
pub mod panels;
pub mod property_control;
pub mod row_tree;
pub mod search_filter;
pub mod set_control;
