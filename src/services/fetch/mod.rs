// Fetch abstraction layer for loading tree documents
//
// This module provides a clean abstraction over the GET requests the tree
// issues, designed to work with a real HTTP server, an in-memory site for
// demos and tests, and a slow wrapper for responsiveness testing.

pub mod backend;
#[cfg(feature = "runtime")]
pub mod http;
pub mod manager;
pub mod memory;
pub mod slow;

pub use backend::ChildrenBackend;
#[cfg(feature = "runtime")]
pub use http::HttpBackend;
pub use manager::FetchManager;
pub use memory::StaticBackend;
pub use slow::{FetchMetrics, SlowBackend};
