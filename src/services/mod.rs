//! Asynchronous services and external integrations
//!
//! This module contains all code that deals with the network, logging
//! setup, and async operations.

pub mod fetch;
#[cfg(feature = "runtime")]
pub mod tracing_setup;
