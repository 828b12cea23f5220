//! # Infracat Testkit
//!
//! Test utilities for infracat.
//!
//! This crate provides:
//! - Test fixtures for in-memory and file-backed catalogs
//! - A fault-injecting provider for partial-failure tests
//! - Property-based test generators using proptest
//! - A provider conformance suite run against every backend
//!
//! ## Usage
//!
//! ```rust
//! use infracat_testkit::prelude::*;
//!
//! with_memory_catalog(|providers| {
//!     scenarios::one_of_each(providers);
//!     assert!(providers.networks.exists("n1"));
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod conformance;
pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use infracat_storage::{ClusterProvider, EntityProvider, NetworkProvider};
}

pub use fixtures::*;
pub use generators::*;
