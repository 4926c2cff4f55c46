#![deny(unsafe_code)]

//! Shared test utilities for the citecompass workspace.
//!
//! Provides config builders, temporary config files, unique identities for
//! tests that share the process-wide registry, and a layer for capturing
//! `tracing` output. Test log output itself goes through
//! `#[test_log::test]`.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! citecompass-test-utils = { workspace = true }
//! ```

pub mod capture;
pub mod fixtures;
