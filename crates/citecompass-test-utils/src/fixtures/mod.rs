//! Reusable test fixtures.

mod config;
mod identity;

pub use config::{TempConfig, TestConfigBuilder};
pub use identity::unique_identity;
