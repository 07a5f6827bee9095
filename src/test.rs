//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::Config;
use tempfile::TempDir;

/// Test environment that sets up a daybook home directory with a Config.
/// Holds the TempDir to keep the directory alive for the duration of the
/// test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with an initialized home directory.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("daybook");
        let config = Config::create(&root).await.unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
