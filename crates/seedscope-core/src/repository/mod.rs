//! Contracts for the external collaborators that own file and process I/O.
//!
//! The core never reads results itself; it is handed them through these
//! traits when a snapshot is loaded.

mod memory;

pub use memory::MemoryRepository;

use crate::config::ConfigFile;
use crate::errors::ConfigError;
use crate::model::{BestScores, Execution, TestCase};
use async_trait::async_trait;

/// Source of executions, test cases and the persisted best-score table.
#[async_trait]
pub trait ResultRepository: Send + Sync {
    async fn list_executions(&self) -> anyhow::Result<Vec<Execution>>;

    /// All test cases, at most one per `(execution_id, seed)`.
    async fn list_test_cases(&self) -> anyhow::Result<Vec<TestCase>>;

    /// Persisted best scores, if the collaborator keeps any.
    async fn load_best_scores(&self) -> anyhow::Result<Option<BestScores>> {
        Ok(None)
    }
}

/// Source of the problem configuration.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// `Ok(None)` when no configuration could be located at all.
    async fn load_config(&self) -> Result<Option<ConfigFile>, ConfigError>;
}

#[async_trait]
impl ConfigSource for ConfigFile {
    async fn load_config(&self) -> Result<Option<ConfigFile>, ConfigError> {
        Ok(Some(self.clone()))
    }
}
