use anyhow::Context;
use async_trait::async_trait;
use seedscope_core::model::{BestScores, Execution, TestCase};
use seedscope_core::repository::ResultRepository;
use serde::Deserialize;
use std::path::PathBuf;
use tokio::sync::OnceCell;

#[derive(Debug, Default, Deserialize)]
struct ResultsFile {
    #[serde(default)]
    executions: Vec<Execution>,
    #[serde(default)]
    test_cases: Vec<TestCase>,
    #[serde(default)]
    best_scores: Option<BestScores>,
}

/// Results exported by the batch runner as a single JSON document. Read once.
pub struct JsonResultFile {
    path: PathBuf,
    contents: OnceCell<ResultsFile>,
}

impl JsonResultFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            contents: OnceCell::new(),
        }
    }

    async fn contents(&self) -> anyhow::Result<&ResultsFile> {
        self.contents
            .get_or_try_init(|| async {
                let raw = tokio::fs::read_to_string(&self.path)
                    .await
                    .with_context(|| format!("failed to read results file: {}", self.path.display()))?;
                serde_json::from_str::<ResultsFile>(&raw)
                    .with_context(|| format!("failed to parse results file: {}", self.path.display()))
            })
            .await
    }
}

#[async_trait]
impl ResultRepository for JsonResultFile {
    async fn list_executions(&self) -> anyhow::Result<Vec<Execution>> {
        Ok(self.contents().await?.executions.clone())
    }

    async fn list_test_cases(&self) -> anyhow::Result<Vec<TestCase>> {
        Ok(self.contents().await?.test_cases.clone())
    }

    async fn load_best_scores(&self) -> anyhow::Result<Option<BestScores>> {
        Ok(self.contents().await?.best_scores.clone())
    }
}
