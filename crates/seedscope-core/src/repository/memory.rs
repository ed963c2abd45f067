use super::ResultRepository;
use crate::model::{BestScores, Execution, TestCase};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Default)]
struct Inner {
    executions: Vec<Execution>,
    test_cases: Vec<TestCase>,
    best_scores: Option<BestScores>,
}

/// In-memory result store. New executions can be appended while readers hold
/// snapshots built from earlier contents.
#[derive(Default)]
pub struct MemoryRepository {
    inner: RwLock<Inner>,
}

impl MemoryRepository {
    pub fn new(executions: Vec<Execution>, test_cases: Vec<TestCase>) -> Self {
        Self {
            inner: RwLock::new(Inner {
                executions,
                test_cases,
                best_scores: None,
            }),
        }
    }

    pub fn with_best_scores(self, best_scores: BestScores) -> Self {
        let mut inner = self.inner.into_inner();
        inner.best_scores = Some(best_scores);
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Records a finished execution and its scored cases. A case that repeats
    /// an existing `(execution_id, seed)` replaces it.
    pub async fn push_execution(&self, execution: Execution, test_cases: Vec<TestCase>) {
        let mut inner = self.inner.write().await;
        inner.executions.retain(|e| e.id != execution.id);
        inner.executions.push(execution);
        for tc in test_cases {
            inner
                .test_cases
                .retain(|t| !(t.execution_id == tc.execution_id && t.seed == tc.seed));
            inner.test_cases.push(tc);
        }
    }

    /// Updates the post-hoc fields of an execution. Returns false if unknown.
    pub async fn annotate_execution(
        &self,
        execution_id: &str,
        comment: Option<String>,
        commit_hash: Option<String>,
    ) -> bool {
        let mut inner = self.inner.write().await;
        let Some(execution) = inner.executions.iter_mut().find(|e| e.id == execution_id) else {
            return false;
        };
        if let Some(comment) = comment {
            execution.comment = comment;
        }
        if commit_hash.is_some() {
            execution.commit_hash = commit_hash;
        }
        true
    }

    pub async fn set_best_scores(&self, best_scores: Option<BestScores>) {
        self.inner.write().await.best_scores = best_scores;
    }
}

#[async_trait]
impl ResultRepository for MemoryRepository {
    async fn list_executions(&self) -> anyhow::Result<Vec<Execution>> {
        Ok(self.inner.read().await.executions.clone())
    }

    async fn list_test_cases(&self) -> anyhow::Result<Vec<TestCase>> {
        Ok(self.inner.read().await.test_cases.clone())
    }

    async fn load_best_scores(&self) -> anyhow::Result<Option<BestScores>> {
        Ok(self.inner.read().await.best_scores.clone())
    }
}
