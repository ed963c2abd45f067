use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Deterministic test-case identifier, reused across executions.
pub type Seed = u64;

/// Reference score per seed. Seeds without a known valid score are absent.
pub type BestScores = BTreeMap<Seed, f64>;

/// One batch run over many seeds.
///
/// `id` is time-ordered by construction, so lexicographic order on it is a
/// proxy for recency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Execution {
    pub id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default)]
    pub comment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commit_hash: Option<String>,
}

impl Execution {
    pub fn new(id: impl Into<String>, start_time: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            start_time,
            comment: String::new(),
            tag_name: None,
            commit_hash: None,
        }
    }

    /// Short label used in views: the id, followed by the comment when set.
    pub fn display_name(&self) -> String {
        if self.comment.trim().is_empty() {
            self.id.clone()
        } else {
            format!("{} ({})", self.id, self.comment.trim())
        }
    }
}

/// One scored sample, keyed by `(execution_id, seed)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub execution_id: String,
    pub seed: Seed,
    /// `score <= 0` marks a failed run (WA), as does a non-finite score.
    pub score: f64,
    /// Seconds.
    pub execution_time: f64,
    #[serde(default)]
    pub error_message: String,
    #[serde(default)]
    pub found_output: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_input_line: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stderr_vars: Option<HashMap<String, f64>>,
}

impl TestCase {
    pub fn new(execution_id: impl Into<String>, seed: Seed, score: f64, execution_time: f64) -> Self {
        Self {
            execution_id: execution_id.into(),
            seed,
            score,
            execution_time,
            error_message: String::new(),
            found_output: score > 0.0,
            first_input_line: None,
            stderr_vars: None,
        }
    }

    pub fn is_wrong_answer(&self) -> bool {
        !(self.score.is_finite() && self.score > 0.0)
    }
}

impl AsRef<TestCase> for TestCase {
    fn as_ref(&self) -> &TestCase {
        self
    }
}

/// Whether higher or lower scores are better for the whole problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Objective {
    Max,
    Min,
}

impl Objective {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "max" => Some(Objective::Max),
            "min" => Some(Objective::Min),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Objective::Max => "max",
            Objective::Min => "min",
        }
    }

    /// Returns true if `candidate` beats `current` under this objective.
    pub fn is_better(&self, candidate: f64, current: f64) -> bool {
        match self {
            Objective::Max => candidate > current,
            Objective::Min => candidate < current,
        }
    }
}
