//! Structural queries over a snapshot, shaped for tree-style presentation.

use crate::config::ViewSettings;
use crate::grouping::{GroupingMode, SeedEntry};
use crate::model::{Seed, TestCase};
use crate::snapshot::Snapshot;
use crate::sort::{sort_seed_entries, sort_test_cases};
use crate::stats::ExecutionStats;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TreeNode {
    Execution { execution_id: String },
    Seed { seed: Seed },
    TestCase { execution_id: String, seed: Seed },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeItem {
    pub node: TreeNode,
    pub label: String,
    pub description: String,
    pub has_children: bool,
}

/// Integers print without a fraction; everything else with three decimals.
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 && score.abs() < 1e15 {
        format!("{}", score as i64)
    } else {
        format!("{:.3}", score)
    }
}

pub fn format_seed(seed: Seed) -> String {
    format!("{:04}", seed)
}

fn case_description(tc: &TestCase, relative: Option<f64>) -> String {
    let mut out = if tc.is_wrong_answer() {
        format!("WA ({})", format_score(tc.score))
    } else {
        format!("score {}", format_score(tc.score))
    };
    if let Some(rel) = relative {
        out.push_str(&format!(" | {:.3}%", rel));
    }
    out.push_str(&format!(" | {:.2}s", tc.execution_time));
    if !tc.error_message.is_empty() {
        out.push_str(&format!(" | {}", tc.error_message.lines().next().unwrap_or_default()));
    }
    out
}

impl Snapshot {
    /// Children of `parent`, or the roots when `parent` is `None`.
    ///
    /// Test-case nodes are leaves; unknown parents have no children.
    pub fn children(&self, parent: Option<&TreeNode>, view: &ViewSettings) -> Vec<TreeItem> {
        match parent {
            None => match view.grouping {
                GroupingMode::ByExecution => self.execution_roots(),
                GroupingMode::BySeed => self.seed_roots(),
            },
            Some(TreeNode::Execution { execution_id }) => self
                .execution_stats(execution_id)
                .map(|stats| self.execution_children(stats, view))
                .unwrap_or_default(),
            Some(TreeNode::Seed { seed }) => self.seed_children(*seed, view),
            Some(TreeNode::TestCase { .. }) => Vec::new(),
        }
    }

    fn execution_roots(&self) -> Vec<TreeItem> {
        self.execution_stats
            .iter()
            .map(|stats| {
                let mut description = format!(
                    "avg {:.3}% | AC {}/{} | max {:.2}s",
                    stats.average_relative_score,
                    stats.ac_count,
                    stats.case_count,
                    stats.max_execution_time
                );
                if let Some(tag) = &stats.execution.tag_name {
                    description.push_str(&format!(" | tag {}", tag));
                }
                TreeItem {
                    node: TreeNode::Execution {
                        execution_id: stats.execution.id.clone(),
                    },
                    label: stats.execution.display_name(),
                    description,
                    has_children: stats.case_count > 0,
                }
            })
            .collect()
    }

    fn seed_roots(&self) -> Vec<TreeItem> {
        self.seed_sizes()
            .map(|(seed, runs)| {
                let best = self
                    .seed_stats
                    .get(&seed)
                    .and_then(|s| s.best_score)
                    .map(format_score)
                    .unwrap_or_else(|| "-".into());
                let average = self
                    .seed_stats
                    .get(&seed)
                    .map(|s| s.average_score)
                    .unwrap_or_default();
                TreeItem {
                    node: TreeNode::Seed { seed },
                    label: format_seed(seed),
                    description: format!(
                        "best {} | avg {} | {} runs",
                        best,
                        format_score(average),
                        runs
                    ),
                    has_children: runs > 0,
                }
            })
            .collect()
    }

    fn execution_children(&self, stats: &ExecutionStats, view: &ViewSettings) -> Vec<TreeItem> {
        let cases: Vec<&TestCase> = stats.test_cases.iter().collect();
        sort_test_cases(&cases, view.execution_sort, &stats.relative_scores)
            .into_iter()
            .map(|tc| TreeItem {
                node: TreeNode::TestCase {
                    execution_id: tc.execution_id.clone(),
                    seed: tc.seed,
                },
                label: format_seed(tc.seed),
                description: case_description(tc, stats.relative_scores.get(&tc.seed).copied()),
                has_children: false,
            })
            .collect()
    }

    fn seed_children(&self, seed: Seed, view: &ViewSettings) -> Vec<TreeItem> {
        let Some(entries) = self.seed_entries(seed) else {
            return Vec::new();
        };

        sort_seed_entries(&entries, view.seed_sort)
            .into_iter()
            .map(|SeedEntry { execution, test_case }| {
                let relative = self
                    .execution_stats(&execution.id)
                    .and_then(|s| s.relative_scores.get(&seed).copied());
                TreeItem {
                    node: TreeNode::TestCase {
                        execution_id: execution.id.clone(),
                        seed,
                    },
                    label: execution.display_name(),
                    description: case_description(test_case, relative),
                    has_children: false,
                }
            })
            .collect()
    }
}
