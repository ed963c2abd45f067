use crate::best_score::{resolve_best_scores, BestScoreSource};
use crate::config::StatsConfig;
use crate::errors::LoadError;
use crate::grouping::{self, SeedEntry, SeedIndex};
use crate::model::{BestScores, Execution, Seed, TestCase};
use crate::repository::{ConfigSource, ResultRepository};
use crate::stats::{aggregate_executions, aggregate_seeds, ExecutionStats, SeedStats};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Everything a presentation layer needs, computed in one pass and never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub config: StatsConfig,
    pub executions: Vec<Execution>,
    pub test_cases: Vec<TestCase>,
    pub best_scores: BestScores,
    pub best_score_source: BestScoreSource,
    pub execution_stats: Vec<ExecutionStats>,
    pub seed_stats: BTreeMap<Seed, SeedStats>,
    /// Test cases whose execution is not part of `executions`.
    pub orphan_count: usize,
    pub fingerprint: String,
    pub loaded_at: DateTime<Utc>,
    #[serde(skip)]
    seed_index: SeedIndex,
    #[serde(skip)]
    stats_by_id: HashMap<String, usize>,
}

impl Snapshot {
    /// Builds a snapshot from already materialized inputs.
    pub fn build(
        config: StatsConfig,
        executions: Vec<Execution>,
        test_cases: Vec<TestCase>,
        external_best_scores: Option<BestScores>,
    ) -> Self {
        let objective = config.objective;
        let (best_scores, best_score_source) =
            resolve_best_scores(external_best_scores, &test_cases, objective);
        tracing::debug!(
            source = ?best_score_source,
            seeds = best_scores.len(),
            "best-score table resolved"
        );

        let execution_stats = aggregate_executions(&executions, &test_cases, &best_scores, objective);
        let seed_stats = aggregate_seeds(&test_cases, &best_scores);
        let orphan_count = grouping::count_orphans(&executions, &test_cases);
        if orphan_count > 0 {
            tracing::warn!(orphans = orphan_count, "orphan test cases dropped");
        }
        let seed_index = grouping::seed_index(&executions, &test_cases);
        let stats_by_id = execution_stats
            .iter()
            .enumerate()
            .map(|(i, s)| (s.execution.id.clone(), i))
            .collect();
        let fingerprint =
            crate::fingerprint::compute(objective, &executions, &test_cases, &best_scores);

        Self {
            config,
            executions,
            test_cases,
            best_scores,
            best_score_source,
            execution_stats,
            seed_stats,
            orphan_count,
            fingerprint,
            loaded_at: Utc::now(),
            seed_index,
            stats_by_id,
        }
    }

    /// Reads configuration and results from the external collaborators and
    /// builds a fresh snapshot.
    ///
    /// The configuration is resolved first; without an objective the load
    /// fails before any result is read.
    pub async fn load(
        results: &dyn ResultRepository,
        config: &dyn ConfigSource,
    ) -> Result<Self, LoadError> {
        let config = config
            .load_config()
            .await?
            .ok_or_else(|| LoadError::MissingConfiguration("no configuration located".into()))?
            .resolve()?;

        let (executions, test_cases, best_scores) = tokio::try_join!(
            results.list_executions(),
            results.list_test_cases(),
            results.load_best_scores(),
        )?;

        let snapshot = Self::build(config, executions, test_cases, best_scores);
        tracing::info!(
            executions = snapshot.executions.len(),
            test_cases = snapshot.test_cases.len(),
            orphans = snapshot.orphan_count,
            objective = snapshot.config.objective.as_str(),
            fingerprint = %snapshot.fingerprint,
            "snapshot loaded"
        );
        Ok(snapshot)
    }

    pub fn execution_stats(&self, execution_id: &str) -> Option<&ExecutionStats> {
        self.stats_by_id
            .get(execution_id)
            .map(|&i| &self.execution_stats[i])
    }

    /// Seeds with at least one non-orphan test case, ascending, with their
    /// entry counts.
    pub fn seed_sizes(&self) -> impl Iterator<Item = (Seed, usize)> + '_ {
        self.seed_index
            .iter()
            .map(|(seed, positions)| (*seed, positions.len()))
    }

    /// `(execution, test case)` entries of one seed, in input order.
    pub fn seed_entries(&self, seed: Seed) -> Option<Vec<SeedEntry<'_>>> {
        self.seed_index
            .get(&seed)
            .map(|positions| grouping::resolve_entries(positions, &self.executions, &self.test_cases))
    }

    /// Most recent execution by id.
    pub fn latest_execution(&self) -> Option<&Execution> {
        self.executions.iter().max_by(|a, b| a.id.cmp(&b.id))
    }
}
