use crate::best_score::lookup;
use crate::grouping::by_execution;
use crate::model::{BestScores, Execution, Objective, Seed, TestCase};
use crate::score::relative_score;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionStats {
    pub execution: Execution,
    pub test_cases: Vec<TestCase>,
    pub case_count: usize,
    pub total_score: f64,
    pub max_execution_time: f64,
    pub wa_seeds: Vec<Seed>,
    pub ac_count: usize,
    pub average_score: f64,
    pub average_relative_score: f64,
    /// Per-seed relative score, as summed into `average_relative_score`.
    pub relative_scores: BTreeMap<Seed, f64>,
}

impl ExecutionStats {
    /// Folds one execution's test cases.
    pub fn compute(
        execution: Execution,
        test_cases: Vec<TestCase>,
        best_scores: &BestScores,
        objective: Objective,
    ) -> Self {
        let case_count = test_cases.len();
        let mut total_score = 0.0;
        let mut max_execution_time: f64 = 0.0;
        let mut relative_sum = 0.0;
        let mut wa_seeds = Vec::new();
        let mut relative_scores = BTreeMap::new();

        for tc in &test_cases {
            total_score += tc.score;
            max_execution_time = max_execution_time.max(tc.execution_time);

            // WA contributes 0 even when the seed has no reference yet.
            let rel = if tc.is_wrong_answer() {
                wa_seeds.push(tc.seed);
                0.0
            } else {
                relative_score(tc.score, lookup(best_scores, tc.seed), objective)
            };
            relative_sum += rel;
            relative_scores.insert(tc.seed, rel);
        }

        let ac_count = case_count - wa_seeds.len();
        Self {
            execution,
            test_cases,
            case_count,
            total_score,
            max_execution_time,
            wa_seeds,
            ac_count,
            average_score: super::mean(total_score, case_count),
            average_relative_score: super::mean(relative_sum, case_count),
            relative_scores,
        }
    }
}

/// One [`ExecutionStats`] per input execution, in input order.
pub fn aggregate_executions(
    executions: &[Execution],
    test_cases: &[TestCase],
    best_scores: &BestScores,
    objective: Objective,
) -> Vec<ExecutionStats> {
    by_execution(executions, test_cases)
        .into_iter()
        .map(|group| {
            let cases = group.test_cases.into_iter().cloned().collect();
            ExecutionStats::compute(group.execution.clone(), cases, best_scores, objective)
        })
        .collect()
}
