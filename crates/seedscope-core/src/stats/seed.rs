use crate::best_score::lookup;
use crate::model::{BestScores, Seed, TestCase};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct SeedStats {
    pub seed: Seed,
    pub test_cases: Vec<TestCase>,
    pub best_score: Option<f64>,
    pub count: usize,
    pub wa_count: usize,
    pub average_score: f64,
    pub max_execution_time: f64,
}

/// Groups test cases by seed regardless of execution.
///
/// `best_score` is looked up in `best_scores`, never recomputed here.
pub fn aggregate_seeds(test_cases: &[TestCase], best_scores: &BestScores) -> BTreeMap<Seed, SeedStats> {
    let mut grouped: BTreeMap<Seed, Vec<TestCase>> = BTreeMap::new();
    for tc in test_cases {
        grouped.entry(tc.seed).or_default().push(tc.clone());
    }

    grouped
        .into_iter()
        .map(|(seed, cases)| {
            let count = cases.len();
            let sum: f64 = cases.iter().map(|tc| tc.score).sum();
            let max_execution_time = cases
                .iter()
                .map(|tc| tc.execution_time)
                .fold(0.0, f64::max);
            let wa_count = cases.iter().filter(|tc| tc.is_wrong_answer()).count();
            let stats = SeedStats {
                seed,
                best_score: lookup(best_scores, seed),
                count,
                wa_count,
                average_score: super::mean(sum, count),
                max_execution_time,
                test_cases: cases,
            };
            (seed, stats)
        })
        .collect()
}
