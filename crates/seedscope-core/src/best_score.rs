use crate::model::{BestScores, Objective, Seed, TestCase};

/// Where the best-score table of a snapshot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BestScoreSource {
    External,
    Recomputed,
}

/// Picks the extremal valid score per seed.
///
/// WA entries (`score <= 0`) are ignored, and a seed with no valid entry is
/// absent from the result. The outcome does not depend on input order.
pub fn select_best_scores<T: AsRef<TestCase>>(test_cases: &[T], objective: Objective) -> BestScores {
    let mut best = BestScores::new();
    for tc in test_cases.iter().map(AsRef::as_ref) {
        if tc.is_wrong_answer() {
            continue;
        }
        best.entry(tc.seed)
            .and_modify(|current| {
                if objective.is_better(tc.score, *current) {
                    *current = tc.score;
                }
            })
            .or_insert(tc.score);
    }
    best
}

/// Returns the table to compare against.
///
/// Positive entries of an externally persisted table win over recomputation,
/// so historical bests that are no longer in memory are not regressed. Seeds
/// the external table does not cover are filled from `test_cases`.
pub fn resolve_best_scores<T: AsRef<TestCase>>(
    external: Option<BestScores>,
    test_cases: &[T],
    objective: Objective,
) -> (BestScores, BestScoreSource) {
    let mut table = select_best_scores(test_cases, objective);
    let Some(external) = external else {
        return (table, BestScoreSource::Recomputed);
    };
    table.extend(external.into_iter().filter(|(_, v)| v.is_finite() && *v > 0.0));
    (table, BestScoreSource::External)
}

/// Positive reference for `seed`, if any.
pub fn lookup(best_scores: &BestScores, seed: Seed) -> Option<f64> {
    best_scores.get(&seed).copied().filter(|v| v.is_finite() && *v > 0.0)
}
