use crate::model::{BestScores, Execution, Objective, TestCase};
use sha2::{Digest, Sha256};

/// Deterministic digest of everything a snapshot is computed from.
///
/// Inputs are canonicalized (executions by id, test cases by
/// `(execution_id, seed)`) so that repository ordering does not matter.
pub fn compute(
    objective: Objective,
    executions: &[Execution],
    test_cases: &[TestCase],
    best_scores: &BestScores,
) -> String {
    let mut parts = Vec::with_capacity(2 + executions.len() + test_cases.len() + best_scores.len());

    parts.push(format!("objective={}", objective.as_str()));

    let mut execs: Vec<&Execution> = executions.iter().collect();
    execs.sort_by(|a, b| a.id.cmp(&b.id));
    for e in execs {
        parts.push(format!(
            "execution={}|{}|{}|{}",
            e.id,
            e.comment,
            e.tag_name.as_deref().unwrap_or(""),
            e.commit_hash.as_deref().unwrap_or("")
        ));
    }

    let mut cases: Vec<&TestCase> = test_cases.iter().collect();
    cases.sort_by(|a, b| a.execution_id.cmp(&b.execution_id).then(a.seed.cmp(&b.seed)));
    for tc in cases {
        parts.push(format!(
            "case={}|{}|{:016x}|{:016x}",
            tc.execution_id,
            tc.seed,
            tc.score.to_bits(),
            tc.execution_time.to_bits()
        ));
    }

    // BTreeMap iteration is already ordered.
    for (seed, score) in best_scores {
        parts.push(format!("best={}|{:016x}", seed, score.to_bits()));
    }

    let mut h = Sha256::new();
    h.update(parts.join("\n").as_bytes());
    format!("sha256:{}", hex::encode(h.finalize()))
}
