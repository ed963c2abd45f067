use crate::model::{Execution, Seed, TestCase};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Top-level partitioning of a snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingMode {
    #[default]
    ByExecution,
    BySeed,
}

impl GroupingMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "by_execution" | "execution" => Some(GroupingMode::ByExecution),
            "by_seed" | "seed" => Some(GroupingMode::BySeed),
            _ => None,
        }
    }
}

/// An execution together with its own test cases.
#[derive(Debug, Clone)]
pub struct ExecutionGroup<'a> {
    pub execution: &'a Execution,
    pub test_cases: Vec<&'a TestCase>,
}

/// A test case joined back to its owning execution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeedEntry<'a> {
    pub execution: &'a Execution,
    pub test_case: &'a TestCase,
}

/// Positions of one seed's entries: `(index into executions, index into test cases)`.
pub type SeedIndex = BTreeMap<Seed, Vec<(usize, usize)>>;

/// One group per execution, in input order, joined on `execution_id`.
///
/// Executions without test cases get an empty group. Test cases whose
/// execution is not in `executions` are dropped.
pub fn by_execution<'a>(executions: &'a [Execution], test_cases: &'a [TestCase]) -> Vec<ExecutionGroup<'a>> {
    let mut cases_by_id: HashMap<&str, Vec<&TestCase>> = HashMap::new();
    for test_case in test_cases {
        cases_by_id
            .entry(test_case.execution_id.as_str())
            .or_default()
            .push(test_case);
    }

    executions
        .iter()
        .map(|execution| ExecutionGroup {
            execution,
            test_cases: cases_by_id.remove(execution.id.as_str()).unwrap_or_default(),
        })
        .collect()
}

/// Index form of [`by_seed`], cheap to keep next to the data it points into.
pub fn seed_index(executions: &[Execution], test_cases: &[TestCase]) -> SeedIndex {
    let positions: HashMap<&str, usize> = executions
        .iter()
        .enumerate()
        .map(|(i, e)| (e.id.as_str(), i))
        .collect();

    let mut index = SeedIndex::new();
    for (case_pos, test_case) in test_cases.iter().enumerate() {
        let Some(&execution_pos) = positions.get(test_case.execution_id.as_str()) else {
            continue;
        };
        index
            .entry(test_case.seed)
            .or_default()
            .push((execution_pos, case_pos));
    }
    index
}

/// Resolves one seed's index positions against the slices they were built from.
pub fn resolve_entries<'a>(
    positions: &[(usize, usize)],
    executions: &'a [Execution],
    test_cases: &'a [TestCase],
) -> Vec<SeedEntry<'a>> {
    positions
        .iter()
        .map(|&(e, t)| SeedEntry {
            execution: &executions[e],
            test_case: &test_cases[t],
        })
        .collect()
}

/// `seed -> [(execution, test case)]`, seeds ascending.
///
/// Test cases whose execution is not in `executions` are dropped. Within a
/// seed, entries keep the input order of `test_cases`.
pub fn by_seed<'a>(executions: &'a [Execution], test_cases: &'a [TestCase]) -> BTreeMap<Seed, Vec<SeedEntry<'a>>> {
    seed_index(executions, test_cases)
        .into_iter()
        .map(|(seed, positions)| (seed, resolve_entries(&positions, executions, test_cases)))
        .collect()
}

/// Number of test cases whose execution cannot be resolved.
pub fn count_orphans(executions: &[Execution], test_cases: &[TestCase]) -> usize {
    let ids: std::collections::HashSet<&str> = executions.iter().map(|e| e.id.as_str()).collect();
    test_cases
        .iter()
        .filter(|tc| !ids.contains(tc.execution_id.as_str()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_by_seed_drops_orphans_and_sorts_seeds() {
        let executions = vec![Execution::new("A", Utc::now()), Execution::new("B", Utc::now())];
        let cases = vec![
            TestCase::new("B", 9, 1.0, 0.1),
            TestCase::new("A", 2, 1.0, 0.1),
            TestCase::new("GONE", 2, 1.0, 0.1),
            TestCase::new("A", 9, 1.0, 0.1),
        ];
        let groups = by_seed(&executions, &cases);
        let seeds: Vec<Seed> = groups.keys().copied().collect();
        assert_eq!(seeds, vec![2, 9]);
        assert_eq!(groups[&2].len(), 1);
        let order: Vec<&str> = groups[&9].iter().map(|e| e.execution.id.as_str()).collect();
        assert_eq!(order, vec!["B", "A"]);
        assert_eq!(count_orphans(&executions, &cases), 1);
    }

    #[test]
    fn test_by_execution_joins_on_id() {
        let executions = vec![
            Execution::new("B", Utc::now()),
            Execution::new("A", Utc::now()),
            Execution::new("C", Utc::now()),
        ];
        let cases = vec![
            TestCase::new("A", 1, 1.0, 0.1),
            TestCase::new("B", 4, 2.0, 0.1),
            TestCase::new("GONE", 1, 3.0, 0.1),
            TestCase::new("A", 2, 4.0, 0.1),
        ];
        let groups = by_execution(&executions, &cases);
        let ids: Vec<&str> = groups.iter().map(|g| g.execution.id.as_str()).collect();
        assert_eq!(ids, vec!["B", "A", "C"]);

        let seeds = |g: &ExecutionGroup| g.test_cases.iter().map(|tc| tc.seed).collect::<Vec<_>>();
        assert_eq!(seeds(&groups[0]), vec![4]);
        assert_eq!(seeds(&groups[1]), vec![1, 2]);
        assert!(groups[2].test_cases.is_empty());
        for group in &groups {
            assert!(group.test_cases.iter().all(|tc| tc.execution_id == group.execution.id));
        }
    }

    #[test]
    fn test_seed_index_points_into_inputs() {
        let executions = vec![Execution::new("A", Utc::now()), Execution::new("B", Utc::now())];
        let cases = vec![
            TestCase::new("B", 3, 1.0, 0.1),
            TestCase::new("X", 3, 1.0, 0.1),
            TestCase::new("A", 3, 2.0, 0.1),
        ];
        let index = seed_index(&executions, &cases);
        assert_eq!(index[&3], vec![(1, 0), (0, 2)]);
        let entries = resolve_entries(&index[&3], &executions, &cases);
        assert_eq!(entries[1].execution.id, "A");
        assert_eq!(entries[1].test_case.score, 2.0);
    }

    #[test]
    fn test_grouping_mode_parse() {
        assert_eq!(GroupingMode::parse("seed"), Some(GroupingMode::BySeed));
        assert_eq!(GroupingMode::parse("by_execution"), Some(GroupingMode::ByExecution));
        assert_eq!(GroupingMode::parse("tree"), None);
    }
}
