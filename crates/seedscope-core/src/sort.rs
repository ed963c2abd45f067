use crate::grouping::SeedEntry;
use crate::model::{Seed, TestCase};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Order of test cases within one execution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionSortOrder {
    #[default]
    SeedAsc,
    SeedDesc,
    RelativeScoreAsc,
    RelativeScoreDesc,
    AbsoluteScoreAsc,
    AbsoluteScoreDesc,
}

/// Order of executions within one seed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedSortOrder {
    ExecutionAsc,
    #[default]
    ExecutionDesc,
    AbsoluteScoreAsc,
    AbsoluteScoreDesc,
}

impl ExecutionSortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "seed_asc" => Some(Self::SeedAsc),
            "seed_desc" => Some(Self::SeedDesc),
            "relative_score_asc" => Some(Self::RelativeScoreAsc),
            "relative_score_desc" => Some(Self::RelativeScoreDesc),
            "absolute_score_asc" => Some(Self::AbsoluteScoreAsc),
            "absolute_score_desc" => Some(Self::AbsoluteScoreDesc),
            _ => None,
        }
    }
}

impl SeedSortOrder {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "execution_asc" => Some(Self::ExecutionAsc),
            "execution_desc" => Some(Self::ExecutionDesc),
            "absolute_score_asc" => Some(Self::AbsoluteScoreAsc),
            "absolute_score_desc" => Some(Self::AbsoluteScoreDesc),
            _ => None,
        }
    }
}

fn directed(ord: Ordering, descending: bool) -> Ordering {
    if descending {
        ord.reverse()
    } else {
        ord
    }
}

/// Returns a sorted copy of `cases`; the input is left untouched.
///
/// The sort is stable. For the relative-score orders, cases whose seed is
/// missing from `relative_scores` stay at their original index and only the
/// remaining cases are reordered among the remaining slots.
pub fn sort_test_cases<T>(cases: &[T], order: ExecutionSortOrder, relative_scores: &BTreeMap<Seed, f64>) -> Vec<T>
where
    T: AsRef<TestCase> + Clone,
{
    let mut sorted = cases.to_vec();
    match order {
        ExecutionSortOrder::SeedAsc | ExecutionSortOrder::SeedDesc => {
            let desc = order == ExecutionSortOrder::SeedDesc;
            sorted.sort_by(|a, b| directed(a.as_ref().seed.cmp(&b.as_ref().seed), desc));
        }
        ExecutionSortOrder::AbsoluteScoreAsc | ExecutionSortOrder::AbsoluteScoreDesc => {
            let desc = order == ExecutionSortOrder::AbsoluteScoreDesc;
            sorted.sort_by(|a, b| directed(a.as_ref().score.total_cmp(&b.as_ref().score), desc));
        }
        ExecutionSortOrder::RelativeScoreAsc | ExecutionSortOrder::RelativeScoreDesc => {
            let desc = order == ExecutionSortOrder::RelativeScoreDesc;
            sort_keyed_in_place(&mut sorted, desc, |tc| {
                relative_scores.get(&tc.as_ref().seed).copied()
            });
        }
    }
    sorted
}

/// Stable sort of the elements that have a key; keyless elements keep their slots.
fn sort_keyed_in_place<T, F>(items: &mut [T], descending: bool, key: F)
where
    T: Clone,
    F: Fn(&T) -> Option<f64>,
{
    let slots: Vec<usize> = (0..items.len()).filter(|&i| key(&items[i]).is_some()).collect();
    let mut keyed: Vec<(f64, T)> = slots
        .iter()
        .filter_map(|&i| key(&items[i]).map(|k| (k, items[i].clone())))
        .collect();
    keyed.sort_by(|a, b| directed(a.0.total_cmp(&b.0), descending));
    for (slot, (_, item)) in slots.into_iter().zip(keyed) {
        items[slot] = item;
    }
}

/// Returns a sorted copy of one seed's `(execution, test case)` entries.
///
/// Execution order is lexicographic on the execution id. The sort is stable.
pub fn sort_seed_entries<'a>(entries: &[SeedEntry<'a>], order: SeedSortOrder) -> Vec<SeedEntry<'a>> {
    let mut sorted = entries.to_vec();
    match order {
        SeedSortOrder::ExecutionAsc => {
            sorted.sort_by(|a, b| a.execution.id.cmp(&b.execution.id));
        }
        SeedSortOrder::ExecutionDesc => {
            sorted.sort_by(|a, b| b.execution.id.cmp(&a.execution.id));
        }
        SeedSortOrder::AbsoluteScoreAsc => {
            sorted.sort_by(|a, b| a.test_case.score.total_cmp(&b.test_case.score));
        }
        SeedSortOrder::AbsoluteScoreDesc => {
            sorted.sort_by(|a, b| b.test_case.score.total_cmp(&a.test_case.score));
        }
    }
    sorted
}
