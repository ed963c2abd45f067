use crate::config::ViewSettings;
use crate::snapshot::Snapshot;
use crate::view::{format_score, format_seed, TreeNode};
use std::fmt::Write;

/// One line per execution, in snapshot order.
pub fn render_executions(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:>9} {:>14} {:>12} {:>9}  {}",
        "EXECUTION", "AC", "AVG SCORE", "AVG REL %", "MAX TIME", "COMMENT"
    );
    for s in &snapshot.execution_stats {
        let _ = writeln!(
            out,
            "{:<24} {:>9} {:>14} {:>12.3} {:>8.2}s  {}",
            s.execution.id,
            format!("{}/{}", s.ac_count, s.case_count),
            format_score((s.average_score * 1000.0).round() / 1000.0),
            s.average_relative_score,
            s.max_execution_time,
            s.execution.comment
        );
        if !s.wa_seeds.is_empty() {
            let seeds: Vec<String> = s.wa_seeds.iter().map(|seed| format_seed(*seed)).collect();
            let _ = writeln!(out, "    WA: {}", seeds.join(", "));
        }
    }
    let _ = writeln!(
        out,
        "\n{} executions, {} test cases, objective {}",
        snapshot.executions.len(),
        snapshot.test_cases.len(),
        snapshot.config.objective.as_str()
    );
    out
}

/// One line per seed, seeds ascending.
pub fn render_seeds(snapshot: &Snapshot) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<6} {:>14} {:>6} {:>4} {:>14} {:>9}",
        "SEED", "BEST", "RUNS", "WA", "AVG SCORE", "MAX TIME"
    );
    for s in snapshot.seed_stats.values() {
        let _ = writeln!(
            out,
            "{:<6} {:>14} {:>6} {:>4} {:>14} {:>8.2}s",
            format_seed(s.seed),
            s.best_score.map(format_score).unwrap_or_else(|| "-".into()),
            s.count,
            s.wa_count,
            format_score((s.average_score * 1000.0).round() / 1000.0),
            s.max_execution_time
        );
    }
    out
}

/// Depth-first rendering of the view tree.
pub fn render_tree(snapshot: &Snapshot, view: &ViewSettings) -> String {
    let mut out = String::new();
    render_level(snapshot, view, None, 0, &mut out);
    out
}

fn render_level(
    snapshot: &Snapshot,
    view: &ViewSettings,
    parent: Option<&TreeNode>,
    depth: usize,
    out: &mut String,
) {
    for item in snapshot.children(parent, view) {
        let _ = writeln!(
            out,
            "{}{}  {}",
            "  ".repeat(depth),
            item.label,
            item.description
        );
        if item.has_children {
            render_level(snapshot, view, Some(&item.node), depth + 1, out);
        }
    }
}

pub fn print_summary(snapshot: &Snapshot) {
    print!("{}", render_executions(snapshot));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StatsConfig;
    use crate::grouping::GroupingMode;
    use crate::model::{Execution, Objective, TestCase};
    use chrono::Utc;

    fn snapshot() -> Snapshot {
        Snapshot::build(
            StatsConfig::new(Objective::Max),
            vec![Execution::new("E1", Utc::now()), Execution::new("E2", Utc::now())],
            vec![
                TestCase::new("E1", 1, 50.0, 0.5),
                TestCase::new("E1", 2, -1.0, 0.5),
                TestCase::new("E2", 1, 100.0, 0.25),
            ],
            None,
        )
    }

    #[test]
    fn test_render_executions_lists_wa_seeds() {
        let out = render_executions(&snapshot());
        assert!(out.contains("E1"));
        assert!(out.contains("1/2"));
        assert!(out.contains("WA: 0002"));
        assert!(out.contains("2 executions, 3 test cases, objective max"));
    }

    #[test]
    fn test_render_seeds() {
        let out = render_seeds(&snapshot());
        let line = out.lines().find(|l| l.starts_with("0001")).unwrap();
        assert!(line.contains("100"));
        assert!(line.contains("75"));
    }

    #[test]
    fn test_render_tree_by_seed_nests_executions() {
        let view = ViewSettings {
            grouping: GroupingMode::BySeed,
            ..Default::default()
        };
        let out = render_tree(&snapshot(), &view);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("0001"));
        // Newest execution first by default.
        assert!(lines[1].starts_with("  E2"));
        assert!(lines[2].starts_with("  E1"));
        assert!(lines[3].starts_with("0002"));
    }
}
