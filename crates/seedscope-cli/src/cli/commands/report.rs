use super::{exit_codes, OutputFormat};
use crate::cli::args::TreeArgs;
use anyhow::Result;
use seedscope_core::config::ViewSettings;
use seedscope_core::grouping::GroupingMode;
use seedscope_core::report::console;
use seedscope_core::snapshot::Snapshot;
use seedscope_core::sort::{ExecutionSortOrder, SeedSortOrder};
use seedscope_core::view::TreeNode;
use serde_json::json;

pub fn cmd_summary(snapshot: &Snapshot, format: OutputFormat) -> Result<i32> {
    match format {
        OutputFormat::Text => console::print_summary(snapshot),
        OutputFormat::Json => {
            let executions: Vec<_> = snapshot
                .execution_stats
                .iter()
                .map(|s| {
                    json!({
                        "id": s.execution.id,
                        "comment": s.execution.comment,
                        "tag_name": s.execution.tag_name,
                        "commit_hash": s.execution.commit_hash,
                        "case_count": s.case_count,
                        "ac_count": s.ac_count,
                        "wa_seeds": s.wa_seeds,
                        "total_score": s.total_score,
                        "average_score": s.average_score,
                        "average_relative_score": s.average_relative_score,
                        "max_execution_time": s.max_execution_time,
                    })
                })
                .collect();
            print_json(&json!({
                "objective": snapshot.config.objective,
                "fingerprint": snapshot.fingerprint,
                "best_score_source": snapshot.best_score_source,
                "executions": executions,
            }))?;
        }
    }
    Ok(exit_codes::OK)
}

pub fn cmd_seeds(snapshot: &Snapshot, format: OutputFormat) -> Result<i32> {
    match format {
        OutputFormat::Text => print!("{}", console::render_seeds(snapshot)),
        OutputFormat::Json => {
            let seeds: Vec<_> = snapshot
                .seed_stats
                .values()
                .map(|s| {
                    json!({
                        "seed": s.seed,
                        "best_score": s.best_score,
                        "count": s.count,
                        "wa_count": s.wa_count,
                        "average_score": s.average_score,
                        "max_execution_time": s.max_execution_time,
                    })
                })
                .collect();
            print_json(&json!({ "seeds": seeds }))?;
        }
    }
    Ok(exit_codes::OK)
}

pub fn cmd_tree(snapshot: &Snapshot, args: &TreeArgs, format: OutputFormat) -> Result<i32> {
    let view = resolve_view(snapshot.config.view, args)?;
    match format {
        OutputFormat::Text => print!("{}", console::render_tree(snapshot, &view)),
        OutputFormat::Json => print_json(&tree_json(snapshot, &view, None))?,
    }
    Ok(exit_codes::OK)
}

fn resolve_view(mut view: ViewSettings, args: &TreeArgs) -> Result<ViewSettings> {
    if let Some(g) = &args.grouping {
        view.grouping = GroupingMode::parse(g)
            .ok_or_else(|| anyhow::anyhow!("unknown --grouping '{}'", g))?;
    }
    if let Some(o) = &args.execution_sort {
        view.execution_sort = ExecutionSortOrder::parse(o)
            .ok_or_else(|| anyhow::anyhow!("unknown --execution-sort '{}'", o))?;
    }
    if let Some(o) = &args.seed_sort {
        view.seed_sort = SeedSortOrder::parse(o)
            .ok_or_else(|| anyhow::anyhow!("unknown --seed-sort '{}'", o))?;
    }
    Ok(view)
}

fn tree_json(snapshot: &Snapshot, view: &ViewSettings, parent: Option<&TreeNode>) -> serde_json::Value {
    let items: Vec<_> = snapshot
        .children(parent, view)
        .into_iter()
        .map(|item| {
            let children = if item.has_children {
                tree_json(snapshot, view, Some(&item.node))
            } else {
                json!([])
            };
            json!({
                "node": item.node,
                "label": item.label,
                "description": item.description,
                "children": children,
            })
        })
        .collect();
    serde_json::Value::Array(items)
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
