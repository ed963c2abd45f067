use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "seedscope",
    version,
    about = "Relative-score statistics for repeated seeded test runs"
)]
pub struct Cli {
    /// Configuration file (objective and view preferences)
    #[arg(long, global = true, default_value = "seedscope.yaml")]
    pub config: PathBuf,

    /// JSON dump of executions, test cases and optional best scores
    #[arg(long, global = true, default_value = ".seedscope/results.json")]
    pub data: PathBuf,

    /// Output format: text | json
    #[arg(long, global = true, default_value = "text")]
    pub format: String,

    /// Reject unknown configuration keys
    #[arg(long, global = true)]
    pub strict: bool,

    /// Override the configured objective (max|min)
    #[arg(long, global = true, env = "SEEDSCOPE_OBJECTIVE")]
    pub objective: Option<String>,

    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// One line per execution
    Summary,
    /// One line per seed
    Seeds,
    /// Grouped and sorted tree view
    Tree(TreeArgs),
    Version,
}

#[derive(clap::Args, Debug, Clone)]
pub struct TreeArgs {
    /// by_execution | by_seed
    #[arg(long)]
    pub grouping: Option<String>,

    /// seed_asc | seed_desc | relative_score_asc | relative_score_desc | absolute_score_asc | absolute_score_desc
    #[arg(long)]
    pub execution_sort: Option<String>,

    /// execution_asc | execution_desc | absolute_score_asc | absolute_score_desc
    #[arg(long)]
    pub seed_sort: Option<String>,
}
