use super::args::*;
use crate::data::JsonResultFile;
use anyhow::Context;
use seedscope_core::config::FileConfigSource;
use seedscope_core::errors::LoadError;
use seedscope_core::snapshot::Snapshot;

pub mod report;

pub mod exit_codes {
    pub const OK: i32 = 0;
    pub const CONFIG_ERROR: i32 = 2;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    fn parse(s: &str) -> anyhow::Result<Self> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => anyhow::bail!("unknown --format '{}' (expected text|json)", other),
        }
    }
}

pub async fn dispatch(cli: Cli) -> anyhow::Result<i32> {
    if let Command::Version = cli.cmd {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(exit_codes::OK);
    }

    let format = OutputFormat::parse(&cli.format)?;
    let snapshot = match load_snapshot(&cli).await {
        Ok(snapshot) => snapshot,
        Err(e @ (LoadError::MissingConfiguration(_) | LoadError::Config(_))) => {
            eprintln!("error: {} (config: {})", e, cli.config.display());
            eprintln!("hint: create {} with `objective: max` or `objective: min`", cli.config.display());
            return Ok(exit_codes::CONFIG_ERROR);
        }
        Err(e) => return Err(e).context("failed to load results"),
    };

    match &cli.cmd {
        Command::Summary => report::cmd_summary(&snapshot, format),
        Command::Seeds => report::cmd_seeds(&snapshot, format),
        Command::Tree(args) => report::cmd_tree(&snapshot, args, format),
        Command::Version => Ok(exit_codes::OK),
    }
}

async fn load_snapshot(cli: &Cli) -> Result<Snapshot, LoadError> {
    tracing::debug!(
        config = %cli.config.display(),
        data = %cli.data.display(),
        "loading results"
    );
    let results = JsonResultFile::new(cli.data.clone());
    let config = FileConfigSource::new(&cli.config)
        .strict(cli.strict)
        .with_objective_override(cli.objective.clone());
    Snapshot::load(&results, &config).await
}
