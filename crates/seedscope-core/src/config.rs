use crate::errors::{ConfigError, LoadError};
use crate::grouping::GroupingMode;
use crate::model::Objective;
use crate::repository::ConfigSource;
use crate::sort::{ExecutionSortOrder, SeedSortOrder};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "seedscope.yaml";
pub const OBJECTIVE_ENV: &str = "SEEDSCOPE_OBJECTIVE";

/// Resolved configuration threaded into every aggregation call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsConfig {
    pub objective: Objective,
    pub view: ViewSettings,
}

impl StatsConfig {
    pub fn new(objective: Objective) -> Self {
        Self {
            objective,
            view: ViewSettings::default(),
        }
    }
}

/// Grouping and sort preferences for tree queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewSettings {
    #[serde(default)]
    pub grouping: GroupingMode,
    #[serde(default)]
    pub execution_sort: ExecutionSortOrder,
    #[serde(default)]
    pub seed_sort: SeedSortOrder,
}

/// On-disk shape of `seedscope.yaml`. The objective may be absent here; that
/// is only reported once a snapshot is actually loaded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub objective: Option<Objective>,
    #[serde(default)]
    pub view: ViewSettings,
}

impl ConfigFile {
    pub fn parse(raw: &str, strict: bool) -> Result<Self, ConfigError> {
        let mut ignored_keys = std::collections::BTreeSet::new();
        let deserializer = serde_yaml::Deserializer::from_str(raw);
        let cfg: ConfigFile = serde_ignored::deserialize(deserializer, |path| {
            ignored_keys.insert(path.to_string());
        })
        .map_err(|e| ConfigError(format!("failed to parse YAML: {}", e)))?;

        let unknown: Vec<_> = ignored_keys
            .iter()
            .filter(|k| !k.starts_with('_') && !k.starts_with("x-"))
            .collect();
        if !unknown.is_empty() {
            if strict {
                return Err(ConfigError(format!(
                    "unknown fields detected in strict mode: {:?}",
                    unknown
                )));
            }
            tracing::warn!(fields = ?unknown, "ignored unknown config fields");
        }
        Ok(cfg)
    }

    /// Replaces the objective with `raw` (`max` or `min`).
    pub fn override_objective(&mut self, raw: &str) -> Result<(), ConfigError> {
        let objective = Objective::parse(raw)
            .ok_or_else(|| ConfigError(format!("invalid objective '{}' (expected max|min)", raw)))?;
        self.objective = Some(objective);
        Ok(())
    }

    pub fn resolve(self) -> Result<StatsConfig, LoadError> {
        let objective = self.objective.ok_or_else(|| {
            LoadError::MissingConfiguration("objective is not set (expected max|min)".into())
        })?;
        Ok(StatsConfig {
            objective,
            view: self.view,
        })
    }
}

/// Reads `seedscope.yaml` from disk, with `SEEDSCOPE_OBJECTIVE` taking
/// precedence over the file's objective.
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
    strict: bool,
    objective_override: Option<String>,
}

impl FileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            strict: false,
            objective_override: std::env::var(OBJECTIVE_ENV).ok().filter(|v| !v.trim().is_empty()),
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_objective_override(mut self, objective: Option<String>) -> Self {
        self.objective_override = objective;
        self
    }
}

#[async_trait]
impl ConfigSource for FileConfigSource {
    async fn load_config(&self) -> Result<Option<ConfigFile>, ConfigError> {
        let file = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Some(ConfigFile::parse(&raw, self.strict).map_err(|e| {
                ConfigError(format!("{} (file: {})", e.0, self.path.display()))
            })?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                return Err(ConfigError(format!(
                    "failed to read config {}: {}",
                    self.path.display(),
                    e
                )))
            }
        };

        match (&self.objective_override, file) {
            (Some(raw), file) => {
                let mut cfg = file.unwrap_or_default();
                cfg.override_objective(raw)?;
                Ok(Some(cfg))
            }
            (None, file) => Ok(file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let cfg = ConfigFile::parse(
            r#"
objective: min
view:
  grouping: by_seed
  execution_sort: relative_score_desc
  seed_sort: absolute_score_asc
"#,
            true,
        )
        .unwrap();
        assert_eq!(cfg.objective, Some(Objective::Min));
        assert_eq!(cfg.view.grouping, GroupingMode::BySeed);
        assert_eq!(cfg.view.execution_sort, ExecutionSortOrder::RelativeScoreDesc);
        assert_eq!(cfg.view.seed_sort, SeedSortOrder::AbsoluteScoreAsc);
    }

    #[test]
    fn test_view_defaults() {
        let cfg = ConfigFile::parse("objective: max\n", true).unwrap();
        assert_eq!(cfg.view, ViewSettings::default());
        assert_eq!(cfg.view.execution_sort, ExecutionSortOrder::SeedAsc);
        assert_eq!(cfg.view.seed_sort, SeedSortOrder::ExecutionDesc);
    }

    #[test]
    fn test_unknown_fields_rejected_in_strict_mode() {
        let err = ConfigFile::parse("objective: max\ncolour: red\n", true).unwrap_err();
        assert!(err.to_string().contains("colour"));
        assert!(ConfigFile::parse("objective: max\ncolour: red\n", false).is_ok());
        assert!(ConfigFile::parse("objective: max\nx-note: hi\n", true).is_ok());
    }

    #[test]
    fn test_invalid_objective_is_config_error() {
        let err = ConfigFile::parse("objective: biggest\n", false).unwrap_err();
        assert!(err.to_string().contains("failed to parse YAML"));
    }

    #[test]
    fn test_resolve_without_objective_is_missing_configuration() {
        let err = ConfigFile::default().resolve().unwrap_err();
        assert!(err.is_missing_configuration());
    }

    #[tokio::test]
    async fn test_missing_file_yields_none() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileConfigSource::new(dir.path().join("nope.yaml")).with_objective_override(None);
        assert!(source.load_config().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_override_wins_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "objective: max\n").unwrap();

        let source = FileConfigSource::new(&path).with_objective_override(Some("min".into()));
        let cfg = source.load_config().await.unwrap().unwrap();
        assert_eq!(cfg.objective, Some(Objective::Min));

        let source = FileConfigSource::new(&path).with_objective_override(Some("sideways".into()));
        assert!(source.load_config().await.is_err());
    }
}
