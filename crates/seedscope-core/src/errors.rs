/// Configuration could not be read or understood.
#[derive(Debug, thiserror::Error)]
#[error("config error: {0}")]
pub struct ConfigError(pub String);

/// Failure of a snapshot load. Nothing partial is returned alongside it.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The objective direction could not be located. Retrying after the
    /// configuration is fixed is expected to succeed.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An external repository failed to supply data.
    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

impl LoadError {
    pub fn is_missing_configuration(&self) -> bool {
        matches!(self, LoadError::MissingConfiguration(_))
    }
}
