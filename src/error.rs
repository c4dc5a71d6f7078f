use std::path::PathBuf;
use thiserror::Error;

/// Fatal startup errors. Anything else during configuration loading is a
/// degraded default and only produces a warning.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to get working directory: {0}")]
    WorkDir(#[source] std::io::Error),

    #[error("failed to load env file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },
}
