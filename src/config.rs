//! Session configuration: CLI flags with environment overrides.
//!
//! Environment variables win over flags when set (and non-empty). The resolved [`AppConfig`] is
//! the only place values are read from; nothing re-reads the environment later.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::transform::{
  CommandTransform, Glossary, GlossaryTransform, TextTransform, TransformError,
};

pub const TRANSFORM_CMD_ENV: &str = "NODE_TRANSLATOR_TRANSFORM_CMD";
pub const GLOSSARY_ENV: &str = "NODE_TRANSLATOR_GLOSSARY";
pub const TIMEOUT_ENV: &str = "NODE_TRANSLATOR_TIMEOUT_MS";

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("invalid NODE_TRANSLATOR_TIMEOUT_MS value '{value}': {source}")]
  InvalidTimeout {
    value: String,
    source: std::num::ParseIntError,
  },

  #[error("cannot load glossary {}: {source}", .path.display())]
  Glossary {
    path: PathBuf,
    source: std::io::Error,
  },

  #[error("invalid transform command: {0}")]
  Transform(#[from] TransformError),
}

/// Values given on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFlags {
  pub transform_cmd: Option<String>,
  pub glossary: Option<PathBuf>,
  pub timeout_ms: Option<u64>,
}

/// Where translations come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformSource {
  Command(String),
  GlossaryFile(PathBuf),
  Builtin,
}

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
  pub transform: TransformSource,
  /// `None` when disabled (0 ms).
  pub timeout: Option<Duration>,
}

impl AppConfig {
  /// Resolves flags against `env` (a variable lookup, `std::env::var` in production).
  pub fn resolve<F>(flags: &ConfigFlags, env: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

    let transform_cmd = env(TRANSFORM_CMD_ENV).or_else(|| flags.transform_cmd.clone());
    let glossary = env(GLOSSARY_ENV)
      .map(PathBuf::from)
      .or_else(|| flags.glossary.clone());
    let transform = match (transform_cmd, glossary) {
      (Some(cmd), glossary) => {
        if let Some(path) = glossary {
          debug!(glossary = %path.display(), "transform command set; ignoring glossary");
        }
        TransformSource::Command(cmd)
      }
      (None, Some(path)) => TransformSource::GlossaryFile(path),
      (None, None) => TransformSource::Builtin,
    };

    let timeout_ms = match env(TIMEOUT_ENV) {
      Some(value) => value
        .trim()
        .parse::<u64>()
        .map_err(|source| ConfigError::InvalidTimeout { value, source })?,
      None => flags.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS),
    };
    let timeout = (timeout_ms > 0).then(|| Duration::from_millis(timeout_ms));

    Ok(Self { transform, timeout })
  }

  /// [`resolve`](Self::resolve) against the process environment.
  pub fn from_env(flags: &ConfigFlags) -> Result<Self, ConfigError> {
    Self::resolve(flags, |key| std::env::var(key).ok())
  }

  /// Instantiates the configured transform.
  pub fn build_transform(&self) -> Result<Arc<dyn TextTransform>, ConfigError> {
    let transform: Arc<dyn TextTransform> = match &self.transform {
      TransformSource::Command(cmd) => Arc::new(CommandTransform::parse(cmd)?),
      TransformSource::GlossaryFile(path) => {
        let glossary = Glossary::load(path).map_err(|source| ConfigError::Glossary {
          path: path.clone(),
          source,
        })?;
        Arc::new(GlossaryTransform::new(glossary))
      }
      TransformSource::Builtin => Arc::new(GlossaryTransform::builtin()),
    };
    info!(transform = transform.name(), timeout = ?self.timeout, "transform configured");
    Ok(transform)
  }
}
