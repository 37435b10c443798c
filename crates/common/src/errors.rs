use std::path::PathBuf;
use thiserror::Error;

/// Основная иерархия ошибок для sqrtbench
#[derive(Error, Debug)]
pub enum BenchError {
    // === Единственная recoverable ошибка ===

    /// Ширина вектора не поддерживается CPU. Runner разрешает её через
    /// политику fallback/skip и не пробрасывает наружу.
    #[error("{strategy} unavailable on this host")]
    UnsupportedWidth { strategy: String },

    // === Фатальные ошибки ===

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Logging initialization failed: {0}")]
    Logging(String),
}

/// Configuration-specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {var}: {value:?} - {reason}")]
    InvalidEnv {
        var: String,
        value: String,
        reason: String,
    },
}

pub type BenchResult<T> = Result<T, BenchError>;

impl BenchError {
    /// Можно ли продолжить прогон после этой ошибки
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BenchError::UnsupportedWidth { .. })
    }

    pub fn unsupported(strategy: impl Into<String>) -> Self {
        BenchError::UnsupportedWidth {
            strategy: strategy.into(),
        }
    }
}
