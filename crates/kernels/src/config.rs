use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use common::{BenchResult, ConfigError};

/// Верхняя граница диапазона по умолчанию
pub const DEFAULT_COUNT: u64 = 100_000_000;

/// Переменная окружения, переопределяющая `count`
pub const COUNT_ENV: &str = "SQRTBENCH_COUNT";

/// Что делать с проходом, ширина которого не поддерживается CPU
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnsupportedPolicy {
    /// Выполнить скалярный f32 проход и показать его время
    #[default]
    Scalar,
    /// Не выполнять, в отчёте `skipped`
    Skip,
}

/// Формат отчёта в stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for UnsupportedPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "scalar" => Ok(Self::Scalar),
            "skip" => Ok(Self::Skip),
            other => Err(format!("unknown policy '{}', expected scalar or skip", other)),
        }
    }
}

impl fmt::Display for UnsupportedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scalar => f.write_str("scalar"),
            Self::Skip => f.write_str("skip"),
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{}', expected text or json", other)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Json => f.write_str("json"),
        }
    }
}

/// Конфигурация прогона
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchConfig {
    /// Верхняя граница N: считаются sqrt для `1..N`. Задаётся вызывающим,
    /// должна быть положительной; не валидируется.
    pub count: u64,

    pub unsupported: UnsupportedPolicy,

    pub format: ReportFormat,
}

impl Default for BenchConfig {
    fn default() -> Self {
        Self {
            count: DEFAULT_COUNT,
            unsupported: UnsupportedPolicy::Scalar,
            format: ReportFormat::Text,
        }
    }
}

impl BenchConfig {
    /// Короткий прогон для проверки окружения
    pub fn quick() -> Self {
        Self {
            count: 1_000_000,
            ..Self::default()
        }
    }

    pub fn with_count(mut self, count: u64) -> Self {
        self.count = count;
        self
    }

    pub fn with_policy(mut self, policy: UnsupportedPolicy) -> Self {
        self.unsupported = policy;
        self
    }

    pub fn with_format(mut self, format: ReportFormat) -> Self {
        self.format = format;
        self
    }

    /// Загрузить из TOML файла. Отсутствующие поля берутся из `Default`.
    pub fn from_file(path: impl AsRef<Path>) -> BenchResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(config)
    }

    /// Применить `SQRTBENCH_COUNT` из окружения процесса
    pub fn apply_env(self) -> BenchResult<Self> {
        self.apply_count_override(std::env::var(COUNT_ENV).ok())
    }

    pub fn apply_count_override(mut self, value: Option<String>) -> BenchResult<Self> {
        if let Some(raw) = value {
            self.count = raw.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: COUNT_ENV.to_string(),
                value: raw.clone(),
                reason: "expected an unsigned integer".to_string(),
            })?;
        }
        Ok(self)
    }
}
