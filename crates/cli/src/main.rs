use anyhow::{Context, Result};
use clap::Parser;
use common::{init_structured_logging, LoggingConfig};
use kernels::{BenchConfig, BenchmarkRunner, ReportFormat, UnsupportedPolicy};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::{debug, Level};

#[derive(Parser, Debug)]
#[command(name = "sqrtbench")]
#[command(about = "Scalar vs SSE/AVX/AVX-512 square-root throughput benchmark")]
#[command(version)]
struct Cli {
    /// Верхняя граница N: считается sqrt(n) для n в 1..N (должна быть > 0)
    #[arg(short = 'n', long)]
    count: Option<u64>,

    /// Короткий прогон: N = 1_000_000
    #[arg(long, conflicts_with = "count")]
    quick: bool,

    /// TOML файл с настройками (count, unsupported, format)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Что делать с шириной, которую CPU не поддерживает: scalar | skip
    #[arg(long = "on-unsupported", value_name = "POLICY")]
    on_unsupported: Option<UnsupportedPolicy>,

    /// Формат отчёта: text | json
    #[arg(long)]
    format: Option<ReportFormat>,

    /// Уровень логов в stderr (RUST_LOG имеет приоритет)
    #[arg(long, default_value = "warn")]
    log_level: Level,

    /// Логи в JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_structured_logging(LoggingConfig {
        level: cli.log_level,
        json_output: cli.json_logs,
        color_output: io::stderr().is_terminal(),
        ..LoggingConfig::default()
    })?;

    let config = resolve_config(&cli)?;
    debug!(?config, "resolved configuration");

    let runner = BenchmarkRunner::new(config);
    debug!(simd_level = ?runner.capabilities().level(), "detected SIMD support");

    let report = runner.run();
    report
        .write_to(runner.config().format, io::stdout().lock())
        .context("failed to write report")?;

    Ok(())
}

/// defaults < config file < SQRTBENCH_COUNT < флаги командной строки
fn resolve_config(cli: &Cli) -> Result<BenchConfig> {
    let base = match &cli.config {
        Some(path) => BenchConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => BenchConfig::default(),
    };

    let mut config = base.apply_env()?;

    if cli.quick {
        config.count = BenchConfig::quick().count;
    }
    if let Some(count) = cli.count {
        config.count = count;
    }
    if let Some(policy) = cli.on_unsupported {
        config.unsupported = policy;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }

    Ok(config)
}
