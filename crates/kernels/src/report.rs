//! Отчёт о прогоне: текст в формате исходного бенчмарка или JSON.

use serde::Serialize;
use std::fmt;
use std::io::Write;
use std::time::Duration;

use common::BenchResult;

use crate::config::ReportFormat;
use crate::lanes::Strategy;
use crate::passes::PassStats;

/// Как завершился проход
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PassOutcome {
    /// Normal: скалярный f64 проход
    Scalar,
    /// Векторный проход на поддерживаемом CPU
    Vectorized,
    /// Ширина не поддерживается, вместо неё скалярный проход
    ScalarFallback,
    Skipped,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PassResult {
    pub strategy: Strategy,
    pub outcome: PassOutcome,
    pub elapsed: Duration,
    pub stats: PassStats,
}

impl PassResult {
    pub fn skipped(strategy: Strategy) -> Self {
        Self {
            strategy,
            outcome: PassOutcome::Skipped,
            elapsed: Duration::ZERO,
            stats: PassStats::default(),
        }
    }

    pub fn seconds(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    /// Evaluations per second; `None` for skipped or zero-length passes.
    pub fn throughput(&self) -> Option<f64> {
        let secs = self.seconds();
        if self.outcome == PassOutcome::Skipped || secs <= 0.0 {
            None
        } else {
            Some(self.stats.total() as f64 / secs)
        }
    }
}

/// Четыре прохода в порядке Normal, SSE, AVX, AVX-512
#[derive(Debug, Clone, PartialEq)]
pub struct BenchReport {
    pub count: u64,
    pub passes: [PassResult; 4],
}

#[derive(Serialize)]
struct JsonPass<'a> {
    strategy: Strategy,
    outcome: PassOutcome,
    seconds: f64,
    evaluations: u64,
    #[serde(flatten)]
    stats: &'a PassStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    throughput: Option<f64>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    count: u64,
    passes: Vec<JsonPass<'a>>,
}

impl BenchReport {
    pub fn header(&self) -> String {
        format!("calculation of sqrt(n) for n in 1 to {}", self.count)
    }

    pub fn render_text(&self) -> String {
        self.to_string()
    }

    pub fn render_json(&self) -> BenchResult<String> {
        let report = JsonReport {
            count: self.count,
            passes: self
                .passes
                .iter()
                .map(|p| JsonPass {
                    strategy: p.strategy,
                    outcome: p.outcome,
                    seconds: p.seconds(),
                    evaluations: p.stats.total(),
                    stats: &p.stats,
                    throughput: p.throughput(),
                })
                .collect(),
        };

        Ok(serde_json::to_string_pretty(&report)?)
    }

    pub fn render(&self, format: ReportFormat) -> BenchResult<String> {
        match format {
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => self.render_json(),
        }
    }

    pub fn write_to<W: Write>(&self, format: ReportFormat, mut out: W) -> BenchResult<()> {
        let rendered = self.render(format)?;
        writeln!(out, "{}", rendered)?;
        out.flush()?;
        Ok(())
    }
}

impl fmt::Display for BenchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header())?;
        for pass in &self.passes {
            match pass.outcome {
                PassOutcome::Skipped => write!(f, "\n{}: skipped", pass.strategy.label())?,
                _ => write!(
                    f,
                    "\n{}: {}s",
                    pass.strategy.label(),
                    format_seconds(pass.seconds())
                )?,
            }
        }
        Ok(())
    }
}

/// Секунды с 9 значащими цифрами, раскладка как у `%g`
pub fn format_seconds(secs: f64) -> String {
    format_significant(secs, 9)
}

/// `%g`-style: fixed notation when the decimal exponent is in
/// `[-5, precision)`, scientific (`1.5e-07`) otherwise; trailing zeros dropped.
pub fn format_significant(value: f64, precision: usize) -> String {
    if value == 0.0 {
        return "0".to_string();
    }
    if !value.is_finite() {
        return value.to_string();
    }

    let precision = precision.max(1);
    // округление делает {:e}, поэтому экспонента уже учитывает перенос (9.99 -> 1e1)
    let sci = format!("{:.*e}", precision - 1, value);
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= precision as i32 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", trim_fraction(mantissa), sign, exp.abs())
    } else {
        let decimals = (precision as i32 - 1 - exp).max(0) as usize;
        trim_fraction(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, "0")]
    #[case(0.5, "0.5")]
    #[case(12.0, "12")]
    #[case(0.123456789123, "0.123456789")]
    #[case(1.234567891234, "1.23456789")]
    #[case(1.5e-7, "1.5e-07")]
    #[case(0.0001, "0.0001")]
    #[case(0.00001234, "1.234e-05")]
    #[case(123456789.6, "123456790")]
    #[case(999999999.7, "1e+09")]
    fn test_format_seconds(#[case] secs: f64, #[case] expected: &str) {
        assert_eq!(format_seconds(secs), expected);
    }

    fn sample_report() -> BenchReport {
        let done = |strategy, ms| PassResult {
            strategy,
            outcome: if strategy == Strategy::Normal {
                PassOutcome::Scalar
            } else {
                PassOutcome::Vectorized
            },
            elapsed: Duration::from_millis(ms),
            stats: PassStats {
                bulk_evaluations: 16,
                tail_evaluations: 0,
            },
        };

        BenchReport {
            count: 17,
            passes: [
                done(Strategy::Normal, 500),
                done(Strategy::Sse128, 250),
                PassResult {
                    outcome: PassOutcome::ScalarFallback,
                    ..done(Strategy::Avx256, 125)
                },
                PassResult::skipped(Strategy::Avx512),
            ],
        }
    }

    #[test]
    fn test_text_report_layout() {
        let text = sample_report().render_text();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "calculation of sqrt(n) for n in 1 to 17",
                "Normal: 0.5s",
                "SSE 128-bit: 0.25s",
                "AVX 256-bit: 0.125s",
                "AVX 512-bit: skipped",
            ]
        );
    }

    #[test]
    fn test_json_report() {
        let json = sample_report().render_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["count"], 17);
        let passes = value["passes"].as_array().unwrap();
        assert_eq!(passes.len(), 4);
        assert_eq!(passes[0]["strategy"], "Normal");
        assert_eq!(passes[0]["evaluations"], 16);
        assert_eq!(passes[0]["throughput"], 32.0);
        assert_eq!(passes[0]["outcome"], "scalar");
        assert_eq!(passes[1]["outcome"], "vectorized");
        assert_eq!(passes[2]["outcome"], "scalar_fallback");
        assert_eq!(passes[3]["outcome"], "skipped");
        assert!(passes[3].get("throughput").is_none());
    }

    #[test]
    fn test_write_to_appends_newline() {
        let mut buf = Vec::new();
        sample_report()
            .write_to(ReportFormat::Text, &mut buf)
            .unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("skipped\n"));
        assert_eq!(text.lines().count(), 5);
    }
}
