use tracing::{debug, info, warn};

use common::{BenchError, BenchResult, OperationTimer};

use crate::config::{BenchConfig, UnsupportedPolicy};
use crate::lanes::{Avx256, Avx512, Sse128, Strategy};
use crate::passes::{self, PassStats};
use crate::report::{BenchReport, PassOutcome, PassResult};
use crate::simd_feature_detection::SimdCapabilities;

/// Последовательно выполняет четыре прохода и собирает отчёт.
///
/// Проходы идут строго друг за другом в одном потоке, каждый замеряется
/// отдельно.
pub struct BenchmarkRunner {
    config: BenchConfig,
    capabilities: SimdCapabilities,
}

impl BenchmarkRunner {
    pub fn new(config: BenchConfig) -> Self {
        Self::with_capabilities(config, SimdCapabilities::detect())
    }

    /// Runner с заданным набором возможностей CPU (например, чтобы
    /// принудительно проверить fallback)
    pub fn with_capabilities(config: BenchConfig, capabilities: SimdCapabilities) -> Self {
        Self {
            config,
            capabilities,
        }
    }

    pub fn config(&self) -> &BenchConfig {
        &self.config
    }

    pub fn capabilities(&self) -> SimdCapabilities {
        self.capabilities
    }

    /// Проверка одной стратегии. Единственная recoverable ошибка бенчмарка.
    pub fn check_support(&self, strategy: Strategy) -> BenchResult<()> {
        if self.capabilities.supports(strategy) {
            Ok(())
        } else {
            Err(BenchError::unsupported(strategy.label()))
        }
    }

    /// Сообщить о неподдерживаемых ширинах один раз, до первого прохода
    fn announce_unsupported(&self) {
        let action = match self.config.unsupported {
            UnsupportedPolicy::Scalar => "running scalar fallback",
            UnsupportedPolicy::Skip => "skipping",
        };

        for strategy in self.capabilities.unsupported() {
            let err = BenchError::unsupported(strategy.label());
            warn!(
                strategy = %strategy,
                error = %err,
                "{} unavailable, {}",
                strategy.isa(),
                action
            );
        }
    }

    pub fn run(&self) -> BenchReport {
        info!(
            count = self.config.count,
            simd_level = ?self.capabilities.level(),
            policy = %self.config.unsupported,
            "Starting sqrt benchmark"
        );
        self.announce_unsupported();

        let passes = Strategy::ALL.map(|strategy| self.run_pass(strategy));

        BenchReport {
            count: self.config.count,
            passes,
        }
    }

    /// Один замеренный проход
    pub fn run_pass(&self, strategy: Strategy) -> PassResult {
        let supported = self.check_support(strategy).is_ok();
        if !supported && self.config.unsupported == UnsupportedPolicy::Skip {
            debug!(strategy = %strategy, "pass skipped");
            return PassResult::skipped(strategy);
        }

        let count = self.config.count;
        let mut timer = OperationTimer::new(strategy.label());
        let stats = self.execute(strategy, supported, count);
        let elapsed = timer.stop();

        let outcome = match strategy {
            Strategy::Normal => PassOutcome::Scalar,
            _ if supported => PassOutcome::Vectorized,
            _ => PassOutcome::ScalarFallback,
        };
        let result = PassResult {
            strategy,
            outcome,
            elapsed,
            stats,
        };

        timer.add_field("items_count", stats.total());
        timer.add_field("outcome", outcome);
        timer.finish();

        info!(
            strategy = %strategy,
            outcome = ?outcome,
            seconds = result.seconds(),
            items_count = stats.total(),
            throughput = result.throughput().unwrap_or(0.0),
            "pass finished"
        );

        result
    }

    fn execute(&self, strategy: Strategy, supported: bool, count: u64) -> PassStats {
        match strategy {
            Strategy::Normal => passes::scalar_pass(count),
            _ if !supported => passes::scalar_fallback_pass(count),
            // SAFETY: для векторных веток `supported` подтверждён SimdCapabilities
            Strategy::Sse128 => unsafe { passes::vector_pass::<Sse128>(count) },
            Strategy::Avx256 => unsafe { passes::vector_pass::<Avx256>(count) },
            Strategy::Avx512 => unsafe { passes::vector_pass::<Avx512>(count) },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing::field::{Field, Visit};
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::{Layer, Registry};

    #[test]
    fn test_run_produces_four_passes_in_order() {
        let runner = BenchmarkRunner::new(BenchConfig::default().with_count(17));
        let report = runner.run();

        assert_eq!(report.count, 17);
        let order: Vec<_> = report.passes.iter().map(|p| p.strategy).collect();
        assert_eq!(order, Strategy::ALL.to_vec());
        for pass in &report.passes {
            assert_eq!(pass.stats.total(), 16, "{}", pass.strategy);
            assert_ne!(pass.outcome, PassOutcome::Skipped);
        }
    }

    #[test]
    fn test_scalar_fallback_policy() {
        let runner = BenchmarkRunner::with_capabilities(
            BenchConfig::default().with_count(33),
            SimdCapabilities::scalar_only(),
        );
        let report = runner.run();

        assert_eq!(report.passes[0].outcome, PassOutcome::Scalar);
        for pass in &report.passes[1..] {
            assert_eq!(pass.outcome, PassOutcome::ScalarFallback);
            assert_eq!(pass.stats.tail_evaluations, 32);
        }
    }

    #[test]
    fn test_skip_policy() {
        let runner = BenchmarkRunner::with_capabilities(
            BenchConfig::default()
                .with_count(33)
                .with_policy(UnsupportedPolicy::Skip),
            SimdCapabilities::scalar_only(),
        );
        let report = runner.run();

        assert_eq!(report.passes[0].stats.total(), 32);
        for pass in &report.passes[1..] {
            assert_eq!(pass.outcome, PassOutcome::Skipped);
            assert_eq!(pass.elapsed, std::time::Duration::ZERO);
        }
        assert!(report.render_text().ends_with("AVX 512-bit: skipped"));
    }

    #[test]
    fn test_check_support_reports_unsupported_width() {
        let runner = BenchmarkRunner::with_capabilities(
            BenchConfig::quick(),
            SimdCapabilities::scalar_only(),
        );
        assert!(runner.check_support(Strategy::Normal).is_ok());

        let err = runner.check_support(Strategy::Avx512).unwrap_err();
        assert!(err.is_recoverable());
        assert!(err.to_string().starts_with("AVX 512-bit"));
    }

    /// Собирает (уровень, сообщение) всех событий
    #[derive(Clone, Default)]
    struct CapturedEvents(Arc<Mutex<Vec<(Level, String)>>>);

    impl CapturedEvents {
        fn warnings(&self) -> Vec<String> {
            self.0
                .lock()
                .unwrap()
                .iter()
                .filter(|(level, _)| *level == Level::WARN)
                .map(|(_, message)| message.clone())
                .collect()
        }
    }

    struct MessageVisitor(String);

    impl Visit for MessageVisitor {
        fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
            if field.name() == "message" {
                self.0 = format!("{:?}", value);
            }
        }
    }

    impl<S: Subscriber> Layer<S> for CapturedEvents {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.0
                .lock()
                .unwrap()
                .push((*event.metadata().level(), visitor.0));
        }
    }

    fn run_capturing(runner: &BenchmarkRunner) -> (BenchReport, CapturedEvents) {
        let events = CapturedEvents::default();
        let subscriber = Registry::default().with(events.clone());
        let report = tracing::subscriber::with_default(subscriber, || runner.run());
        (report, events)
    }

    #[test]
    fn test_skip_policy_warns_once_per_missing_width() {
        let caps = SimdCapabilities {
            sse: true,
            avx: true,
            avx512f: false,
        };
        let runner = BenchmarkRunner::with_capabilities(
            BenchConfig::default()
                .with_count(9)
                .with_policy(UnsupportedPolicy::Skip),
            caps,
        );

        let (report, events) = run_capturing(&runner);

        assert_eq!(events.warnings(), vec!["AVX-512 unavailable, skipping"]);
        assert_eq!(report.passes[3].outcome, PassOutcome::Skipped);
    }

    #[test]
    fn test_scalar_policy_warns_once_per_missing_width() {
        let runner = BenchmarkRunner::with_capabilities(
            BenchConfig::default().with_count(9),
            SimdCapabilities::scalar_only(),
        );

        let (_, events) = run_capturing(&runner);

        assert_eq!(
            events.warnings(),
            vec![
                "SSE unavailable, running scalar fallback",
                "AVX unavailable, running scalar fallback",
                "AVX-512 unavailable, running scalar fallback",
            ]
        );
    }

    #[test]
    fn test_count_of_one_does_nothing() {
        let report = BenchmarkRunner::new(BenchConfig::default().with_count(1)).run();
        assert!(report.passes.iter().all(|p| p.stats.total() == 0));
    }
}
