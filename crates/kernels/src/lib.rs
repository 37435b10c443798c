//! Scalar vs SSE/AVX/AVX-512 square-root throughput benchmark.

pub mod config;
pub mod lanes;
pub mod passes;
pub mod plan;
pub mod report;
pub mod runner;
pub mod simd_feature_detection;
#[cfg(target_arch = "x86_64")]
pub mod x86;

pub use config::{BenchConfig, ReportFormat, UnsupportedPolicy, COUNT_ENV, DEFAULT_COUNT};
pub use lanes::{Avx256, Avx512, LaneBuffer, SqrtLanes, Sse128, Strategy};
pub use passes::{scalar_fallback_pass, scalar_pass, vector_pass, PassStats};
pub use plan::ChunkPlan;
pub use report::{format_seconds, BenchReport, PassOutcome, PassResult};
pub use runner::BenchmarkRunner;
pub use simd_feature_detection::{SimdCapabilities, SimdLevel};
