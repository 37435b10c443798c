//! SIMD Feature Detection
//!
//! Определяет, какие ширины векторного sqrt доступны на текущем CPU:
//! - SSE (128-bit, `_mm_sqrt_ps`)
//! - AVX (256-bit, `_mm256_sqrt_ps`)
//! - AVX-512F (512-bit, `_mm512_sqrt_ps`)
//!
//! Safety
//! - В модуле нет `unsafe`. Детекция через `is_x86_feature_detected!`,
//!   результат кэшируется в `OnceLock` на весь процесс.

use serde::Serialize;
use std::sync::OnceLock;
use tracing::info;

use crate::lanes::Strategy;

static CAPABILITIES: OnceLock<SimdCapabilities> = OnceLock::new();

/// SIMD capability levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum SimdLevel {
    None,
    Sse,
    Avx,
    Avx512F,
}

/// Набор флагов, нужных для трёх векторных проходов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimdCapabilities {
    pub sse: bool,
    pub avx: bool,
    pub avx512f: bool,
}

impl SimdCapabilities {
    /// Get host capabilities (detected once per process)
    pub fn detect() -> Self {
        *CAPABILITIES.get_or_init(Self::detect_host)
    }

    /// Только скалярные проходы. Используется на не-x86_64 и в тестах.
    pub const fn scalar_only() -> Self {
        Self {
            sse: false,
            avx: false,
            avx512f: false,
        }
    }

    #[cfg(target_arch = "x86_64")]
    fn detect_host() -> Self {
        let caps = Self {
            sse: is_x86_feature_detected!("sse"),
            avx: is_x86_feature_detected!("avx"),
            avx512f: is_x86_feature_detected!("avx512f"),
        };

        info!("🚀 SIMD Feature Detection Complete:");
        info!("   SIMD Level: {:?}", caps.level());
        info!("   SSE: {}", caps.sse);
        info!("   AVX: {}", caps.avx);
        info!("   AVX-512F: {}", caps.avx512f);

        caps
    }

    #[cfg(not(target_arch = "x86_64"))]
    fn detect_host() -> Self {
        info!("ℹ️ Non-x86_64 architecture detected - vector passes unavailable");
        Self::scalar_only()
    }

    /// Best available SIMD level
    pub fn level(&self) -> SimdLevel {
        if self.avx512f {
            SimdLevel::Avx512F
        } else if self.avx {
            SimdLevel::Avx
        } else if self.sse {
            SimdLevel::Sse
        } else {
            SimdLevel::None
        }
    }

    /// Может ли проход выполниться на этом CPU в векторном виде
    pub fn supports(&self, strategy: Strategy) -> bool {
        match strategy {
            Strategy::Normal => true,
            Strategy::Sse128 => self.sse,
            Strategy::Avx256 => self.avx,
            Strategy::Avx512 => self.avx512f,
        }
    }

    /// Проходы, которые не смогут выполниться векторно
    pub fn unsupported(&self) -> Vec<Strategy> {
        Strategy::ALL
            .into_iter()
            .filter(|s| !self.supports(*s))
            .collect()
    }
}
