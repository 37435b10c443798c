//! Ширины векторного sqrt и общий trait для проходов.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::plan::ChunkPlan;

/// Четыре стратегии в фиксированном порядке отчёта
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    Normal,
    Sse128,
    Avx256,
    Avx512,
}

impl Strategy {
    pub const ALL: [Strategy; 4] = [
        Strategy::Normal,
        Strategy::Sse128,
        Strategy::Avx256,
        Strategy::Avx512,
    ];

    /// Метка строки отчёта
    pub fn label(&self) -> &'static str {
        match self {
            Strategy::Normal => "Normal",
            Strategy::Sse128 => "SSE 128-bit",
            Strategy::Avx256 => "AVX 256-bit",
            Strategy::Avx512 => "AVX 512-bit",
        }
    }

    /// Number of f32 lanes (1 for the scalar pass)
    pub fn width(&self) -> usize {
        match self {
            Strategy::Normal => 1,
            Strategy::Sse128 => Sse128::WIDTH,
            Strategy::Avx256 => Avx256::WIDTH,
            Strategy::Avx512 => Avx512::WIDTH,
        }
    }

    /// Имя набора инструкций для диагностики
    pub fn isa(&self) -> &'static str {
        match self {
            Strategy::Normal => "scalar",
            Strategy::Sse128 => "SSE",
            Strategy::Avx256 => "AVX",
            Strategy::Avx512 => "AVX-512",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Strategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Буфер линий, выровненный под самую широкую загрузку (64 байта для AVX-512)
#[repr(C, align(64))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneBuffer<const W: usize>(pub [f32; W]);

impl<const W: usize> LaneBuffer<W> {
    /// `first, first+1, ..., first+W-1`, приведённые к f32
    #[inline(always)]
    pub fn consecutive(first: u64) -> Self {
        Self(std::array::from_fn(|k| (first + k as u64) as f32))
    }

    #[inline(always)]
    pub fn zeroed() -> Self {
        Self([0.0; W])
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *const f32 {
        self.0.as_ptr()
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut f32 {
        self.0.as_mut_ptr()
    }
}

/// Vector-of-W-floats sqrt over the bulk part of a [`ChunkPlan`].
pub trait SqrtLanes {
    const WIDTH: usize;
    const STRATEGY: Strategy;

    /// Посчитать sqrt для каждого полного чанка плана, результат в `black_box`.
    ///
    /// # Safety
    /// Вызывающий должен убедиться, что CPU поддерживает набор инструкций
    /// (`SimdCapabilities::supports(Self::STRATEGY)`).
    unsafe fn sweep_bulk(plan: &ChunkPlan);
}

pub struct Sse128;
pub struct Avx256;
pub struct Avx512;

#[cfg(target_arch = "x86_64")]
mod x86_impls {
    use super::*;
    use crate::x86;

    impl SqrtLanes for Sse128 {
        const WIDTH: usize = 4;
        const STRATEGY: Strategy = Strategy::Sse128;

        unsafe fn sweep_bulk(plan: &ChunkPlan) {
            x86::sqrt_bulk_sse(plan)
        }
    }

    impl SqrtLanes for Avx256 {
        const WIDTH: usize = 8;
        const STRATEGY: Strategy = Strategy::Avx256;

        unsafe fn sweep_bulk(plan: &ChunkPlan) {
            x86::sqrt_bulk_avx(plan)
        }
    }

    impl SqrtLanes for Avx512 {
        const WIDTH: usize = 16;
        const STRATEGY: Strategy = Strategy::Avx512;

        unsafe fn sweep_bulk(plan: &ChunkPlan) {
            x86::sqrt_bulk_avx512(plan)
        }
    }
}

#[cfg(not(target_arch = "x86_64"))]
mod portable_impls {
    use super::*;
    use std::hint::black_box;

    // Без x86 intrinsics: те же чанки, sqrt по линиям.
    fn sweep_lanes<const W: usize>(plan: &ChunkPlan) {
        for first in plan.chunk_starts() {
            let lanes = LaneBuffer::<W>::consecutive(first);
            black_box(lanes.0.map(f32::sqrt));
        }
    }

    impl SqrtLanes for Sse128 {
        const WIDTH: usize = 4;
        const STRATEGY: Strategy = Strategy::Sse128;

        unsafe fn sweep_bulk(plan: &ChunkPlan) {
            sweep_lanes::<4>(plan)
        }
    }

    impl SqrtLanes for Avx256 {
        const WIDTH: usize = 8;
        const STRATEGY: Strategy = Strategy::Avx256;

        unsafe fn sweep_bulk(plan: &ChunkPlan) {
            sweep_lanes::<8>(plan)
        }
    }

    impl SqrtLanes for Avx512 {
        const WIDTH: usize = 16;
        const STRATEGY: Strategy = Strategy::Avx512;

        unsafe fn sweep_bulk(plan: &ChunkPlan) {
            sweep_lanes::<16>(plan)
        }
    }
}
