//! Проходы бенчмарка по диапазону `1..count`.
//!
//! Результаты нигде не сохраняются: каждое значение уходит в `black_box`,
//! чтобы компилятор не выбросил вычисление.

use serde::Serialize;
use std::hint::black_box;
use std::ops::Range;

use crate::lanes::SqrtLanes;
use crate::plan::ChunkPlan;

/// Сколько sqrt посчитано в каждой фазе прохода
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PassStats {
    pub bulk_evaluations: u64,
    pub tail_evaluations: u64,
}

impl PassStats {
    pub fn total(&self) -> u64 {
        self.bulk_evaluations + self.tail_evaluations
    }
}

/// Normal: sqrt каждого числа в f64
pub fn scalar_pass(count: u64) -> PassStats {
    let plan = ChunkPlan::new(count, 1);
    for i in 1..count {
        black_box((i as f64).sqrt());
    }

    PassStats {
        bulk_evaluations: plan.evaluations(),
        tail_evaluations: 0,
    }
}

/// Замена векторного прохода на CPU без нужного набора инструкций:
/// тот же диапазон, скалярный sqrt в f32.
pub fn scalar_fallback_pass(count: u64) -> PassStats {
    let plan = ChunkPlan::new(count, 1);
    sqrt_tail(1..count);

    PassStats {
        bulk_evaluations: 0,
        tail_evaluations: plan.evaluations(),
    }
}

/// Векторный проход: `bulk_chunks` полных чанков, затем хвост скалярно.
///
/// # Safety
/// CPU должен поддерживать `K::STRATEGY`
/// (см. [`SimdCapabilities::supports`](crate::SimdCapabilities::supports)).
pub unsafe fn vector_pass<K: SqrtLanes>(count: u64) -> PassStats {
    let plan = ChunkPlan::new(count, K::WIDTH);

    K::sweep_bulk(&plan);
    sqrt_tail(plan.tail());

    PassStats {
        bulk_evaluations: plan.bulk_evaluations(),
        tail_evaluations: plan.tail_len(),
    }
}

#[inline]
fn sqrt_tail(range: Range<u64>) {
    for i in range {
        black_box((i as f32).sqrt());
    }
}
