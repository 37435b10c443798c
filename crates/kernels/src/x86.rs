//! x86_64 intrinsics: один векторный sqrt на чанк.
//!
//! Каждая функция требует соответствующий target feature; проверку делает
//! вызывающий через `SimdCapabilities`.

use std::arch::x86_64::*;
use std::hint::black_box;

use crate::lanes::LaneBuffer;
use crate::plan::ChunkPlan;

#[inline]
#[target_feature(enable = "sse")]
/// # Safety
/// Требуется SSE.
pub unsafe fn sqrt_chunk_sse(lanes: &LaneBuffer<4>) -> LaneBuffer<4> {
    let mut out = LaneBuffer::zeroed();
    let x = _mm_load_ps(lanes.as_ptr());
    _mm_store_ps(out.as_mut_ptr(), _mm_sqrt_ps(x));
    out
}

#[inline]
#[target_feature(enable = "avx")]
/// # Safety
/// Требуется AVX.
pub unsafe fn sqrt_chunk_avx(lanes: &LaneBuffer<8>) -> LaneBuffer<8> {
    let mut out = LaneBuffer::zeroed();
    let x = _mm256_load_ps(lanes.as_ptr());
    _mm256_store_ps(out.as_mut_ptr(), _mm256_sqrt_ps(x));
    out
}

#[inline]
#[target_feature(enable = "avx512f")]
/// # Safety
/// Требуется AVX-512F.
pub unsafe fn sqrt_chunk_avx512(lanes: &LaneBuffer<16>) -> LaneBuffer<16> {
    let mut out = LaneBuffer::zeroed();
    let x = _mm512_load_ps(lanes.as_ptr());
    _mm512_store_ps(out.as_mut_ptr(), _mm512_sqrt_ps(x));
    out
}

#[target_feature(enable = "sse")]
/// # Safety
/// Требуется SSE.
pub unsafe fn sqrt_bulk_sse(plan: &ChunkPlan) {
    for first in plan.chunk_starts() {
        let lanes = LaneBuffer::<4>::consecutive(first);
        black_box(sqrt_chunk_sse(&lanes));
    }
}

#[target_feature(enable = "avx")]
/// # Safety
/// Требуется AVX.
pub unsafe fn sqrt_bulk_avx(plan: &ChunkPlan) {
    for first in plan.chunk_starts() {
        let lanes = LaneBuffer::<8>::consecutive(first);
        black_box(sqrt_chunk_avx(&lanes));
    }
}

#[target_feature(enable = "avx512f")]
/// # Safety
/// Требуется AVX-512F.
pub unsafe fn sqrt_bulk_avx512(plan: &ChunkPlan) {
    for first in plan.chunk_starts() {
        let lanes = LaneBuffer::<16>::consecutive(first);
        black_box(sqrt_chunk_avx512(&lanes));
    }
}
