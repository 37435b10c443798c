use std::ops::Range;

/// Разбиение диапазона `1..count` на полные векторные чанки и хвост.
///
/// Чанк `k` покрывает `1 + k*width ..= (k+1)*width`, хвост начинается
/// сразу после последнего чанка и заканчивается на `count - 1`.
/// `bulk_chunks * width + tail_len == count - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    count: u64,
    width: u64,
    bulk_chunks: u64,
    tail_len: u64,
}

impl ChunkPlan {
    /// `count` is caller-supplied and should be positive; `count <= 1`
    /// yields an empty plan. A zero `width` is treated as 1.
    pub fn new(count: u64, width: usize) -> Self {
        let width = (width as u64).max(1);
        let len = count.saturating_sub(1);

        Self {
            count,
            width,
            bulk_chunks: len / width,
            tail_len: len % width,
        }
    }

    pub fn width(&self) -> u64 {
        self.width
    }

    /// Сколько чисел в диапазоне `1..count`
    pub fn len(&self) -> u64 {
        self.count.saturating_sub(1)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn bulk_chunks(&self) -> u64 {
        self.bulk_chunks
    }

    pub fn tail_len(&self) -> u64 {
        self.tail_len
    }

    /// Первый элемент каждого полного чанка
    pub fn chunk_starts(&self) -> impl Iterator<Item = u64> {
        let width = self.width;
        (0..self.bulk_chunks).map(move |k| 1 + k * width)
    }

    pub fn bulk_evaluations(&self) -> u64 {
        self.bulk_chunks * self.width
    }

    /// Хвост, который считается скалярно
    pub fn tail(&self) -> Range<u64> {
        let start = 1 + self.bulk_evaluations();
        start..start + self.tail_len
    }

    pub fn evaluations(&self) -> u64 {
        self.bulk_evaluations() + self.tail_len
    }
}
