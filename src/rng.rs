//! Seeded pseudo-random stream used by the plant renderer.
//!
//! Every value is the fractional part of `sin(cursor) * 10000`. The same seed
//! string must always produce the same sequence.

use crate::error::{GardenError, Result};

/// Deterministic stream derived from a seed string
#[derive(Debug, Clone)]
pub struct SeededRng {
    cursor: i64,
}

impl SeededRng {
    pub fn new(seed: &str) -> Self {
        Self {
            cursor: hash_seed(seed),
        }
    }

    /// Next value in [0, 1)
    pub fn next(&mut self) -> f64 {
        let x = (self.cursor as f64).sin() * 10000.0;
        self.cursor += 1;
        x - x.floor()
    }

    /// Integer in [min, max], inclusive on both ends
    pub fn range(&mut self, min: i32, max: i32) -> i32 {
        (self.next() * (max - min + 1) as f64).floor() as i32 + min
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.next() < p
    }

    /// Pick one element. An empty slice is rejected before the stream moves.
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T> {
        if items.is_empty() {
            return Err(GardenError::InvalidArgument(
                "cannot pick from an empty list".to_string(),
            ));
        }
        let idx = self.range(0, items.len() as i32 - 1) as usize;
        Ok(&items[idx])
    }
}

/// Rolling `hash * 31 + unit` over UTF-16 code units, wrapped to i32, then made
/// non-negative. `i32::MIN` stays representable because the result is i64.
fn hash_seed(seed: &str) -> i64 {
    let hash = seed
        .encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(unit as i32));
    (hash as i64).abs()
}
