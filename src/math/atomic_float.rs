// Copyright @yucwang 2026

use super::constants::Float;

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// A `Float` cell that supports lock-free accumulation from several
/// threads. The value is kept as its bit pattern in an `AtomicU32`.
pub struct AtomicFloat {
    bits: AtomicU32,
}

impl AtomicFloat {
    pub fn new(value: Float) -> Self {
        Self { bits: AtomicU32::new(value.to_bits()) }
    }

    pub fn load(&self) -> Float {
        Float::from_bits(self.bits.load(Ordering::Relaxed))
    }

    pub fn store(&self, value: Float) {
        self.bits.store(value.to_bits(), Ordering::Relaxed);
    }

    /// Adds `value` to the cell and returns the previous value.
    pub fn fetch_add(&self, value: Float) -> Float {
        let mut current = self.bits.load(Ordering::Relaxed);
        loop {
            let next = (Float::from_bits(current) + value).to_bits();
            match self.bits.compare_exchange_weak(current, next,
                                                  Ordering::Relaxed,
                                                  Ordering::Relaxed) {
                Ok(previous) => return Float::from_bits(previous),
                Err(actual) => current = actual,
            }
        }
    }
}

impl Default for AtomicFloat {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Clone for AtomicFloat {
    fn clone(&self) -> Self {
        Self::new(self.load())
    }
}

impl fmt::Debug for AtomicFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.load())
    }
}
