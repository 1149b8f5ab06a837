// Copyright @yucwang 2026

use crate::math::constants::{Float, Point2f};

/// Small deterministic generator for sample positions.
pub struct LcgRng {
    state: u64,
}

impl LcgRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        (self.state >> 32) as u32
    }

    /// Uniform in `[0, 1)`.
    pub fn next_f32(&mut self) -> Float {
        (self.next_u32() >> 8) as Float * (1.0 / (1u32 << 24) as Float)
    }

    /// Uniform point in the pixel at `(x, y)`.
    pub fn next_in_pixel(&mut self, x: usize, y: usize) -> Point2f {
        Point2f::new(x as Float + self.next_f32(), y as Float + self.next_f32())
    }
}

#[cfg(test)]
mod tests {
    use super::LcgRng;

    #[test]
    fn test_rng_is_deterministic_and_in_range() {
        let mut a = LcgRng::new(7);
        let mut b = LcgRng::new(7);
        for _ in 0..1000 {
            let v = a.next_f32();
            assert_eq!(v, b.next_f32());
            assert!((0.0..1.0).contains(&v));
        }
        let p = a.next_in_pixel(3, 5);
        assert!(p.x >= 3.0 && p.x < 4.0 && p.y >= 5.0 && p.y < 6.0);
    }
}
