// Copyright @yucwang 2026

use crate::core::rfilter::ReconstructionFilter;
use crate::math::constants::Float;

/// Triangle filter. Sampled at unit spacing its weights sum to one.
pub struct TentFilter {
    radius: Float,
    inv_radius: Float,
}

impl TentFilter {
    pub fn new(radius: Option<Float>) -> Self {
        let radius = radius.unwrap_or(1.0);
        Self { radius, inv_radius: 1.0 / radius }
    }
}

impl ReconstructionFilter for TentFilter {
    fn radius(&self) -> Float {
        self.radius
    }

    fn eval(&self, x: Float) -> Float {
        (1.0 - x.abs() * self.inv_radius).max(0.0) * self.inv_radius
    }

    fn describe(&self) -> String {
        format!("TentFilter\n  radius: {}", self.radius)
    }
}
