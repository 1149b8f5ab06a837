// Copyright @yucwang 2026

use crate::core::rfilter::ReconstructionFilter;
use crate::math::constants::Float;

/// Truncated Gaussian, shifted down so that it reaches zero at the radius.
pub struct GaussianFilter {
    stddev: Float,
    radius: Float,
    alpha: Float,
    bias: Float,
}

impl GaussianFilter {
    pub fn new(stddev: Option<Float>) -> Self {
        let stddev = stddev.unwrap_or(0.5);
        let radius = 4.0 * stddev;
        let alpha = 1.0 / (2.0 * stddev * stddev);
        Self { stddev, radius, alpha, bias: (-alpha * radius * radius).exp() }
    }
}

impl ReconstructionFilter for GaussianFilter {
    fn radius(&self) -> Float {
        self.radius
    }

    fn eval(&self, x: Float) -> Float {
        ((-self.alpha * x * x).exp() - self.bias).max(0.0)
    }

    fn describe(&self) -> String {
        format!("GaussianFilter\n  stddev: {}\n  radius: {}", self.stddev, self.radius)
    }
}

#[cfg(test)]
mod tests {
    use super::GaussianFilter;
    use crate::core::rfilter::ReconstructionFilter;

    #[test]
    fn test_gaussian_support() {
        let filter = GaussianFilter::new(None);
        assert_eq!(filter.radius(), 2.0);
        assert_eq!(filter.border_size(), 2);
        assert_eq!(filter.eval(2.0), 0.0);
        assert_eq!(filter.eval(3.0), 0.0);
        assert!(filter.eval(0.0) > filter.eval(0.5));
        assert!(filter.eval(1.9) > 0.0);
    }
}
