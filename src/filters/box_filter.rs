// Copyright @yucwang 2026

use crate::core::rfilter::ReconstructionFilter;
use crate::math::constants::Float;

pub struct BoxFilter;

impl BoxFilter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BoxFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReconstructionFilter for BoxFilter {
    fn radius(&self) -> Float {
        0.5
    }

    fn eval(&self, x: Float) -> Float {
        if x.abs() <= 0.5 { 1.0 } else { 0.0 }
    }

    fn describe(&self) -> String {
        String::from("BoxFilter\n  radius: 0.5")
    }
}

#[cfg(test)]
mod tests {
    use super::BoxFilter;
    use crate::core::rfilter::ReconstructionFilter;

    #[test]
    fn test_box_filter_is_box() {
        let filter = BoxFilter::new();
        assert!(filter.is_box_filter());
        assert_eq!(filter.border_size(), 0);
        assert_eq!(filter.weight(0.2, -0.4), 1.0);
        assert_eq!(filter.weight(0.7, 0.0), 0.0);
    }
}
