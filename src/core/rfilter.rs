// Copyright @yucwang 2026

use crate::math::constants::Float;

/// Reconstruction filter seen by an image block. Filters are separable:
/// `weight(dx, dy)` is `eval(dx) * eval(dy)` unless an implementation
/// overrides it.
pub trait ReconstructionFilter: Send + Sync {
    /// Half-width of the support in pixels.
    fn radius(&self) -> Float;

    /// 1D filter profile at signed offset `x` from the sample.
    fn eval(&self, x: Float) -> Float;

    fn weight(&self, dx: Float, dy: Float) -> Float {
        self.eval(dx) * self.eval(dy)
    }

    /// Margin a block needs so that no footprint pixel falls outside it.
    fn border_size(&self) -> u32 {
        (self.radius() - 0.5).ceil().max(0.0) as u32
    }

    fn is_box_filter(&self) -> bool {
        self.radius() <= 0.5
    }

    fn describe(&self) -> String {
        String::from("ReconstructionFilter")
    }
}
