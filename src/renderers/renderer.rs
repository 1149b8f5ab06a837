// Copyright @yucwang 2021

use crate::core::error::BlockError;
use crate::core::imageblock::ImageBlock;
use crate::math::constants::{Float, Point2f};

/// Radiance seen through an image position. Stands in for a scene and an
/// integrator when driving image blocks.
pub trait SampleSource: Sync {
    fn radiance(&self, pos: &Point2f) -> [Float; 3];
}

impl<F> SampleSource for F where F: Fn(&Point2f) -> [Float; 3] + Sync {
    fn radiance(&self, pos: &Point2f) -> [Float; 3] {
        self(pos)
    }
}

pub trait Renderer {
    fn render(&self, source: &dyn SampleSource) -> Result<ImageBlock<'static>, BlockError>;
}
