/* Copyright 2020 @Yuchen Wong */

use nalgebra as na;

pub type Float = f32;
pub type Int = i32;
pub type UInt = u32;

pub type Point2f = na::Point2<Float>;
pub type Point2i = na::Point2<Int>;
pub type Vector2u = na::Vector2<UInt>;

// Samples this far below zero are still considered non-negative.
pub const NEGATIVE_TOLERANCE: Float = -1e-5;
