// Copyright 2020 @TwoCookingMice

pub mod atomic_float;
pub mod constants;
