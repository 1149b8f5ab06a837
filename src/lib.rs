// Copyright @yucwang 2021

pub extern crate nalgebra as na;

pub mod core;
pub mod filters;
pub mod io;
pub mod math;
pub mod renderers;

pub use self::core::config::{BlockConfig, ExecutionMode};
pub use self::core::error::BlockError;
pub use self::core::imageblock::ImageBlock;
pub use self::core::rfilter::ReconstructionFilter;
pub use self::core::tensor::{AtomicTensor, TensorXf};
