// Copyright @yucwang 2021

pub mod coalescer;
pub mod config;
pub mod error;
pub mod imageblock;
pub mod rfilter;
pub mod rng;
pub mod sanitizer;
pub mod spectrum;
pub mod splat;
pub mod storage;
pub mod tensor;
