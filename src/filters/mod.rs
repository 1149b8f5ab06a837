// Copyright @yucwang 2026

pub mod box_filter;
pub mod gaussian;
pub mod tent;

use std::sync::Arc;

use crate::core::rfilter::ReconstructionFilter;

/// Looks a filter up by the name used on the command line.
pub fn filter_from_name(name: &str) -> Option<Arc<dyn ReconstructionFilter>> {
    match name {
        "box" => Some(Arc::new(box_filter::BoxFilter::new())),
        "tent" => Some(Arc::new(tent::TentFilter::new(None))),
        "gaussian" => Some(Arc::new(gaussian::GaussianFilter::new(None))),
        _ => None,
    }
}
