// Copyright @yucwang 2026

use crate::core::rfilter::ReconstructionFilter;
use crate::core::storage::Storage;
use crate::math::constants::{Float, Point2f, Point2i};

/// Maps an image-space position into the padded pixel space of a block
/// whose logical region starts at `offset`.
pub fn to_block_local(pos: &Point2f, offset: &Point2i, border_size: usize) -> Point2f {
    Point2f::new(pos.x - offset.x as Float + border_size as Float,
                 pos.y - offset.y as Float + border_size as Float)
}

/// Calls `f(cell_index, weight)` for every storage pixel a sample at the
/// block-local position `local` contributes to. `cell_index` addresses
/// channel 0 of the pixel. Pixels outside the padded storage are skipped,
/// as are pixels whose filter weight is zero.
pub fn for_each_tap<F>(storage: &Storage,
                       rfilter: Option<&dyn ReconstructionFilter>,
                       local: &Point2f,
                       mut f: F)
    where F: FnMut(usize, Float) {
    if !local.x.is_finite() || !local.y.is_finite() {
        return;
    }

    let rfilter = match rfilter {
        Some(rfilter) if !rfilter.is_box_filter() => rfilter,
        _ => {
            if let Some(index) = storage.index(local.x.floor() as i64, local.y.floor() as i64) {
                f(index, 1.0);
            }
            return;
        }
    };

    let radius = rfilter.radius();
    let x_lo = ((local.x - radius + 0.5).floor() as i64).max(0);
    let y_lo = ((local.y - radius + 0.5).floor() as i64).max(0);
    let x_hi = ((local.x + radius - 0.5).ceil() as i64).min(storage.padded_width() as i64 - 1);
    let y_hi = ((local.y + radius - 0.5).ceil() as i64).min(storage.padded_height() as i64 - 1);

    for py in y_lo..=y_hi {
        let dy = py as Float + 0.5 - local.y;
        for px in x_lo..=x_hi {
            let weight = rfilter.weight(px as Float + 0.5 - local.x, dy);
            if weight == 0.0 {
                continue;
            }
            if let Some(index) = storage.index(px, py) {
                f(index, weight);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::gaussian::GaussianFilter;
    use crate::filters::tent::TentFilter;

    fn collect(storage: &Storage, rfilter: Option<&dyn ReconstructionFilter>,
               local: Point2f) -> Vec<(usize, Float)> {
        let mut taps = Vec::new();
        for_each_tap(storage, rfilter, &local, |index, weight| taps.push((index, weight)));
        taps
    }

    #[test]
    fn test_block_local_position() {
        let local = to_block_local(&Point2f::new(10.25, 4.5), &Point2i::new(8, 4), 2);
        assert_eq!(local, Point2f::new(4.25, 2.5));
    }

    #[test]
    fn test_box_path_hits_nearest_pixel() {
        let storage = Storage::new(4, 4, 0, 2);
        assert_eq!(collect(&storage, None, Point2f::new(1.7, 2.2)), vec![((2 * 4 + 1) * 2, 1.0)]);
        assert!(collect(&storage, None, Point2f::new(4.0, 0.5)).is_empty());
        assert!(collect(&storage, None, Point2f::new(-0.1, 0.5)).is_empty());
    }

    #[test]
    fn test_non_finite_position_has_no_taps() {
        let storage = Storage::new(4, 4, 1, 1);
        let tent = TentFilter::new(None);
        assert!(collect(&storage, None, Point2f::new(Float::NAN, 1.0)).is_empty());
        assert!(collect(&storage, Some(&tent), Point2f::new(1.0, Float::INFINITY)).is_empty());
    }

    #[test]
    fn test_tent_weights_sum_to_one_inside() {
        let storage = Storage::new(8, 8, 1, 1);
        let tent = TentFilter::new(None);
        let taps = collect(&storage, Some(&tent), Point2f::new(4.3, 5.8));
        let sum: Float = taps.iter().map(|(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(taps.len() <= 9);
    }

    #[test]
    fn test_spill_past_storage_is_dropped() {
        let storage = Storage::new(4, 4, 0, 1);
        let gaussian = GaussianFilter::new(None);
        let inside: Float = collect(&storage, Some(&gaussian), Point2f::new(2.0, 2.0))
            .iter().map(|(_, w)| w).sum();
        let corner: Float = collect(&storage, Some(&gaussian), Point2f::new(0.1, 0.1))
            .iter().map(|(_, w)| w).sum();
        assert!(corner < inside);
        assert!(collect(&storage, Some(&gaussian), Point2f::new(-5.0, -5.0)).is_empty());
    }
}
