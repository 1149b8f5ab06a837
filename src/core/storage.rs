// Copyright @yucwang 2026

use crate::core::error::BlockError;
use crate::core::tensor::AtomicTensor;
use crate::math::atomic_float::AtomicFloat;

/// Either a buffer owned by the block, or one lent by the caller for
/// in-place accumulation. A lent buffer must outlive the block.
#[derive(Debug)]
enum Cells<'a> {
    Owned(AtomicTensor),
    Borrowed(&'a AtomicTensor),
}

/// Padded multi-channel pixel buffer of an image block. Coordinates taken
/// by `at` and `index` are block-local and include the border, so
/// `(0, 0)` is the top-left border pixel.
#[derive(Debug)]
pub struct Storage<'a> {
    cells: Cells<'a>,
    width: usize,
    height: usize,
    border_size: usize,
    channel_count: usize,
}

impl Storage<'static> {
    pub fn new(width: usize, height: usize, border_size: usize,
               channel_count: usize) -> Self {
        let tensor = AtomicTensor::zeros([height + 2 * border_size,
                                          width + 2 * border_size,
                                          channel_count]);
        Self { cells: Cells::Owned(tensor), width, height, border_size, channel_count }
    }

    pub fn from_owned(tensor: AtomicTensor, border_size: usize) -> Result<Self, BlockError> {
        let (width, height, channel_count) = logical_extent(&tensor, border_size)?;
        Ok(Self { cells: Cells::Owned(tensor), width, height, border_size, channel_count })
    }
}

impl<'a> Storage<'a> {
    pub fn borrowed(tensor: &'a AtomicTensor, border_size: usize) -> Result<Self, BlockError> {
        let (width, height, channel_count) = logical_extent(tensor, border_size)?;
        Ok(Self { cells: Cells::Borrowed(tensor), width, height, border_size, channel_count })
    }

    pub fn tensor(&self) -> &AtomicTensor {
        match &self.cells {
            Cells::Owned(tensor) => tensor,
            Cells::Borrowed(tensor) => tensor,
        }
    }

    pub fn is_borrowed(&self) -> bool {
        matches!(self.cells, Cells::Borrowed(_))
    }

    /// Logical width, without the border.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Logical height, without the border.
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn padded_width(&self) -> usize {
        self.width + 2 * self.border_size
    }

    pub fn padded_height(&self) -> usize {
        self.height + 2 * self.border_size
    }

    pub fn border_size(&self) -> usize {
        self.border_size
    }

    pub fn channel_count(&self) -> usize {
        self.channel_count
    }

    /// Flat index of channel 0 of pixel `(px, py)`, or `None` outside the
    /// padded buffer.
    pub fn index(&self, px: i64, py: i64) -> Option<usize> {
        if px < 0 || py < 0 {
            return None;
        }
        let (px, py) = (px as usize, py as usize);
        if px >= self.padded_width() || py >= self.padded_height() {
            return None;
        }
        Some((py * self.padded_width() + px) * self.channel_count)
    }

    pub fn at(&self, px: i64, py: i64, channel: usize) -> Option<&AtomicFloat> {
        if channel >= self.channel_count {
            return None;
        }
        self.index(px, py).map(|base| self.cell(base + channel))
    }

    pub(crate) fn cell(&self, index: usize) -> &AtomicFloat {
        &self.tensor().cells()[index]
    }

    pub fn clear(&mut self) {
        self.tensor().fill(0.0);
    }
}

fn logical_extent(tensor: &AtomicTensor, border_size: usize)
    -> Result<(usize, usize, usize), BlockError> {
    let [padded_height, padded_width, channel_count] = tensor.shape();
    let height = padded_height.saturating_sub(2 * border_size);
    let width = padded_width.saturating_sub(2 * border_size);
    if width == 0 || height == 0 {
        return Err(BlockError::InvalidSize { width: width as u32, height: height as u32 });
    }
    if channel_count == 0 {
        return Err(BlockError::EmptyChannelLayout);
    }
    Ok((width, height, channel_count))
}

#[cfg(test)]
mod tests {
    use super::Storage;
    use crate::core::error::BlockError;
    use crate::core::tensor::AtomicTensor;

    #[test]
    fn test_storage_padded_layout() {
        let storage = Storage::new(4, 3, 1, 2);
        assert_eq!(storage.width(), 4);
        assert_eq!(storage.height(), 3);
        assert_eq!(storage.padded_width(), 6);
        assert_eq!(storage.padded_height(), 5);
        assert_eq!(storage.tensor().shape(), [5, 6, 2]);

        assert_eq!(storage.index(0, 0), Some(0));
        assert_eq!(storage.index(1, 1), Some((6 + 1) * 2));
        assert_eq!(storage.index(6, 0), None);
        assert_eq!(storage.index(-1, 2), None);
        assert!(storage.at(5, 4, 1).is_some());
        assert!(storage.at(5, 4, 2).is_none());
    }

    #[test]
    fn test_clear_zero_fills() {
        let mut storage = Storage::new(2, 2, 0, 1);
        storage.at(1, 1, 0).expect("in bounds").fetch_add(3.0);
        storage.clear();
        assert!(storage.tensor().cells().iter().all(|c| c.load() == 0.0));
    }

    #[test]
    fn test_borrowed_storage_writes_through() {
        let tensor = AtomicTensor::zeros([4, 4, 3]);
        {
            let storage = Storage::borrowed(&tensor, 1).expect("valid shape");
            assert!(storage.is_borrowed());
            assert_eq!(storage.width(), 2);
            storage.at(2, 1, 2).expect("in bounds").fetch_add(1.25);
        }
        assert_eq!(tensor.get(1, 2, 2).map(|c| c.load()), Some(1.25));
    }

    #[test]
    fn test_adoption_rejects_tensor_smaller_than_border() {
        let tensor = AtomicTensor::zeros([2, 2, 1]);
        let result = Storage::borrowed(&tensor, 1);
        assert_eq!(result.err(), Some(BlockError::InvalidSize { width: 0, height: 0 }));
    }
}
