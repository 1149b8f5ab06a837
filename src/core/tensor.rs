// Copyright @yucwang 2026

use crate::core::error::BlockError;
use crate::math::atomic_float::AtomicFloat;
use crate::math::constants::Float;

use std::ops;

/// A dense `(height, width, channels)` row-major tensor of plain floats.
#[derive(Debug, Clone, PartialEq)]
pub struct TensorXf {
    data: Vec<Float>,
    shape: [usize; 3],
}

impl ops::Index<(usize, usize, usize)> for TensorXf {
    type Output = Float;

    fn index(&self, index: (usize, usize, usize)) -> &Float {
        &self.data[self.offset_of(index)]
    }
}

impl ops::IndexMut<(usize, usize, usize)> for TensorXf {
    fn index_mut(&mut self, index: (usize, usize, usize)) -> &mut Float {
        let offset = self.offset_of(index);
        &mut self.data[offset]
    }
}

impl TensorXf {
    pub fn new(height: usize, width: usize, channels: usize) -> Self {
        Self { data: vec![0.0; height * width * channels],
               shape: [height, width, channels] }
    }

    pub fn from_vec(shape: [usize; 3], data: Vec<Float>) -> Result<Self, BlockError> {
        let expected = shape[0] * shape[1] * shape[2];
        if data.len() != expected {
            return Err(BlockError::InvalidTensorShape { expected, actual: data.len() });
        }
        Ok(Self { data, shape })
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn height(&self) -> usize {
        self.shape[0]
    }

    pub fn width(&self) -> usize {
        self.shape[1]
    }

    pub fn channel_count(&self) -> usize {
        self.shape[2]
    }

    pub fn data(&self) -> &[Float] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [Float] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<Float> {
        self.data
    }

    /// All channels of the pixel at `(x, y)`.
    pub fn pixel(&self, x: usize, y: usize) -> &[Float] {
        let start = self.offset_of((y, x, 0));
        &self.data[start..start + self.shape[2]]
    }

    /// Copies the `width x height` window starting at `(x0, y0)`. The window
    /// is clipped to the tensor.
    pub fn crop(&self, x0: usize, y0: usize, width: usize, height: usize) -> TensorXf {
        let x1 = (x0 + width).min(self.width());
        let y1 = (y0 + height).min(self.height());
        let out_width = x1.saturating_sub(x0);
        let out_height = y1.saturating_sub(y0);
        let channels = self.channel_count();

        let mut data = Vec::with_capacity(out_width * out_height * channels);
        for y in y0..y1 {
            for x in x0..x1 {
                data.extend_from_slice(self.pixel(x, y));
            }
        }
        Self { data, shape: [out_height, out_width, channels] }
    }

    fn offset_of(&self, index: (usize, usize, usize)) -> usize {
        let (y, x, c) = index;
        assert!(y < self.shape[0] && x < self.shape[1] && c < self.shape[2],
                "tensor index {:?} out of shape {:?}", index, self.shape);
        (y * self.shape[1] + x) * self.shape[2] + c
    }
}

/// Same layout as `TensorXf`, but every cell can be accumulated into
/// through a shared reference.
#[derive(Debug, Clone)]
pub struct AtomicTensor {
    cells: Vec<AtomicFloat>,
    shape: [usize; 3],
}

impl AtomicTensor {
    pub fn zeros(shape: [usize; 3]) -> Self {
        let count = shape[0] * shape[1] * shape[2];
        let mut cells = Vec::with_capacity(count);
        cells.resize_with(count, AtomicFloat::default);
        Self { cells, shape }
    }

    pub fn shape(&self) -> [usize; 3] {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[AtomicFloat] {
        &self.cells
    }

    pub fn get(&self, y: usize, x: usize, c: usize) -> Option<&AtomicFloat> {
        if y >= self.shape[0] || x >= self.shape[1] || c >= self.shape[2] {
            return None;
        }
        self.cells.get((y * self.shape[1] + x) * self.shape[2] + c)
    }

    pub fn fill(&self, value: Float) {
        for cell in &self.cells {
            cell.store(value);
        }
    }

    pub fn to_tensor(&self) -> TensorXf {
        TensorXf { data: self.cells.iter().map(|c| c.load()).collect(),
                   shape: self.shape }
    }
}

impl From<TensorXf> for AtomicTensor {
    fn from(tensor: TensorXf) -> Self {
        Self { cells: tensor.data.into_iter().map(AtomicFloat::new).collect(),
               shape: tensor.shape }
    }
}
