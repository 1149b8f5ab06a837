// Copyright @yucwang 2026

use crate::core::coalescer::Coalescer;
use crate::core::config::BlockConfig;
use crate::core::error::BlockError;
use crate::core::rfilter::ReconstructionFilter;
use crate::core::sanitizer::{SampleDiagnostics, Sanitizer};
use crate::core::spectrum::{ChannelConverter, RgbConverter};
use crate::core::splat::{for_each_tap, to_block_local};
use crate::core::storage::Storage;
use crate::core::tensor::{AtomicTensor, TensorXf};
use crate::math::constants::{Float, Point2f, Point2i, Vector2u};

use std::borrow::Cow;
use std::sync::Arc;
use std::thread;

// Lanes handed to one worker by the uncoalesced batch path.
const LANES_PER_WORKER: usize = 64;

/// Accumulates filtered samples into a rectangular region of an image.
///
/// The logical region starts at `offset` and spans `size` pixels. When a
/// non-box filter is set and borders are enabled, the storage is padded on
/// every side so that filter spill past the region is kept and can later be
/// merged into neighbouring blocks with `put_block`.
///
/// All accumulation goes through atomic cells, so `put`, `put_spectral`,
/// `put_batch` and `put_block` only need a shared reference and may be
/// called from several threads at once.
pub struct ImageBlock<'a> {
    offset: Point2i,
    size: Vector2u,
    storage: Storage<'a>,
    rfilter: Option<Arc<dyn ReconstructionFilter>>,
    converter: Arc<dyn ChannelConverter>,
    config: BlockConfig,
    diagnostics: SampleDiagnostics,
}

fn border_for(rfilter: Option<&Arc<dyn ReconstructionFilter>>, config: &BlockConfig) -> usize {
    match rfilter {
        Some(rfilter) if config.border => rfilter.border_size() as usize,
        _ => 0,
    }
}

impl ImageBlock<'static> {
    /// Creates a zero-filled block that owns its storage.
    pub fn new(offset: Point2i,
               size: Vector2u,
               channel_count: usize,
               rfilter: Option<Arc<dyn ReconstructionFilter>>,
               config: BlockConfig) -> Result<Self, BlockError> {
        if size.x == 0 || size.y == 0 {
            return Err(BlockError::InvalidSize { width: size.x, height: size.y });
        }
        if channel_count == 0 {
            return Err(BlockError::EmptyChannelLayout);
        }
        let border_size = border_for(rfilter.as_ref(), &config);
        let storage = Storage::new(size.x as usize, size.y as usize, border_size, channel_count);
        Ok(Self::from_parts(offset, storage, rfilter, config))
    }

    /// Adopts `tensor` as the block's storage. The tensor shape includes the
    /// border implied by `rfilter` and `config`.
    pub fn from_tensor(offset: Point2i,
                       tensor: TensorXf,
                       rfilter: Option<Arc<dyn ReconstructionFilter>>,
                       config: BlockConfig) -> Result<Self, BlockError> {
        let border_size = border_for(rfilter.as_ref(), &config);
        let storage = Storage::from_owned(AtomicTensor::from(tensor), border_size)?;
        Ok(Self::from_parts(offset, storage, rfilter, config))
    }
}

impl<'a> ImageBlock<'a> {
    /// Accumulates straight into caller-managed storage. The caller keeps
    /// ownership and sees every write in place.
    pub fn with_storage(offset: Point2i,
                        tensor: &'a AtomicTensor,
                        rfilter: Option<Arc<dyn ReconstructionFilter>>,
                        config: BlockConfig) -> Result<Self, BlockError> {
        let border_size = border_for(rfilter.as_ref(), &config);
        let storage = Storage::borrowed(tensor, border_size)?;
        Ok(Self::from_parts(offset, storage, rfilter, config))
    }

    fn from_parts(offset: Point2i,
                  storage: Storage<'a>,
                  rfilter: Option<Arc<dyn ReconstructionFilter>>,
                  config: BlockConfig) -> Self {
        Self {
            offset,
            size: Vector2u::new(storage.width() as u32, storage.height() as u32),
            storage,
            rfilter,
            converter: Arc::new(RgbConverter),
            config,
            diagnostics: SampleDiagnostics::default(),
        }
    }

    /// Replaces the converter used by `put_spectral`.
    pub fn with_converter(mut self, converter: Arc<dyn ChannelConverter>) -> Self {
        self.converter = converter;
        self
    }

    pub fn clear(&mut self) {
        self.storage.clear();
    }

    pub fn set_offset(&mut self, offset: Point2i) {
        self.offset = offset;
    }

    /// Resizes the logical region. Storage is reallocated and zeroed unless
    /// the size is unchanged; a block that borrowed its storage owns the
    /// new buffer afterwards.
    pub fn set_size(&mut self, size: Vector2u) -> Result<(), BlockError> {
        if size == self.size {
            return Ok(());
        }
        if size.x == 0 || size.y == 0 {
            return Err(BlockError::InvalidSize { width: size.x, height: size.y });
        }
        self.storage = Storage::new(size.x as usize, size.y as usize,
                                    self.storage.border_size(),
                                    self.storage.channel_count());
        self.size = size;
        Ok(())
    }

    pub fn offset(&self) -> Point2i {
        self.offset
    }

    pub fn size(&self) -> Vector2u {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.x
    }

    pub fn height(&self) -> u32 {
        self.size.y
    }

    pub fn rfilter(&self) -> Option<&Arc<dyn ReconstructionFilter>> {
        self.rfilter.as_ref()
    }

    pub fn config(&self) -> &BlockConfig {
        &self.config
    }

    pub fn coalesce(&self) -> bool {
        self.config.coalesce
    }

    pub fn normalize(&self) -> bool {
        self.config.normalize
    }

    pub fn warn_invalid(&self) -> bool {
        self.config.warn_invalid
    }

    pub fn warn_negative(&self) -> bool {
        self.config.warn_negative
    }

    pub fn set_warn_invalid(&mut self, value: bool) {
        self.config.warn_invalid = value;
    }

    pub fn set_warn_negative(&mut self, value: bool) {
        self.config.warn_negative = value;
    }

    pub fn border_size(&self) -> u32 {
        self.storage.border_size() as u32
    }

    pub fn channel_count(&self) -> usize {
        self.storage.channel_count()
    }

    /// Number of samples reported as negative so far.
    pub fn negative_samples(&self) -> usize {
        self.diagnostics.negative()
    }

    /// Number of samples that carried NaN or infinite values so far.
    pub fn invalid_samples(&self) -> usize {
        self.diagnostics.invalid()
    }

    /// The raw accumulation buffer, border included.
    pub fn storage(&self) -> &AtomicTensor {
        self.storage.tensor()
    }

    /// Splats one sample given as raw channel values.
    pub fn put(&self, pos: &Point2f, values: &[Float], active: bool) -> Result<(), BlockError> {
        self.check_channels(values.len())?;
        if active {
            self.splat(pos, values, self.radiance_channels());
        }
        Ok(())
    }

    /// Splats one spectral sample. The converter output is followed by
    /// `alpha` and `weight` to form the block's channel layout.
    pub fn put_spectral(&self,
                        pos: &Point2f,
                        wavelengths: &[Float],
                        value: &[Float],
                        alpha: Float,
                        weight: Float,
                        active: bool) -> Result<(), BlockError> {
        let color_channels = self.converter.channel_count();
        self.check_channels(color_channels + 2)?;

        let mut values = vec![0.0; color_channels + 2];
        self.converter.convert(wavelengths, value, &mut values[..color_channels])?;
        values[color_channels] = alpha;
        values[color_channels + 1] = weight;

        if active {
            self.splat(pos, &values, color_channels);
        }
        Ok(())
    }

    /// Splats a batch of samples processed together. `values` holds
    /// `channel_count` entries per lane, `active` masks lanes out.
    ///
    /// With coalescing on, writes of the whole batch are summed per cell
    /// before touching storage; otherwise lanes are spread over worker
    /// threads and every contribution is its own atomic addition.
    pub fn put_batch(&self,
                     positions: &[Point2f],
                     values: &[Float],
                     active: &[bool]) -> Result<(), BlockError> {
        let channel_count = self.channel_count();
        if values.len() != positions.len() * channel_count {
            return Err(BlockError::IncompatibleChannelCount {
                expected: positions.len() * channel_count,
                actual: values.len(),
            });
        }
        if active.len() != positions.len() {
            return Err(BlockError::BatchLengthMismatch { expected: positions.len(),
                                                         actual: active.len() });
        }

        if self.config.coalesce {
            self.put_coalesced(positions, values, active);
        } else {
            self.put_parallel(positions, values, active);
        }
        Ok(())
    }

    fn put_coalesced(&self, positions: &[Point2f], values: &[Float], active: &[bool]) {
        let channel_count = self.channel_count();
        let radiance_channels = self.radiance_channels();
        let mut coalescer = Coalescer::with_capacity(positions.len() * channel_count);

        for (lane, pos) in positions.iter().enumerate() {
            if !active[lane] {
                continue;
            }
            let lane_values = &values[lane * channel_count..(lane + 1) * channel_count];
            let lane_values = self.sanitized(pos, lane_values, radiance_channels);
            let local = to_block_local(pos, &self.offset, self.storage.border_size());
            for_each_tap(&self.storage, self.rfilter.as_deref(), &local, |index, weight| {
                for (c, value) in lane_values.iter().enumerate() {
                    coalescer.push(index + c, weight * value);
                }
            });
        }

        let written = coalescer.flush(&self.storage);
        log::trace!("Coalesced batch of {} lanes into {} cell writes.", positions.len(), written);
    }

    fn put_parallel(&self, positions: &[Point2f], values: &[Float], active: &[bool]) {
        let channel_count = self.channel_count();
        let radiance_channels = self.radiance_channels();
        let workers = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        let lanes_per_worker = ((positions.len() + workers - 1) / workers).max(LANES_PER_WORKER);

        thread::scope(|scope| {
            for (chunk, chunk_positions) in positions.chunks(lanes_per_worker).enumerate() {
                let first_lane = chunk * lanes_per_worker;
                scope.spawn(move || {
                    for (i, pos) in chunk_positions.iter().enumerate() {
                        let lane = first_lane + i;
                        if !active[lane] {
                            continue;
                        }
                        let lane_values = &values[lane * channel_count..(lane + 1) * channel_count];
                        self.splat(pos, lane_values, radiance_channels);
                    }
                });
            }
        });
    }

    /// Adds every cell of `other`, border included, into this block at the
    /// position implied by the two offsets. Cells outside the overlap are
    /// left alone.
    pub fn put_block(&self, other: &ImageBlock) -> Result<(), BlockError> {
        if other.channel_count() != self.channel_count() {
            return Err(BlockError::ChannelCountMismatch { target: self.channel_count(),
                                                          source: other.channel_count() });
        }

        let source = &other.storage;
        let target = &self.storage;
        let channel_count = self.channel_count();

        // Where the source's padded (0, 0) lands in the target's padded space.
        let shift_x = (other.offset.x as i64 - source.border_size() as i64)
            - (self.offset.x as i64 - target.border_size() as i64);
        let shift_y = (other.offset.y as i64 - source.border_size() as i64)
            - (self.offset.y as i64 - target.border_size() as i64);

        let x_begin = (-shift_x).max(0);
        let x_end = (source.padded_width() as i64).min(target.padded_width() as i64 - shift_x);
        let y_begin = (-shift_y).max(0);
        let y_end = (source.padded_height() as i64).min(target.padded_height() as i64 - shift_y);
        if x_begin >= x_end || y_begin >= y_end {
            log::debug!("put_block: blocks at {:?} and {:?} do not overlap.", other.offset, self.offset);
            return Ok(());
        }

        for sy in y_begin..y_end {
            for sx in x_begin..x_end {
                let (src, dst) = match (source.index(sx, sy), target.index(sx + shift_x, sy + shift_y)) {
                    (Some(src), Some(dst)) => (src, dst),
                    _ => continue,
                };
                for c in 0..channel_count {
                    target.cell(dst + c).fetch_add(source.cell(src + c).load());
                }
            }
        }

        log::debug!("put_block: merged {}x{} pixels from block at {:?} into block at {:?}.",
                    x_end - x_begin, y_end - y_begin, other.offset, self.offset);
        Ok(())
    }

    /// Reads back what a sample at `pos` would see: the raw cell for a box
    /// filter, or the filter-weighted sum over the footprint otherwise. With
    /// `normalize` set, the filter weights are rescaled to sum to one.
    pub fn read(&self, pos: &Point2f, active: bool) -> Vec<Float> {
        let channel_count = self.channel_count();
        let mut out = vec![0.0; channel_count];
        if !active {
            return out;
        }

        let local = to_block_local(pos, &self.offset, self.storage.border_size());
        let mut total_weight = 0.0;
        for_each_tap(&self.storage, self.rfilter.as_deref(), &local, |index, weight| {
            total_weight += weight;
            for (c, value) in out.iter_mut().enumerate() {
                *value += weight * self.storage.cell(index + c).load();
            }
        });

        if self.config.normalize && total_weight != 0.0 {
            let inv_weight = 1.0 / total_weight;
            for value in out.iter_mut() {
                *value *= inv_weight;
            }
        }
        out
    }

    /// Snapshot of the whole padded buffer. With `normalize` set, every
    /// channel but the trailing weight channel is divided by that weight;
    /// pixels with zero weight come out as zero.
    pub fn tensor(&self) -> TensorXf {
        let mut tensor = self.storage.tensor().to_tensor();
        let channel_count = self.channel_count();
        if !self.config.normalize || channel_count < 2 {
            return tensor;
        }

        for pixel in tensor.data_mut().chunks_exact_mut(channel_count) {
            let (color, weight) = pixel.split_at_mut(channel_count - 1);
            let inv_weight = 1.0 / weight[0];
            for value in color.iter_mut() {
                let normalized = *value * inv_weight;
                *value = if normalized.is_finite() { normalized } else { 0.0 };
            }
        }
        tensor
    }

    fn check_channels(&self, actual: usize) -> Result<(), BlockError> {
        if actual != self.channel_count() {
            return Err(BlockError::IncompatibleChannelCount { expected: self.channel_count(),
                                                              actual });
        }
        Ok(())
    }

    // Raw samples carry a trailing weight channel that is never radiance.
    fn radiance_channels(&self) -> usize {
        match self.channel_count() {
            1 => 1,
            n => n - 1,
        }
    }

    fn sanitized<'v>(&self, pos: &Point2f, values: &'v [Float],
                     radiance_channels: usize) -> Cow<'v, [Float]> {
        let sanitizer = Sanitizer::new(self.config.warn_negative, self.config.warn_invalid);
        if !sanitizer.is_enabled() {
            return Cow::Borrowed(values);
        }
        let mut owned = values.to_vec();
        sanitizer.sanitize(pos, &mut owned, radiance_channels, &self.diagnostics);
        Cow::Owned(owned)
    }

    fn splat(&self, pos: &Point2f, values: &[Float], radiance_channels: usize) {
        let values = self.sanitized(pos, values, radiance_channels);
        let local = to_block_local(pos, &self.offset, self.storage.border_size());
        for_each_tap(&self.storage, self.rfilter.as_deref(), &local, |index, weight| {
            for (c, value) in values.iter().enumerate() {
                self.storage.cell(index + c).fetch_add(weight * value);
            }
        });
    }
}
