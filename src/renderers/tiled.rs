// Copyright @yucwang 2021

use crate::core::config::BlockConfig;
use crate::core::error::BlockError;
use crate::core::imageblock::ImageBlock;
use crate::core::rfilter::ReconstructionFilter;
use crate::core::rng::LcgRng;
use crate::math::constants::{Point2i, Vector2u};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

pub use super::renderer::{Renderer, SampleSource};

// RGB, alpha and sample weight.
pub const FILM_CHANNELS: usize = 5;

/// Splits the image into square tiles, renders each tile into its own
/// image block on a worker thread and merges finished tiles into one film
/// block.
pub struct TiledRenderer {
    width: usize,
    height: usize,
    tile_size: usize,
    samples_per_pixel: u32,
    seed: u64,
    rfilter: Option<Arc<dyn ReconstructionFilter>>,
    config: BlockConfig,
    show_progress: bool,
}

impl TiledRenderer {
    pub fn new(width: usize, height: usize, rfilter: Option<Arc<dyn ReconstructionFilter>>) -> Self {
        Self {
            width,
            height,
            tile_size: 32,
            samples_per_pixel: 1,
            seed: 0,
            rfilter,
            config: BlockConfig::default(),
            show_progress: false,
        }
    }

    pub fn with_tile_size(mut self, tile_size: usize) -> Self {
        self.tile_size = tile_size.max(1);
        self
    }

    pub fn with_samples_per_pixel(mut self, samples_per_pixel: u32) -> Self {
        self.samples_per_pixel = samples_per_pixel;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_config(mut self, config: BlockConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    fn render_tile(&self, source: &dyn SampleSource,
                   x0: usize, y0: usize, x1: usize, y1: usize) -> Result<ImageBlock<'static>, BlockError> {
        let tile = ImageBlock::new(Point2i::new(x0 as i32, y0 as i32),
                                   Vector2u::new((x1 - x0) as u32, (y1 - y0) as u32),
                                   FILM_CHANNELS,
                                   self.rfilter.clone(),
                                   self.config.with_normalize(false))?;
        let spp = match self.samples_per_pixel {
            0 => 1,
            v => v,
        };

        for y in y0..y1 {
            for x in x0..x1 {
                let seed = ((self.seed & 0xFFF) << 32)
                    | (((y as u64) & 0xFFFF) << 16)
                    | ((x as u64) & 0xFFFF);
                let mut rng = LcgRng::new(seed);
                for _sample in 0..spp {
                    let pos = rng.next_in_pixel(x, y);
                    let rgb = source.radiance(&pos);
                    tile.put_spectral(&pos, &[], &rgb, 1.0, 1.0, true)?;
                }
            }
        }
        Ok(tile)
    }
}

impl Renderer for TiledRenderer {
    fn render(&self, source: &dyn SampleSource) -> Result<ImageBlock<'static>, BlockError> {
        let film = ImageBlock::new(Point2i::new(0, 0),
                                   Vector2u::new(self.width as u32, self.height as u32),
                                   FILM_CHANNELS,
                                   self.rfilter.clone(),
                                   self.config.with_normalize(true))?;

        let (width, height, block_size) = (self.width, self.height, self.tile_size);
        let blocks_x = (width + block_size - 1) / block_size;
        let blocks_y = (height + block_size - 1) / block_size;
        let total_blocks = blocks_x * blocks_y;

        let progress = if self.show_progress {
            ProgressBar::new(total_blocks as u64)
        } else {
            ProgressBar::hidden()
        };
        progress.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} blocks")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );

        let next_block = Arc::new(AtomicUsize::new(0));
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let (tx, rx) = mpsc::channel::<Result<ImageBlock<'static>, BlockError>>();

        let merged: Result<usize, BlockError> = thread::scope(|scope| {
            for _ in 0..thread_count {
                let next_block = Arc::clone(&next_block);
                let tx = tx.clone();
                scope.spawn(move || {
                    loop {
                        let block_index = next_block.fetch_add(1, Ordering::Relaxed);
                        if block_index >= total_blocks {
                            break;
                        }

                        let bx = block_index % blocks_x;
                        let by = block_index / blocks_x;
                        let x0 = bx * block_size;
                        let y0 = by * block_size;
                        let x1 = (x0 + block_size).min(width);
                        let y1 = (y0 + block_size).min(height);

                        let tile = self.render_tile(source, x0, y0, x1, y1);
                        let failed = tile.is_err();
                        if tx.send(tile).is_err() || failed {
                            break;
                        }
                    }
                });
            }

            drop(tx);
            let mut merged = 0;
            for tile in rx.iter() {
                film.put_block(&tile?)?;
                merged += 1;
                progress.inc(1);
            }
            Ok(merged)
        });
        progress.finish_and_clear();

        let merged = merged?;
        log::info!("Merged {} of {} tiles into a {}x{} film.", merged, total_blocks, width, height);
        if film.invalid_samples() > 0 || film.negative_samples() > 0 {
            log::warn!("Film received {} invalid and {} negative samples.",
                       film.invalid_samples(), film.negative_samples());
        }
        Ok(film)
    }
}
