// Copyright 2020 TwoCookingMice

use splatblock::core::config::{BlockConfig, ExecutionMode};
use splatblock::filters::filter_from_name;
use splatblock::io::exr_utils;
use splatblock::math::constants::{Float, Point2f};
use splatblock::renderers::tiled::{Renderer, TiledRenderer};

use std::env;

// Rings around the image centre over a horizontal colour ramp.
fn test_pattern(width: usize, height: usize) -> impl Fn(&Point2f) -> [Float; 3] + Sync {
    let (w, h) = (width as Float, height as Float);
    move |pos: &Point2f| {
        let dx = pos.x - 0.5 * w;
        let dy = pos.y - 0.5 * h;
        let r = (dx * dx + dy * dy).sqrt();
        let ring = if (r * 0.25) as i64 % 2 == 0 { 1.0 } else { 0.2 };
        let t = pos.x / w;
        [ring * t, ring * (1.0 - t), ring * 0.5]
    }
}

fn main() {
    env::set_var("RUST_LOG", env::var("RUST_LOG").unwrap_or_else(|_| String::from("info")));
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <output.exr> [--width N] [--height N] [--spp N] [--tile N] [--seed N] [--filter box|tent|gaussian]", args[0]);
        std::process::exit(1);
    }

    let output_path = &args[1];
    let mut width: usize = 256;
    let mut height: usize = 256;
    let mut spp: u32 = 4;
    let mut tile_size: usize = 32;
    let mut seed: u64 = 0;
    let mut filter_name = String::from("gaussian");

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--width" => {
                i += 1;
                width = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(width);
            }
            "--height" => {
                i += 1;
                height = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(height);
            }
            "--spp" => {
                i += 1;
                spp = args.get(i).and_then(|v| v.parse::<u32>().ok()).unwrap_or(spp);
            }
            "--tile" => {
                i += 1;
                tile_size = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(tile_size);
            }
            "--seed" => {
                i += 1;
                seed = args.get(i).and_then(|v| v.parse::<u64>().ok()).unwrap_or(0);
            }
            "--filter" => {
                i += 1;
                if let Some(name) = args.get(i) {
                    filter_name = name.clone();
                }
            }
            other => log::warn!("Ignoring unknown argument: {}.", other),
        }
        i += 1;
    }

    let rfilter = match filter_from_name(&filter_name) {
        Some(rfilter) => rfilter,
        None => {
            eprintln!("Unknown filter: {}", filter_name);
            std::process::exit(1);
        }
    };
    log::info!("Rendering {}x{} at {} spp with {}.", width, height, spp, rfilter.describe());

    let renderer = TiledRenderer::new(width, height, Some(rfilter))
        .with_tile_size(tile_size)
        .with_samples_per_pixel(spp)
        .with_seed(seed)
        .with_config(BlockConfig::for_mode(ExecutionMode::Scalar))
        .with_progress(true);

    let film = match renderer.render(&test_pattern(width, height)) {
        Ok(film) => film,
        Err(e) => {
            eprintln!("Render failed: {}", e);
            std::process::exit(1);
        }
    };

    let border = film.border_size() as usize;
    let image = film.tensor().crop(border, border, width, height);
    if let Err(e) = exr_utils::write_tensor_to_exr(&image, output_path) {
        eprintln!("EXR written error: {}.", e);
        std::process::exit(1);
    }
}
