/* Copyright 2020 @TwoCookingMice */

use crate::core::tensor::TensorXf;

use exr::prelude::write_rgb_file;

// Write the first three channels of a tensor as an RGB OpenEXR image.
// Single-channel tensors are written as grey.
pub fn write_tensor_to_exr(tensor: &TensorXf, file_path: &str) -> Result<(), exr::error::Error> {
    log::info!("Starting writing openexr images: {}.", file_path);

    let rgb = |x: usize, y: usize| {
        let pixel = tensor.pixel(x, y);
        match pixel.len() {
            0 => (0.0, 0.0, 0.0),
            1 | 2 => (pixel[0], pixel[0], pixel[0]),
            _ => (pixel[0], pixel[1], pixel[2]),
        }
    };
    write_rgb_file(file_path, tensor.width(), tensor.height(), rgb)?;

    log::info!("EXR written to: {}.", file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::write_tensor_to_exr;
    use crate::core::tensor::TensorXf;

    #[test]
    fn test_write_tensor_to_exr() {
        let mut path = std::env::temp_dir();
        path.push("splatblock_write_tensor.exr");
        let mut tensor = TensorXf::new(2, 3, 5);
        tensor[(1, 2, 0)] = 1.0;

        write_tensor_to_exr(&tensor, path.to_str().unwrap()).expect("write exr");
        let written = std::fs::metadata(&path).expect("exr exists");
        assert!(written.len() > 0);
    }
}
