// Copyright @yucwang 2026

use crate::core::error::BlockError;
use crate::math::constants::Float;

/// Turns a renderer's spectral sample into the color channels of an image
/// block. Alpha and sample weight are appended by the block itself.
pub trait ChannelConverter: Send + Sync {
    fn channel_count(&self) -> usize;

    fn convert(&self, wavelengths: &[Float], value: &[Float], out: &mut [Float])
        -> Result<(), BlockError>;
}

/// RGB renderers already carry color channels; wavelengths are ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct RgbConverter;

impl ChannelConverter for RgbConverter {
    fn channel_count(&self) -> usize {
        3
    }

    fn convert(&self, _wavelengths: &[Float], value: &[Float], out: &mut [Float])
        -> Result<(), BlockError> {
        if value.len() != 3 {
            return Err(BlockError::IncompatibleChannelCount { expected: 3, actual: value.len() });
        }
        out[..3].copy_from_slice(value);
        Ok(())
    }
}

/// Collapses RGB values to a single luminance channel.
#[derive(Debug, Default, Clone, Copy)]
pub struct LuminanceConverter;

impl ChannelConverter for LuminanceConverter {
    fn channel_count(&self) -> usize {
        1
    }

    fn convert(&self, _wavelengths: &[Float], value: &[Float], out: &mut [Float])
        -> Result<(), BlockError> {
        match value {
            [y] => out[0] = *y,
            [r, g, b] => out[0] = 0.212671 * r + 0.715160 * g + 0.072169 * b,
            _ => return Err(BlockError::IncompatibleChannelCount { expected: 3, actual: value.len() }),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_converter_copies() {
        let mut out = [0.0; 5];
        RgbConverter.convert(&[550.0], &[0.1, 0.2, 0.3], &mut out).expect("rgb");
        assert_eq!(out, [0.1, 0.2, 0.3, 0.0, 0.0]);
        assert!(RgbConverter.convert(&[], &[1.0], &mut out).is_err());
    }

    #[test]
    fn test_luminance_of_white_is_one() {
        let mut out = [0.0; 3];
        LuminanceConverter.convert(&[], &[1.0, 1.0, 1.0], &mut out).expect("luminance");
        assert!((out[0] - 1.0).abs() < 1e-5);
    }
}
