// Copyright @yucwang 2026

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// A raw value sequence handed to `put` does not match the block layout.
    IncompatibleChannelCount { expected: usize, actual: usize },
    /// Two blocks with different channel layouts were merged.
    ChannelCountMismatch { target: usize, source: usize },
    InvalidSize { width: u32, height: u32 },
    InvalidTensorShape { expected: usize, actual: usize },
    EmptyChannelLayout,
    /// Positions, values and mask of a sample batch disagree in length.
    BatchLengthMismatch { expected: usize, actual: usize },
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockError::IncompatibleChannelCount { expected, actual } => {
                write!(f, "incompatible channel count: expected {}, got {}", expected, actual)
            }
            BlockError::ChannelCountMismatch { target, source } => {
                write!(f, "channel count mismatch: target has {}, source has {}", target, source)
            }
            BlockError::InvalidSize { width, height } => {
                write!(f, "invalid block size: {}x{}", width, height)
            }
            BlockError::InvalidTensorShape { expected, actual } => {
                write!(f, "invalid tensor shape: expected {} values, got {}", expected, actual)
            }
            BlockError::EmptyChannelLayout => write!(f, "an image block needs at least one channel"),
            BlockError::BatchLengthMismatch { expected, actual } => {
                write!(f, "sample batch length mismatch: expected {}, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for BlockError {}
