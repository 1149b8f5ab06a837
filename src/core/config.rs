// Copyright @yucwang 2026

/// Which numeric backend drives the block. Only affects defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// One sample at a time on a CPU thread.
    Scalar,
    /// Wide batches of samples processed together.
    Vectorized,
}

/// Resolved behaviour flags of an image block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockConfig {
    pub border: bool,
    pub normalize: bool,
    pub coalesce: bool,
    pub warn_negative: bool,
    pub warn_invalid: bool,
}

impl BlockConfig {
    pub fn for_mode(mode: ExecutionMode) -> Self {
        let scalar = mode == ExecutionMode::Scalar;
        Self {
            border: scalar,
            normalize: false,
            coalesce: !scalar,
            warn_negative: scalar,
            warn_invalid: scalar,
        }
    }

    pub fn with_border(mut self, border: bool) -> Self {
        self.border = border;
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }

    pub fn with_coalesce(mut self, coalesce: bool) -> Self {
        self.coalesce = coalesce;
        self
    }

    pub fn with_warn_negative(mut self, warn_negative: bool) -> Self {
        self.warn_negative = warn_negative;
        self
    }

    pub fn with_warn_invalid(mut self, warn_invalid: bool) -> Self {
        self.warn_invalid = warn_invalid;
        self
    }
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self::for_mode(ExecutionMode::Scalar)
    }
}

#[cfg(test)]
mod tests {
    use super::{BlockConfig, ExecutionMode};

    #[test]
    fn test_mode_defaults() {
        let scalar = BlockConfig::for_mode(ExecutionMode::Scalar);
        assert!(scalar.border && scalar.warn_negative && scalar.warn_invalid);
        assert!(!scalar.coalesce && !scalar.normalize);

        let vectorized = BlockConfig::for_mode(ExecutionMode::Vectorized);
        assert!(!vectorized.border && !vectorized.warn_negative && !vectorized.warn_invalid);
        assert!(vectorized.coalesce && !vectorized.normalize);
    }

    #[test]
    fn test_builders_override_defaults() {
        let config = BlockConfig::default().with_normalize(true).with_border(false);
        assert!(config.normalize);
        assert!(!config.border);
        assert_eq!(BlockConfig::default(), BlockConfig::for_mode(ExecutionMode::Scalar));
    }
}
