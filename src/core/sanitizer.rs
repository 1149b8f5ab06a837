// Copyright @yucwang 2026

use crate::math::constants::{Float, Point2f, NEGATIVE_TOLERANCE};

use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleCheck {
    Valid,
    /// Below zero on a channel that carries radiance.
    Negative,
    /// NaN or infinite.
    Invalid,
}

pub fn classify(value: Float, radiance: bool) -> SampleCheck {
    if !value.is_finite() {
        SampleCheck::Invalid
    } else if radiance && value < NEGATIVE_TOLERANCE {
        SampleCheck::Negative
    } else {
        SampleCheck::Valid
    }
}

/// Running count of samples the sanitizer complained about.
#[derive(Debug, Default)]
pub struct SampleDiagnostics {
    negative: AtomicUsize,
    invalid: AtomicUsize,
}

impl SampleDiagnostics {
    pub fn negative(&self) -> usize {
        self.negative.load(Ordering::Relaxed)
    }

    pub fn invalid(&self) -> usize {
        self.invalid.load(Ordering::Relaxed)
    }

    pub fn reset(&self) {
        self.negative.store(0, Ordering::Relaxed);
        self.invalid.store(0, Ordering::Relaxed);
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SanitizeReport {
    pub negative: usize,
    pub invalid: usize,
}

impl SanitizeReport {
    pub fn is_clean(&self) -> bool {
        self.negative == 0 && self.invalid == 0
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Sanitizer {
    pub warn_negative: bool,
    pub warn_invalid: bool,
}

impl Sanitizer {
    pub fn new(warn_negative: bool, warn_invalid: bool) -> Self {
        Self { warn_negative, warn_invalid }
    }

    pub fn is_enabled(&self) -> bool {
        self.warn_negative || self.warn_invalid
    }

    /// Checks `values` in place. The first `radiance_channels` entries are
    /// tested for negativity; non-finite entries are zeroed when invalid
    /// samples are being watched. Negative values are kept.
    pub fn sanitize(&self,
                    pos: &Point2f,
                    values: &mut [Float],
                    radiance_channels: usize,
                    diagnostics: &SampleDiagnostics) -> SanitizeReport {
        let mut report = SanitizeReport::default();
        if !self.is_enabled() {
            return report;
        }

        let original: Vec<Float> = values.to_vec();
        for (idx, value) in values.iter_mut().enumerate() {
            match classify(*value, idx < radiance_channels) {
                SampleCheck::Invalid if self.warn_invalid => {
                    *value = 0.0;
                    report.invalid += 1;
                }
                SampleCheck::Negative if self.warn_negative => {
                    report.negative += 1;
                }
                _ => {}
            }
        }

        if report.invalid > 0 {
            diagnostics.invalid.fetch_add(1, Ordering::Relaxed);
            log::warn!("Invalid sample value at ({}, {}): {:?}, non-finite channels set to zero.",
                       pos.x, pos.y, original);
        }
        if report.negative > 0 {
            diagnostics.negative.fetch_add(1, Ordering::Relaxed);
            log::warn!("Negative sample value at ({}, {}): {:?}.", pos.x, pos.y, original);
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(1.0, true), SampleCheck::Valid);
        assert_eq!(classify(-1e-6, true), SampleCheck::Valid);
        assert_eq!(classify(-0.5, true), SampleCheck::Negative);
        assert_eq!(classify(-0.5, false), SampleCheck::Valid);
        assert_eq!(classify(Float::NAN, false), SampleCheck::Invalid);
        assert_eq!(classify(Float::NEG_INFINITY, true), SampleCheck::Invalid);
    }

    #[test]
    fn test_invalid_values_are_zeroed() {
        let diagnostics = SampleDiagnostics::default();
        let sanitizer = Sanitizer::new(false, true);
        let mut values = [1.0, Float::NAN, Float::INFINITY, 0.5];
        let report = sanitizer.sanitize(&Point2f::new(1.0, 2.0), &mut values, 3, &diagnostics);

        assert_eq!(values, [1.0, 0.0, 0.0, 0.5]);
        assert_eq!(report, SanitizeReport { negative: 0, invalid: 2 });
        assert_eq!(diagnostics.invalid(), 1);
        assert_eq!(diagnostics.negative(), 0);
    }

    #[test]
    fn test_negative_values_are_kept() {
        let diagnostics = SampleDiagnostics::default();
        let sanitizer = Sanitizer::new(true, true);
        let mut values = [-2.0, 1.0, -1.0];
        let report = sanitizer.sanitize(&Point2f::new(0.0, 0.0), &mut values, 2, &diagnostics);

        assert_eq!(values, [-2.0, 1.0, -1.0]);
        assert_eq!(report.negative, 1);
        assert_eq!(diagnostics.negative(), 1);
    }

    #[test]
    fn test_disabled_sanitizer_passes_through() {
        let diagnostics = SampleDiagnostics::default();
        let sanitizer = Sanitizer::new(false, false);
        let mut values = [Float::NAN, -3.0];
        let report = sanitizer.sanitize(&Point2f::new(0.0, 0.0), &mut values, 2, &diagnostics);

        assert!(report.is_clean());
        assert!(values[0].is_nan());
        assert_eq!(diagnostics.invalid(), 0);
    }
}
