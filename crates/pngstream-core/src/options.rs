/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Encoder options
//!
//! This module exposes a struct holding the knobs the
//! png encoder respects.
//!
//! All options have sensible defaults so `EncoderOptions::default()`
//! produces what most callers want, a whole image compressed at the
//! default zlib level with alpha preserved.

/// Highest supported effort, maps to zlib level 9
pub const MAX_EFFORT: u8 = 9;

/// Encoder options
///
/// Setters consume and return the options, allowing them
/// to be chained
///
/// ```
/// use pngstream_core::options::EncoderOptions;
///
/// let options = EncoderOptions::default()
///     .set_effort(9)
///     .set_band_height(16);
///
/// assert_eq!(options.effort(), 9);
/// assert_eq!(options.band_height(), Some(16));
/// ```
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct EncoderOptions {
    effort:      u8,
    save_alpha:  bool,
    band_height: usize
}

impl Default for EncoderOptions {
    fn default() -> Self {
        Self {
            effort:      6,
            save_alpha:  true,
            band_height: 0
        }
    }
}

impl EncoderOptions {
    /// Create default options
    pub fn new() -> EncoderOptions {
        EncoderOptions::default()
    }

    /// Get the compression effort
    ///
    /// This is the zlib compression level, 0 means store only and 9 is the
    /// slowest but smallest.
    ///
    /// - Default value: 6
    pub const fn effort(&self) -> u8 {
        self.effort
    }

    /// Set the compression effort, values above [`MAX_EFFORT`] are clamped
    pub fn set_effort(mut self, effort: u8) -> Self {
        self.effort = effort.min(MAX_EFFORT);
        self
    }

    /// Whether the alpha channel of images carrying one is written
    ///
    /// When false, alpha is dropped while filtering and the image
    /// is stored as plain grayscale or RGB.
    ///
    /// - Default value: true
    pub const fn save_alpha(&self) -> bool {
        self.save_alpha
    }

    /// Set whether to keep the alpha channel
    pub fn set_save_alpha(mut self, yes: bool) -> Self {
        self.save_alpha = yes;
        self
    }

    /// Number of rows submitted to the encoder per band, or `None`
    /// if the image is submitted in a single band
    ///
    /// Smaller bands mean smaller scratch buffers.
    ///
    /// - Default value: `None`
    pub const fn band_height(&self) -> Option<usize> {
        if self.band_height == 0 {
            None
        } else {
            Some(self.band_height)
        }
    }

    /// Set the number of rows per band, `0` means the whole image
    pub fn set_band_height(mut self, rows: usize) -> Self {
        self.band_height = rows;
        self
    }
}

#[test]
fn test_effort_is_clamped() {
    let options = EncoderOptions::new().set_effort(200);
    assert_eq!(options.effort(), MAX_EFFORT);
    assert_eq!(EncoderOptions::new().band_height(), None);
}
