/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A strided 8 bit raster
//!
//! Pixels are stored interleaved, row after row, with each row
//! taking `stride` bytes, of which the first `width*components`
//! are meaningful.
use alloc::borrow::Cow;
use alloc::vec::Vec;

use crate::colorspace::ColorSpace;

/// An 8 bit interleaved image, either borrowing its samples
/// or owning them
#[derive(Clone, Debug)]
pub struct Pixmap<'a> {
    samples:    Cow<'a, [u8]>,
    width:      usize,
    height:     usize,
    stride:     usize,
    colorspace: ColorSpace
}

impl<'a> Pixmap<'a> {
    /// Create a pixmap borrowing tightly packed samples
    ///
    /// # Arguments
    /// - samples: Pixel data, should be at least `width*height*colorspace components` long
    /// - width, height: Image dimensions
    /// - colorspace: How samples are interpreted
    pub fn new(samples: &'a [u8], width: usize, height: usize, colorspace: ColorSpace) -> Pixmap<'a> {
        let stride = width * colorspace.num_components();
        Pixmap::new_with_stride(samples, width, height, colorspace, stride)
    }

    /// Create a pixmap borrowing samples whose rows are `stride` bytes apart
    ///
    /// A stride of zero means rows are tightly packed.
    pub fn new_with_stride(
        samples: &'a [u8], width: usize, height: usize, colorspace: ColorSpace, stride: usize
    ) -> Pixmap<'a> {
        let stride = if stride == 0 {
            width * colorspace.num_components()
        } else {
            stride
        };
        Pixmap {
            samples: Cow::Borrowed(samples),
            width,
            height,
            stride,
            colorspace
        }
    }

    /// Create a pixmap owning tightly packed samples
    pub fn from_vec(
        samples: Vec<u8>, width: usize, height: usize, colorspace: ColorSpace
    ) -> Pixmap<'static> {
        Pixmap {
            samples: Cow::Owned(samples),
            width,
            height,
            stride: width * colorspace.num_components(),
            colorspace
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// Return a tuple of `(width, height)`
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Distance in bytes between the start of two successive rows
    pub const fn stride(&self) -> usize {
        self.stride
    }

    pub const fn colorspace(&self) -> ColorSpace {
        self.colorspace
    }

    /// Number of interleaved samples per pixel
    pub const fn num_components(&self) -> usize {
        self.colorspace.num_components()
    }

    pub const fn has_alpha(&self) -> bool {
        self.colorspace.has_alpha()
    }

    /// Raw samples, including any row padding
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    /// The number of bytes needed to hold every meaningful sample
    /// given the stride, the last row is not required to be padded.
    pub fn min_samples_len(&self) -> usize {
        if self.height == 0 {
            return 0;
        }
        self.stride * (self.height - 1) + self.width * self.num_components()
    }

    /// Return the meaningful samples of row `y`, or `None` if the
    /// row is out of bounds or the buffer is too short to hold it
    pub fn row(&self, y: usize) -> Option<&[u8]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.stride;
        self.samples
            .get(start..start + self.width * self.num_components())
    }
}
