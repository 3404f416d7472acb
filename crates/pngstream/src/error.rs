/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Errors possible during encoding.
use core::fmt::{Debug, Display, Formatter};

use pngstream_core::bytestream::ZByteIoError;
use pngstream_core::colorspace::ColorSpace;

/// Errors encountered during encoding
///
/// An encode either completes or returns one of these, bytes already
/// handed to the sink before the error should be treated as garbage.
pub enum PngEncodeErrors {
    /// The pixel layout is neither grayscale nor RGB once
    /// the alpha channel is accounted for
    ///
    /// Raised before anything is written to the sink.
    UnsupportedChannels {
        /// Channels per pixel of the source
        channels:  usize,
        /// Whether the last of those channels was alpha
        has_alpha: bool
    },
    /// Unsupported colorspace
    ///
    /// The first argument is the colorspace encountered
    /// The second argument is list of colorspaces that can be converted
    UnsupportedColorspace(ColorSpace, &'static [ColorSpace]),
    /// Too large dimensions
    ///
    /// The dimension cannot be stored in a png header
    TooLargeDimensions(usize),
    /// A chunk payload is longer than png allows
    TooLargeChunk(usize),
    /// The compressor returned a status it shouldn't have
    CompressionError(&'static str),
    /// The pixel buffer is too small for the rows described
    ///
    /// # Arguments
    /// - 1st argument is the number of bytes we expected
    /// - 2nd argument is number of bytes actually present
    NotEnoughData(usize, usize),
    /// The row stride is smaller than a row of samples
    ///
    /// # Arguments
    /// - 1st argument is the stride given
    /// - 2nd argument is the length of one row
    TooSmallStride(usize, usize),
    /// A band is taller than the first band, which sized the scratch buffers
    ///
    /// # Arguments
    /// - 1st argument is the maximum number of rows a band may have
    /// - 2nd argument is the number of rows in the rejected band
    BandTooLarge(usize, usize),
    /// A band holds no rows although rows remain to be encoded
    ///
    /// The argument is the first row not yet encoded
    EmptyBand(usize),
    /// A band doesn't start where the previous one ended
    UnexpectedBand {
        /// The first row not yet encoded
        expected_row: usize,
        /// The first row of the band submitted
        found_row:    usize
    },
    /// The encoder cannot accept this call in its current stage
    InvalidState(&'static str),
    /// The sink failed
    IoError(ZByteIoError)
}

impl Debug for PngEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            PngEncodeErrors::UnsupportedChannels {
                channels,
                has_alpha
            } => {
                writeln!(
                    f,
                    "Pixmap must be grayscale or rgb to write as png, found {channels} channels (alpha: {has_alpha})"
                )
            }
            PngEncodeErrors::UnsupportedColorspace(found, supported) => {
                writeln!(f, "Cannot encode image with colorspace {found:?} into png, supported ones are {supported:?}")
            }
            PngEncodeErrors::TooLargeDimensions(found) => {
                writeln!(
                    f,
                    "Too large image dimensions {found}, png can only encode dimensions up to {}",
                    crate::constants::PNG_MAX_U31
                )
            }
            PngEncodeErrors::TooLargeChunk(found) => {
                writeln!(
                    f,
                    "Chunk payload of {found} bytes exceeds the png limit of {} bytes",
                    crate::constants::PNG_MAX_U31
                )
            }
            PngEncodeErrors::CompressionError(reason) => {
                writeln!(f, "Compression error: {reason}")
            }
            PngEncodeErrors::NotEnoughData(expected, found) => {
                writeln!(
                    f,
                    "Not enough pixel data, expected at least {expected} bytes but found {found}"
                )
            }
            PngEncodeErrors::TooSmallStride(stride, row) => {
                writeln!(f, "Stride {stride} is smaller than a row of {row} bytes")
            }
            PngEncodeErrors::BandTooLarge(limit, found) => {
                writeln!(
                    f,
                    "Band of {found} rows exceeds the first band's height of {limit} rows"
                )
            }
            PngEncodeErrors::EmptyBand(row) => {
                writeln!(f, "Band holds no rows, but rows from {row} onwards remain")
            }
            PngEncodeErrors::UnexpectedBand {
                expected_row,
                found_row
            } => {
                writeln!(
                    f,
                    "Band starts at row {found_row} but the next row to encode is {expected_row}"
                )
            }
            PngEncodeErrors::InvalidState(reason) => {
                writeln!(f, "{reason}")
            }
            PngEncodeErrors::IoError(v) => {
                writeln!(f, "I/O error {:?}", v)
            }
        }
    }
}

impl Display for PngEncodeErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PngEncodeErrors {}

impl From<ZByteIoError> for PngEncodeErrors {
    fn from(value: ZByteIoError) -> Self {
        Self::IoError(value)
    }
}

#[cfg(feature = "std")]
impl From<std::io::Error> for PngEncodeErrors {
    fn from(value: std::io::Error) -> Self {
        Self::IoError(ZByteIoError::from(value))
    }
}
