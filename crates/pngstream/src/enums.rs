/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

#![allow(clippy::upper_case_acronyms)]

/// The chunks this encoder writes
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngChunkType {
    IHDR,
    IDAT,
    IEND
}

impl PngChunkType {
    /// The four ascii bytes naming the chunk
    pub const fn to_tag(self) -> [u8; 4] {
        match self {
            Self::IHDR => *b"IHDR",
            Self::IDAT => *b"IDAT",
            Self::IEND => *b"IEND"
        }
    }
}

/// Png color types the encoder can produce
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PngColor {
    Luma,
    LumaA,
    RGB,
    RGBA
}

impl PngColor {
    /// Pick the color type for an image with `color_channels` color
    /// samples per pixel, optionally followed by alpha
    ///
    /// Returns `None` for anything that isn't grayscale or RGB
    pub const fn from_channels(color_channels: usize, alpha: bool) -> Option<PngColor> {
        match (color_channels, alpha) {
            (1, false) => Some(Self::Luma),
            (1, true) => Some(Self::LumaA),
            (3, false) => Some(Self::RGB),
            (3, true) => Some(Self::RGBA),
            _ => None
        }
    }

    /// Number of samples per pixel written to the stream
    pub const fn num_components(self) -> usize {
        match self {
            Self::Luma => 1,
            Self::LumaA => 2,
            Self::RGB => 3,
            Self::RGBA => 4
        }
    }

    /// The IHDR color type byte
    pub const fn to_int(self) -> u8 {
        match self {
            Self::Luma => 0,
            Self::RGB => 2,
            Self::LumaA => 4,
            Self::RGBA => 6
        }
    }

    pub const fn has_alpha(self) -> bool {
        matches!(self, Self::LumaA | Self::RGBA)
    }
}
