/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Image Colorspace information and manipulation utilities.

/// All possible image colorspaces
///
/// Only the grayscale and RGB ones can be written to png
/// directly, the rest have to be converted first.
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ColorSpace {
    /// Red, Green , Blue
    RGB,
    /// Red, Green, Blue, Alpha
    RGBA,
    /// YUV colorspace, full range JFIF coefficients
    YCbCr,
    /// Grayscale colorspace
    Luma,
    /// Grayscale with alpha colorspace
    LumaA,
    /// YCbCr with an extra key(black) channel, Adobe style
    YCCK,
    /// Cyan , Magenta, Yellow, Black
    CMYK,
    /// Blue, Green, Red
    BGR,
    /// Blue, Green, Red, Alpha
    BGRA,
    /// The colorspace is unknown
    Unknown,
    /// Alpha Red Green Blue
    ARGB,
    /// Multiple arbitrary image channels.
    ///
    /// Multi-band images are assumed to be n-channel images with no alpha,
    /// they carry no color interpretation and thus cannot be converted.
    MultiBand(core::num::NonZeroU32)
}

impl ColorSpace {
    /// Number of color channels present for a certain colorspace
    ///
    /// E.g. RGB returns 3 since it contains R,G and B colors to make up a pixel
    pub const fn num_components(&self) -> usize {
        match self {
            Self::RGB | Self::YCbCr | Self::BGR => 3,
            Self::RGBA | Self::YCCK | Self::CMYK | Self::BGRA | Self::ARGB => 4,
            Self::Luma => 1,
            Self::LumaA => 2,
            Self::Unknown => 0,
            Self::MultiBand(n) => n.get() as usize
        }
    }

    pub const fn has_alpha(&self) -> bool {
        matches!(self, Self::RGBA | Self::LumaA | Self::BGRA | Self::ARGB)
    }

    /// Returns true if pixels in this colorspace can be written
    /// to png without any conversion
    ///
    /// These are grayscale and RGB, with or without a trailing alpha channel
    pub const fn is_png_native(&self) -> bool {
        matches!(self, Self::Luma | Self::LumaA | Self::RGB | Self::RGBA)
    }

    /// Returns the position of the alpha pixel in a pixel
    ///
    ///
    /// That is for an array of color components say `[0,1,2,3]` if the image has an alpha channel
    /// and is in RGBA format, this will return `Some(3)`, indicating alpha is found in the third index
    /// but if the image is in `ARGB` format, it will return `Some(0)` indicating alpha is found in  
    /// index 0
    ///
    /// If an image doesn't have an alpha channel returns `None`
    ///
    pub const fn alpha_position(&self) -> Option<usize> {
        match self {
            ColorSpace::RGBA => Some(3),
            ColorSpace::LumaA => Some(1),
            ColorSpace::BGRA => Some(3),
            ColorSpace::ARGB => Some(0),
            _ => None
        }
    }
}

#[test]
fn test_alpha_and_components_agree() {
    use core::num::NonZeroU32;

    for colorspace in [
        ColorSpace::RGB,
        ColorSpace::RGBA,
        ColorSpace::Luma,
        ColorSpace::LumaA,
        ColorSpace::BGRA,
        ColorSpace::ARGB,
        ColorSpace::CMYK,
        ColorSpace::MultiBand(NonZeroU32::new(5).unwrap())
    ] {
        if let Some(pos) = colorspace.alpha_position() {
            assert!(colorspace.has_alpha());
            assert!(pos < colorspace.num_components());
        } else {
            assert!(!colorspace.has_alpha());
        }
    }
    assert!(ColorSpace::LumaA.is_png_native());
    assert!(!ColorSpace::BGR.is_png_native());
}
