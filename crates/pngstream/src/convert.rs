/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Conversion of pixmaps png can't store into RGB
//!
//! Png only knows grayscale and RGB, so anything else is turned into
//! RGB (RGBA if the source carries alpha) before encoding.
use alloc::vec;
use alloc::vec::Vec;

use pngstream_core::colorspace::ColorSpace;
use pngstream_core::pixmap::Pixmap;

use crate::error::PngEncodeErrors;

/// Colorspaces that can be converted to RGB before encoding
pub const CONVERTIBLE_COLORSPACES: [ColorSpace; 6] = [
    ColorSpace::BGR,
    ColorSpace::BGRA,
    ColorSpace::ARGB,
    ColorSpace::CMYK,
    ColorSpace::YCbCr,
    ColorSpace::YCCK
];

#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
#[inline]
fn blinn_8x8(in_val: u8, y: u8) -> u8 {
    let t = i32::from(in_val) * i32::from(y) + 128;
    ((t + (t >> 8)) >> 8) as u8
}

#[inline]
fn clamp(value: i32) -> u8 {
    value.clamp(0, 255) as u8
}

/// Full range (JFIF) YCbCr to RGB, in 14 bit fixed point
#[inline]
fn ycbcr_to_rgb(y: u8, cb: u8, cr: u8) -> [u8; 3] {
    const SCALE: i32 = 14;
    const HALF: i32 = 1 << (SCALE - 1);

    let y = (i32::from(y) << SCALE) + HALF;
    let cb = i32::from(cb) - 128;
    let cr = i32::from(cr) - 128;

    // 1.402, 0.344136, 0.714136, 1.772
    let r = (y + 22970 * cr) >> SCALE;
    let g = (y - 5638 * cb - 11700 * cr) >> SCALE;
    let b = (y + 29032 * cb) >> SCALE;

    [clamp(r), clamp(g), clamp(b)]
}

/// Convert one pixel to RGB(A), `out` has 3 or 4 entries
#[inline]
fn convert_pixel(colorspace: ColorSpace, px: &[u8], out: &mut [u8]) {
    match colorspace {
        ColorSpace::BGR => out.copy_from_slice(&[px[2], px[1], px[0]]),
        ColorSpace::BGRA => out.copy_from_slice(&[px[2], px[1], px[0], px[3]]),
        ColorSpace::ARGB => out.copy_from_slice(&[px[1], px[2], px[3], px[0]]),
        ColorSpace::CMYK => {
            let k = 255 - px[3];
            out.copy_from_slice(&[
                blinn_8x8(255 - px[0], k),
                blinn_8x8(255 - px[1], k),
                blinn_8x8(255 - px[2], k)
            ]);
        }
        ColorSpace::YCbCr => out.copy_from_slice(&ycbcr_to_rgb(px[0], px[1], px[2])),
        ColorSpace::YCCK => {
            // the YCC triple encodes inverted CMY, which are the RGB values before
            // the key is applied
            let [r, g, b] = ycbcr_to_rgb(px[0], px[1], px[2]);
            let k = 255 - px[3];
            out.copy_from_slice(&[blinn_8x8(r, k), blinn_8x8(g, k), blinn_8x8(b, k)]);
        }
        _ => unreachable!("colorspace {colorspace:?} was checked to be convertible")
    }
}

/// Convert `pixmap` into a tightly packed RGB or RGBA pixmap
///
/// The source is left untouched, the result owns its samples.
///
/// # Errors
/// - [`UnsupportedColorspace`](PngEncodeErrors::UnsupportedColorspace) if there is no
///   conversion for the pixmap's colorspace
/// - [`TooSmallStride`](PngEncodeErrors::TooSmallStride) if rows overlap
/// - [`NotEnoughData`](PngEncodeErrors::NotEnoughData) if the pixmap's buffer is too short
pub fn convert_to_rgb(pixmap: &Pixmap) -> Result<Pixmap<'static>, PngEncodeErrors> {
    let colorspace = pixmap.colorspace();

    if !CONVERTIBLE_COLORSPACES.contains(&colorspace) {
        return Err(PngEncodeErrors::UnsupportedColorspace(
            colorspace,
            &CONVERTIBLE_COLORSPACES
        ));
    }
    let row_size = pixmap.width() * colorspace.num_components();

    if pixmap.height() > 1 && pixmap.stride() < row_size {
        return Err(PngEncodeErrors::TooSmallStride(pixmap.stride(), row_size));
    }
    let expected = pixmap.min_samples_len();

    if pixmap.samples().len() < expected {
        return Err(PngEncodeErrors::NotEnoughData(
            expected,
            pixmap.samples().len()
        ));
    }
    let out_colorspace = if colorspace.has_alpha() {
        ColorSpace::RGBA
    } else {
        ColorSpace::RGB
    };
    let (width, height) = pixmap.dimensions();
    let in_components = colorspace.num_components();
    let out_components = out_colorspace.num_components();

    if width == 0 || height == 0 {
        return Ok(Pixmap::from_vec(Vec::new(), width, height, out_colorspace));
    }
    let mut out = vec![0; width * height * out_components];

    for (y, out_row) in out
        .chunks_exact_mut(width * out_components)
        .enumerate()
    {
        let row = pixmap
            .row(y)
            .ok_or(PngEncodeErrors::NotEnoughData(expected, pixmap.samples().len()))?;

        for (px, out_px) in row
            .chunks_exact(in_components)
            .zip(out_row.chunks_exact_mut(out_components))
        {
            convert_pixel(colorspace, px, out_px);
        }
    }
    Ok(Pixmap::from_vec(out, width, height, out_colorspace))
}
