/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Scanline filtering before compression
//!
//! Every row is written with the Sub predictor, each sample is replaced by its
//! difference to the same channel of the pixel on its left.
//!
//! The source and destination can have different numbers of components per
//! pixel, trailing source components (alpha) not present in the destination are
//! skipped, so alpha stripping and filtering happen in one pass.
use crate::constants::SUB_FILTER;

/// Filter a single row with the Sub filter
///
/// # Arguments
/// - `row`: Raw samples of the row, `width*src_components` long
/// - `out`: Destination, `width*dest_components + 1` long, the first byte receives
///   the filter type
/// - `src_components`: Samples per pixel in `row`
/// - `dest_components`: Samples per pixel to write, `<= src_components`
pub(crate) fn filter_sub_row(
    row: &[u8], out: &mut [u8], src_components: usize, dest_components: usize
) {
    debug_assert!(dest_components <= src_components);

    let Some((filter, out)) = out.split_first_mut() else {
        return;
    };
    *filter = SUB_FILTER;

    if src_components == 0 || dest_components == 0 {
        return;
    }
    let mut previous: Option<&[u8]> = None;

    for (pixel, out_px) in row
        .chunks_exact(src_components)
        .zip(out.chunks_exact_mut(dest_components))
    {
        match previous {
            // first pixel is stored as is
            None => out_px.copy_from_slice(&pixel[..dest_components]),
            Some(left) => {
                for ((dst, current), left) in out_px.iter_mut().zip(pixel).zip(left) {
                    *dst = current.wrapping_sub(*left);
                }
            }
        }
        previous = Some(pixel);
    }
}

/// Filter `rows` rows starting at the beginning of `samples` into `out`
///
/// Rows in `samples` are `stride` bytes apart, filtered rows are packed
/// back to back in `out`.
///
/// Returns the number of bytes written to `out`
pub(crate) fn filter_band(
    samples: &[u8], stride: usize, width: usize, rows: usize, src_components: usize,
    dest_components: usize, out: &mut [u8]
) -> usize {
    let row_size = width * src_components;
    let filtered_row_size = width * dest_components + 1;

    for (y, out_row) in out
        .chunks_exact_mut(filtered_row_size)
        .take(rows)
        .enumerate()
    {
        let start = y * stride;
        let row = &samples[start..start + row_size];

        filter_sub_row(row, out_row, src_components, dest_components);
    }
    filtered_row_size * rows
}

#[cfg(test)]
mod tests {
    use crate::filters::{filter_band, filter_sub_row};

    #[test]
    fn test_sub_filter_gray() {
        let row = [10, 12, 11, 200];
        let mut out = [0; 5];
        filter_sub_row(&row, &mut out, 1, 1);
        // 11-12 and 200-11 wrap
        assert_eq!(out, [1, 10, 2, 255, 189]);
    }

    #[test]
    fn test_sub_filter_drops_alpha() {
        // two gray+alpha pixels
        let row = [50, 255, 60, 0];
        let mut out = [0; 3];
        filter_sub_row(&row, &mut out, 2, 1);
        assert_eq!(out, [1, 50, 10]);
    }

    #[test]
    fn test_sub_filter_keeps_alpha() {
        let row = [1, 2, 3, 4, 2, 4, 6, 8];
        let mut out = [0; 9];
        filter_sub_row(&row, &mut out, 4, 4);
        assert_eq!(out, [1, 1, 2, 3, 4, 1, 2, 3, 4]);
    }

    #[test]
    fn test_band_skips_row_padding() {
        // 2x2 gray, stride 3, padding byte is garbage
        let samples = [5, 7, 99, 1, 1];
        let mut out = [0; 6];
        let written = filter_band(&samples, 3, 2, 2, 1, 1, &mut out);
        assert_eq!(written, 6);
        assert_eq!(out, [1, 5, 2, 1, 1, 0]);
    }
}
