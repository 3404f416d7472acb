/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

/// The eight bytes every png stream starts with
pub(crate) const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Size of the IHDR payload
pub(crate) const IHDR_SIZE: usize = 13;

/// Largest value allowed in a chunk length and in the IHDR dimensions,
/// png stores them in 31 bits.
pub(crate) const PNG_MAX_U31: usize = (1 << 31) - 1;

/// Filter type byte prefixed to every scanline, 1 is the Sub predictor
pub(crate) const SUB_FILTER: u8 = 1;

/// The only supported bit depth
pub(crate) const BIT_DEPTH: u8 = 8;

/// zlib window size, as log2, 15 produces a zlib header
pub(crate) const ZLIB_WINDOW_BITS: i32 = 15;
