/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A streaming png encoder
//!
//! This features a png writer for 8 bit grayscale and RGB images, with or without
//! alpha, which compresses pixels a band of rows at a time instead of
//! holding the whole compressed image in memory.
//!
//! # Features
//! - Bounded memory, scratch space is sized by the band, not the image
//! - Compressed data is written out as IDAT chunks as soon as it is produced
//! - Works with any sink implementing [`ZByteWriterTrait`](pngstream_core::bytestream::ZByteWriterTrait),
//!   including `std::io::Write` types with the `std` feature
//!
//! # Usage
//! Add the library to `Cargo.toml`
//!
//! ```toml
//! pngstream="0.1"
//! ```
//!
//! #### Encode a whole image
//!
//!```
//! use pngstream::encode_pixmap_to_png;
//! use pngstream_core::colorspace::ColorSpace;
//! use pngstream_core::pixmap::Pixmap;
//!
//! let pixels = vec![0_u8; 20 * 20 * 4];
//! let pixmap = Pixmap::new(&pixels, 20, 20, ColorSpace::RGBA);
//!
//! let png = encode_pixmap_to_png(&pixmap, true).unwrap();
//! ```
//!
//! Colorspaces png can't store, like BGR or CMYK, are converted to RGB on a copy
//! before encoding.
//!
//! #### Encode in bands
//!
//! When rows are produced incrementally, use [`PngBandEncoder`] directly: start it with
//! [`PngBandEncoder::begin`], submit bands in order with [`PngBandEncoder::submit_band`]
//! and end with [`PngBandEncoder::finish`].
//!
//! # Alternatives
//! - [png](https://crates.io/crates/png) crate
//!
#![cfg_attr(not(feature = "std"), no_std)]
#![allow(clippy::op_ref, clippy::identity_op)]
extern crate alloc;

pub use band_encoder::{EncoderStage, PngBandEncoder};
pub use convert::{convert_to_rgb, CONVERTIBLE_COLORSPACES};
#[cfg(feature = "std")]
pub use encoder::save_pixmap_as_png;
pub use encoder::{encode_owned_pixmap_to_png, encode_pixmap_to_png, write_pixmap_as_png, PngEncoder};
pub use enums::{PngChunkType, PngColor};
pub use crc::calc_crc;
pub use error::PngEncodeErrors;
pub use pngstream_core;

mod band_encoder;
mod constants;
mod convert;
mod crc;
mod deflate;
mod encoder;
mod enums;
pub mod error;
mod filters;
mod headers;
