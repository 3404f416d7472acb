/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Core routines shared by the pngstream encoder
//!
//! This crate provides a set of core types used by the
//! banded png encoder and whoever feeds it pixels.
//!
//! It currently contains
//!
//! - A bytestream writer with endian aware writes, generic over the sink
//! - Colorspace information shared by images
//! - A simple strided raster type, [`Pixmap`](pixmap::Pixmap)
//! - Encoder options
//!
//! This library is `#[no_std]` with `alloc` needed for defining `Vec`
//! which we need for owned pixel storage.
//!
//!
//! # Features
//!  - `std`: Allows anything implementing `std::io::Write` to be used as a sink.
//!
//!  - `log`: Routes the crate's [log](crate::log) macros to the `log` crate, otherwise they
//!     compile to nothing.
//!
#![cfg_attr(not(feature = "std"), no_std)]
#![macro_use]
extern crate alloc;

pub mod bytestream;
pub mod colorspace;
pub mod log;
pub mod options;
pub mod pixmap;
