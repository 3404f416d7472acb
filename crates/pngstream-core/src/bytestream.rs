/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A simple implementation of a bytestream writer
//! with endian aware writes
//!
//! The encoder never seeks, it only appends, so the sink
//! abstraction is a single trait, [`ZByteWriterTrait`], wrapped
//! by [`ZWriter`] which adds big endian integer writes and
//! keeps count of bytes written.
pub use traits::ZByteWriterTrait;
pub use writer::{ZByteIoError, ZWriter};

mod traits;
mod writer;
