/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use pngstream_core::bytestream::{ZByteWriterTrait, ZWriter};
use pngstream_core::log::trace;

use crate::constants::{BIT_DEPTH, IHDR_SIZE, PNG_MAX_U31, PNG_SIGNATURE};
use crate::crc::calc_crc_with_bytes;
use crate::enums::{PngChunkType, PngColor};
use crate::error::PngEncodeErrors;

/// Write a single chunk
///
/// The format is
/// length - chunk type - [data] -  crc chunk
///
/// where length is that of data only and the crc covers the chunk type and data.
pub(crate) fn write_chunk<T: ZByteWriterTrait>(
    chunk: PngChunkType, data: &[u8], writer: &mut ZWriter<T>
) -> Result<(), PngEncodeErrors> {
    if data.len() > PNG_MAX_U31 {
        return Err(PngEncodeErrors::TooLargeChunk(data.len()));
    }
    let name = chunk.to_tag();

    trace!("Writing {:?} chunk of {} bytes", chunk, data.len());
    // write length
    writer.write_u32_be_err(data.len() as u32)?;
    // write chunk name
    writer.write_const_bytes(&name)?;
    // write chunk data
    writer.write_all(data)?;
    // crc is a continuous function, so first crc the chunk name
    // and then crc that with the chunk bytes passing in the previous crc

    // equal to crc((chunk.chunk + data) ,u32::MAX))
    let crc = calc_crc_with_bytes(&name, u32::MAX);
    let crc = !calc_crc_with_bytes(data, crc);
    writer.write_u32_be_err(crc)?;
    Ok(())
}

/// Write the png signature followed by the IHDR chunk
pub(crate) fn write_header<T: ZByteWriterTrait>(
    width: usize, height: usize, color: PngColor, writer: &mut ZWriter<T>
) -> Result<(), PngEncodeErrors> {
    for dimension in [width, height] {
        if dimension > PNG_MAX_U31 {
            return Err(PngEncodeErrors::TooLargeDimensions(dimension));
        }
    }
    let mut ihdr = [0_u8; IHDR_SIZE];
    // write width and height
    ihdr[0..4].copy_from_slice(&(width as u32).to_be_bytes());
    ihdr[4..8].copy_from_slice(&(height as u32).to_be_bytes());
    ihdr[8] = BIT_DEPTH;
    ihdr[9] = color.to_int();
    // compression, filter and interlace method, all zero

    writer.write_const_bytes(&PNG_SIGNATURE)?;
    write_chunk(PngChunkType::IHDR, &ihdr, writer)
}

// iend carries no data
pub(crate) fn write_iend<T: ZByteWriterTrait>(
    writer: &mut ZWriter<T>
) -> Result<(), PngEncodeErrors> {
    write_chunk(PngChunkType::IEND, &[], writer)
}
