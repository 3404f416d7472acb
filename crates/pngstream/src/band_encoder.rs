/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Incremental png encoding, a band of rows at a time
//!
//! The encoder writes the header when created, then accepts consecutive
//! bands of rows, filtering and compressing each into IDAT chunks as soon
//! as compressed data is available, and finally writes the IEND chunk.
//!
//! Scratch space is allocated on the first band and sized for it, so
//! memory use is bounded by the band height, not the image height.
//!
//! ```
//! use pngstream::PngBandEncoder;
//! use pngstream::pngstream_core::bytestream::ZWriter;
//!
//! let (width, height) = (8, 10);
//! // 4 rows per band, gray pixels
//! let pixels = vec![128_u8; width * height];
//! let mut sink: Vec<u8> = vec![];
//! let mut writer = ZWriter::new(&mut sink);
//!
//! let mut encoder = PngBandEncoder::begin(&mut writer, width, height, 1, false, false).unwrap();
//!
//! for (band, rows) in pixels.chunks(width * 4).enumerate() {
//!     encoder.submit_band(&mut writer, width, band, 4, rows).unwrap();
//! }
//! encoder.finish(&mut writer).unwrap();
//! ```
use alloc::vec;
use alloc::vec::Vec;

use pngstream_core::bytestream::{ZByteWriterTrait, ZWriter};
use pngstream_core::log::{debug, trace};
use pngstream_core::options::EncoderOptions;

use crate::deflate::{compress_bound, StreamStatus, ZlibStream};
use crate::enums::{PngChunkType, PngColor};
use crate::error::PngEncodeErrors;
use crate::filters::filter_band;
use crate::headers::writers::{write_chunk, write_header, write_iend};

/// Where an encoder is in its lifetime
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum EncoderStage {
    /// The header is written, no band was submitted yet
    HeaderWritten,
    /// At least one band was compressed, more rows are expected
    Banding,
    /// Every row was compressed and the zlib stream is terminated,
    /// only [`finish`](PngBandEncoder::finish) remains
    Complete,
    /// A band failed, the stream is unusable
    Failed
}

/// Scratch space and the live stream, they only exist
/// between the first band and the end of the stream
struct BandBuffers {
    stream:          ZlibStream,
    // filtered rows for one band
    staging:         Vec<u8>,
    // compressed output of one compressor call
    compressed:      Vec<u8>,
    // rows the staging buffer can hold
    max_band_height: usize
}

impl BandBuffers {
    fn new(staging_size: usize, rows: usize, effort: u8) -> BandBuffers {
        let compressed_size = compress_bound(staging_size);

        debug!(
            "Allocating {} bytes of staging and {} bytes of compression scratch for {} rows",
            staging_size, compressed_size, rows
        );
        BandBuffers {
            stream:          ZlibStream::new(effort),
            staging:         vec![0; staging_size],
            compressed:      vec![0; compressed_size],
            max_band_height: rows
        }
    }
}

enum Stage {
    HeaderWritten,
    Banding(BandBuffers),
    Complete,
    Failed
}

/// A png encoder that receives its image in horizontal bands
///
/// Created with [`begin`](Self::begin), which writes the signature and header,
/// fed with [`submit_band`](Self::submit_band) and terminated with
/// [`finish`](Self::finish).
///
/// Each encoder owns its compression stream and buffers, they are released
/// when the encoder is finished or dropped.
pub struct PngBandEncoder {
    width:           usize,
    height:          usize,
    source_channels: usize,
    has_alpha:       bool,
    save_alpha:      bool,
    color:           PngColor,
    effort:          u8,
    rows_consumed:   usize,
    stage:           Stage
}

impl PngBandEncoder {
    /// Write the png signature and header for an image and return an
    /// encoder ready to receive rows
    ///
    /// # Arguments
    /// - writer: The sink
    /// - width, height: Image dimensions
    /// - channels: Samples per pixel in the rows that will be submitted
    /// - has_alpha: Whether the last of those samples is alpha
    /// - save_alpha: Whether to write alpha to the png, ignored if there is no alpha
    ///
    /// # Errors
    /// If the pixels are neither grayscale nor RGB, with optional alpha,
    /// [`UnsupportedChannels`](PngEncodeErrors::UnsupportedChannels) is returned before
    /// anything is written.
    pub fn begin<T: ZByteWriterTrait>(
        writer: &mut ZWriter<T>, width: usize, height: usize, channels: usize, has_alpha: bool,
        save_alpha: bool
    ) -> Result<PngBandEncoder, PngEncodeErrors> {
        let options = EncoderOptions::default().set_save_alpha(save_alpha);

        PngBandEncoder::begin_with_options(writer, width, height, channels, has_alpha, &options)
    }

    /// Same as [`begin`](Self::begin) but with alpha handling and compression
    /// effort taken from `options`
    pub fn begin_with_options<T: ZByteWriterTrait>(
        writer: &mut ZWriter<T>, width: usize, height: usize, channels: usize, has_alpha: bool,
        options: &EncoderOptions
    ) -> Result<PngBandEncoder, PngEncodeErrors> {
        // a single channel with alpha is treated as plain gray
        let has_alpha = has_alpha && channels != 1;

        let color = channels
            .checked_sub(usize::from(has_alpha))
            .and_then(|color_channels| {
                PngColor::from_channels(color_channels, has_alpha && options.save_alpha())
            })
            .ok_or(PngEncodeErrors::UnsupportedChannels {
                channels,
                has_alpha
            })?;

        write_header(width, height, color, writer)?;

        trace!(
            "Wrote png header, {}x{} {:?} from {} channels",
            width,
            height,
            color,
            channels
        );

        Ok(PngBandEncoder {
            width,
            height,
            source_channels: channels,
            has_alpha,
            save_alpha: color.has_alpha(),
            color,
            effort: options.effort(),
            rows_consumed: 0,
            stage: Stage::HeaderWritten
        })
    }

    /// Filter and compress one band of rows, writing any compressed
    /// data produced as IDAT chunks
    ///
    /// # Arguments
    /// - writer: The sink, should be the same one passed to `begin`
    /// - stride: Distance in bytes between the starts of two rows in `samples`
    /// - band_index: Position of this band, the band starts at row `band_index * band_height`
    /// - band_height: Rows per band, the last band may be cut short by the image height
    /// - samples: Pixels of the band, starting with its first row
    ///
    /// Bands must arrive in order and the first band fixes the scratch buffer size,
    /// later bands may not contain more rows than it did.
    ///
    /// Bands without rows are rejected, unless the image itself has no rows.
    ///
    /// # Errors
    /// Any error leaves the encoder in [`EncoderStage::Failed`] with its
    /// buffers released, except for calls made after the stream completed which
    /// are rejected without side effects.
    pub fn submit_band<T: ZByteWriterTrait>(
        &mut self, writer: &mut ZWriter<T>, stride: usize, band_index: usize,
        band_height: usize, samples: &[u8]
    ) -> Result<(), PngEncodeErrors> {
        let buffers = match core::mem::replace(&mut self.stage, Stage::Failed) {
            Stage::HeaderWritten => None,
            Stage::Banding(buffers) => Some(buffers),
            Stage::Complete => {
                self.stage = Stage::Complete;
                return Err(PngEncodeErrors::InvalidState(
                    "Cannot submit a band, every row was already encoded"
                ));
            }
            Stage::Failed => {
                return Err(PngEncodeErrors::InvalidState(
                    "Cannot submit a band to an encoder that failed"
                ));
            }
        };
        // on error the stage stays failed and buffers drop here
        self.stage = self.compress_band(writer, buffers, stride, band_index, band_height, samples)?;

        Ok(())
    }

    fn compress_band<T: ZByteWriterTrait>(
        &mut self, writer: &mut ZWriter<T>, buffers: Option<BandBuffers>, stride: usize,
        band_index: usize, band_height: usize, samples: &[u8]
    ) -> Result<Stage, PngEncodeErrors> {
        let start_row = band_index
            .checked_mul(band_height)
            .ok_or(PngEncodeErrors::TooLargeDimensions(band_index))?;

        if start_row != self.rows_consumed {
            return Err(PngEncodeErrors::UnexpectedBand {
                expected_row: self.rows_consumed,
                found_row:    start_row
            });
        }
        let is_final_band = start_row.saturating_add(band_height) >= self.height;
        let rows = band_height.min(self.height - start_row);

        if rows == 0 && !is_final_band {
            return Err(PngEncodeErrors::EmptyBand(start_row));
        }

        let row_size = self.width * self.source_channels;

        if rows > 1 && stride < row_size {
            return Err(PngEncodeErrors::TooSmallStride(stride, row_size));
        }
        let expected_len = if rows == 0 {
            0
        } else {
            stride
                .checked_mul(rows - 1)
                .and_then(|x| x.checked_add(row_size))
                .ok_or(PngEncodeErrors::TooLargeDimensions(rows))?
        };
        if samples.len() < expected_len {
            return Err(PngEncodeErrors::NotEnoughData(expected_len, samples.len()));
        }

        let dest_channels = self.dest_channels();
        let filtered_row_size = self.width * dest_channels + 1;

        let mut buffers = match buffers {
            Some(buffers) => buffers,
            None => {
                let staging_size = filtered_row_size
                    .checked_mul(rows)
                    .ok_or(PngEncodeErrors::TooLargeDimensions(rows))?;

                BandBuffers::new(staging_size, rows, self.effort)
            }
        };
        if rows > buffers.max_band_height {
            return Err(PngEncodeErrors::BandTooLarge(buffers.max_band_height, rows));
        }

        let filled = filter_band(
            samples,
            stride,
            self.width,
            rows,
            self.source_channels,
            dest_channels,
            &mut buffers.staging
        );

        trace!(
            "Band {} covers rows {}..{}, {} filtered bytes, final: {}",
            band_index,
            start_row,
            start_row + rows,
            filled,
            is_final_band
        );

        let BandBuffers {
            stream,
            staging,
            compressed,
            ..
        } = &mut buffers;

        let mut input = &staging[..filled];

        loop {
            let step = stream.compress(input, compressed, is_final_band)?;

            input = &input[step.consumed..];

            if step.written > 0 {
                write_chunk(PngChunkType::IDAT, &compressed[..step.written], writer)?;
            }
            let output_full = step.written == compressed.len();

            match step.status {
                StreamStatus::Finished => break,
                StreamStatus::Stalled if !is_final_band => break,
                StreamStatus::Progress if output_full => continue,
                StreamStatus::Progress if !is_final_band => break,
                _ => {
                    return Err(PngEncodeErrors::CompressionError(
                        "compressor stopped before the end of the stream"
                    ))
                }
            }
        }
        self.rows_consumed += rows;

        if is_final_band {
            debug_assert!(stream.is_finished());
            debug!("Compressed all {} rows, releasing band buffers", self.height);
            return Ok(Stage::Complete);
        }
        Ok(Stage::Banding(buffers))
    }

    /// Terminate the png, writing the IEND chunk and releasing the
    /// compression stream and buffers
    ///
    /// # Errors
    /// If not every row was compressed, either because bands are missing or a band failed,
    /// a [`CompressionError`](PngEncodeErrors::CompressionError) is returned and no chunk
    /// is written. Resources are released either way.
    pub fn finish<T: ZByteWriterTrait>(self, writer: &mut ZWriter<T>) -> Result<(), PngEncodeErrors> {
        match self.stage {
            Stage::Complete => write_iend(writer),
            Stage::HeaderWritten | Stage::Banding(_) => Err(PngEncodeErrors::CompressionError(
                "stream closed before every row was compressed"
            )),
            Stage::Failed => Err(PngEncodeErrors::CompressionError(
                "stream closed after a failed band"
            ))
        }
    }

    /// [`finish`](Self::finish) an encoder if there is one, doing nothing
    /// for `None`
    ///
    /// Allows cleanup paths to run unconditionally
    pub fn finish_optional<T: ZByteWriterTrait>(
        encoder: Option<PngBandEncoder>, writer: &mut ZWriter<T>
    ) -> Result<(), PngEncodeErrors> {
        match encoder {
            Some(encoder) => encoder.finish(writer),
            None => Ok(())
        }
    }

    pub fn stage(&self) -> EncoderStage {
        match self.stage {
            Stage::HeaderWritten => EncoderStage::HeaderWritten,
            Stage::Banding(_) => EncoderStage::Banding,
            Stage::Complete => EncoderStage::Complete,
            Stage::Failed => EncoderStage::Failed
        }
    }

    /// Whether the staging and compression buffers are currently allocated
    pub fn has_buffers(&self) -> bool {
        matches!(self.stage, Stage::Banding(_))
    }

    /// Rows filtered and compressed so far
    pub const fn rows_consumed(&self) -> usize {
        self.rows_consumed
    }

    /// The color type written in the header
    pub const fn color(&self) -> PngColor {
        self.color
    }

    /// Samples per pixel written to the png
    ///
    /// This is the source channel count, less alpha if it is being dropped
    pub const fn dest_channels(&self) -> usize {
        self.source_channels - self.has_alpha as usize + self.save_alpha as usize
    }

    pub const fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}
