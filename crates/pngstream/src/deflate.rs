/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! A zlib stream that can be fed incrementally
//!
//! Thin wrapper over miniz_oxide's streaming compressor which
//! turns its status codes into what the band encoder cares about.
use alloc::boxed::Box;

use miniz_oxide::deflate::core::{create_comp_flags_from_zip_params, CompressorOxide};
use miniz_oxide::deflate::stream::deflate;
use miniz_oxide::{MZError, MZFlush, MZStatus};

use crate::constants::ZLIB_WINDOW_BITS;
use crate::error::PngEncodeErrors;

/// Worst case size of compressing `len` bytes in one go
///
/// This is zlib's `compressBound`, the zlib header and trailer are included.
///
/// When a stream is fed in pieces the compressor may hold back output and
/// release more than this in one call, so callers must still loop until
/// the output stops filling up.
pub(crate) const fn compress_bound(len: usize) -> usize {
    len + (len >> 12) + (len >> 14) + (len >> 25) + 13
}

/// What happened after a call to [`ZlibStream::compress`]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum StreamStatus {
    /// Input was consumed and/or output produced, the stream continues
    Progress,
    /// No input left and nothing buffered to emit without a flush
    Stalled,
    /// The zlib trailer was written, nothing more will come out
    Finished
}

/// Outcome of one compression step
#[derive(Copy, Clone, Debug)]
pub(crate) struct StepResult {
    pub(crate) consumed: usize,
    pub(crate) written:  usize,
    pub(crate) status:   StreamStatus
}

pub(crate) struct ZlibStream {
    compressor: Box<CompressorOxide>,
    finished:   bool
}

impl ZlibStream {
    /// Start a zlib stream at compression `level` (0-9)
    pub(crate) fn new(level: u8) -> ZlibStream {
        let flags = create_comp_flags_from_zip_params(i32::from(level), ZLIB_WINDOW_BITS, 0);

        ZlibStream {
            compressor: Box::new(CompressorOxide::new(flags)),
            finished:   false
        }
    }

    pub(crate) const fn is_finished(&self) -> bool {
        self.finished
    }

    /// Compress as much of `input` into `output` as fits
    ///
    /// With `finish` set, the stream is terminated once all input is consumed,
    /// callers keep calling until [`StreamStatus::Finished`] is returned.
    pub(crate) fn compress(
        &mut self, input: &[u8], output: &mut [u8], finish: bool
    ) -> Result<StepResult, PngEncodeErrors> {
        if self.finished {
            return Err(PngEncodeErrors::CompressionError(
                "compression stream already finished"
            ));
        }
        let flush = if finish { MZFlush::Finish } else { MZFlush::None };

        let result = deflate(&mut self.compressor, input, output, flush);

        let status = match (result.status, finish) {
            (Ok(MZStatus::Ok), _) => StreamStatus::Progress,
            (Ok(MZStatus::StreamEnd), true) => {
                self.finished = true;
                StreamStatus::Finished
            }
            // nothing consumed and nothing produced, zlib reports the same
            (Err(MZError::Buf), false) => StreamStatus::Stalled,
            (Ok(MZStatus::StreamEnd), false) => {
                return Err(PngEncodeErrors::CompressionError(
                    "stream ended before the final band"
                ))
            }
            (Ok(_), _) => {
                return Err(PngEncodeErrors::CompressionError(
                    "compressor returned an unexpected status"
                ))
            }
            (Err(MZError::Buf), true) => {
                return Err(PngEncodeErrors::CompressionError(
                    "compressor made no progress finishing the stream"
                ))
            }
            (Err(_), _) => {
                return Err(PngEncodeErrors::CompressionError(
                    "compressor rejected its input"
                ))
            }
        };
        Ok(StepResult {
            consumed: result.bytes_consumed,
            written: result.bytes_written,
            status
        })
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use alloc::vec::Vec;

    use crate::deflate::{compress_bound, StreamStatus, ZlibStream};

    #[test]
    fn test_bound_covers_empty_input() {
        // zlib header, empty block and adler
        assert!(compress_bound(0) >= 8);
    }

    #[test]
    fn test_stream_in_pieces_inflates_back() {
        let data = (0..10_000_u32).map(|x| (x % 251) as u8).collect::<Vec<u8>>();
        let mut stream = ZlibStream::new(6);
        let mut compressed = Vec::new();
        let mut scratch = vec![0; 64];

        for (i, piece) in data.chunks(3000).enumerate() {
            let last = i == data.len().div_ceil(3000) - 1;
            let mut input = piece;
            loop {
                let step = stream.compress(input, &mut scratch, last).unwrap();
                input = &input[step.consumed..];
                compressed.extend_from_slice(&scratch[..step.written]);

                match step.status {
                    StreamStatus::Finished | StreamStatus::Stalled => break,
                    StreamStatus::Progress if !last && step.written < scratch.len() => break,
                    StreamStatus::Progress => {}
                }
            }
        }
        assert!(stream.is_finished());

        let inflated = miniz_oxide::inflate::decompress_to_vec_zlib(&compressed).unwrap();
        assert_eq!(inflated, data);
    }
}
