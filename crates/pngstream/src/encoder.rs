/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use alloc::vec::Vec;

use pngstream_core::bytestream::{ZByteWriterTrait, ZWriter};
use pngstream_core::log::{trace, warn};
use pngstream_core::options::EncoderOptions;
use pngstream_core::pixmap::Pixmap;

use crate::band_encoder::PngBandEncoder;
use crate::convert::convert_to_rgb;
use crate::error::PngEncodeErrors;

/// Capacity hint given to the sink before writing
const INITIAL_OUTPUT_CAPACITY: usize = 1024;

/// Encodes a whole pixmap as png
///
/// This drives a [`PngBandEncoder`] over the pixmap, in a single band
/// unless [`EncoderOptions::set_band_height`] asks for smaller ones, and converts
/// colorspaces png can't store to RGB first.
///
/// # Example
/// - Encode a 100 by 100 RGB image
///
/// ```
/// use pngstream_core::colorspace::ColorSpace;
/// use pngstream_core::options::EncoderOptions;
/// use pngstream_core::pixmap::Pixmap;
/// use pngstream::{PngEncoder, PngEncodeErrors};
///
/// const W: usize = 100;
/// const H: usize = 100;
///
/// fn main() -> Result<(), PngEncodeErrors> {
///     let pixels = std::array::from_fn::<u8, { W * H * 3 }, _>(|i| (i % 256) as u8);
///     let pixmap = Pixmap::new(&pixels, W, H, ColorSpace::RGB);
///     let encoder = PngEncoder::new(&pixmap, EncoderOptions::default());
///     let mut sink: Vec<u8> = vec![];
///     encoder.encode(&mut sink)?;
///     // write pixels, or do something
///     Ok(())
/// }
/// ```
pub struct PngEncoder<'a, 'b> {
    pixmap:  &'a Pixmap<'b>,
    options: EncoderOptions
}

impl<'a, 'b> PngEncoder<'a, 'b> {
    /// Create a new encoder which will encode `pixmap`
    pub fn new(pixmap: &'a Pixmap<'b>, options: EncoderOptions) -> PngEncoder<'a, 'b> {
        PngEncoder { pixmap, options }
    }

    /// Encode the pixmap into `sink`, returning the number of bytes written
    ///
    /// Images with a zero dimension produce no output at all.
    pub fn encode<T: ZByteWriterTrait>(&self, sink: T) -> Result<usize, PngEncodeErrors> {
        let (width, height) = self.pixmap.dimensions();

        if width == 0 || height == 0 {
            trace!("Empty {}x{} image, nothing to write", width, height);
            return Ok(0);
        }
        let mut writer = ZWriter::new(sink);
        writer.reserve(INITIAL_OUTPUT_CAPACITY)?;

        if self.pixmap.colorspace().is_png_native() {
            encode_native(self.pixmap, &self.options, &mut writer)?;
        } else {
            warn!(
                "Converting {:?} pixmap to rgb before png encoding",
                self.pixmap.colorspace()
            );
            let converted = convert_to_rgb(self.pixmap)?;
            encode_native(&converted, &self.options, &mut writer)?;
        }
        writer.flush()?;

        Ok(writer.bytes_written())
    }

    /// Encode the pixmap into a freshly allocated buffer
    ///
    /// Images with a zero dimension give an empty buffer.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, PngEncodeErrors> {
        let mut sink = Vec::new();
        self.encode(&mut sink)?;

        Ok(sink)
    }
}

/// Encode a grayscale or RGB pixmap, band by band
fn encode_native<T: ZByteWriterTrait>(
    pixmap: &Pixmap, options: &EncoderOptions, writer: &mut ZWriter<T>
) -> Result<(), PngEncodeErrors> {
    let (width, height) = pixmap.dimensions();
    let samples = pixmap.samples();
    let stride = pixmap.stride();

    // check the layout before a single byte goes out
    let row_size = width * pixmap.num_components();

    if height > 1 && stride < row_size {
        return Err(PngEncodeErrors::TooSmallStride(stride, row_size));
    }
    let expected = pixmap.min_samples_len();

    if samples.len() < expected {
        return Err(PngEncodeErrors::NotEnoughData(expected, samples.len()));
    }
    let mut encoder = PngBandEncoder::begin_with_options(
        writer,
        width,
        height,
        pixmap.num_components(),
        pixmap.has_alpha(),
        options
    )?;

    let band_height = options.band_height().unwrap_or(height);
    let bands = height.div_ceil(band_height);

    for band in 0..bands {
        let start = band * band_height * stride;
        let rows = samples.get(start..).unwrap_or_default();

        if let Err(err) = encoder.submit_band(writer, stride, band, band_height, rows) {
            // release the stream, the band error is what the caller needs to see
            if let Err(_cleanup) = encoder.finish(writer) {
                trace!("Cleanup after failed band: {:?}", _cleanup);
            }
            return Err(err);
        }
    }
    encoder.finish(writer)
}

/// Encode a pixmap into an in memory png
///
/// Colorspaces other than grayscale and RGB are converted on a copy, the
/// pixmap passed in is never modified. Images with a zero dimension give an
/// empty buffer.
///
/// # Arguments
/// - pixmap: The image
/// - save_alpha: Whether to keep the alpha channel, if the image has one
pub fn encode_pixmap_to_png(pixmap: &Pixmap, save_alpha: bool) -> Result<Vec<u8>, PngEncodeErrors> {
    let options = EncoderOptions::default().set_save_alpha(save_alpha);

    PngEncoder::new(pixmap, options).encode_to_vec()
}

/// Encode a pixmap into an in memory png, taking ownership of it
///
/// When a colorspace conversion is needed, the source is released as soon as the
/// converted copy exists so both are never alive while encoding.
pub fn encode_owned_pixmap_to_png(
    pixmap: Pixmap, save_alpha: bool
) -> Result<Vec<u8>, PngEncodeErrors> {
    if pixmap.width() == 0 || pixmap.height() == 0 || pixmap.colorspace().is_png_native() {
        return encode_pixmap_to_png(&pixmap, save_alpha);
    }
    let converted = convert_to_rgb(&pixmap)?;
    drop(pixmap);

    encode_pixmap_to_png(&converted, save_alpha)
}

/// Encode a pixmap as png into `sink`, returning bytes written
pub fn write_pixmap_as_png<T: ZByteWriterTrait>(
    sink: T, pixmap: &Pixmap, save_alpha: bool
) -> Result<usize, PngEncodeErrors> {
    let options = EncoderOptions::default().set_save_alpha(save_alpha);

    PngEncoder::new(pixmap, options).encode(sink)
}

/// Encode a pixmap as png into the file at `path`, creating or truncating it
///
/// On error the file may hold a partial png.
#[cfg(feature = "std")]
pub fn save_pixmap_as_png<P: AsRef<std::path::Path>>(
    path: P, pixmap: &Pixmap, save_alpha: bool
) -> Result<(), PngEncodeErrors> {
    let file = std::fs::File::create(path)?;
    let mut buffered = std::io::BufWriter::new(file);

    write_pixmap_as_png(&mut buffered, pixmap, save_alpha)?;

    Ok(())
}

#[test]
fn test_simple_write() {
    use pngstream_core::colorspace::ColorSpace;

    let width = 40;
    let height = 10;
    let data = alloc::vec![100; width * height];

    let pixmap = Pixmap::new(&data, width, height, ColorSpace::Luma);
    let options = EncoderOptions::default().set_band_height(3);

    let encoder = PngEncoder::new(&pixmap, options);
    let mut sink: Vec<u8> = alloc::vec![];

    let written = encoder.encode(&mut sink).unwrap();
    assert_eq!(written, sink.len());
    assert_eq!(&sink[sink.len() - 8..sink.len() - 4], b"IEND");

    // gather idat payloads, the header is 33 bytes
    let mut zlib = alloc::vec![];
    let mut position = 33;

    while position < sink.len() {
        let length = u32::from_be_bytes(sink[position..position + 4].try_into().unwrap()) as usize;
        let tag = &sink[position + 4..position + 8];

        if tag == b"IDAT" {
            zlib.extend_from_slice(&sink[position + 8..position + 8 + length]);
        }
        position += length + 12;
    }
    let inflated = miniz_oxide::inflate::decompress_to_vec_zlib(&zlib).unwrap();

    assert_eq!(inflated.len(), (width + 1) * height);
    // every row is a sub filtered constant
    for row in inflated.chunks_exact(width + 1) {
        assert_eq!(row[0], 1);
        assert_eq!(row[1], 100);
        assert!(row[2..].iter().all(|x| *x == 0));
    }
}
