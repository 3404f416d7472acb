/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Inputs the encoder must refuse, and what is left behind when it does

use std::num::NonZeroU32;

use pngstream::pngstream_core::bytestream::ZWriter;
use pngstream::{
    encode_owned_pixmap_to_png, encode_pixmap_to_png, write_pixmap_as_png, EncoderStage,
    PngBandEncoder, PngEncodeErrors, PngEncoder
};
use pngstream_core::colorspace::ColorSpace;
use pngstream_core::options::EncoderOptions;
use pngstream_core::pixmap::Pixmap;

#[test]
fn test_zero_sized_images_are_empty() {
    let pixels = [1, 2, 3];

    for (width, height) in [(0, 0), (0, 10), (10, 0)] {
        let pixmap = Pixmap::new(&pixels, width, height, ColorSpace::RGB);

        assert!(encode_pixmap_to_png(&pixmap, true).unwrap().is_empty());

        let mut sink: Vec<u8> = vec![];
        assert_eq!(write_pixmap_as_png(&mut sink, &pixmap, true).unwrap(), 0);
        assert!(sink.is_empty());
    }
    // even if the colorspace can't be encoded
    let pixmap = Pixmap::from_vec(vec![], 0, 3, ColorSpace::Unknown);
    assert!(encode_owned_pixmap_to_png(pixmap, false).unwrap().is_empty());
}

#[test]
fn test_unusable_channel_counts() {
    for (channels, has_alpha) in [(2, false), (0, false), (5, true), (6, false)] {
        let mut sink: Vec<u8> = vec![];
        let result = PngBandEncoder::begin(
            &mut ZWriter::new(&mut sink),
            8,
            8,
            channels,
            has_alpha,
            true
        );

        match result {
            Err(PngEncodeErrors::UnsupportedChannels {
                channels: found, ..
            }) => assert_eq!(found, channels),
            _ => panic!("{channels} channels should be rejected")
        }
        assert!(sink.is_empty());
    }
}

#[test]
fn test_unconvertible_colorspace() {
    let pixels = [0; 5 * 4];
    let multiband = ColorSpace::MultiBand(NonZeroU32::new(5).unwrap());

    for colorspace in [ColorSpace::Unknown, multiband] {
        let pixmap = Pixmap::new(&pixels, 2, 2, colorspace);
        let mut sink: Vec<u8> = vec![];

        let result = write_pixmap_as_png(&mut sink, &pixmap, true);
        assert!(matches!(
            result,
            Err(PngEncodeErrors::UnsupportedColorspace(..))
        ));
        assert!(sink.is_empty());
    }
}

#[test]
fn test_short_buffer_writes_nothing() {
    let pixels = [0; 10 * 10 * 3 - 1];
    let pixmap = Pixmap::new(&pixels, 10, 10, ColorSpace::RGB);
    let mut sink: Vec<u8> = vec![];

    let result = write_pixmap_as_png(&mut sink, &pixmap, true);
    assert!(matches!(result, Err(PngEncodeErrors::NotEnoughData(300, 299))));
    assert!(sink.is_empty());
}

#[test]
fn test_sink_failure_is_reported() {
    let pixels = [0; 16 * 16];
    let pixmap = Pixmap::new(&pixels, 16, 16, ColorSpace::Luma);

    // too small to even hold the header
    let mut storage = [0_u8; 16];
    let result = write_pixmap_as_png(&mut storage[..], &pixmap, true);

    assert!(matches!(result, Err(PngEncodeErrors::IoError(_))));
}

#[test]
fn test_sink_failure_after_header() {
    let pixels = [0; 16 * 16];
    let pixmap = Pixmap::new(&pixels, 16, 16, ColorSpace::Luma);

    // room for signature and IHDR only, the band fails and the stream is cleaned up
    let mut storage = [0_u8; 40];
    let result = write_pixmap_as_png(&mut storage[..], &pixmap, true);

    assert!(matches!(result, Err(PngEncodeErrors::IoError(_))));
    assert_eq!(&storage[12..16], b"IHDR");
}

#[test]
fn test_failed_band_leaves_no_iend() {
    let pixels = vec![0_u8; 8 * 8];
    let mut sink: Vec<u8> = vec![];
    let mut writer = ZWriter::new(&mut sink);

    let mut encoder = PngBandEncoder::begin(&mut writer, 8, 8, 1, false, false).unwrap();
    encoder.submit_band(&mut writer, 8, 0, 4, &pixels).unwrap();

    // skips rows 4..8
    let result = encoder.submit_band(&mut writer, 8, 2, 4, &pixels);
    assert!(matches!(
        result,
        Err(PngEncodeErrors::UnexpectedBand {
            expected_row: 4,
            found_row:    8
        })
    ));
    assert_eq!(encoder.stage(), EncoderStage::Failed);
    assert!(!encoder.has_buffers());

    assert!(PngBandEncoder::finish_optional(Some(encoder), &mut writer).is_err());
    assert!(PngBandEncoder::finish_optional(None, &mut writer).is_ok());

    assert_ne!(&sink[sink.len() - 8..sink.len() - 4], b"IEND");
}

#[test]
fn test_padding_narrower_than_row() {
    let pixels = [0; 64];
    // three bytes per row needed, stride of two
    let pixmap = Pixmap::new_with_stride(&pixels, 1, 4, ColorSpace::RGB, 2);
    let mut sink: Vec<u8> = vec![];

    let result = write_pixmap_as_png(&mut sink, &pixmap, true);
    assert!(matches!(result, Err(PngEncodeErrors::TooSmallStride(2, 3))));
    assert!(sink.is_empty());

    // same for colorspaces that go through conversion
    let pixmap = Pixmap::new_with_stride(&pixels, 1, 4, ColorSpace::BGR, 2);
    let result = PngEncoder::new(&pixmap, EncoderOptions::default()).encode(&mut sink);
    assert!(matches!(result, Err(PngEncodeErrors::TooSmallStride(2, 3))));
    assert!(sink.is_empty());
}

#[test]
fn test_zero_stride_means_packed() {
    let pixels = (0..4 * 3 * 3).map(|x| x as u8).collect::<Vec<u8>>();

    let strided = Pixmap::new_with_stride(&pixels, 4, 3, ColorSpace::RGB, 0);
    let packed = Pixmap::new(&pixels, 4, 3, ColorSpace::RGB);

    assert_eq!(
        encode_pixmap_to_png(&strided, true).unwrap(),
        encode_pixmap_to_png(&packed, true).unwrap()
    );
}

#[test]
fn test_empty_band_before_last_row() {
    let pixels = [0_u8; 4 * 3];
    let mut sink: Vec<u8> = vec![];
    let mut writer = ZWriter::new(&mut sink);

    let mut encoder = PngBandEncoder::begin(&mut writer, 4, 3, 1, false, false).unwrap();
    let written = writer.bytes_written();

    let result = encoder.submit_band(&mut writer, 4, 0, 0, &[]);
    assert!(matches!(result, Err(PngEncodeErrors::EmptyBand(0))));
    assert_eq!(encoder.stage(), EncoderStage::Failed);
    assert!(!encoder.has_buffers());
    assert_eq!(writer.bytes_written(), written);

    let again = encoder.submit_band(&mut writer, 4, 0, 3, &pixels);
    assert!(matches!(again, Err(PngEncodeErrors::InvalidState(_))));
}

#[test]
fn test_errors_display() {
    let error = PngEncodeErrors::NotEnoughData(300, 299);
    let message = format!("{error}");

    assert!(message.contains("300"));
    assert!(message.contains("299"));

    let boxed: Box<dyn std::error::Error> = Box::new(error);
    assert!(!boxed.to_string().is_empty());
}
