/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! Chunk layout of encoded images and equivalence of banded encoding

use nanorand::Rng;
use pngstream::pngstream_core::bytestream::ZWriter;
use pngstream::{calc_crc, EncoderStage, PngBandEncoder, PngEncoder};
use pngstream_core::colorspace::ColorSpace;
use pngstream_core::options::EncoderOptions;
use pngstream_core::pixmap::Pixmap;

const SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Split a png into `(tag, payload)` pairs, checking every crc on the way
fn read_chunks(data: &[u8]) -> Vec<([u8; 4], Vec<u8>)> {
    assert_eq!(&data[..8], &SIGNATURE);

    let mut chunks = vec![];
    let mut position = 8;

    while position < data.len() {
        let length = u32::from_be_bytes(data[position..position + 4].try_into().unwrap()) as usize;
        let tag: [u8; 4] = data[position + 4..position + 8].try_into().unwrap();
        let body = &data[position + 4..position + 8 + length];
        let crc = u32::from_be_bytes(
            data[position + 8 + length..position + 12 + length]
                .try_into()
                .unwrap()
        );
        assert_eq!(calc_crc(body), crc, "bad crc on {:?}", tag);

        chunks.push((tag, body[4..].to_vec()));
        position += length + 12;
    }
    assert_eq!(position, data.len());
    chunks
}

fn idat_stream(chunks: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
    chunks
        .iter()
        .filter(|(tag, _)| tag == b"IDAT")
        .flat_map(|(_, body)| body.iter().copied())
        .collect()
}

fn encode_with_bands(pixmap: &Pixmap, band_height: usize) -> Vec<u8> {
    let options = EncoderOptions::default().set_band_height(band_height);
    PngEncoder::new(pixmap, options).encode_to_vec().unwrap()
}

fn random_pixels(len: usize, seed: u64) -> Vec<u8> {
    let mut pixels = vec![0_u8; len];
    nanorand::WyRand::new_seed(seed).fill(&mut pixels);
    pixels
}

#[test]
fn test_chunk_order_and_header() {
    let pixels = random_pixels(300 * 2 * 4, 1);
    let pixmap = Pixmap::new(&pixels, 300, 2, ColorSpace::RGBA);
    let chunks = read_chunks(&encode_with_bands(&pixmap, 0));

    let (tag, ihdr) = &chunks[0];
    assert_eq!(tag, b"IHDR");
    assert_eq!(ihdr, &[0, 0, 1, 44, 0, 0, 0, 2, 8, 6, 0, 0, 0]);

    let (tag, iend) = chunks.last().unwrap();
    assert_eq!(tag, b"IEND");
    assert!(iend.is_empty());

    assert!(chunks[1..chunks.len() - 1]
        .iter()
        .all(|(tag, _)| tag == b"IDAT"));
    assert!(chunks.len() >= 3);
}

#[test]
fn test_color_type_bytes() {
    let cases = [
        (ColorSpace::Luma, true, 0),
        (ColorSpace::LumaA, true, 4),
        (ColorSpace::LumaA, false, 0),
        (ColorSpace::RGB, true, 2),
        (ColorSpace::RGBA, true, 6),
        (ColorSpace::RGBA, false, 2)
    ];
    for (colorspace, save_alpha, color_type) in cases {
        let pixels = vec![0; 4 * 4 * colorspace.num_components()];
        let pixmap = Pixmap::new(&pixels, 4, 4, colorspace);
        let encoded = pngstream::encode_pixmap_to_png(&pixmap, save_alpha).unwrap();

        assert_eq!(encoded[25], color_type, "{colorspace:?} save alpha {save_alpha}");
    }
}

#[test]
fn test_uniform_bands_match_single_band() {
    let (width, height) = (57, 48);
    let pixels = random_pixels(width * height * 3, 5);
    let pixmap = Pixmap::new(&pixels, width, height, ColorSpace::RGB);

    let whole = idat_stream(&read_chunks(&encode_with_bands(&pixmap, height)));

    for band_height in [1, 2, 3, 8, 16, 24] {
        let banded = idat_stream(&read_chunks(&encode_with_bands(&pixmap, band_height)));
        assert_eq!(whole, banded, "band height {band_height}");
    }
}

#[test]
fn test_uneven_bands_match_single_band() {
    let (width, height) = (21, 12);
    let stride = width * 3;
    let pixels = random_pixels(stride * height, 21);
    let pixmap = Pixmap::new(&pixels, width, height, ColorSpace::RGB);

    let whole = idat_stream(&read_chunks(&encode_with_bands(&pixmap, height)));

    // rows 0..4, 4..6, 6..8 and 8..12, none taller than the first
    let bands = [(0, 4), (2, 2), (3, 2), (2, 4)];

    let mut sink: Vec<u8> = vec![];
    let mut writer = ZWriter::new(&mut sink);
    let mut encoder = PngBandEncoder::begin(&mut writer, width, height, 3, false, false).unwrap();

    for (band_index, band_height) in bands {
        let start = band_index * band_height * stride;
        encoder
            .submit_band(&mut writer, stride, band_index, band_height, &pixels[start..])
            .unwrap();
    }
    assert_eq!(encoder.rows_consumed(), height);
    encoder.finish(&mut writer).unwrap();

    assert_eq!(idat_stream(&read_chunks(&sink)), whole);
    assert_eq!(decode_ref(&sink), pixels);
}

#[test]
fn test_short_last_band_decodes() {
    let (width, height) = (33, 31);
    let pixels = random_pixels(width * height * 2, 8);
    let pixmap = Pixmap::new(&pixels, width, height, ColorSpace::LumaA);

    let encoded = encode_with_bands(&pixmap, 4);
    assert_eq!(decode_ref(&encoded), pixels);
}

fn decode_ref(data: &[u8]) -> Vec<u8> {
    let decoder = png::Decoder::new(data);
    let mut reader = decoder.read_info().unwrap();
    let mut buf = vec![0; reader.output_buffer_size()];
    let frame = reader.next_frame(&mut buf).unwrap();
    buf.truncate(frame.buffer_size());
    buf
}

#[test]
fn test_band_encoder_by_hand() {
    let (width, height, band_height) = (20, 10, 3);
    let pixels = random_pixels(width * height * 3, 12);

    let mut sink: Vec<u8> = vec![];
    let mut writer = ZWriter::new(&mut sink);
    let mut encoder = PngBandEncoder::begin(&mut writer, width, height, 3, false, false).unwrap();

    assert_eq!(encoder.stage(), EncoderStage::HeaderWritten);
    assert!(!encoder.has_buffers());

    for (band, rows) in pixels.chunks(width * 3 * band_height).enumerate() {
        encoder
            .submit_band(&mut writer, width * 3, band, band_height, rows)
            .unwrap();

        let expected = ((band + 1) * band_height).min(height);
        assert_eq!(encoder.rows_consumed(), expected);

        if expected < height {
            assert_eq!(encoder.stage(), EncoderStage::Banding);
            assert!(encoder.has_buffers());
        }
    }
    // buffers go away with the end of the stream
    assert_eq!(encoder.stage(), EncoderStage::Complete);
    assert!(!encoder.has_buffers());

    encoder.finish(&mut writer).unwrap();

    assert_eq!(decode_ref(&sink), pixels);
}

#[test]
fn test_alpha_dropped_while_banding() {
    let (width, height) = (9, 7);
    let pixels = random_pixels(width * height * 4, 13);

    let mut sink: Vec<u8> = vec![];
    let mut writer = ZWriter::new(&mut sink);
    let mut encoder = PngBandEncoder::begin(&mut writer, width, height, 4, true, false).unwrap();

    for (band, rows) in pixels.chunks(width * 4 * 2).enumerate() {
        encoder
            .submit_band(&mut writer, width * 4, band, 2, rows)
            .unwrap();
    }
    encoder.finish(&mut writer).unwrap();

    let expected = pixels
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect::<Vec<u8>>();
    assert_eq!(decode_ref(&sink), expected);
}
