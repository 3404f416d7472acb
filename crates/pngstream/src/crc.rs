/*
 * Copyright (c) 2023.
 *
 * This software is free software; You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

//! CRC-32 as used by png chunks
//!
//! Polynomial `0xEDB88320`, the table is built at compile time.

static CRC_TABLE: [u32; 256] = make_crc_table();

const fn make_crc_table() -> [u32; 256] {
    let mut out = [0; 256];
    let mut n = 0;

    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;

        while k < 8 {
            if (c & 1) != 0 {
                c = 0xEDB8_8320_u32 ^ (c >> 1);
            } else {
                c >>= 1;
            }
            k += 1;
        }
        out[n] = c;
        n += 1;
    }
    out
}

/// Continue a running crc with `data`
///
/// The crc passed in is the raw register, start with `u32::MAX`
/// and invert the final value to get the checksum
pub fn calc_crc_with_bytes(data: &[u8], crc: u32) -> u32 {
    let mut crc = crc;

    for byte in data {
        let i = (crc ^ u32::from(*byte)) as u8;
        crc = CRC_TABLE[usize::from(i)] ^ (crc >> 8);
    }
    crc
}

/// Calculate the png crc of `data`
pub fn calc_crc(data: &[u8]) -> u32 {
    !calc_crc_with_bytes(data, u32::MAX)
}

#[test]
fn test_crc_check_values() {
    assert_eq!(calc_crc(b"123456789"), 0xCBF4_3926);
    // Every IEND chunk carries this crc
    assert_eq!(calc_crc(b"IEND"), 0xAE42_6082);
}

#[test]
fn test_crc_is_continuous() {
    let whole = calc_crc(b"IDAThello world");
    let split = !calc_crc_with_bytes(b"hello world", calc_crc_with_bytes(b"IDAT", u32::MAX));
    assert_eq!(whole, split);
}
