/*
 * Copyright (c) 2023.
 *
 * This software is free software;
 *
 * You can redistribute it or modify it under terms of the MIT, Apache License or Zlib license
 */

use core::fmt::{Debug, Display, Formatter};

use crate::bytestream::ZByteWriterTrait;

mod no_std_writer;
mod std_writer;

/// Errors raised by a sink
pub enum ZByteIoError {
    #[cfg(feature = "std")]
    StdIoError(std::io::Error),
    // requested, available
    NotEnoughBuffer(usize, usize)
}

impl Debug for ZByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            #[cfg(feature = "std")]
            ZByteIoError::StdIoError(err) => {
                writeln!(f, "Underlying I/O error {}", err)
            }
            ZByteIoError::NotEnoughBuffer(expected, found) => {
                writeln!(
                    f,
                    "Not enough buffer to write {expected} bytes, buffer size is {found}"
                )
            }
        }
    }
}

impl Display for ZByteIoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "{:?}", self)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ZByteIoError {}

#[cfg(feature = "std")]
impl From<std::io::Error> for ZByteIoError {
    fn from(value: std::io::Error) -> Self {
        ZByteIoError::StdIoError(value)
    }
}

/// Encapsulates a simple byte writer with
/// support for endian aware writes
///
/// The writer only appends to the underlying sink and keeps
/// count of the number of bytes it has written.
pub struct ZWriter<T: ZByteWriterTrait> {
    buffer:        T,
    bytes_written: usize
}

impl<T: ZByteWriterTrait> ZWriter<T> {
    /// Create a new writer for the sink
    ///
    /// # Example
    /// ```
    /// use pngstream_core::bytestream::ZWriter;
    /// let mut storage: Vec<u8> = vec![];
    ///
    /// let writer = ZWriter::new(&mut storage);
    /// assert_eq!(writer.bytes_written(), 0); // no bytes were written
    /// ```
    pub fn new(data: T) -> ZWriter<T> {
        ZWriter {
            buffer:        data,
            bytes_written: 0
        }
    }

    /// Return the number of bytes the writer has written
    ///
    /// ```
    /// use pngstream_core::bytestream::ZWriter;
    /// let mut sink: Vec<u8> = vec![];
    /// let mut stream = ZWriter::new(&mut sink);
    /// stream.write_u32_be_err(10).unwrap();
    /// assert_eq!(stream.bytes_written(), 4);
    /// ```
    pub const fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Write all bytes from `buf` into the bytestream and return
    /// an error if not all bytes could be written
    pub fn write_all(&mut self, buf: &[u8]) -> Result<(), ZByteIoError> {
        self.buffer.write_all_bytes(buf)?;
        self.bytes_written += buf.len();
        Ok(())
    }

    /// Write a fixed compile time known number of bytes to the sink
    ///
    /// This is provided since some implementations can optimize such writes by eliminating
    /// some redundant code.
    pub fn write_const_bytes<const N: usize>(&mut self, byte: &[u8; N]) -> Result<(), ZByteIoError> {
        self.buffer.write_const_bytes(byte)?;
        self.bytes_written += N;
        Ok(())
    }

    /// Write a single byte into the bytestream or error out
    /// if the sink refuses it
    pub fn write_u8_err(&mut self, byte: u8) -> Result<(), ZByteIoError> {
        self.write_const_bytes(&[byte])
    }

    /// Ensure bytes written reach the sink
    pub fn flush(&mut self) -> Result<(), ZByteIoError> {
        self.buffer.flush_bytes()
    }

    /// Tell the underlying sink how many more bytes we expect to write
    ///
    /// This is a hint, sinks are free to ignore it
    pub fn reserve(&mut self, additional: usize) -> Result<(), ZByteIoError> {
        self.buffer.reserve_capacity(additional)
    }
}

enum Mode {
    // Big endian
    BE,
    // Little Endian
    LE
}

macro_rules! write_single_type {
    ($name:tt,$name2:tt,$name3:tt,$int_type:tt) => {
        impl<T: ZByteWriterTrait> ZWriter<T> {
            #[inline(always)]
            fn $name(&mut self, byte: $int_type, mode: Mode) -> Result<(), ZByteIoError> {
                // get bits, depending on mode.
                // This should be inlined and not visible in
                // the generated binary since mode is a compile
                // time constant.
                let bytes = match mode {
                    Mode::BE => byte.to_be_bytes(),
                    Mode::LE => byte.to_le_bytes()
                };
                self.write_const_bytes(&bytes)
            }

            #[doc=concat!("Write ",stringify!($int_type)," as a big endian integer")]
            #[doc=concat!("Returning an error if the underlying sink cannot support a ",stringify!($int_type)," write.")]
            #[inline]
            pub fn $name2(&mut self, byte: $int_type) -> Result<(), ZByteIoError> {
                self.$name(byte, Mode::BE)
            }

            #[doc=concat!("Write ",stringify!($int_type)," as a little endian integer")]
            #[doc=concat!("Returning an error if the underlying sink cannot support a ",stringify!($int_type)," write.")]
            #[inline]
            pub fn $name3(&mut self, byte: $int_type) -> Result<(), ZByteIoError> {
                self.$name(byte, Mode::LE)
            }
        }
    };
}

write_single_type!(write_u32_inner_or_die, write_u32_be_err, write_u32_le_err, u32);

write_single_type!(write_u16_inner_or_die, write_u16_be_err, write_u16_le_err, u16);

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use crate::bytestream::ZWriter;

    #[test]
    fn test_big_endian_writes() {
        let mut sink: Vec<u8> = Vec::new();
        let mut writer = ZWriter::new(&mut sink);

        writer.write_u32_be_err(0x0102_0304).unwrap();
        writer.write_u16_le_err(0x0506).unwrap();
        writer.write_u8_err(7).unwrap();
        assert_eq!(writer.bytes_written(), 7);

        assert_eq!(sink, [1, 2, 3, 4, 6, 5, 7]);
    }

    #[test]
    fn test_fixed_buffer_runs_out() {
        let mut storage = [0_u8; 6];
        let mut writer = ZWriter::new(&mut storage[..]);

        assert!(writer.write_u32_be_err(u32::MAX).is_ok());
        assert!(writer.write_u32_be_err(u32::MAX).is_err());
    }
}
