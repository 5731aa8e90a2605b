use std::io::{Error, ErrorKind};

use binary_reader::{BinaryReader, Endian};

pub trait DirectorExt {
    fn read_fourcc(&mut self) -> Result<u32, Error>;
    fn read_pascal_string(&mut self) -> Result<String, Error>;
    fn read_string(&mut self, len: usize) -> Result<String, Error>;
    fn read_apple_float_80(&mut self) -> Result<f64, Error>;
    fn bytes_left(&self) -> usize;
}

impl DirectorExt for BinaryReader {
    /// Tags are stored byte-reversed in XFIR files, so reading them as a
    /// u32 in the file's endianness always yields the canonical value.
    fn read_fourcc(&mut self) -> Result<u32, Error> {
        self.read_u32()
    }

    fn bytes_left(&self) -> usize {
        self.length.saturating_sub(self.pos)
    }

    fn read_pascal_string(&mut self) -> Result<String, Error> {
        let len = self.read_u8()? as usize;
        return self.read_string(len);
    }

    fn read_string(&mut self, len: usize) -> Result<String, Error> {
        if len > self.bytes_left() {
            return Err(Error::new(
                ErrorKind::UnexpectedEof,
                format!("string of {} bytes overruns buffer at {}", len, self.pos),
            ));
        }
        let bytes = self.read_bytes(len)?;
        return Ok(latin1_to_string(bytes));
    }

    fn read_apple_float_80(&mut self) -> Result<f64, Error> {
        // Floats are stored as an "80 bit IEEE Standard 754 floating
        // point number (Standard Apple Numeric Environment [SANE] data type
        // Extended).
        let data = self.read_bytes(10)?;
        let mut buf = [0u8; 10];
        buf.copy_from_slice(data);
        return Ok(apple_float_80_to_f64(&buf));
    }
}

/// Decodes a big-endian SANE extended float: 1 sign bit, 15 exponent bits
/// and a 64-bit mantissa with an explicit integer bit.
pub fn apple_float_80_to_f64(data: &[u8; 10]) -> f64 {
    let exponent = u16::from_be_bytes([data[0], data[1]]);
    let mantissa = u64::from_be_bytes([
        data[2], data[3], data[4], data[5], data[6], data[7], data[8], data[9],
    ]);
    let sign = if exponent & 0x8000 != 0 { -1.0 } else { 1.0 };
    let exponent = exponent & 0x7fff;

    if exponent == 0 && mantissa == 0 {
        return 0.0 * sign;
    }
    if exponent == 0x7fff {
        return if mantissa << 1 == 0 {
            sign * f64::INFINITY
        } else {
            f64::NAN
        };
    }

    // 16383 is the extended format's exponent bias, and the mantissa carries
    // 63 fraction bits after the explicit integer bit.
    let fraction = mantissa as f64 / (1u64 << 63) as f64;
    sign * fraction * 2f64.powi(exponent as i32 - 16383)
}

/// Director strings are Mac Roman / Latin-1 bytes; map each byte to the code
/// point of the same value.
pub fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

pub fn endian_reader(bytes: &[u8], endian: Endian) -> BinaryReader {
    let mut reader = BinaryReader::from_u8(bytes);
    reader.set_endian(endian);
    reader
}
