// meshforge-export/src/tds/codec.rs
//! Fixed-width primitive encoders for the 3DS chunk format
//!
//! Every primitive knows its exact encoded byte length up front, without
//! writing. Numerics are little-endian; strings are ASCII (non-ASCII
//! characters replaced) with a single trailing zero byte. Encoding never
//! fails for values within the advertised storage range; array-length and
//! index limits are validated by the chunk layer before anything is
//! written.

use byteorder::{LittleEndian, WriteBytesExt};
use meshforge_core::types::{Vec2, Vec3};
use std::io::{self, Write};

/// Encoded size of a u16
pub const SZ_SHORT: u32 = 2;
/// Encoded size of a u32
pub const SZ_INT: u32 = 4;
/// Encoded size of an f32
pub const SZ_FLOAT: u32 = 4;

/// A value with a fixed binary encoding
pub trait Encode {
    /// Exact number of bytes `encode` will write
    fn encoded_len(&self) -> u32;

    /// Write exactly `encoded_len()` bytes
    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()>;
}

impl Encode for u16 {
    fn encoded_len(&self) -> u32 {
        SZ_SHORT
    }

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u16::<LittleEndian>(*self)
    }
}

impl Encode for u32 {
    fn encoded_len(&self) -> u32 {
        SZ_INT
    }

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(*self)
    }
}

impl Encode for f32 {
    fn encoded_len(&self) -> u32 {
        SZ_FLOAT
    }

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_f32::<LittleEndian>(*self)
    }
}

impl Encode for Vec3 {
    fn encoded_len(&self) -> u32 {
        3 * SZ_FLOAT
    }

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_f32::<LittleEndian>(self.x)?;
        writer.write_f32::<LittleEndian>(self.y)?;
        writer.write_f32::<LittleEndian>(self.z)
    }
}

impl Encode for Vec2 {
    fn encoded_len(&self) -> u32 {
        2 * SZ_FLOAT
    }

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_f32::<LittleEndian>(self.x)?;
        writer.write_f32::<LittleEndian>(self.y)
    }
}

/// Null-terminated ASCII string
///
/// Construction replaces every non-ASCII character with `?`, so the byte
/// length is always the character count plus one terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZString(Vec<u8>);

impl ZString {
    pub fn new(name: &str) -> Self {
        let bytes = name
            .chars()
            .map(|c| if c.is_ascii() { c as u8 } else { b'?' })
            .collect();
        Self(bytes)
    }

    /// The encoded bytes, terminator excluded
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Encode for ZString {
    fn encoded_len(&self) -> u32 {
        self.0.len() as u32 + 1
    }

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.0)?;
        writer.write_u8(0)
    }
}

/// One face record: three vertex indices plus a reserved trailing short,
/// fixed at zero (only 3D Studio itself ever reads it)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriFace {
    pub indices: [u16; 3],
}

impl TriFace {
    pub fn new(i0: u16, i1: u16, i2: u16) -> Self {
        Self {
            indices: [i0, i1, i2],
        }
    }
}

impl Encode for TriFace {
    fn encoded_len(&self) -> u32 {
        4 * SZ_SHORT
    }

    fn encode<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u16::<LittleEndian>(self.indices[0])?;
        writer.write_u16::<LittleEndian>(self.indices[1])?;
        writer.write_u16::<LittleEndian>(self.indices[2])?;
        writer.write_u16::<LittleEndian>(0)
    }
}
