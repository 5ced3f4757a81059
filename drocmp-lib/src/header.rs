use crate::constants::{
    CODEMAP_SIZE, DRO_SIGNATURE, DRO_VERSION_MAJOR, DRO_VERSION_MINOR, FILE_HEADER_SIZE, FORMAT_HEADER_SIZE,
};
use crate::error::DecodeError;
use bytes::Bytes;
use modular_bitfield::prelude::*;
use num_enum::{FromPrimitive, IntoPrimitive};
use serde::Serialize;
use std::fmt;
use zerocopy::byteorder::little_endian::{U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct FileHeaderRaw {
    pub signature: [u8; 8],
    pub version_major: U16,
    pub version_minor: U16,
}

#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned)]
#[repr(C)]
pub struct FormatHeaderRaw {
    pub length_pairs: U32,     // Number of register/value pairs
    pub length_ms: U32,        // Song length, informational
    pub hardware_type: u8,
    pub format: u8,
    pub compression: u8,
    pub short_delay_code: u8,
    pub long_delay_code: u8,
    pub codemap_length: u8,
    pub codemap: [u8; CODEMAP_SIZE],
}

const _: () = assert!(size_of::<FileHeaderRaw>() == FILE_HEADER_SIZE);
const _: () = assert!(size_of::<FormatHeaderRaw>() == FORMAT_HEADER_SIZE);

/// OPL chip configuration the capture was recorded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, FromPrimitive, Serialize)]
#[repr(u8)]
pub enum HardwareType {
    Opl2 = 0,
    DualOpl2 = 1,
    Opl3 = 2,

    #[num_enum(catch_all)]
    Unknown(u8),
}

impl fmt::Display for HardwareType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HardwareType::Opl2 => write!(f, "OPL2"),
            HardwareType::DualOpl2 => write!(f, "Dual OPL2"),
            HardwareType::Opl3 => write!(f, "OPL3"),
            HardwareType::Unknown(v) => write!(f, "unknown ({v})"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, FromPrimitive, Serialize)]
#[repr(u8)]
pub enum DataFormat {
    /// Commands and data interleaved in a single stream
    Interleaved = 0,

    #[num_enum(catch_all)]
    Unknown(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoPrimitive, FromPrimitive, Serialize)]
#[repr(u8)]
pub enum Compression {
    None = 0,

    #[num_enum(catch_all)]
    Unknown(u8),
}

impl Compression {
    pub fn is_compressed(&self) -> bool {
        *self != Compression::None
    }
}

/// A register code as it appears in the pair stream.
///
/// The low 7 bits index the codemap, bit 7 selects the second chip
/// (dual OPL2) or the high register set (OPL3).
#[bitfield(bytes = 1)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterCode {
    pub index: B7,
    pub high_bank: bool,
}

impl From<u8> for RegisterCode {
    fn from(code: u8) -> Self {
        RegisterCode::from_bytes([code])
    }
}

/// Validated file header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileHeader {
    pub version_major: u16,
    pub version_minor: u16,
}

impl FileHeader {
    /// Splits the file header off the front of `bytes` and validates it.
    pub fn read(bytes: &mut Bytes) -> Result<Self, DecodeError> {
        let head = take(bytes, FILE_HEADER_SIZE, "file header")?;
        let raw = FileHeaderRaw::read_from_bytes(head.as_ref()).map_err(|_| DecodeError::Truncated {
            section: "file header",
            expected: FILE_HEADER_SIZE,
            actual: head.len(),
        })?;

        if &raw.signature != DRO_SIGNATURE {
            return Err(DecodeError::BadSignature { found: raw.signature });
        }

        let header = FileHeader {
            version_major: raw.version_major.get(),
            version_minor: raw.version_minor.get(),
        };
        if header.version_major != DRO_VERSION_MAJOR || header.version_minor != DRO_VERSION_MINOR {
            return Err(DecodeError::UnsupportedVersion {
                major: header.version_major,
                minor: header.version_minor,
            });
        }
        Ok(header)
    }
}

/// The v2.0 format header with its fields decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatHeader {
    pub pair_count: u32,
    pub length_ms: u32,
    pub hardware_type: HardwareType,
    pub format: DataFormat,
    pub compression: Compression,
    pub short_delay_code: u8,
    pub long_delay_code: u8,
    pub codemap_length: u8,
    #[serde(skip)]
    pub codemap: [u8; CODEMAP_SIZE],
}

impl From<FormatHeaderRaw> for FormatHeader {
    fn from(raw: FormatHeaderRaw) -> Self {
        FormatHeader {
            pair_count: raw.length_pairs.get(),
            length_ms: raw.length_ms.get(),
            hardware_type: HardwareType::from_primitive(raw.hardware_type),
            format: DataFormat::from_primitive(raw.format),
            compression: Compression::from_primitive(raw.compression),
            short_delay_code: raw.short_delay_code,
            long_delay_code: raw.long_delay_code,
            codemap_length: raw.codemap_length,
            codemap: raw.codemap,
        }
    }
}

impl FormatHeader {
    /// Splits the format header off the front of `bytes`.
    pub fn read(bytes: &mut Bytes) -> Result<Self, DecodeError> {
        let head = take(bytes, FORMAT_HEADER_SIZE, "format header")?;
        let raw = FormatHeaderRaw::read_from_bytes(head.as_ref()).map_err(|_| DecodeError::Truncated {
            section: "format header",
            expected: FORMAT_HEADER_SIZE,
            actual: head.len(),
        })?;
        Ok(FormatHeader::from(raw))
    }

    /// Resolve a register code through the codemap.
    ///
    /// Returns the chip register, offset by 0x100 for the high bank, or `None`
    /// when the index lies outside the populated part of the codemap.
    pub fn resolve_register(&self, code: u8) -> Option<u16> {
        let code = RegisterCode::from(code);
        let index = usize::from(code.index());
        if index >= usize::from(self.codemap_length).min(CODEMAP_SIZE) {
            return None;
        }
        let bank = if code.high_bank() { 0x100 } else { 0 };
        Some(bank | u16::from(self.codemap[index]))
    }
}

fn take(bytes: &mut Bytes, size: usize, section: &'static str) -> Result<Bytes, DecodeError> {
    if bytes.len() < size {
        return Err(DecodeError::Truncated {
            section,
            expected: size,
            actual: bytes.len(),
        });
    }
    Ok(bytes.split_to(size))
}
