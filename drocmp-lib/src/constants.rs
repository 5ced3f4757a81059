// Layout constants for DRO v2.0 captures

/// Signature at the start of every DRO capture
pub const DRO_SIGNATURE: &[u8; 8] = b"DBRAWOPL";

/// The only supported major version
pub const DRO_VERSION_MAJOR: u16 = 2;

/// The only supported minor version
pub const DRO_VERSION_MINOR: u16 = 0;

/// Size of the file header (signature + major + minor)
pub const FILE_HEADER_SIZE: usize = 12;

/// Number of entries in the v2.0 codemap
pub const CODEMAP_SIZE: usize = 128;

/// Size of the v2.0 format header, codemap included
pub const FORMAT_HEADER_SIZE: usize = 14 + CODEMAP_SIZE;

/// Offset of the first register/value pair
pub const DATA_OFFSET: usize = FILE_HEADER_SIZE + FORMAT_HEADER_SIZE;

/// Size of one register/value pair
pub const PAIR_SIZE: usize = 2;

/// Milliseconds per step of a long delay
pub const LONG_DELAY_MULTIPLIER: u32 = 256;
