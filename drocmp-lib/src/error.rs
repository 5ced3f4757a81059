use std::io;
use thiserror::Error;

/// Errors raised while decoding a DRO capture.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Not a DRO capture: signature {} does not match \"DBRAWOPL\"", hex::encode(.found))]
    BadSignature { found: [u8; 8] },

    #[error("Unsupported DRO version {major}.{minor} (only 2.0 is supported)")]
    UnsupportedVersion { major: u16, minor: u16 },

    #[error("Truncated {section}: expected {expected} bytes, got {actual}")]
    Truncated {
        section: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Delay total overflowed at pair {index}")]
    Overflow { index: usize },

    #[error("Compressed captures are not supported (compression type {0})")]
    UnsupportedCompression(u8),
}
