//! Common test utilities and shared imports

// Allow unused imports and dead code since this is a shared module
// used across multiple test files - not all items are used in every test file
#[allow(unused_imports)]
pub use bytes::Bytes;
#[allow(unused_imports)]
pub use drocmp_lib::capture::{DecodeOptions, DecodedCapture, decode, decode_bytes, decode_reader, decode_with};
#[allow(unused_imports)]
pub use drocmp_lib::compare::{Difference, Verdict, compare};
#[allow(unused_imports)]
pub use drocmp_lib::error::DecodeError;
#[allow(unused_imports)]
pub use drocmp_lib::pair::DataPair;

pub const SHORT_DELAY: u8 = 0x3D;
pub const LONG_DELAY: u8 = 0x3E;

/// Builds DRO v2.0 capture bytes for tests.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub struct DroBuilder {
    pub signature: [u8; 8],
    pub version: (u16, u16),
    pub compression: u8,
    pub short_delay: u8,
    pub long_delay: u8,
    pub pairs: Vec<(u8, u8)>,
    /// Overrides the pair count written to the header
    pub declared_pairs: Option<u32>,
}

#[allow(dead_code)]
impl DroBuilder {
    pub fn new(pairs: &[(u8, u8)]) -> Self {
        Self {
            signature: *b"DBRAWOPL",
            version: (2, 0),
            compression: 0,
            short_delay: SHORT_DELAY,
            long_delay: LONG_DELAY,
            pairs: pairs.to_vec(),
            declared_pairs: None,
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&self.signature);
        out.extend_from_slice(&self.version.0.to_le_bytes());
        out.extend_from_slice(&self.version.1.to_le_bytes());
        let count = self.declared_pairs.unwrap_or(self.pairs.len() as u32);
        out.extend_from_slice(&count.to_le_bytes());
        out.extend_from_slice(&0u32.to_le_bytes());
        out.extend_from_slice(&[0, 0, self.compression, self.short_delay, self.long_delay, 0]);
        out.extend_from_slice(&[0u8; 128]);
        for &(register, value) in &self.pairs {
            out.push(register);
            out.push(value);
        }
        out
    }

    pub fn bytes(&self) -> Bytes {
        Bytes::from(self.build())
    }

    pub fn decode(&self, exclude_delay_pairs: bool) -> Result<DecodedCapture, DecodeError> {
        let options = DecodeOptions::default().with_exclude_delay_pairs(exclude_delay_pairs);
        decode_bytes(self.bytes(), &options)
    }
}

/// Decode hex string to bytes for testing
#[allow(dead_code)]
pub fn hex_to_bytes(hex_data: &str) -> Bytes {
    Bytes::from(hex::decode(hex_data).expect("Failed to decode hex"))
}

/// A minimal capture with three register writes and no delays:
/// (0x20,0x01) (0x40,0x10) (0xB0,0x31)
#[allow(dead_code)]
pub const THREE_PAIR_CAPTURE: &str = concat!(
    "44425241574f504c02000000",
    "03000000e8030000",
    "0000003d3e00",
    "0000000000000000000000000000000000000000000000000000000000000000",
    "0000000000000000000000000000000000000000000000000000000000000000",
    "0000000000000000000000000000000000000000000000000000000000000000",
    "0000000000000000000000000000000000000000000000000000000000000000",
    "20014010b031",
);

/// Route library logs through the test harness; honours RUST_LOG.
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
