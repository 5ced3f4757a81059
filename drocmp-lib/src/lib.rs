pub mod capture;
pub mod compare;
pub mod constants;
pub mod error;
pub mod header;
pub mod pair;


// Re-export the decode/compare entry points for easy access
pub use capture::{DecodeOptions, DecodedCapture, decode, decode_bytes, decode_reader, decode_with};
pub use compare::{Difference, Verdict, compare};
pub use error::DecodeError;
pub use pair::{DataPair, DelayCodes};
