use crate::constants::LONG_DELAY_MULTIPLIER;
use serde::Serialize;
use std::fmt;
use strum_macros::Display;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout, Unaligned};

/// One register write as stored in the capture.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable, Unaligned, Serialize,
)]
#[repr(C)]
pub struct DataPair {
    pub register: u8,
    pub value: u8,
}

impl DataPair {
    pub const fn new(register: u8, value: u8) -> Self {
        Self { register, value }
    }
}

impl fmt::Display for DataPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reg={:#04x} val={:#04x}", self.register, self.value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairKind {
    #[strum(to_string = "short delay")]
    ShortDelay,
    #[strum(to_string = "long delay")]
    LongDelay,
    #[strum(to_string = "register write")]
    Register,
}

/// The two register codes a capture reserves for delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayCodes {
    pub short: u8,
    pub long: u8,
}

impl DelayCodes {
    pub const fn new(short: u8, long: u8) -> Self {
        Self { short, long }
    }

    /// Short delay is checked first, so it wins if both codes are equal.
    pub fn classify(&self, pair: DataPair) -> PairKind {
        if pair.register == self.short {
            PairKind::ShortDelay
        } else if pair.register == self.long {
            PairKind::LongDelay
        } else {
            PairKind::Register
        }
    }

    pub fn is_delay(&self, pair: DataPair) -> bool {
        self.classify(pair) != PairKind::Register
    }

    /// Delay in milliseconds contributed by `pair`: 1..=256 for a short
    /// delay, 256..=65536 for a long delay, 0 otherwise.
    pub fn delay_ms(&self, pair: DataPair) -> u32 {
        let steps = u32::from(pair.value) + 1;
        match self.classify(pair) {
            PairKind::ShortDelay => steps,
            PairKind::LongDelay => steps * LONG_DELAY_MULTIPLIER,
            PairKind::Register => 0,
        }
    }
}
