use crate::capture::DecodedCapture;
use crate::pair::DataPair;
use serde::Serialize;
use std::fmt;

/// Why two captures were judged different.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Difference {
    LengthMismatch { left: usize, right: usize },
    /// `index` is 1-based
    PairMismatch { index: usize, left: DataPair, right: DataPair },
    DelayMismatch { left: u64, right: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", content = "difference", rename_all = "snake_case")]
pub enum Verdict {
    Identical,
    Differ(Difference),
}

impl Verdict {
    pub fn is_identical(&self) -> bool {
        matches!(self, Verdict::Identical)
    }
}

impl fmt::Display for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difference::LengthMismatch { .. } => write!(f, "DRO files have different lengths."),
            Difference::PairMismatch { index, .. } => write!(f, "DRO files differ at pair {index}."),
            Difference::DelayMismatch { .. } => write!(f, "DRO files have non-matching delays."),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Identical => write!(f, "DRO files are identical."),
            Verdict::Differ(difference) => difference.fmt(f),
        }
    }
}

/// Compare two decoded captures.
///
/// Checks run in a fixed order and the first failing one decides the verdict:
/// retained length, then pairs in playback order, then (with `match_delays`)
/// the delay totals.
pub fn compare(a: &DecodedCapture, b: &DecodedCapture, match_delays: bool) -> Verdict {
    if a.pairs.len() != b.pairs.len() {
        return Verdict::Differ(Difference::LengthMismatch {
            left: a.pairs.len(),
            right: b.pairs.len(),
        });
    }

    if let Some((i, (&left, &right))) = a
        .pairs
        .iter()
        .zip(&b.pairs)
        .enumerate()
        .find(|(_, (left, right))| left != right)
    {
        return Verdict::Differ(Difference::PairMismatch {
            index: i + 1,
            left,
            right,
        });
    }

    if match_delays && a.total_delay_ms != b.total_delay_ms {
        return Verdict::Differ(Difference::DelayMismatch {
            left: a.total_delay_ms,
            right: b.total_delay_ms,
        });
    }

    Verdict::Identical
}
