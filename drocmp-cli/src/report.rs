//! Human-readable and JSON rendering of a comparison.

use anyhow::{Context, Result};
use drocmp_lib::header::HardwareType;
use drocmp_lib::pair::PairKind;
use drocmp_lib::{DataPair, DecodedCapture, Difference, Verdict};
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct FileSummary {
    pub path: String,
    /// Pairs taking part in the comparison
    pub pairs: usize,
    pub raw_pairs: u32,
    pub excluded_pairs: usize,
    pub total_delay_ms: u64,
    pub length_ms: u32,
    pub hardware_type: HardwareType,
}

impl FileSummary {
    fn new(path: &Path, capture: &DecodedCapture) -> Self {
        Self {
            path: path.display().to_string(),
            pairs: capture.len(),
            raw_pairs: capture.raw_pair_count(),
            excluded_pairs: capture.excluded_pairs,
            total_delay_ms: capture.total_delay_ms,
            length_ms: capture.format_header.length_ms,
            hardware_type: capture.format_header.hardware_type,
        }
    }
}

/// One side of the first differing pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PairDetail {
    pub pair: DataPair,
    pub kind: PairKind,
    /// Chip register resolved through the capture's codemap
    pub register: Option<u16>,
}

impl PairDetail {
    fn new(pair: DataPair, capture: &DecodedCapture) -> Self {
        Self {
            pair,
            kind: capture.delay_codes().classify(pair),
            register: capture.format_header.resolve_register(pair.register),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub files: [FileSummary; 2],
    pub verdict: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mismatch: Option<[PairDetail; 2]>,
}

impl Report {
    pub fn new(first: (&Path, &DecodedCapture), second: (&Path, &DecodedCapture), verdict: Verdict) -> Self {
        let mismatch = match verdict {
            Verdict::Differ(Difference::PairMismatch { left, right, .. }) => {
                Some([PairDetail::new(left, first.1), PairDetail::new(right, second.1)])
            }
            _ => None,
        };

        Self {
            files: [FileSummary::new(first.0, first.1), FileSummary::new(second.0, second.1)],
            verdict,
            mismatch,
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail
        for (i, file) in self.files.iter().enumerate() {
            let _ = writeln!(out, "File {} Pairs: {}", i + 1, file.pairs);
        }
        for (i, file) in self.files.iter().enumerate() {
            let _ = writeln!(out, "File {} Delays: {}", i + 1, file.total_delay_ms);
        }

        for (i, detail) in self.mismatch.iter().flatten().enumerate() {
            let _ = write!(out, "  File {}: {}, {}", i + 1, detail.pair, detail.kind);
            if let Some(register) = detail.register {
                let _ = write!(out, " (OPL register {:#05x})", register);
            }
            out.push('\n');
        }

        let _ = writeln!(out, "{}", self.verdict);
        out
    }

    pub fn render_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report")
    }
}
