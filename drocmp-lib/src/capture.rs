//! Decoding of DRO v2.0 captures into comparable pair sequences.

use crate::constants::{FILE_HEADER_SIZE, FORMAT_HEADER_SIZE, PAIR_SIZE};
use crate::error::DecodeError;
use crate::header::{FileHeader, FormatHeader};
use crate::pair::{DataPair, DelayCodes};
use bytes::Bytes;
use serde::Serialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, warn};
use zerocopy::FromBytes;

/// Options controlling how a capture is decoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Drop short and long delay pairs from the retained sequence.
    pub exclude_delay_pairs: bool,
    /// Fail instead of decoding a capture flagged as compressed.
    pub reject_compressed: bool,
}

impl DecodeOptions {
    pub fn with_exclude_delay_pairs(mut self, exclude: bool) -> Self {
        self.exclude_delay_pairs = exclude;
        self
    }

    pub fn with_reject_compressed(mut self, reject: bool) -> Self {
        self.reject_compressed = reject;
        self
    }
}

/// A fully decoded capture, ready for comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedCapture {
    pub file_header: FileHeader,
    pub format_header: FormatHeader,
    /// Pairs kept for comparison, in playback order
    pub pairs: Vec<DataPair>,
    /// Sum of all delays in the stream, including excluded pairs
    pub total_delay_ms: u64,
    /// Pairs dropped because they encode delays
    pub excluded_pairs: usize,
}

impl DecodedCapture {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Pair count announced by the format header
    pub fn raw_pair_count(&self) -> u32 {
        self.format_header.pair_count
    }

    pub fn delay_codes(&self) -> DelayCodes {
        DelayCodes::new(
            self.format_header.short_delay_code,
            self.format_header.long_delay_code,
        )
    }
}

/// Decode the capture at `path`.
pub fn decode(path: impl AsRef<Path>, exclude_delay_pairs: bool) -> Result<DecodedCapture, DecodeError> {
    decode_with(path, &DecodeOptions::default().with_exclude_delay_pairs(exclude_delay_pairs))
}

pub fn decode_with(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<DecodedCapture, DecodeError> {
    let path = path.as_ref();
    debug!(path = %path.display(), "Opening capture");
    let file = File::open(path)?;
    decode_reader(BufReader::new(file), options)
}

/// Decode a capture from a stream.
///
/// Each section is validated before the next one is read, and nothing past
/// the last declared pair is consumed.
pub fn decode_reader<R: Read>(mut reader: R, options: &DecodeOptions) -> Result<DecodedCapture, DecodeError> {
    let mut head = read_section(&mut reader, FILE_HEADER_SIZE, "file header")?;
    let file_header = FileHeader::read(&mut head)?;

    let mut head = read_section(&mut reader, FORMAT_HEADER_SIZE, "format header")?;
    let format_header = FormatHeader::read(&mut head)?;
    check_format(&format_header, options)?;

    let body = read_section(&mut reader, pair_data_size(&format_header), "pair data")?;
    decode_pairs(file_header, format_header, &body, options)
}

/// Decode a capture held in memory.
pub fn decode_bytes(mut bytes: Bytes, options: &DecodeOptions) -> Result<DecodedCapture, DecodeError> {
    let file_header = FileHeader::read(&mut bytes)?;
    let format_header = FormatHeader::read(&mut bytes)?;
    check_format(&format_header, options)?;

    let expected = pair_data_size(&format_header);
    if bytes.len() < expected {
        return Err(DecodeError::Truncated {
            section: "pair data",
            expected,
            actual: bytes.len(),
        });
    }
    if bytes.len() > expected {
        debug!(trailing = bytes.len() - expected, "Ignoring bytes after the last pair");
    }

    let body = bytes.split_to(expected);
    decode_pairs(file_header, format_header, &body, options)
}

fn read_section<R: Read>(reader: &mut R, size: usize, section: &'static str) -> Result<Bytes, DecodeError> {
    let mut buf = Vec::new();
    reader.by_ref().take(size as u64).read_to_end(&mut buf)?;
    if buf.len() < size {
        return Err(DecodeError::Truncated {
            section,
            expected: size,
            actual: buf.len(),
        });
    }
    Ok(Bytes::from(buf))
}

fn pair_data_size(format_header: &FormatHeader) -> usize {
    (format_header.pair_count as usize).saturating_mul(PAIR_SIZE)
}

fn check_format(format_header: &FormatHeader, options: &DecodeOptions) -> Result<(), DecodeError> {
    debug!(
        pairs = format_header.pair_count,
        length_ms = format_header.length_ms,
        hardware = %format_header.hardware_type,
        short_delay = format_header.short_delay_code,
        long_delay = format_header.long_delay_code,
        "Decoded DRO v2.0 header"
    );

    if format_header.compression.is_compressed() {
        let value: u8 = format_header.compression.into();
        if options.reject_compressed {
            return Err(DecodeError::UnsupportedCompression(value));
        }
        warn!(compression = value, "Capture is flagged as compressed, decoding it as raw pairs");
    }
    Ok(())
}

fn decode_pairs(
    file_header: FileHeader,
    format_header: FormatHeader,
    body: &[u8],
    options: &DecodeOptions,
) -> Result<DecodedCapture, DecodeError> {
    let raw_pairs = <[DataPair]>::ref_from_bytes(body).map_err(|_| DecodeError::Truncated {
        section: "pair data",
        expected: pair_data_size(&format_header),
        actual: body.len(),
    })?;

    let codes = DelayCodes::new(format_header.short_delay_code, format_header.long_delay_code);
    let mut pairs = Vec::with_capacity(raw_pairs.len());
    let mut total_delay_ms = 0u64;
    let mut excluded_pairs = 0usize;

    for (index, &pair) in raw_pairs.iter().enumerate() {
        total_delay_ms = accumulate_delay(total_delay_ms, codes.delay_ms(pair), index)?;

        if options.exclude_delay_pairs && codes.is_delay(pair) {
            excluded_pairs += 1;
        } else {
            pairs.push(pair);
        }
    }

    debug!(
        retained = pairs.len(),
        excluded = excluded_pairs,
        total_delay_ms,
        "Decoded pair stream"
    );

    Ok(DecodedCapture {
        file_header,
        format_header,
        pairs,
        total_delay_ms,
        excluded_pairs,
    })
}

/// Add one pair's delay to the running total. `index` is 0-based.
pub(crate) fn accumulate_delay(total: u64, delay_ms: u32, index: usize) -> Result<u64, DecodeError> {
    total
        .checked_add(u64::from(delay_ms))
        .ok_or(DecodeError::Overflow { index: index + 1 })
}
