//! Tests for malformed captures and error reporting

mod common;

use common::*;

#[test]
fn test_bad_signature() {
    let mut builder = DroBuilder::new(&[(0x20, 0x01)]);
    builder.signature = *b"dbrawopl";

    match builder.decode(false) {
        Err(DecodeError::BadSignature { found }) => assert_eq!(&found, b"dbrawopl"),
        other => panic!("Expected BadSignature, got {:?}", other),
    }
}

#[test]
fn test_bad_signature_message_shows_bytes() {
    let mut builder = DroBuilder::new(&[]);
    builder.signature = *b"RIFFWAVE";
    let err = builder.decode(false).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Not a DRO capture: signature 5249464657415645 does not match \"DBRAWOPL\""
    );
}

#[test]
fn test_unsupported_versions() {
    for version in [(0, 1), (1, 0), (2, 1), (3, 0)] {
        let mut builder = DroBuilder::new(&[]);
        builder.version = version;
        match builder.decode(false) {
            Err(DecodeError::UnsupportedVersion { major, minor }) => {
                assert_eq!((major, minor), version);
            }
            other => panic!("{:?}: Expected UnsupportedVersion, got {:?}", version, other),
        }
    }
}

#[test]
fn test_truncated_file_header() {
    let test_cases = vec![
        (vec![], "Empty file"),
        (b"DBRAW".to_vec(), "Partial signature"),
        (b"DBRAWOPL\x02\x00".to_vec(), "Missing minor version"),
    ];

    for (data, description) in test_cases {
        let len = data.len();
        match decode_bytes(Bytes::from(data), &DecodeOptions::default()) {
            Err(DecodeError::Truncated {
                section,
                expected,
                actual,
            }) => {
                assert_eq!(section, "file header", "{}", description);
                assert_eq!(expected, 12, "{}", description);
                assert_eq!(actual, len, "{}", description);
            }
            other => panic!("{}: Expected Truncated, got {:?}", description, other),
        }
    }
}

#[test]
fn test_truncated_format_header() {
    let mut data = DroBuilder::new(&[]).build();
    data.truncate(12 + 20);
    match decode_bytes(Bytes::from(data), &DecodeOptions::default()) {
        Err(DecodeError::Truncated { section, expected, actual }) => {
            assert_eq!(section, "format header");
            assert_eq!(expected, 142);
            assert_eq!(actual, 20);
        }
        other => panic!("Expected Truncated, got {:?}", other),
    }
}

#[test]
fn test_truncated_pair_data() {
    let mut builder = DroBuilder::new(&[(0x20, 0x01), (0x20, 0x02)]);
    builder.declared_pairs = Some(3);
    match builder.decode(false) {
        Err(DecodeError::Truncated { section, expected, actual }) => {
            assert_eq!(section, "pair data");
            assert_eq!(expected, 6);
            assert_eq!(actual, 4);
        }
        other => panic!("Expected Truncated, got {:?}", other),
    }
}

#[test]
fn test_half_pair_is_truncated() {
    let mut data = DroBuilder::new(&[(0x20, 0x01)]).build();
    data.pop();
    assert!(matches!(
        decode_bytes(Bytes::from(data), &DecodeOptions::default()),
        Err(DecodeError::Truncated { .. })
    ));
}

#[test]
fn test_signature_checked_before_version() {
    let mut builder = DroBuilder::new(&[]);
    builder.signature = *b"XXXXXXXX";
    builder.version = (1, 0);
    assert!(matches!(builder.decode(false), Err(DecodeError::BadSignature { .. })));
}
