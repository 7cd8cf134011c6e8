use crate::nmea::Codec;
use crate::nmea::CodecError;

use bytes::BytesMut;

use tokio_util::codec::Decoder;

#[test]
fn test_codec_same_read() {
    let mut codec = Codec::default();

    // these two lines appeared in a single read from the GPS device
    let mut bytes_mut = BytesMut::new();
    bytes_mut.extend_from_slice(
        b"$GPGGA,025134.000,4735.2887,N,12217.9631,W,1,10,0.90,27.1,M,-17.3,M,,*61\r\n",
    );
    bytes_mut.extend_from_slice(b"$GPGLL,4735.2887,N,12217.9631,W,025134.000,A,A*40\r\n");

    let first = codec.decode(&mut bytes_mut).unwrap().unwrap();
    let second = codec.decode(&mut bytes_mut).unwrap().unwrap();

    assert_eq!(
        "$GPGGA,025134.000,4735.2887,N,12217.9631,W,1,10,0.90,27.1,M,-17.3,M,,*61",
        first
    );
    assert_eq!("$GPGLL,4735.2887,N,12217.9631,W,025134.000,A,A*40", second);
    assert_eq!(None, codec.decode(&mut bytes_mut).unwrap());
}

#[test]
fn test_codec_partial_read() {
    let mut codec = Codec::default();

    let mut bytes_mut = BytesMut::new();
    bytes_mut.extend_from_slice(b"$GPZDA,201530.00,04,");

    assert_eq!(None, codec.decode(&mut bytes_mut).unwrap());

    bytes_mut.extend_from_slice(b"07,2002,00,00*60\r\n");

    assert_eq!(
        Some("$GPZDA,201530.00,04,07,2002,00,00*60".to_string()),
        codec.decode(&mut bytes_mut).unwrap()
    );
}

#[test]
fn test_codec_invalid_utf8() {
    let mut codec = Codec::default();

    let mut bytes_mut = BytesMut::new();
    bytes_mut.extend_from_slice(b"\xFF$GPZDA\n");

    assert_eq!(
        Some("\u{FFFD}$GPZDA".to_string()),
        codec.decode(&mut bytes_mut).unwrap()
    );
}

#[test]
fn test_codec_overflow() {
    let mut codec = Codec::new(10);

    let mut bytes_mut = BytesMut::new();
    bytes_mut.extend_from_slice(b"$GPGGA,025134");

    match codec.decode(&mut bytes_mut) {
        Err(CodecError::Overflow(13)) => (),
        r => panic!("expected overflow, got {:?}", r),
    }
}

#[test]
fn test_codec_overflow_with_line_ending() {
    let mut codec = Codec::new(10);

    let mut bytes_mut = BytesMut::new();
    bytes_mut.extend_from_slice(b"$GPZDA,123\n");

    assert!(matches!(
        codec.decode(&mut bytes_mut),
        Err(CodecError::Overflow(11))
    ));

    let mut bytes_mut = BytesMut::new();
    bytes_mut.extend_from_slice(b"$GPZDA,12\n");

    assert_eq!(
        Some("$GPZDA,12".to_string()),
        codec.decode(&mut bytes_mut).unwrap()
    );
}
