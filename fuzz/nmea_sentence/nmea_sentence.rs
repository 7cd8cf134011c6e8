#![no_main]
use libfuzzer_sys::fuzz_target;
extern crate gps_nmea;

use gps_nmea::nmea::is_nmea;
use gps_nmea::nmea::parse_sentence;
use gps_nmea::nmea::Sentence;

fuzz_target!(|input: &[u8]| {
    let line = String::from_utf8_lossy(input);

    let sentence = parse_sentence(&line);

    assert_eq!(
        !matches!(sentence, Sentence::Invalid(_)),
        is_nmea(&line)
    );
});
