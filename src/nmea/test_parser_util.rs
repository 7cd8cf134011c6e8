use crate::nmea::parser_util as parser;
use crate::nmea::parser_util::*;

use nom::error::convert_error;
use nom::error::VerboseError;

type VE<'a> = VerboseError<&'a str>;

fn p<'a, D>(input: &'a str, result: nom::IResult<&'a str, D, VE>) -> D {
    match result {
        Ok((_, data)) => data,
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            panic!("{}", convert_error(input, e));
        }
        Err(nom::Err::Incomplete(_)) => panic!("impossible incomplete error"),
    }
}

#[test]
fn test_comma() {
    assert_eq!(",", parser::comma::<VE>(",").unwrap().1);
}

#[test]
fn test_date() {
    let input = "150124";
    let date = p(input, parser::date::<VE>(input));

    assert_eq!(
        Date {
            day: 15,
            month: 1,
            year: 2024
        },
        date
    );
}

#[test]
fn test_date_short() {
    assert!(parser::date::<VE>("1501").is_err());
}

#[test]
fn test_int32() {
    assert_eq!(-5, parser::int32::<VE>("-05").unwrap().1);
    assert_eq!(5, parser::int32::<VE>("+05").unwrap().1);
    assert!(parser::int32::<VE>("").is_err());
}

#[test]
fn test_lat() {
    assert_approx_eq!(47.28521118, parser::lat::<VE>("4717.112671").unwrap().1);
}

#[test]
fn test_latlon() {
    let lat_lon = parser::latlon::<VE>("4717.11399,N,00833.91590,W")
        .unwrap()
        .1
        .unwrap();

    assert_approx_eq!(47.2852331, lat_lon.latitude);
    assert_approx_eq!(-8.565265, lat_lon.longitude);
}

#[test]
fn test_latlon_south() {
    let lat_lon = parser::latlon::<VE>("3345.0000,S,04500.0000,E")
        .unwrap()
        .1
        .unwrap();

    assert_approx_eq!(-33.75, lat_lon.latitude);
    assert_approx_eq!(45.0, lat_lon.longitude);
}

#[test]
fn test_latlon_empty() {
    let lat_lon = parser::latlon::<VE>(",,,").unwrap().1;

    assert_eq!(None, lat_lon);
}

#[test]
fn test_lon() {
    assert_approx_eq!(8.56524738, parser::lon::<VE>("00833.914843").unwrap().1);
}

#[test]
fn test_lat_range() {
    assert_approx_eq!(90.0, parser::lat::<VE>("9000.0000").unwrap().1);
    assert!(parser::lat::<VE>("9959.0000").is_err());
    assert!(parser::lat::<VE>("9000.0001").is_err());
    assert!(parser::lat::<VE>("4760.0000").is_err());
}

#[test]
fn test_lon_range() {
    assert_approx_eq!(180.0, parser::lon::<VE>("18000.0000").unwrap().1);
    assert_approx_eq!(0.0, parser::lon::<VE>("00000.0000").unwrap().1);
    assert!(parser::lon::<VE>("36500.0000").is_err());
    assert!(parser::lon::<VE>("18000.0001").is_err());
    assert!(parser::lon::<VE>("00875.0000").is_err());
}

#[test]
fn test_zone_hours() {
    assert_eq!(-5, parser::zone_hours::<VE>("-05").unwrap().1);
    assert_eq!(5, parser::zone_hours::<VE>("+05").unwrap().1);
    assert_eq!(13, parser::zone_hours::<VE>("13").unwrap().1);
    assert!(parser::zone_hours::<VE>("14").is_err());
    assert!(parser::zone_hours::<VE>("-2147483648").is_err());
}

#[test]
fn test_zone_minutes() {
    assert_eq!(30, parser::zone_minutes::<VE>("30").unwrap().1);
    assert_eq!(30, parser::zone_minutes::<VE>("-30").unwrap().1);
    assert!(parser::zone_minutes::<VE>("60").is_err());
}

#[test]
fn test_time_hms() {
    let input = "072732";
    let time = p(input, parser::time::<VE>(input));

    assert_eq!(
        Time {
            hours: 7,
            minutes: 27,
            seconds: 32,
            microseconds: 0
        },
        time
    );
}

#[test]
fn test_time_hms_centi() {
    let input = "072732.91";
    let time = p(input, parser::time::<VE>(input));

    assert_eq!(910_000, time.microseconds);
}

#[test]
fn test_time_hms_milli() {
    let input = "072732.911";
    let time = p(input, parser::time::<VE>(input));

    assert_eq!(911_000, time.microseconds);
}

#[test]
fn test_time_long_subsecond() {
    let input = "072732.12345678";
    let time = p(input, parser::time::<VE>(input));

    assert_eq!(123_456, time.microseconds);
}

#[test]
fn test_time_out_of_range() {
    // checked against the calendar later, not here
    let input = "811118";
    let time = p(input, parser::time::<VE>(input));

    assert_eq!(81, time.hours);
}

#[test]
fn test_uint32() {
    assert_eq!(12, parser::uint32::<VE>("12").unwrap().1);
    assert!(parser::uint32::<VE>("").is_err());
}
