use nom::branch::alt;
use nom::bytes::complete::*;
use nom::character::complete::*;
use nom::combinator::*;
use nom::error::ContextError;
use nom::error::FromExternalError;
use nom::error::ParseError;
use nom::number::complete::recognize_float;
use nom::sequence::preceded;
use nom::sequence::terminated;
use nom::sequence::tuple;
use nom::IResult;

use std::num::ParseFloatError;
use std::num::ParseIntError;

pub(crate) fn comma<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    tag(",")(input)
}

/// A calendar date as transmitted, not yet checked against the calendar.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Date {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

// ddmmyy, years are 2000-based
pub(crate) fn date<'a, E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>>(
    input: &'a str,
) -> IResult<&'a str, Date, E> {
    map(
        tuple((two_digit, two_digit, two_digit)),
        |(day, month, year)| Date {
            day,
            month,
            year: 2000 + year as i32,
        },
    )(input)
}

pub(crate) fn dot<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    tag(".")(input)
}

#[derive(Clone, Debug, PartialEq)]
pub enum EastWest {
    East,
    West,
}

pub(crate) fn east_west<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, EastWest, E> {
    alt((
        value(EastWest::East, char('E')),
        value(EastWest::West, char('W')),
    ))(input)
}

pub(crate) fn flt64<
    'a,
    E: ParseError<&'a str> + ContextError<&'a str> + FromExternalError<&'a str, ParseFloatError>,
>(
    input: &'a str,
) -> IResult<&'a str, f64, E> {
    map_res(recognize_float, |s: &str| s.parse())(input)
}

pub(crate) fn is_digit(chr: char) -> bool {
    chr.is_ascii_digit()
}

pub(crate) fn int32<'a, E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>>(
    input: &'a str,
) -> IResult<&'a str, i32, E> {
    map_res(
        recognize(preceded(opt(one_of("+-")), take_while1(is_digit))),
        |s: &str| s.parse(),
    )(input)
}

pub(crate) fn is_upper_alphanum(chr: char) -> bool {
    chr.is_ascii_uppercase() || chr.is_ascii_digit()
}

pub(crate) fn lat<
    'a,
    E: ParseError<&'a str>
        + ContextError<&'a str>
        + FromExternalError<&'a str, ParseIntError>
        + FromExternalError<&'a str, ParseFloatError>,
>(
    input: &'a str,
) -> IResult<&'a str, f64, E> {
    verify(
        map(tuple((two_digit, arc_minutes)), |(d, m)| d as f64 + m / 60.0),
        |l: &f64| *l <= 90.0,
    )(input)
}

pub(crate) fn lon<
    'a,
    E: ParseError<&'a str>
        + ContextError<&'a str>
        + FromExternalError<&'a str, ParseFloatError>
        + FromExternalError<&'a str, ParseIntError>,
>(
    input: &'a str,
) -> IResult<&'a str, f64, E> {
    verify(
        map(tuple((three_digit, arc_minutes)), |(d, m)| d as f64 + m / 60.0),
        |l: &f64| *l <= 180.0,
    )(input)
}

// Minutes of arc, [0, 60)
fn arc_minutes<
    'a,
    E: ParseError<&'a str> + ContextError<&'a str> + FromExternalError<&'a str, ParseFloatError>,
>(
    input: &'a str,
) -> IResult<&'a str, f64, E> {
    verify(flt64, |m: &f64| (0.0..60.0).contains(m))(input)
}

/// Signed decimal degrees, south and west negative.
#[derive(Clone, Debug, PartialEq)]
pub struct LatLon {
    pub latitude: f64,
    pub longitude: f64,
}

// Empty position fields (no fix yet) parse as None
pub(crate) fn latlon<
    'a,
    E: ParseError<&'a str>
        + ContextError<&'a str>
        + FromExternalError<&'a str, ParseFloatError>
        + FromExternalError<&'a str, ParseIntError>,
>(
    input: &'a str,
) -> IResult<&'a str, Option<LatLon>, E> {
    map(
        tuple((
            map(
                tuple((
                    terminated(opt(lat), comma),
                    terminated(opt(north_south), comma),
                )),
                |(l, d)| match (l, d) {
                    (Some(l), Some(d)) => Some(l * if d == NorthSouth::North { 1.0 } else { -1.0 }),
                    _ => None,
                },
            ),
            map(
                tuple((terminated(opt(lon), comma), opt(east_west))),
                |(l, d)| match (l, d) {
                    (Some(l), Some(d)) => Some(l * if d == EastWest::East { 1.0 } else { -1.0 }),
                    _ => None,
                },
            ),
        )),
        |(latitude, longitude)| match (latitude, longitude) {
            (Some(latitude), Some(longitude)) => Some(LatLon {
                latitude,
                longitude,
            }),
            _ => None,
        },
    )(input)
}

#[derive(Clone, Debug, PartialEq)]
pub enum NorthSouth {
    North,
    South,
}

pub(crate) fn north_south<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, NorthSouth, E> {
    alt((
        value(NorthSouth::North, char('N')),
        value(NorthSouth::South, char('S')),
    ))(input)
}

pub(crate) fn three_digit<
    'a,
    E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>,
>(
    input: &'a str,
) -> IResult<&'a str, u32, E> {
    map_res(take_while_m_n(3, 3, is_digit), |i: &str| i.parse())(input)
}

/// A time of day as transmitted, not yet checked against the clock.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Time {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub microseconds: u32,
}

// Parses time without subseconds: 010203
//
// with any number of subsecond digits: 010203.45, 010203.456
//
// digits past the microsecond are dropped

pub(crate) fn time<
    'a,
    E: ParseError<&'a str>
        + ContextError<&'a str>
        + FromExternalError<&'a str, ParseFloatError>
        + FromExternalError<&'a str, ParseIntError>,
>(
    input: &'a str,
) -> IResult<&'a str, Time, E> {
    map(
        tuple((two_digit, two_digit, two_digit, opt(preceded(dot, subsecond)))),
        |(hours, minutes, seconds, microseconds)| Time {
            hours,
            minutes,
            seconds,
            microseconds: microseconds.unwrap_or(0),
        },
    )(input)
}

fn subsecond<'a, E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>>(
    input: &'a str,
) -> IResult<&'a str, u32, E> {
    map_res(digit1, |digits: &str| {
        let digits = &digits[..digits.len().min(6)];

        digits
            .parse::<u32>()
            .map(|d| d * 10u32.pow(6 - digits.len() as u32))
    })(input)
}

pub(crate) fn two_digit<'a, E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>>(
    input: &'a str,
) -> IResult<&'a str, u32, E> {
    map_res(take_while_m_n(2, 2, is_digit), |i: &str| i.parse())(input)
}

/// Local zone hours from UTC, -13 to 13
pub(crate) fn zone_hours<'a, E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>>(
    input: &'a str,
) -> IResult<&'a str, i32, E> {
    verify(
        map(tuple((opt(one_of("+-")), two_digit)), |(sign, hours)| {
            if sign == Some('-') {
                -(hours as i32)
            } else {
                hours as i32
            }
        }),
        |h: &i32| (-13..=13).contains(h),
    )(input)
}

// Zone minutes carry the sign of the zone hours, any sign here is dropped
pub(crate) fn zone_minutes<
    'a,
    E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>,
>(
    input: &'a str,
) -> IResult<&'a str, u32, E> {
    verify(preceded(opt(one_of("+-")), two_digit), |m: &u32| *m < 60)(input)
}

pub(crate) fn uint32<'a, E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>>(
    input: &'a str,
) -> IResult<&'a str, u32, E> {
    map_res(take_while1(is_digit), |s: &str| s.parse())(input)
}
