use crate::nmea::parser_util::*;
use crate::nmea::sentence_parser::sentence_body;
use crate::nmea::sentence_parser::ChecksumMismatch;

use nom::bytes::complete::take_while_m_n;
use nom::character::complete::one_of;
use nom::combinator::*;
use nom::error::context;
use nom::error::convert_error;
use nom::error::ContextError;
use nom::error::FromExternalError;
use nom::error::ParseError;
use nom::error::VerboseError;
use nom::multi::count;
use nom::sequence::preceded;
use nom::sequence::terminated;
use nom::sequence::tuple;
use nom::Err;
use nom::IResult;

use std::num::ParseFloatError;
use std::num::ParseIntError;

use thiserror::Error;

/// One line from the receiver, classified.
#[derive(Clone, Debug, PartialEq)]
pub enum Sentence {
    /// Recommended minimum: position and time
    RMC(RMCData),
    /// Fix data: position, altitude, fix quality
    GGA(GGAData),
    /// DOP and active satellites: fix mode
    GSA(GSAData),
    /// Date, time and local zone
    ZDA(ZDAData),
    /// A well-formed sentence of a kind not modeled here
    Unrecognized(String),
    Invalid(SentenceError),
}

#[derive(Clone, Debug, Error, PartialEq)]
pub enum SentenceError {
    #[error("no sentence framing in \"{0}\"")]
    Framing(String),
    #[error("non-printable character in \"{0}\"")]
    NonPrintable(String),
    #[error("checksum mismatch on \"{}\", given {:02X}, calculated {:02X}", .0.message, .0.given, .0.calculated)]
    Checksum(ChecksumMismatch),
    #[error("invalid address in \"{0}\"")]
    Address(String),
    #[error("malformed {kind} sentence: {detail}")]
    Fields { kind: &'static str, detail: String },
}

#[derive(Clone, Debug, PartialEq)]
pub enum Talker {
    BeiDou,
    Combination,
    GLONASS,
    GPS,
    Galileo,
    Unknown(String),
}

fn talker<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, Talker, E> {
    map(take_while_m_n(2, 2, is_upper_alphanum), |talker: &str| {
        match talker {
            "GA" => Talker::Galileo,
            "GB" | "BD" => Talker::BeiDou,
            "GL" => Talker::GLONASS,
            "GN" => Talker::Combination,
            "GP" => Talker::GPS,
            _ => Talker::Unknown(talker.to_string()),
        }
    })(input)
}

fn sentence_type<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    take_while_m_n(3, 3, is_upper_alphanum)(input)
}

/// Parses one line into a [`Sentence`].
///
/// Never fails: anything that cannot be read becomes [`Sentence::Invalid`].
pub fn parse_sentence(line: &str) -> Sentence {
    let body = match sentence_body(line) {
        Ok(b) => b,
        Err(e) => return Sentence::Invalid(e),
    };

    let (fields, (talker, kind)) =
        match tuple((talker::<VerboseError<&str>>, sentence_type))(body) {
            Ok(t) => t,
            Err(_) => return Sentence::Invalid(SentenceError::Address(body.to_string())),
        };

    match kind {
        "RMC" => fields_of("RMC", fields, |i| rmc(talker, i), Sentence::RMC),
        "GGA" => fields_of("GGA", fields, |i| gga(talker, i), Sentence::GGA),
        "GSA" => fields_of("GSA", fields, |i| gsa(talker, i), Sentence::GSA),
        "ZDA" => fields_of("ZDA", fields, |i| zda(talker, i), Sentence::ZDA),
        _ => Sentence::Unrecognized(body.to_string()),
    }
}

/// True when `line` looks like it came from an NMEA device.
pub fn is_nmea(line: &str) -> bool {
    !matches!(parse_sentence(line), Sentence::Invalid(_))
}

type VE<'a> = VerboseError<&'a str>;

fn fields_of<'a, D, P>(
    kind: &'static str,
    input: &'a str,
    parser: P,
    wrap: fn(D) -> Sentence,
) -> Sentence
where
    P: FnOnce(&'a str) -> IResult<&'a str, D, VE<'a>>,
{
    match parser(input) {
        Ok((_, data)) => wrap(data),
        Err(Err::Error(e)) | Err(Err::Failure(e)) => Sentence::Invalid(SentenceError::Fields {
            kind,
            detail: convert_error(input, e),
        }),
        Err(Err::Incomplete(_)) => Sentence::Invalid(SentenceError::Fields {
            kind,
            detail: "incomplete".to_string(),
        }),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct RMCData {
    pub talker: Talker,
    pub time: Option<Time>,
    pub valid: bool,
    pub lat_lon: Option<LatLon>,
    pub speed: Option<f64>,
    pub course: Option<f64>,
    pub date: Option<Date>,
}

pub(crate) fn rmc<
    'a,
    E: ParseError<&'a str>
        + ContextError<&'a str>
        + FromExternalError<&'a str, ParseFloatError>
        + FromExternalError<&'a str, ParseIntError>,
>(
    talker: Talker,
    input: &'a str,
) -> IResult<&'a str, RMCData, E> {
    context(
        "RMC",
        map(
            tuple((
                preceded(comma, opt(time)),
                preceded(comma, map(one_of("AV"), |s| s == 'A')),
                preceded(comma, latlon),
                preceded(comma, opt(flt64)),
                preceded(comma, opt(flt64)),
                preceded(comma, opt(date)),
                // magnetic variation, mode and navigation status are ignored
                rest,
            )),
            move |(time, valid, lat_lon, speed, course, date, _)| RMCData {
                talker: talker.clone(),
                time,
                valid,
                lat_lon,
                speed,
                course,
                date,
            },
        ),
    )(input)
}

#[derive(Clone, Debug, PartialEq)]
pub struct GGAData {
    pub talker: Talker,
    pub time: Option<Time>,
    pub lat_lon: Option<LatLon>,
    /// 0 is no fix, 1 GNSS, 2 DGNSS, 4 RTK fixed, 5 RTK float, 6 dead reckoning
    pub fix_quality: u32,
    pub num_satellites: Option<u32>,
    pub hdop: Option<f64>,
    pub altitude: Option<f64>,
    pub geoid_separation: Option<f64>,
}

pub(crate) fn gga<
    'a,
    E: ParseError<&'a str>
        + ContextError<&'a str>
        + FromExternalError<&'a str, ParseFloatError>
        + FromExternalError<&'a str, ParseIntError>,
>(
    talker: Talker,
    input: &'a str,
) -> IResult<&'a str, GGAData, E> {
    context(
        "GGA",
        map(
            tuple((
                preceded(comma, opt(time)),
                preceded(comma, latlon),
                preceded(comma, map(opt(uint32), |q| q.unwrap_or(0))),
                preceded(comma, opt(uint32)),
                preceded(comma, opt(flt64)),
                preceded(comma, opt(flt64)),
                preceded(comma, opt(one_of("M"))),
                preceded(comma, opt(flt64)),
                // separation unit, differential age and station are ignored
                rest,
            )),
            move |(
                time,
                lat_lon,
                fix_quality,
                num_satellites,
                hdop,
                altitude,
                _,
                geoid_separation,
                _,
            )| GGAData {
                talker: talker.clone(),
                time,
                lat_lon,
                fix_quality,
                num_satellites,
                hdop,
                altitude,
                geoid_separation,
            },
        ),
    )(input)
}

#[derive(Clone, Debug, PartialEq)]
pub enum SelectionMode {
    Automatic,
    Manual,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GSAData {
    pub talker: Talker,
    pub selection_mode: Option<SelectionMode>,
    /// 1 no fix, 2 2D fix, 3 3D fix
    pub fix_type: Option<u32>,
    pub satellites: Vec<u32>,
    pub pdop: Option<f64>,
    pub hdop: Option<f64>,
    pub vdop: Option<f64>,
}

pub(crate) fn gsa<
    'a,
    E: ParseError<&'a str>
        + ContextError<&'a str>
        + FromExternalError<&'a str, ParseFloatError>
        + FromExternalError<&'a str, ParseIntError>,
>(
    talker: Talker,
    input: &'a str,
) -> IResult<&'a str, GSAData, E> {
    context(
        "GSA",
        map(
            tuple((
                preceded(
                    comma,
                    opt(map(one_of("AM"), |m| match m {
                        'A' => SelectionMode::Automatic,
                        _ => SelectionMode::Manual,
                    })),
                ),
                preceded(comma, opt(uint32)),
                count(preceded(comma, opt(uint32)), 12),
                preceded(comma, opt(flt64)),
                preceded(comma, opt(flt64)),
                preceded(comma, opt(flt64)),
                // NMEA 4.1 system ID is ignored
                rest,
            )),
            move |(selection_mode, fix_type, satellites, pdop, hdop, vdop, _)| GSAData {
                talker: talker.clone(),
                selection_mode,
                fix_type,
                satellites: satellites.into_iter().flatten().collect(),
                pdop,
                hdop,
                vdop,
            },
        ),
    )(input)
}

#[derive(Clone, Debug, PartialEq)]
pub struct ZDAData {
    pub talker: Talker,
    pub time: Option<Time>,
    pub day: Option<u32>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    /// -13 to 13
    pub local_zone_hours: Option<i32>,
    /// 0 to 59, with the sign of `local_zone_hours`
    pub local_zone_minutes: Option<u32>,
}

pub(crate) fn zda<
    'a,
    E: ParseError<&'a str>
        + ContextError<&'a str>
        + FromExternalError<&'a str, ParseFloatError>
        + FromExternalError<&'a str, ParseIntError>,
>(
    talker: Talker,
    input: &'a str,
) -> IResult<&'a str, ZDAData, E> {
    context(
        "ZDA",
        map(
            terminated(
                tuple((
                    preceded(comma, opt(time)),
                    preceded(comma, opt(two_digit)),
                    preceded(comma, opt(two_digit)),
                    preceded(comma, opt(int32)),
                    preceded(comma, opt(zone_hours)),
                    preceded(comma, opt(zone_minutes)),
                )),
                eof,
            ),
            move |(time, day, month, year, local_zone_hours, local_zone_minutes)| ZDAData {
                talker: talker.clone(),
                time,
                day,
                month,
                year,
                local_zone_hours,
                local_zone_minutes,
            },
        ),
    )(input)
}
