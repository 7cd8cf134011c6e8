use crate::nmea::SentenceError;

use nom::bytes::complete::take_till;
use nom::bytes::complete::take_while_m_n;
use nom::character::complete::char;
use nom::combinator::eof;
use nom::combinator::map;
use nom::combinator::map_res;
use nom::combinator::opt;
use nom::error::context;
use nom::error::ContextError;
use nom::error::FromExternalError;
use nom::error::ParseError;
use nom::error::VerboseError;
use nom::sequence::preceded;
use nom::sequence::terminated;
use nom::sequence::tuple;
use nom::IResult;

use std::num::ParseIntError;

use tracing::trace;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ChecksumMismatch {
    pub message: String,
    pub given: u8,
    pub calculated: u8,
}

/// Strips framing from a line and verifies the checksum when one is present.
///
/// Returns the sentence body between `$` and `*`.
pub(crate) fn sentence_body(line: &str) -> Result<&str, SentenceError> {
    let line = line.trim_end_matches(|c| c == '\r' || c == '\n');

    let (body, given) = match frame::<VerboseError<&str>>(line) {
        Ok((_, framed)) => framed,
        Err(_) => return Err(SentenceError::Framing(line.to_string())),
    };

    if !body.chars().all(|c| c.is_ascii_graphic() || c == ' ') {
        return Err(SentenceError::NonPrintable(body.to_string()));
    }

    if let Some(given) = given {
        let calculated = body.bytes().fold(0, |c, b| c ^ b);

        if given != calculated {
            trace!(
                "invalid checksum for \"{}\" ({} != {})",
                body,
                given,
                calculated
            );

            return Err(SentenceError::Checksum(ChecksumMismatch {
                message: body.to_string(),
                given,
                calculated,
            }));
        }
    }

    Ok(body)
}

pub(crate) fn frame<
    'a,
    E: ParseError<&'a str> + ContextError<&'a str> + FromExternalError<&'a str, ParseIntError>,
>(
    input: &'a str,
) -> IResult<&'a str, (&'a str, Option<u8>), E> {
    context(
        "sentence",
        terminated(
            tuple((
                preceded(tuple((garbage, char('$'))), non_star),
                opt(preceded(char('*'), checksum)),
            )),
            eof,
        ),
    )(input)
}

// Line noise ahead of the start of the sentence
pub(crate) fn garbage<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, usize, E> {
    map(take_till(|c| c == '$'), |g: &str| g.len())(input)
}

pub(crate) fn non_star<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    take_till(|c| c == '*')(input)
}

pub(crate) fn checksum<'a, E: ParseError<&'a str> + FromExternalError<&'a str, ParseIntError>>(
    input: &'a str,
) -> IResult<&'a str, u8, E> {
    map_res(
        take_while_m_n(2, 2, |c: char| c.is_ascii_hexdigit()),
        |c: &str| u8::from_str_radix(c, 16),
    )(input)
}
