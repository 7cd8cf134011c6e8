use bytes::Buf;
use bytes::BytesMut;

use std::io;

use thiserror::Error;

use tokio_util::codec::Decoder;

use tracing::trace;

/// Longest line NMEA-0183 allows, including `$` and the line ending
pub const MAX_LINE_LENGTH: usize = 82;

/// Splits a byte stream into lines no longer than `max_length`.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Codec {
    max_length: usize,
}

impl Codec {
    pub fn new(max_length: usize) -> Self {
        Codec { max_length }
    }

    pub fn max_length(&self) -> usize {
        self.max_length
    }
}

impl Default for Codec {
    fn default() -> Self {
        Codec::new(MAX_LINE_LENGTH)
    }
}

impl Decoder for Codec {
    type Item = String;
    type Error = CodecError;

    fn decode(&mut self, buf: &mut BytesMut) -> Result<Option<String>, CodecError> {
        let newline = buf.iter().position(|b| *b == b'\n');

        let end = match newline {
            Some(n) if n < self.max_length => n,
            Some(n) => return Err(CodecError::Overflow(n + 1)),
            None if buf.len() >= self.max_length => {
                return Err(CodecError::Overflow(buf.len()));
            }
            None => return Ok(None),
        };

        let line = buf.split_to(end);
        buf.advance(1);

        let line = String::from_utf8_lossy(&line);
        let line = line.trim_end_matches('\r').to_string();

        trace!("read line {:?}, {} bytes remaining", line, buf.len());

        Ok(Some(line))
    }
}

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("line exceeded {0} bytes without a line ending")]
    Overflow(usize),
    #[error(transparent)]
    Io(#[from] io::Error),
}
