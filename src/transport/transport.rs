use crate::nmea::Codec;
use crate::nmea::CodecError;

use futures_util::stream::StreamExt;

use std::future::Future;
use std::io;
use std::time::Duration;

use thiserror::Error;

use tokio::io::AsyncRead;

use tokio_util::codec::FramedRead;

/// Outcome of a failed [`Transport::read_line`]
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("timed out waiting for a line")]
    Timeout,
    #[error("line exceeded {0} bytes without a line ending")]
    Overflow(usize),
    #[error("connection refused or closed")]
    Refused,
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// A line-oriented link to a GPS receiver.
///
/// `connect` replaces any previous read handle, so a reader never has to be
/// rebuilt after a reconnect.
pub trait Transport: Send {
    fn name(&self) -> &str;

    fn connect(&mut self) -> impl Future<Output = io::Result<()>> + Send;

    fn disconnect(&mut self) -> impl Future<Output = ()> + Send;

    fn read_line(
        &mut self,
        timeout: Duration,
    ) -> impl Future<Output = Result<String, ReadError>> + Send;
}

// An unopened or exhausted stream reads as refused so the supervisor
// reconnects it.
pub(crate) async fn read_framed<S>(
    framed: &mut Option<FramedRead<S, Codec>>,
    timeout: Duration,
) -> Result<String, ReadError>
where
    S: AsyncRead + Unpin + Send,
{
    let reader = match framed {
        Some(r) => r,
        None => return Err(ReadError::Refused),
    };

    match tokio::time::timeout(timeout, reader.next()).await {
        Err(_) => Err(ReadError::Timeout),
        Ok(Some(Ok(line))) => Ok(line),
        Ok(Some(Err(CodecError::Overflow(length)))) => Err(ReadError::Overflow(length)),
        Ok(Some(Err(CodecError::Io(e)))) if e.kind() == io::ErrorKind::ConnectionRefused => {
            Err(ReadError::Refused)
        }
        Ok(Some(Err(CodecError::Io(e)))) => Err(ReadError::Io(e)),
        Ok(None) => {
            *framed = None;
            Err(ReadError::Refused)
        }
    }
}
