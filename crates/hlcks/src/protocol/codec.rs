//! JSON codec for the issuance protocol.
//!
//! One message per stream; the writer closes its side to delimit the
//! message. Reads are capped at [`MAX_MESSAGE_BYTES`]: an oversized frame
//! gets truncated at the cap and then fails JSON parsing, so a misbehaving
//! peer cannot make us buffer without bound.

use std::io;

use async_trait::async_trait;
use futures::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use libp2p::{request_response::Codec, StreamProtocol};

use super::types::{IssueRequest, IssueResponse};

/// Upper bound on a single encoded message. Issuance envelopes are a name,
/// a policy reference and a parameter map; anything near this size is junk.
pub const MAX_MESSAGE_BYTES: u64 = 64 * 1024;

/// Codec carrying issuance envelopes as JSON
#[derive(Debug, Clone, Default)]
pub struct IssueCodec;

#[async_trait]
impl Codec for IssueCodec {
    type Protocol = StreamProtocol;
    type Request = IssueRequest;
    type Response = IssueResponse;

    async fn read_request<T>(&mut self, _: &Self::Protocol, io: &mut T) -> io::Result<Self::Request>
    where
        T: AsyncRead + Unpin + Send,
    {
        let mut buf = Vec::new();
        io.take(MAX_MESSAGE_BYTES).read_to_end(&mut buf).await?;

        serde_json::from_slice(&buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    async fn read_response<T>(
        &mut self,
        _: &Self::Protocol,
        io: &mut T,
    ) -> io::Result<Self::Response>
    where
        T: AsyncRead + Unpin + Send,
    {
        let mut buf = Vec::new();
        io.take(MAX_MESSAGE_BYTES).read_to_end(&mut buf).await?;

        serde_json::from_slice(&buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    async fn write_request<T>(
        &mut self,
        _: &Self::Protocol,
        io: &mut T,
        req: Self::Request,
    ) -> io::Result<()>
    where
        T: AsyncWrite + Unpin + Send,
    {
        let encoded =
            serde_json::to_vec(&req).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        io.write_all(&encoded).await?;
        io.close().await?;

        Ok(())
    }

    async fn write_response<T>(
        &mut self,
        _: &Self::Protocol,
        io: &mut T,
        res: Self::Response,
    ) -> io::Result<()>
    where
        T: AsyncWrite + Unpin + Send,
    {
        let encoded =
            serde_json::to_vec(&res).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        io.write_all(&encoded).await?;
        io.close().await?;

        Ok(())
    }
}
