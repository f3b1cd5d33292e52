//! Swarm-level events emitted by the issuer behaviour.

use libp2p::request_response::{
    self, InboundFailure, OutboundFailure, OutboundRequestId, ResponseChannel,
};
use libp2p::PeerId;

use crate::protocol::{IssueRequest, IssueResponse};

/// Events the issuance behaviour surfaces to the node event loop
#[derive(Debug)]
pub enum IssuerEvent {
    /// A peer asked this node to issue a ping URL.
    IssueRequestReceived {
        peer: PeerId,
        request: IssueRequest,
        channel: ResponseChannel<IssueResponse>,
    },

    /// A peer answered one of our delegated requests.
    IssueResponseReceived {
        peer: PeerId,
        request_id: OutboundRequestId,
        response: IssueResponse,
    },

    /// A delegated request failed before a response arrived.
    OutboundIssueFailure {
        peer: PeerId,
        request_id: OutboundRequestId,
        error: OutboundFailure,
    },

    /// An inbound request failed before we could answer it.
    InboundIssueFailure { peer: PeerId, error: InboundFailure },

    /// Our answer to an inbound request went out.
    ResponseSent { peer: PeerId },
}

impl From<request_response::Event<IssueRequest, IssueResponse>> for IssuerEvent {
    fn from(event: request_response::Event<IssueRequest, IssueResponse>) -> Self {
        match event {
            request_response::Event::Message { peer, message, .. } => match message {
                request_response::Message::Request {
                    request, channel, ..
                } => IssuerEvent::IssueRequestReceived {
                    peer,
                    request,
                    channel,
                },
                request_response::Message::Response {
                    request_id,
                    response,
                } => IssuerEvent::IssueResponseReceived {
                    peer,
                    request_id,
                    response,
                },
            },
            request_response::Event::OutboundFailure {
                peer,
                request_id,
                error,
                ..
            } => IssuerEvent::OutboundIssueFailure {
                peer,
                request_id,
                error,
            },
            request_response::Event::InboundFailure { peer, error, .. } => {
                IssuerEvent::InboundIssueFailure { peer, error }
            }
            request_response::Event::ResponseSent { peer, .. } => {
                IssuerEvent::ResponseSent { peer }
            }
        }
    }
}
