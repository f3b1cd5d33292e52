//! Network behaviour for issuance.

use std::time::Duration;

use libp2p::{request_response, swarm::NetworkBehaviour, StreamProtocol};

use super::events::IssuerEvent;
use crate::protocol::{IssueCodec, ISSUE_PROTOCOL};

/// The network behaviour of an issuer node
#[derive(NetworkBehaviour)]
#[behaviour(to_swarm = "IssuerEvent")]
pub struct IssuerBehaviour {
    /// Request/response protocol for ping URL issuance
    pub request_response: request_response::Behaviour<IssueCodec>,
}

impl IssuerBehaviour {
    pub fn new(request_timeout: Duration) -> Self {
        let config = request_response::Config::default()
            .with_request_timeout(request_timeout)
            .with_max_concurrent_streams(5);

        let request_response = request_response::Behaviour::new(
            [(
                StreamProtocol::new(ISSUE_PROTOCOL),
                request_response::ProtocolSupport::Full,
            )],
            config,
        );

        Self { request_response }
    }
}
