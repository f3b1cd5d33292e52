//! The issuer node event loop.
//!
//! One task owns the swarm. Other tasks reach it through [`NodeHandle`],
//! which pairs each outbound request with a oneshot for its eventual
//! answer; inbound requests are served by the issuance coordinator on
//! spawned tasks so a slow monitoring API never stalls the swarm.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use futures::StreamExt;
use libp2p::request_response::{OutboundRequestId, ResponseChannel};
use libp2p::swarm::SwarmEvent;
use libp2p::{PeerId, Swarm};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use super::config::NodeConfig;
use super::handle::{Command, NodeHandle};
use super::keys::load_or_generate_keypair;
use crate::issue::IssueCoordinator;
use crate::network::{IssuerBehaviour, IssuerEvent};
use crate::protocol::{IssueRequest, IssueResponse};
use crate::transport::TransportError;

/// A running issuer node
pub struct IssuerNode {
    swarm: Swarm<IssuerBehaviour>,
    peer_id: PeerId,
    config: NodeConfig,
    coordinator: Arc<IssueCoordinator>,
    commands: mpsc::Receiver<Command>,
    command_tx: mpsc::Sender<Command>,
    responses_tx: mpsc::Sender<(ResponseChannel<IssueResponse>, IssueResponse)>,
    responses_rx: mpsc::Receiver<(ResponseChannel<IssueResponse>, IssueResponse)>,
    pending: HashMap<OutboundRequestId, oneshot::Sender<Result<IssueResponse, TransportError>>>,
}

impl IssuerNode {
    /// Create a node from its configuration and the coordinator that will
    /// serve inbound requests.
    pub fn new(config: NodeConfig, coordinator: Arc<IssueCoordinator>) -> Result<Self> {
        let keypair = match &config.keypair_path {
            Some(path) => load_or_generate_keypair(path)?,
            None => libp2p::identity::Keypair::generate_ed25519(),
        };
        let peer_id = PeerId::from(keypair.public());
        info!("local peer id: {peer_id}");

        let behaviour = IssuerBehaviour::new(config.request_timeout);
        let swarm = libp2p::SwarmBuilder::with_existing_identity(keypair)
            .with_tokio()
            .with_tcp(
                libp2p::tcp::Config::default(),
                libp2p::noise::Config::new,
                libp2p::yamux::Config::default,
            )?
            .with_behaviour(|_| behaviour)?
            .with_swarm_config(|c| {
                c.with_idle_connection_timeout(std::time::Duration::from_secs(60))
            })
            .build();

        let (command_tx, commands) = mpsc::channel(32);
        let (responses_tx, responses_rx) = mpsc::channel(32);

        Ok(Self {
            swarm,
            peer_id,
            config,
            coordinator,
            commands,
            command_tx,
            responses_tx,
            responses_rx,
            pending: HashMap::new(),
        })
    }

    pub fn peer_id(&self) -> PeerId {
        self.peer_id
    }

    /// A handle for sending delegated requests through this node.
    pub fn handle(&self) -> NodeHandle {
        NodeHandle::new(self.command_tx.clone(), self.config.request_timeout)
    }

    /// Run the node event loop until Ctrl+C.
    pub async fn run(mut self) -> Result<()> {
        let listen_addr = format!("/ip4/0.0.0.0/tcp/{}", self.config.port);
        self.swarm.listen_on(listen_addr.parse()?)?;

        loop {
            tokio::select! {
                event = self.swarm.select_next_some() => {
                    self.handle_swarm_event(event);
                }
                Some(command) = self.commands.recv() => {
                    self.handle_command(command);
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("shutdown signal received");
                    break;
                }
                Some((channel, response)) = self.responses_rx.recv() => {
                    let sent = self
                        .swarm
                        .behaviour_mut()
                        .request_response
                        .send_response(channel, response);
                    if sent.is_err() {
                        warn!("response channel closed before the answer went out");
                    }
                }
            }
        }

        Ok(())
    }

    fn handle_swarm_event(&mut self, event: SwarmEvent<IssuerEvent>) {
        match event {
            SwarmEvent::NewListenAddr { address, .. } => {
                info!("listening on {address}");
            }
            SwarmEvent::Behaviour(event) => self.handle_issuer_event(event),
            other => debug!("swarm event: {other:?}"),
        }
    }

    fn handle_issuer_event(&mut self, event: IssuerEvent) {
        match event {
            IssuerEvent::IssueRequestReceived {
                peer,
                request,
                channel,
            } => self.serve_request(peer, request, channel),
            IssuerEvent::IssueResponseReceived {
                request_id,
                response,
                ..
            } => {
                if let Some(reply) = self.pending.remove(&request_id) {
                    let _ = reply.send(Ok(response));
                }
            }
            IssuerEvent::OutboundIssueFailure {
                peer,
                request_id,
                error,
            } => {
                warn!("request to {peer} failed: {error}");
                if let Some(reply) = self.pending.remove(&request_id) {
                    let _ = reply.send(Err(TransportError::NoResponse(error.to_string())));
                }
            }
            IssuerEvent::InboundIssueFailure { peer, error } => {
                warn!("inbound request from {peer} failed: {error}");
            }
            IssuerEvent::ResponseSent { peer } => {
                debug!("response sent to {peer}");
            }
        }
    }

    /// Serve one inbound issuance request. The requester identity comes
    /// from our own peer book, never from the message.
    fn serve_request(
        &mut self,
        peer: PeerId,
        request: IssueRequest,
        channel: ResponseChannel<IssueResponse>,
    ) {
        let requester = self
            .config
            .peers
            .name_of(&peer)
            .map(str::to_owned)
            .unwrap_or_else(|| peer.to_string());
        info!(
            %requester,
            check = %request.name,
            policy = %request.policy,
            "inbound issuance request"
        );

        let coordinator = Arc::clone(&self.coordinator);
        let responses = self.responses_tx.clone();
        tokio::spawn(async move {
            let response = coordinator.issue_ping_url_remote(&requester, request).await;
            if responses.send((channel, response)).await.is_err() {
                warn!("node loop gone before the response could be queued");
            }
        });
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::Call {
                target,
                request,
                reply,
            } => {
                let entry = match self.config.peers.get(&target) {
                    Some(entry) => entry.clone(),
                    None => {
                        let _ = reply.send(Err(TransportError::UnknownPeer(target)));
                        return;
                    }
                };
                self.swarm.add_peer_address(entry.peer_id, entry.address);
                let request_id = self
                    .swarm
                    .behaviour_mut()
                    .request_response
                    .send_request(&entry.peer_id, request);
                self.pending.insert(request_id, reply);
            }
        }
    }
}
