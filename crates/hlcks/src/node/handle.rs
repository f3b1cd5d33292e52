//! Handle for talking to the node event loop from other tasks.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::{mpsc, oneshot};

use crate::protocol::{IssueRequest, IssueResponse};
use crate::transport::{RemoteTransport, TransportError};

/// Commands accepted by the node event loop
#[derive(Debug)]
pub enum Command {
    /// Send an issuance request to a named peer and deliver its answer.
    Call {
        target: String,
        request: IssueRequest,
        reply: oneshot::Sender<Result<IssueResponse, TransportError>>,
    },
}

/// Cloneable handle onto a running [`IssuerNode`](super::IssuerNode)
#[derive(Debug, Clone)]
pub struct NodeHandle {
    commands: mpsc::Sender<Command>,
    timeout: Duration,
}

impl NodeHandle {
    pub(crate) fn new(commands: mpsc::Sender<Command>, timeout: Duration) -> Self {
        Self { commands, timeout }
    }
}

#[async_trait]
impl RemoteTransport for NodeHandle {
    async fn call(
        &self,
        target: &str,
        request: IssueRequest,
    ) -> Result<IssueResponse, TransportError> {
        let (reply, receiver) = oneshot::channel();
        self.commands
            .send(Command::Call {
                target: target.to_string(),
                request,
                reply,
            })
            .await
            .map_err(|_| TransportError::ChannelClosed)?;

        match tokio::time::timeout(self.timeout, receiver).await {
            Err(_) => Err(TransportError::NoResponse(format!(
                "no answer from {target} within {:?}",
                self.timeout
            ))),
            Ok(Err(_)) => Err(TransportError::ChannelClosed),
            Ok(Ok(result)) => result,
        }
    }
}
