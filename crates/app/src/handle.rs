//! Cloneable handle to a running resource engine.

use serde_json::Value;
use smartnode_domain::error::SmartNodeError;
use smartnode_domain::resource::ResourceKind;
use tokio::sync::{mpsc, oneshot};

/// Observe intent carried by a retrieve request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Observe {
    Subscribe,
    Unsubscribe,
}

/// Requests processed by the engine actor, one at a time.
#[derive(Debug)]
pub enum Command {
    Retrieve {
        observe: Option<Observe>,
        reply: oneshot::Sender<Value>,
    },
    Update {
        payload: Value,
        reply: oneshot::Sender<Result<Value, SmartNodeError>>,
    },
    Translate {
        units: Option<String>,
        reply: oneshot::Sender<Result<Value, SmartNodeError>>,
    },
    Shutdown {
        done: oneshot::Sender<()>,
    },
}

/// Client-side entry point into a resource: what a transport calls when a
/// request arrives.
#[derive(Debug, Clone)]
pub struct ResourceHandle {
    id: String,
    kind: ResourceKind,
    sender: mpsc::Sender<Command>,
}

impl ResourceHandle {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        kind: ResourceKind,
        sender: mpsc::Sender<Command>,
    ) -> Self {
        Self {
            id: id.into(),
            kind,
            sender,
        }
    }

    /// Identifier echoed in error payloads.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Read the current payload, optionally (un)subscribing the caller.
    ///
    /// The observer count changes only after the payload has been produced.
    ///
    /// # Errors
    ///
    /// Returns [`SmartNodeError::NotRunning`] once the engine has stopped.
    pub async fn retrieve(&self, observe: Option<Observe>) -> Result<Value, SmartNodeError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Retrieve { observe, reply }).await?;
        rx.await.map_err(|_| SmartNodeError::NotRunning)
    }

    /// Validate and apply a write, returning the new payload.
    ///
    /// # Errors
    ///
    /// Returns the validation error of a rejected payload, or
    /// [`SmartNodeError::NotRunning`] once the engine has stopped.
    pub async fn update(&self, payload: Value) -> Result<Value, SmartNodeError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Update { payload, reply }).await?;
        rx.await.map_err(|_| SmartNodeError::NotRunning)?
    }

    /// Render the current state in another unit.
    ///
    /// # Errors
    ///
    /// Returns [`SmartNodeError::InvalidUnit`] for an unknown unit,
    /// [`SmartNodeError::TranslateUnsupported`] for resources without units,
    /// or [`SmartNodeError::NotRunning`] once the engine has stopped.
    pub async fn translate(&self, units: Option<String>) -> Result<Value, SmartNodeError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Translate { units, reply }).await?;
        rx.await.map_err(|_| SmartNodeError::NotRunning)?
    }

    /// Stop the engine and wait until it has cancelled its timer.
    ///
    /// Stopping an engine that already stopped is a no-op.
    pub async fn shutdown(&self) {
        let (done, rx) = oneshot::channel();
        if self.send(Command::Shutdown { done }).await.is_ok() {
            let _ = rx.await;
        }
    }

    async fn send(&self, command: Command) -> Result<(), SmartNodeError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| SmartNodeError::NotRunning)
    }
}
