//! WebSocket-backed session.
//!
//! Outbound frames go through an unbounded channel to the connection's
//! writer task, so `send` never waits on the socket and is safe to call from
//! the scheduler while the connection's reader is busy.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use axum::extract::ws::{close_code, CloseFrame, Message};
use tokio::sync::mpsc;

use crate::domain::broadcast::ConnectionError;
use crate::domain::foundation::SessionId;
use crate::ports::Session;

/// Session handle for one upgraded WebSocket connection.
pub struct WebSocketSession {
    id: SessionId,
    outbound: mpsc::UnboundedSender<Message>,
    open: AtomicBool,
}

impl WebSocketSession {
    /// Create a session writing into `outbound`, with a fresh id.
    pub fn new(outbound: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            id: SessionId::new(),
            outbound,
            open: AtomicBool::new(true),
        }
    }

    /// Flip the liveness flag once the connection is torn down.
    pub fn mark_closed(&self) {
        self.open.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl Session for WebSocketSession {
    fn id(&self) -> SessionId {
        self.id
    }

    fn is_open(&self) -> bool {
        self.open.load(Ordering::SeqCst) && !self.outbound.is_closed()
    }

    async fn send(&self, text: &str) -> Result<(), ConnectionError> {
        if !self.is_open() {
            return Err(ConnectionError::closed(self.id));
        }
        self.outbound
            .send(Message::Text(text.to_string()))
            .map_err(|_| {
                self.mark_closed();
                ConnectionError::send_failed(self.id, "writer task has exited")
            })
    }

    async fn close(&self) -> Result<(), ConnectionError> {
        if !self.open.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        let frame = CloseFrame {
            code: close_code::NORMAL,
            reason: "stop requested".into(),
        };
        self.outbound
            .send(Message::Close(Some(frame)))
            .map_err(|_| ConnectionError::send_failed(self.id, "writer task has exited"))
    }
}
