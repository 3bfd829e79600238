//! Connection session loop
//!
//! One `Session` per connected client. The loop waits for a frame, turns it
//! into a reply and sends it, until the client leaves or, in strict mode,
//! the first bad message closes the connection with code 1011.
//!
//! The loop is generic over the transport so it can be driven by an axum
//! `WebSocket` in production and by in-memory channels in tests.

use axum::extract::ws::{CloseFrame, Message};
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use rand::rngs::StdRng;
use setpoint_model::{session_rng, Recommender};
use setpoint_types::{
    parse_reading, ProtocolError, ProtocolMode, CLOSE_INTERNAL_ERROR, HANDSHAKE_REPLY,
    HANDSHAKE_REQUEST,
};
use std::borrow::Cow;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Connected,
    AwaitingMessage,
    Processing,
    Closed,
}

/// Why a session ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// Client sent a close frame
    ClientClosed { code: Option<u16> },

    /// Inbound stream ended without a close frame
    StreamEnded,

    /// Inbound transport failed
    TransportError(String),

    /// A reply could not be delivered
    SendFailed(String),

    /// Strict mode: a message failed and the connection was closed with 1011
    Aborted(ProtocolError),
}

impl SessionEnd {
    /// Whether the session ended because the client went away
    pub fn is_disconnect(&self) -> bool {
        matches!(
            self,
            SessionEnd::ClientClosed { .. } | SessionEnd::StreamEnded
        )
    }
}

impl std::fmt::Display for SessionEnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionEnd::ClientClosed { code: Some(code) } => {
                write!(f, "client closed the connection ({})", code)
            }
            SessionEnd::ClientClosed { code: None } => write!(f, "client closed the connection"),
            SessionEnd::StreamEnded => write!(f, "connection dropped"),
            SessionEnd::TransportError(e) => write!(f, "transport error: {}", e),
            SessionEnd::SendFailed(e) => write!(f, "send failed: {}", e),
            SessionEnd::Aborted(e) => write!(f, "aborted with code {}: {}", CLOSE_INTERNAL_ERROR, e),
        }
    }
}

/// Counters shared by every session
#[derive(Debug, Default)]
pub struct SessionStats {
    active: AtomicUsize,
    opened: AtomicU64,
    messages: AtomicU64,
    failures: AtomicU64,
}

impl SessionStats {
    pub fn active(&self) -> usize {
        self.active.load(Ordering::Relaxed)
    }

    pub fn opened(&self) -> u64 {
        self.opened.load(Ordering::Relaxed)
    }

    pub fn messages(&self) -> u64 {
        self.messages.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

/// Decrements the active count when the session is dropped
struct ActiveGuard(Arc<SessionStats>);

impl ActiveGuard {
    fn new(stats: Arc<SessionStats>) -> Self {
        stats.active.fetch_add(1, Ordering::Relaxed);
        stats.opened.fetch_add(1, Ordering::Relaxed);
        Self(stats)
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.0.active.fetch_sub(1, Ordering::Relaxed);
    }
}

/// Per-connection state. Owns its RNG, so noise never crosses connections.
pub struct Session {
    id: Uuid,
    recommender: Arc<Recommender>,
    mode: ProtocolMode,
    rng: StdRng,
    state: SessionState,
    handled: u64,
    guard: ActiveGuard,
}

impl Session {
    pub fn new(recommender: Arc<Recommender>, mode: ProtocolMode, stats: Arc<SessionStats>) -> Self {
        Self {
            id: Uuid::new_v4(),
            recommender,
            mode,
            rng: session_rng(),
            state: SessionState::Connected,
            handled: 0,
            guard: ActiveGuard::new(stats),
        }
    }

    /// Replace the entropy-seeded RNG
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> ProtocolMode {
        self.mode
    }

    /// Messages answered so far, including error replies
    pub fn handled(&self) -> u64 {
        self.handled
    }

    fn transition(&mut self, next: SessionState) {
        tracing::trace!(from = ?self.state, to = ?next, "session state");
        self.state = next;
    }

    /// Turn one text payload into the text reply
    pub fn process(&mut self, payload: &str) -> Result<String, ProtocolError> {
        if self.mode.answers_handshake() && payload.trim() == HANDSHAKE_REQUEST {
            return Ok(HANDSHAKE_REPLY.to_string());
        }

        let reading = parse_reading(payload)?;
        let response = self
            .recommender
            .recommend(&reading, &mut self.rng)
            .map_err(|e| ProtocolError::Inference(e.to_string()))?;

        serde_json::to_string(&response).map_err(|e| ProtocolError::Encoding(e.to_string()))
    }

    fn process_frame(&mut self, frame: Message) -> Frame {
        match frame {
            Message::Text(text) => Frame::Payload(self.process(&text)),
            Message::Binary(bytes) => Frame::Payload(
                String::from_utf8(bytes)
                    .map_err(|e| ProtocolError::InvalidJson(e.to_string()))
                    .and_then(|text| self.process(&text)),
            ),
            Message::Ping(_) | Message::Pong(_) => Frame::Control,
            Message::Close(frame) => Frame::Close(frame.map(|f| f.code)),
        }
    }

    /// Drive the session until the client leaves or the connection fails
    pub async fn run<R, W>(self, inbound: R, outbound: W) -> SessionEnd
    where
        R: Stream<Item = Result<Message, axum::Error>> + Unpin,
        W: Sink<Message> + Unpin,
        W::Error: std::fmt::Display,
    {
        let span = tracing::info_span!("session", id = %self.id);
        self.serve(inbound, outbound).instrument(span).await
    }

    async fn serve<R, W>(mut self, mut inbound: R, mut outbound: W) -> SessionEnd
    where
        R: Stream<Item = Result<Message, axum::Error>> + Unpin,
        W: Sink<Message> + Unpin,
        W::Error: std::fmt::Display,
    {
        tracing::info!(mode = %self.mode, "Client connected");
        self.transition(SessionState::AwaitingMessage);

        let end = loop {
            let frame = match inbound.next().await {
                Some(Ok(frame)) => frame,
                Some(Err(e)) => break SessionEnd::TransportError(e.to_string()),
                None => break SessionEnd::StreamEnded,
            };

            self.transition(SessionState::Processing);
            let outcome = match self.process_frame(frame) {
                Frame::Control => {
                    self.transition(SessionState::AwaitingMessage);
                    continue;
                }
                Frame::Close(code) => break SessionEnd::ClientClosed { code },
                Frame::Payload(outcome) => outcome,
            };

            self.handled += 1;
            self.guard.0.messages.fetch_add(1, Ordering::Relaxed);

            let reply = match outcome {
                Ok(reply) => reply,
                Err(err) => {
                    self.guard.0.failures.fetch_add(1, Ordering::Relaxed);

                    if self.mode.closes_on_error() {
                        tracing::error!(error = %err, "Closing connection");
                        let close = Message::Close(Some(CloseFrame {
                            code: CLOSE_INTERNAL_ERROR,
                            reason: Cow::Borrowed(err.close_reason()),
                        }));
                        if let Err(e) = outbound.send(close).await {
                            tracing::debug!(error = %e, "Close frame not delivered");
                        }
                        break SessionEnd::Aborted(err);
                    }

                    tracing::warn!(error = %err, "Rejected message");
                    err.to_string()
                }
            };

            if let Err(e) = outbound.send(Message::Text(reply)).await {
                break SessionEnd::SendFailed(e.to_string());
            }
            self.transition(SessionState::AwaitingMessage);
        };

        self.transition(SessionState::Closed);
        if let Err(e) = outbound.close().await {
            tracing::debug!(error = %e, "Outbound close failed");
        }

        if end.is_disconnect() {
            tracing::info!(handled = self.handled, "Client disconnected");
        } else {
            tracing::warn!(handled = self.handled, reason = %end, "Session ended");
        }

        end
    }
}

enum Frame {
    Payload(Result<String, ProtocolError>),
    Control,
    Close(Option<u16>),
}
