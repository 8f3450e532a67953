use thiserror::Error;
use tracing::debug;

use crate::asr::RecognitionResult;

/// Consecutive silent chunks tolerated before the next emission gets a
/// paragraph break. The counter must exceed this value, so the break
/// appears after the 4th silent chunk in a row.
pub const PAUSE_BREAK_THRESHOLD: u32 = 3;

/// Lifecycle of one streaming connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Inbound connection request received, handshake not yet complete.
    Connecting,
    /// Handshake done; chunks may be processed.
    Open,
    /// Terminal. No further chunks are processed.
    Closed,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is not open (state: {0:?})")]
    NotOpen(SessionState),
    #[error("session already open")]
    AlreadyOpen,
}

/// Per-connection streaming state: the silence counter and the lifecycle
/// state machine. Strictly connection-local — one instance per accepted
/// WebSocket, never shared across connections.
///
/// The controller is transport-agnostic: the caller feeds it each chunk's
/// recognition result and sends whatever text comes back. Chunks are
/// independent recognition units; nothing is buffered across calls.
#[derive(Debug)]
pub struct StreamingSession {
    state: SessionState,
    consecutive_silent_chunks: u32,
}

impl StreamingSession {
    /// A session in `Connecting`: created on the inbound request, unusable
    /// until `open()` marks the handshake complete.
    pub fn new() -> Self {
        Self {
            state: SessionState::Connecting,
            consecutive_silent_chunks: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn silent_chunks(&self) -> u32 {
        self.consecutive_silent_chunks
    }

    /// Marks the handshake complete. Valid only from `Connecting`.
    pub fn open(&mut self) -> Result<(), SessionError> {
        match self.state {
            SessionState::Connecting => {
                self.state = SessionState::Open;
                Ok(())
            }
            SessionState::Open => Err(SessionError::AlreadyOpen),
            SessionState::Closed => Err(SessionError::NotOpen(self.state)),
        }
    }

    /// Transitions to `Closed`. Idempotent; called on every exit path.
    pub fn close(&mut self) {
        self.state = SessionState::Closed;
    }

    /// Applies the emission policy to one chunk's recognition result.
    ///
    /// A usable result (at least one segment with an alternative) resets
    /// the silence counter and yields its top transcript, prefixed with a
    /// newline when the counter had exceeded [`PAUSE_BREAK_THRESHOLD`].
    /// A silent chunk increments the counter and yields nothing.
    pub fn process_chunk(
        &mut self,
        result: &RecognitionResult,
    ) -> Result<Option<String>, SessionError> {
        if self.state != SessionState::Open {
            return Err(SessionError::NotOpen(self.state));
        }

        match result.top_transcript() {
            Some(text) => {
                let emit = if self.consecutive_silent_chunks > PAUSE_BREAK_THRESHOLD {
                    format!("\n{text}")
                } else {
                    text.to_string()
                };
                self.consecutive_silent_chunks = 0;
                Ok(Some(emit))
            }
            None => {
                self.consecutive_silent_chunks += 1;
                debug!(
                    silent_chunks = self.consecutive_silent_chunks,
                    "Silent chunk, nothing to emit"
                );
                Ok(None)
            }
        }
    }
}

impl Default for StreamingSession {
    fn default() -> Self {
        Self::new()
    }
}
