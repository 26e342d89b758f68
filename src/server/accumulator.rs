//! Request body accumulation
//!
//! Buffers the incoming byte stream of one request in arrival order until
//! the client signals completion. A transport error or an oversized body is
//! terminal; no partial data escapes to a handler.

use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};

use crate::server::error::AccumulateError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Receiving,
    Complete,
    Errored,
}

/// Append-only chunk buffer with a terminal state and a size cap
#[derive(Debug)]
pub struct RequestAccumulator {
    chunks: Vec<Bytes>,
    received: usize,
    limit: usize,
    state: State,
}

impl RequestAccumulator {
    #[must_use]
    pub const fn new(limit: usize) -> Self {
        Self {
            chunks: Vec::new(),
            received: 0,
            limit,
            state: State::Receiving,
        }
    }

    /// Drain the body stream and return the concatenated bytes.
    ///
    /// Chunks are appended in arrival order. A stream-level error transitions
    /// to `errored` and surfaces as [`AccumulateError::Transport`]; exceeding
    /// the size cap surfaces as [`AccumulateError::TooLarge`]. Once terminal,
    /// no further chunks are accepted.
    pub async fn collect<B>(mut self, mut body: B) -> Result<Bytes, AccumulateError>
    where
        B: Body<Data = Bytes> + Unpin,
        B::Error: std::fmt::Display,
    {
        loop {
            match body.frame().await {
                Some(Ok(frame)) => {
                    if let Ok(chunk) = frame.into_data() {
                        self.push(chunk)?;
                    }
                }
                Some(Err(e)) => {
                    self.state = State::Errored;
                    return Err(AccumulateError::Transport(e.to_string()));
                }
                None => break,
            }
        }
        self.state = State::Complete;
        Ok(self.into_bytes())
    }

    fn push(&mut self, chunk: Bytes) -> Result<(), AccumulateError> {
        debug_assert_eq!(self.state, State::Receiving);
        self.received += chunk.len();
        if self.received > self.limit {
            self.state = State::Errored;
            return Err(AccumulateError::TooLarge { limit: self.limit });
        }
        self.chunks.push(chunk);
        Ok(())
    }

    fn into_bytes(mut self) -> Bytes {
        match self.chunks.len() {
            0 => Bytes::new(),
            1 => self.chunks.remove(0),
            _ => {
                let mut buffer = Vec::with_capacity(self.received);
                for chunk in &self.chunks {
                    buffer.extend_from_slice(chunk);
                }
                Bytes::from(buffer)
            }
        }
    }
}
