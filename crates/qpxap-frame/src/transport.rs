use qpxap_transport::HidChannel;
use tracing::{debug, trace};

use crate::codec::{decode_response, encode_frame, FrameConfig, Response, FRAME_SIZE};
use crate::error::{FrameError, Result};

/// Exchanges framed requests over a [`HidChannel`].
///
/// One request in flight at a time: each [`send`](Self::send) writes a whole
/// frame and then waits for one reply before returning.
pub struct FrameTransport<C> {
    inner: C,
    config: FrameConfig,
}

impl<C: HidChannel> FrameTransport<C> {
    /// Create a transport with default configuration.
    pub fn new(inner: C) -> Self {
        Self::with_config(inner, FrameConfig::default())
    }

    /// Create a transport with explicit configuration.
    pub fn with_config(inner: C, config: FrameConfig) -> Self {
        Self { inner, config }
    }

    /// Frame `payload`, write it, and wait for the reply.
    ///
    /// Returns `Ok(None)` when no reply arrived within the read timeout; that
    /// is not an error at this layer. Nothing is written if the payload does
    /// not fit in a frame.
    pub fn send(&mut self, payload: &[u8]) -> Result<Option<Response>> {
        let mut frame = [0u8; FRAME_SIZE];
        encode_frame(payload, &mut frame)?;

        let mut prefixed = [0u8; FRAME_SIZE + 1];
        let wire: &[u8] = if self.config.report_id_prefix {
            prefixed[1..].copy_from_slice(&frame);
            &prefixed
        } else {
            &frame
        };

        debug!(payload_len = payload.len(), wire_len = wire.len(), "sending frame");
        trace!(frame = ?wire, "frame bytes");

        let written = self.inner.write(wire)?;
        if written < wire.len() {
            return Err(FrameError::ShortWrite {
                written,
                expected: wire.len(),
            });
        }

        let mut reply = [0u8; FRAME_SIZE];
        let read = self.inner.read_timeout(&mut reply, self.config.read_timeout)?;
        if read == 0 {
            debug!(timeout = ?self.config.read_timeout, "no reply before timeout");
            return Ok(None);
        }

        let response = decode_response(&reply[..read]);
        if let Some(response) = &response {
            trace!(
                flags = response.flags,
                length = response.length,
                token_matches = response.token_matches(),
                "reply received"
            );
        }
        Ok(response)
    }

    /// Borrow the underlying channel.
    pub fn get_ref(&self) -> &C {
        &self.inner
    }

    /// Mutably borrow the underlying channel.
    pub fn get_mut(&mut self) -> &mut C {
        &mut self.inner
    }

    /// Consume the transport and return the channel.
    pub fn into_inner(self) -> C {
        self.inner
    }

    /// Current configuration.
    pub fn config(&self) -> &FrameConfig {
        &self.config
    }
}
