use std::time::Duration;

use bytes::{BufMut, Bytes};

use crate::error::{FrameError, Result};

/// Size of every report on the wire (excluding an optional report-id prefix).
pub const FRAME_SIZE: usize = 64;

/// Request header: token (2) + payload length (1) = 3 bytes.
pub const HEADER_SIZE: usize = 3;

/// Largest payload that fits in one frame.
pub const MAX_PAYLOAD: usize = FRAME_SIZE - HEADER_SIZE;

/// Client token. Arbitrary, but constant for this client.
pub const TOKEN: [u8; 2] = [0x42, 0x42];

/// Response header: token (2) + flags (1) + payload length (1) = 4 bytes.
pub const RESPONSE_HEADER_SIZE: usize = 4;

/// Response flag set by the device when a request was handled.
pub const RESPONSE_FLAG_SUCCESS: u8 = 1 << 0;

/// How long to wait for the reply to each request.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(1000);

/// Encode a payload into a request frame.
///
/// Wire format:
/// ```text
/// ┌──────────────┬───────────┬──────────────┬──────────────────┐
/// │ Token (2B)   │ Length    │ Payload      │ Zero padding     │
/// │ 0x42 0x42    │ (1B)      │ (Length B)   │ (61 - Length B)  │
/// └──────────────┴───────────┴──────────────┴──────────────────┘
/// ```
///
/// The length is checked before `dst` is touched.
pub fn encode_frame(payload: &[u8], dst: &mut [u8; FRAME_SIZE]) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }

    dst.fill(0);
    let mut cursor = &mut dst[..];
    cursor.put_slice(&TOKEN);
    cursor.put_u8(payload.len() as u8);
    cursor.put_slice(payload);
    Ok(())
}

/// A reply report, as far as it can be interpreted.
///
/// Nothing here is checked against the request that triggered it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Token echoed by the device.
    pub token: [u8; 2],
    /// Response flags.
    pub flags: u8,
    /// Payload length declared by the device.
    pub length: u8,
    /// Payload bytes actually present in the report.
    pub payload: Bytes,
}

impl Response {
    /// Whether the device flagged the request as handled.
    pub fn succeeded(&self) -> bool {
        self.flags & RESPONSE_FLAG_SUCCESS != 0
    }

    /// Whether the echoed token is ours.
    pub fn token_matches(&self) -> bool {
        self.token == TOKEN
    }
}

/// Interpret a reply report.
///
/// Returns `None` if `src` is shorter than the response header.
pub fn decode_response(src: &[u8]) -> Option<Response> {
    if src.len() < RESPONSE_HEADER_SIZE {
        return None;
    }

    let length = src[3];
    let available = src.len() - RESPONSE_HEADER_SIZE;
    let end = RESPONSE_HEADER_SIZE + usize::from(length).min(available);

    Some(Response {
        token: [src[0], src[1]],
        flags: src[2],
        length,
        payload: Bytes::copy_from_slice(&src[RESPONSE_HEADER_SIZE..end]),
    })
}

/// Configuration for frame exchanges.
#[derive(Debug, Clone)]
pub struct FrameConfig {
    /// Bounded wait for each reply. Default: 1000 ms.
    pub read_timeout: Duration,
    /// Prepend a zero report-id byte to every request (65 bytes on the wire).
    /// Default: on for Windows, off elsewhere.
    pub report_id_prefix: bool,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            read_timeout: DEFAULT_READ_TIMEOUT,
            report_id_prefix: cfg!(windows),
        }
    }
}
