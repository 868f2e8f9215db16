//! Fixed-size token framing for XAP request/response exchanges.
//!
//! Every request is exactly one 64-byte report:
//! - A 2-byte token (`0x42 0x42`) identifying this client
//! - A 1-byte payload length (0..=61)
//! - The payload, zero padded to the end of the report
//!
//! Each request is answered by exactly one 64-byte report, read with a
//! bounded wait. The reply is surfaced for logging but never validated.

pub mod codec;
pub mod error;
pub mod transport;

pub use codec::{
    decode_response, encode_frame, FrameConfig, Response, DEFAULT_READ_TIMEOUT, FRAME_SIZE,
    HEADER_SIZE, MAX_PAYLOAD, RESPONSE_FLAG_SUCCESS, RESPONSE_HEADER_SIZE, TOKEN,
};
pub use error::{FrameError, Result};
pub use transport::FrameTransport;
