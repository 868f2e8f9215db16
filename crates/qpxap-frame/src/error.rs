use qpxap_transport::TransportError;

/// Errors that can occur while framing or exchanging a report.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload does not fit in one frame.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The channel accepted fewer bytes than a whole report.
    #[error("short write ({written} of {expected} bytes)")]
    ShortWrite { written: usize, expected: usize },

    /// The underlying channel failed.
    #[error("frame transport error: {0}")]
    Transport(#[from] TransportError),
}

pub type Result<T> = std::result::Result<T, FrameError>;
