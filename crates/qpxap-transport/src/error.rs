/// Errors that can occur on a HID channel.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred on the channel.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The HID backend reported an error.
    #[error("hid error: {0}")]
    Hid(String),

    /// No interface matched the requested usage page / usage.
    #[error("no device found (usage page {usage_page:#06x}, usage {usage:#06x})")]
    DeviceNotFound { usage_page: u16, usage: u16 },

    /// Failed to open the selected interface.
    #[error("failed to open {path}: {reason}")]
    Open { path: String, reason: String },

    /// The channel has already been released.
    #[error("channel closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, TransportError>;
