use std::fmt;
use std::io;

use qpxap_frame::FrameError;
use qpxap_painter::{FormatError, PainterError, ScriptError};
use qpxap_transport::TransportError;

// Process exit codes.
pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const TRANSPORT_ERROR: i32 = 3;
pub const NOT_FOUND: i32 = 4;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERRUPTED: i32 = 130;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => NOT_FOUND,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn transport_error(context: &str, err: TransportError) -> CliError {
    match err {
        TransportError::Io(source) => io_error(context, source),
        TransportError::DeviceNotFound { .. } => {
            CliError::new(NOT_FOUND, format!("{context}: {err}"))
        }
        other => CliError::new(TRANSPORT_ERROR, format!("{context}: {other}")),
    }
}

pub fn frame_error(context: &str, err: FrameError) -> CliError {
    match err {
        FrameError::Transport(err) => transport_error(context, err),
        FrameError::PayloadTooLarge { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        FrameError::ShortWrite { .. } => {
            CliError::new(TRANSPORT_ERROR, format!("{context}: {err}"))
        }
    }
}

pub fn format_error(context: &str, err: FormatError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn script_error(context: &str, err: ScriptError) -> CliError {
    CliError::new(DATA_INVALID, format!("{context}: {err}"))
}

pub fn painter_error(context: &str, err: PainterError) -> CliError {
    match err {
        PainterError::Format { op, source } => format_error(&format!("{context}: {op}"), source),
        PainterError::Send { op, source } => frame_error(&format!("{context}: {op}"), source),
        PainterError::Transport(err) => transport_error(context, err),
        PainterError::Closed => CliError::new(FAILURE, format!("{context}: {err}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_not_found_maps_to_not_found() {
        let err = transport_error(
            "open",
            TransportError::DeviceNotFound {
                usage_page: 0xFF51,
                usage: 0x58,
            },
        );
        assert_eq!(err.code, NOT_FOUND);
        assert!(err.message.starts_with("open: "));
    }

    #[test]
    fn oversized_payload_is_data_invalid() {
        let err = painter_error(
            "draw",
            PainterError::Send {
                op: "drawtext",
                source: FrameError::PayloadTooLarge { size: 70, max: 61 },
            },
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.starts_with("draw: drawtext: "));
    }

    #[test]
    fn hid_failure_during_send_is_transport_error() {
        let err = painter_error(
            "draw",
            PainterError::Send {
                op: "clear",
                source: FrameError::Transport(TransportError::Hid("gone".to_string())),
            },
        );
        assert_eq!(err.code, TRANSPORT_ERROR);
    }

    #[test]
    fn bad_argument_is_data_invalid() {
        let err = painter_error(
            "draw",
            PainterError::Format {
                op: "setpixel",
                source: FormatError::MissingField { field: "color" },
            },
        );
        assert_eq!(err.code, DATA_INVALID);
        assert!(err.message.contains("missing argument `color`"));
    }
}
