use qpxap_frame::FrameError;
use qpxap_transport::TransportError;

/// Malformed textual argument.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// Not an integer.
    #[error("invalid number {value:?}")]
    InvalidNumber { value: String },

    /// A color did not have exactly three components.
    #[error("color must have 3 components, found {found} in {value:?}")]
    ColorComponents { value: String, found: usize },

    /// A required argument was not supplied.
    #[error("missing argument `{field}`")]
    MissingField { field: &'static str },

    /// An argument the operation does not take.
    #[error("unexpected argument `{field}`")]
    UnexpectedField { field: String },

    /// A named argument failed to parse.
    #[error("argument `{field}`: {source}")]
    InvalidArgument {
        field: &'static str,
        source: Box<FormatError>,
    },

    /// Text holds a character with no one-byte encoding.
    #[error("character {ch:?} is above U+00FF and cannot be sent as one byte")]
    NonLatin1Text { ch: char },

    /// Not one of the drawing operations.
    #[error("unknown operation {name:?}")]
    UnknownOperation { name: String },

    /// Malformed script line.
    #[error("syntax error: {0}")]
    Syntax(String),
}

impl FormatError {
    /// Attach the name of the argument this error came from.
    pub fn in_field(self, field: &'static str) -> Self {
        FormatError::InvalidArgument {
            field,
            source: Box::new(self),
        }
    }
}

/// Errors that can occur in painter operations.
#[derive(Debug, thiserror::Error)]
pub enum PainterError {
    /// An argument could not be encoded.
    #[error("{op}: {source}")]
    Format {
        op: &'static str,
        source: FormatError,
    },

    /// Framing or exchanging a command failed.
    #[error("{op}: {source}")]
    Send {
        op: &'static str,
        source: FrameError,
    },

    /// Releasing the channel failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The session has already been closed.
    #[error("painter session closed")]
    Closed,
}

pub type Result<T> = std::result::Result<T, PainterError>;
