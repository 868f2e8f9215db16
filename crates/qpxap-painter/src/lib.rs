//! Quantum Painter drawing commands over XAP.
//!
//! This is the layer applications use. Open a [`Painter`] on a HID channel
//! and call drawing operations; each one is encoded into a command payload,
//! framed, written, and acknowledged before the call returns.

pub mod codec;
pub mod command;
pub mod error;
pub mod script;
pub mod session;

pub use codec::{parse_bool, parse_color, parse_int, to16, to_u8, Color};
pub use command::{Command, Operation, COMMAND_GROUP, COMMAND_SUBGROUP};
pub use error::{FormatError, PainterError, Result};
pub use script::{parse_line, parse_script, ScriptError};
pub use session::{Painter, ScreenSize, SessionConfig};
