//! Draw on QMK Quantum Painter displays over XAP.
//!
//! qpxap sends drawing commands (pixels, shapes, images, text) to a display
//! controller inside a keyboard, using 64-byte XAP raw HID reports.
//!
//! # Crate Structure
//!
//! - [`transport`]: HID report channel abstraction and device discovery
//! - [`frame`]: 64-byte request framing and response decoding
//! - [`painter`]: drawing commands and the [`painter::Painter`] session
//!
//! ```
//! use qpxap::painter::{Color, Command, ScreenSize};
//!
//! let cmd = Command::SetPixel { display: 0, x: 10, y: 20, color: Color::new(0, 255, 255) };
//! let payloads = cmd.payloads(ScreenSize::default()).unwrap();
//! assert_eq!(payloads[0], vec![2, 2, 2, 0, 10, 0, 20, 0, 0, 255, 255]);
//! ```

/// Re-export transport types.
pub mod transport {
    pub use qpxap_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use qpxap_frame::*;
}

/// Re-export painter types.
pub mod painter {
    pub use qpxap_painter::*;
}
