//! Half-duplex HID report channel abstraction.
//!
//! This is the lowest layer of qpxap. A [`HidChannel`] writes one output
//! report and reads one input report with a bounded wait; everything above
//! (framing, command encoding, sessions) is written against this trait.
//!
//! With the `hidapi` feature, [`HidDevice`] implements the trait over a real
//! HID interface and [`discover`] finds XAP endpoints by usage page / usage.

pub mod error;
pub mod traits;

#[cfg(feature = "hidapi")]
pub mod hid;

pub use error::{Result, TransportError};
pub use traits::HidChannel;

#[cfg(feature = "hidapi")]
pub use hid::{discover, open, open_first, DeviceInfo, HidDevice};

/// Usage page of the XAP raw HID interface.
pub const XAP_USAGE_PAGE: u16 = 0xFF51;

/// Usage of the XAP raw HID interface.
pub const XAP_USAGE: u16 = 0x0058;
