//! Conversions from host-side values to wire fields.
//!
//! Every numeric field on the wire is either one byte or two bytes
//! (little-endian). Conversions truncate silently: only the low 8 or 16 bits
//! of a value survive, and that is never an error.

use std::fmt;
use std::str::FromStr;

use crate::error::FormatError;

/// Words accepted as `true` by [`parse_bool`] (compared case-insensitively).
const TRUE_WORDS: [&str; 4] = ["true", "yes", "y", "1"];

/// Low 8 bits of `value`.
pub fn to_u8(value: i64) -> u8 {
    (value & 0xFF) as u8
}

/// Low 16 bits of `value` as `[low, high]`.
///
/// # Example
/// ```
/// use qpxap_painter::to16;
/// assert_eq!(to16(480), [224, 1]);
/// assert_eq!(to16(0x1_0001), [1, 0]);
/// ```
pub fn to16(value: i64) -> [u8; 2] {
    [(value & 0xFF) as u8, ((value >> 8) & 0xFF) as u8]
}

/// Parse a decimal integer, ignoring surrounding whitespace.
pub fn parse_int(text: &str) -> Result<i64, FormatError> {
    text.trim()
        .parse::<i64>()
        .map_err(|_| FormatError::InvalidNumber {
            value: text.to_string(),
        })
}

/// Permissive boolean: true only for `true`, `yes`, `y` or `1` in any case.
///
/// Anything else, including unrecognized words, is `false`.
pub fn parse_bool(text: &str) -> bool {
    let lowered = text.to_lowercase();
    TRUE_WORDS.contains(&lowered.as_str())
}

/// Parse `"[a, b, c]"` or `"a, b, c"` into a [`Color`].
pub fn parse_color(text: &str) -> Result<Color, FormatError> {
    let cleaned = text.replace(['[', ']', ' '], "");
    let parts: Vec<&str> = cleaned.split(',').collect();
    if parts.len() != 3 {
        return Err(FormatError::ColorComponents {
            value: text.to_string(),
            found: parts.len(),
        });
    }

    let mut channels = [0u8; 3];
    for (slot, part) in channels.iter_mut().zip(&parts) {
        *slot = to_u8(parse_int(part)?);
    }
    Ok(Color(channels))
}

/// Three opaque 8-bit color channels.
///
/// The device interprets them (Quantum Painter uses hue, saturation, value);
/// this crate only carries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color(pub [u8; 3]);

impl Color {
    pub const BLACK: Color = Color([0, 0, 0]);

    pub const fn new(a: u8, b: u8, c: u8) -> Self {
        Self([a, b, c])
    }

    /// Wire bytes, in channel order.
    pub const fn as_bytes(&self) -> [u8; 3] {
        self.0
    }
}

impl FromStr for Color {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "[{a}, {b}, {c}]")
    }
}
