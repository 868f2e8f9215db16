//! Drawing commands and their payload encoding.
//!
//! Every payload starts with the same four bytes:
//!
//! ```text
//! [COMMAND_GROUP, COMMAND_SUBGROUP, <command id>, to_u8(display)]
//! ```
//!
//! followed by the operation's arguments in a fixed order. Coordinates and
//! sizes are 16-bit little-endian; display, image, font and `filled` are one
//! byte; colors are three bytes; text is one byte per character, so only
//! characters up to U+00FF can be sent.

use std::fmt;
use std::str::FromStr;

use bytes::BufMut;

use crate::codec::{parse_bool, parse_color, parse_int, to16, to_u8, Color};
use crate::error::FormatError;
use crate::session::ScreenSize;

/// XAP route group for Quantum Painter.
pub const COMMAND_GROUP: u8 = 0x02;

/// XAP route subgroup for Quantum Painter drawing.
pub const COMMAND_SUBGROUP: u8 = 0x02;

/// The drawing operations, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Clear,
    SetPixel,
    Line,
    Rect,
    Circle,
    Ellipse,
    DrawImage,
    DrawImageRecolor,
    Animate,
    AnimateRecolor,
    DrawText,
    DrawTextRecolor,
}

impl Operation {
    /// Every operation, in command-id order.
    pub const ALL: [Operation; 12] = [
        Operation::Clear,
        Operation::SetPixel,
        Operation::Line,
        Operation::Rect,
        Operation::Circle,
        Operation::Ellipse,
        Operation::DrawImage,
        Operation::DrawImageRecolor,
        Operation::Animate,
        Operation::AnimateRecolor,
        Operation::DrawText,
        Operation::DrawTextRecolor,
    ];

    /// Command id byte.
    pub const fn id(self) -> u8 {
        match self {
            Operation::Clear => 0x01,
            Operation::SetPixel => 0x02,
            Operation::Line => 0x03,
            Operation::Rect => 0x04,
            Operation::Circle => 0x05,
            Operation::Ellipse => 0x06,
            Operation::DrawImage => 0x07,
            Operation::DrawImageRecolor => 0x08,
            Operation::Animate => 0x09,
            Operation::AnimateRecolor => 0x0A,
            Operation::DrawText => 0x0B,
            Operation::DrawTextRecolor => 0x0C,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Operation::Clear => "clear",
            Operation::SetPixel => "setpixel",
            Operation::Line => "line",
            Operation::Rect => "rect",
            Operation::Circle => "circle",
            Operation::Ellipse => "ellipse",
            Operation::DrawImage => "drawimage",
            Operation::DrawImageRecolor => "drawimage_recolor",
            Operation::Animate => "animate",
            Operation::AnimateRecolor => "animate_recolor",
            Operation::DrawText => "drawtext",
            Operation::DrawTextRecolor => "drawtext_recolor",
        }
    }

    /// Argument names, in emission order.
    pub const fn fields(self) -> &'static [&'static str] {
        match self {
            Operation::Clear => &["display"],
            Operation::SetPixel => &["display", "x", "y", "color"],
            Operation::Line => &["display", "x0", "y0", "x1", "y1", "color"],
            Operation::Rect => &[
                "display", "left", "top", "right", "bottom", "color", "filled",
            ],
            Operation::Circle => &["display", "x", "y", "radius", "color", "filled"],
            Operation::Ellipse => &["display", "x", "y", "sizex", "sizey", "color", "filled"],
            Operation::DrawImage | Operation::Animate => &["display", "x", "y", "img"],
            Operation::DrawImageRecolor | Operation::AnimateRecolor => {
                &["display", "x", "y", "img", "fg_color", "bg_color"]
            }
            Operation::DrawText => &["display", "x", "y", "font", "text"],
            Operation::DrawTextRecolor => {
                &["display", "x", "y", "font", "fg_color", "bg_color", "text"]
            }
        }
    }
}

impl FromStr for Operation {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Operation::ALL
            .into_iter()
            .find(|op| op.name() == wanted)
            .ok_or_else(|| FormatError::UnknownOperation {
                name: s.to_string(),
            })
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One drawing operation with its arguments.
///
/// Numeric arguments are kept as given and truncated only when encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Clear {
        display: i64,
    },
    SetPixel {
        display: i64,
        x: i64,
        y: i64,
        color: Color,
    },
    Line {
        display: i64,
        x0: i64,
        y0: i64,
        x1: i64,
        y1: i64,
        color: Color,
    },
    Rect {
        display: i64,
        left: i64,
        top: i64,
        right: i64,
        bottom: i64,
        color: Color,
        filled: bool,
    },
    Circle {
        display: i64,
        x: i64,
        y: i64,
        radius: i64,
        color: Color,
        filled: bool,
    },
    Ellipse {
        display: i64,
        x: i64,
        y: i64,
        sizex: i64,
        sizey: i64,
        color: Color,
        filled: bool,
    },
    DrawImage {
        display: i64,
        x: i64,
        y: i64,
        img: i64,
    },
    DrawImageRecolor {
        display: i64,
        x: i64,
        y: i64,
        img: i64,
        fg: Color,
        bg: Color,
    },
    Animate {
        display: i64,
        x: i64,
        y: i64,
        img: i64,
    },
    AnimateRecolor {
        display: i64,
        x: i64,
        y: i64,
        img: i64,
        fg: Color,
        bg: Color,
    },
    DrawText {
        display: i64,
        x: i64,
        y: i64,
        font: i64,
        text: String,
    },
    DrawTextRecolor {
        display: i64,
        x: i64,
        y: i64,
        font: i64,
        fg: Color,
        bg: Color,
        text: String,
    },
}

impl Command {
    pub fn operation(&self) -> Operation {
        match self {
            Command::Clear { .. } => Operation::Clear,
            Command::SetPixel { .. } => Operation::SetPixel,
            Command::Line { .. } => Operation::Line,
            Command::Rect { .. } => Operation::Rect,
            Command::Circle { .. } => Operation::Circle,
            Command::Ellipse { .. } => Operation::Ellipse,
            Command::DrawImage { .. } => Operation::DrawImage,
            Command::DrawImageRecolor { .. } => Operation::DrawImageRecolor,
            Command::Animate { .. } => Operation::Animate,
            Command::AnimateRecolor { .. } => Operation::AnimateRecolor,
            Command::DrawText { .. } => Operation::DrawText,
            Command::DrawTextRecolor { .. } => Operation::DrawTextRecolor,
        }
    }

    pub fn id(&self) -> u8 {
        self.operation().id()
    }

    pub fn name(&self) -> &'static str {
        self.operation().name()
    }

    /// Display index this command targets, before truncation.
    pub fn display(&self) -> i64 {
        match *self {
            Command::Clear { display }
            | Command::SetPixel { display, .. }
            | Command::Line { display, .. }
            | Command::Rect { display, .. }
            | Command::Circle { display, .. }
            | Command::Ellipse { display, .. }
            | Command::DrawImage { display, .. }
            | Command::DrawImageRecolor { display, .. }
            | Command::Animate { display, .. }
            | Command::AnimateRecolor { display, .. }
            | Command::DrawText { display, .. }
            | Command::DrawTextRecolor { display, .. } => display,
        }
    }

    /// Encode this command as a single payload.
    ///
    /// For [`Command::Clear`] this is only the device-level clear; use
    /// [`payloads`](Self::payloads) for what actually goes on the wire.
    ///
    /// Fails only for text holding a character above U+00FF.
    pub fn encode(&self) -> Result<Vec<u8>, FormatError> {
        let mut out = Vec::with_capacity(16);
        out.put_slice(&[COMMAND_GROUP, COMMAND_SUBGROUP, self.id(), to_u8(self.display())]);

        match self {
            Command::Clear { .. } => {}
            Command::SetPixel { x, y, color, .. } => {
                put_coords(&mut out, &[*x, *y]);
                out.put_slice(&color.as_bytes());
            }
            Command::Line {
                x0,
                y0,
                x1,
                y1,
                color,
                ..
            } => {
                put_coords(&mut out, &[*x0, *y0, *x1, *y1]);
                out.put_slice(&color.as_bytes());
            }
            Command::Rect {
                left,
                top,
                right,
                bottom,
                color,
                filled,
                ..
            } => {
                put_coords(&mut out, &[*left, *top, *right, *bottom]);
                out.put_slice(&color.as_bytes());
                out.put_u8(u8::from(*filled));
            }
            Command::Circle {
                x,
                y,
                radius,
                color,
                filled,
                ..
            } => {
                put_coords(&mut out, &[*x, *y, *radius]);
                out.put_slice(&color.as_bytes());
                out.put_u8(u8::from(*filled));
            }
            Command::Ellipse {
                x,
                y,
                sizex,
                sizey,
                color,
                filled,
                ..
            } => {
                put_coords(&mut out, &[*x, *y, *sizex, *sizey]);
                out.put_slice(&color.as_bytes());
                out.put_u8(u8::from(*filled));
            }
            Command::DrawImage { x, y, img, .. } | Command::Animate { x, y, img, .. } => {
                put_coords(&mut out, &[*x, *y]);
                out.put_u8(to_u8(*img));
            }
            Command::DrawImageRecolor {
                x, y, img, fg, bg, ..
            }
            | Command::AnimateRecolor {
                x, y, img, fg, bg, ..
            } => {
                put_coords(&mut out, &[*x, *y]);
                out.put_u8(to_u8(*img));
                out.put_slice(&fg.as_bytes());
                out.put_slice(&bg.as_bytes());
            }
            Command::DrawText {
                x, y, font, text, ..
            } => {
                put_coords(&mut out, &[*x, *y]);
                out.put_u8(to_u8(*font));
                put_text(&mut out, text)?;
            }
            Command::DrawTextRecolor {
                x,
                y,
                font,
                fg,
                bg,
                text,
                ..
            } => {
                put_coords(&mut out, &[*x, *y]);
                out.put_u8(to_u8(*font));
                out.put_slice(&fg.as_bytes());
                out.put_slice(&bg.as_bytes());
                put_text(&mut out, text)?;
            }
        }

        Ok(out)
    }

    /// Every payload this command puts on the wire, in order.
    ///
    /// The device-level clear has no visible effect on its own, so `Clear`
    /// is followed by a filled black rectangle over the whole `screen`.
    /// All other commands are a single payload.
    pub fn payloads(&self, screen: ScreenSize) -> Result<Vec<Vec<u8>>, FormatError> {
        match *self {
            Command::Clear { display } => {
                let blank = Command::Rect {
                    display,
                    left: 0,
                    top: 0,
                    right: i64::from(screen.width),
                    bottom: i64::from(screen.height),
                    color: Color::BLACK,
                    filled: true,
                };
                Ok(vec![self.encode()?, blank.encode()?])
            }
            _ => Ok(vec![self.encode()?]),
        }
    }

    /// Build a command from textual arguments.
    ///
    /// `lookup` maps an argument name from [`Operation::fields`] to its raw
    /// text. Numbers go through [`parse_int`], colors through
    /// [`parse_color`], `filled` through [`parse_bool`]; text is taken as is
    /// but must stay within U+00FF.
    pub fn from_fields<'a, F>(op: Operation, lookup: F) -> Result<Self, FormatError>
    where
        F: FnMut(&str) -> Option<&'a str>,
    {
        let mut args = Fields { lookup };
        let display = args.int("display")?;

        let command = match op {
            Operation::Clear => Command::Clear { display },
            Operation::SetPixel => Command::SetPixel {
                display,
                x: args.int("x")?,
                y: args.int("y")?,
                color: args.color("color")?,
            },
            Operation::Line => Command::Line {
                display,
                x0: args.int("x0")?,
                y0: args.int("y0")?,
                x1: args.int("x1")?,
                y1: args.int("y1")?,
                color: args.color("color")?,
            },
            Operation::Rect => Command::Rect {
                display,
                left: args.int("left")?,
                top: args.int("top")?,
                right: args.int("right")?,
                bottom: args.int("bottom")?,
                color: args.color("color")?,
                filled: args.flag("filled")?,
            },
            Operation::Circle => Command::Circle {
                display,
                x: args.int("x")?,
                y: args.int("y")?,
                radius: args.int("radius")?,
                color: args.color("color")?,
                filled: args.flag("filled")?,
            },
            Operation::Ellipse => Command::Ellipse {
                display,
                x: args.int("x")?,
                y: args.int("y")?,
                sizex: args.int("sizex")?,
                sizey: args.int("sizey")?,
                color: args.color("color")?,
                filled: args.flag("filled")?,
            },
            Operation::DrawImage => Command::DrawImage {
                display,
                x: args.int("x")?,
                y: args.int("y")?,
                img: args.int("img")?,
            },
            Operation::DrawImageRecolor => Command::DrawImageRecolor {
                display,
                x: args.int("x")?,
                y: args.int("y")?,
                img: args.int("img")?,
                fg: args.color("fg_color")?,
                bg: args.color("bg_color")?,
            },
            Operation::Animate => Command::Animate {
                display,
                x: args.int("x")?,
                y: args.int("y")?,
                img: args.int("img")?,
            },
            Operation::AnimateRecolor => Command::AnimateRecolor {
                display,
                x: args.int("x")?,
                y: args.int("y")?,
                img: args.int("img")?,
                fg: args.color("fg_color")?,
                bg: args.color("bg_color")?,
            },
            Operation::DrawText => Command::DrawText {
                display,
                x: args.int("x")?,
                y: args.int("y")?,
                font: args.int("font")?,
                text: args.text("text")?,
            },
            Operation::DrawTextRecolor => Command::DrawTextRecolor {
                display,
                x: args.int("x")?,
                y: args.int("y")?,
                font: args.int("font")?,
                fg: args.color("fg_color")?,
                bg: args.color("bg_color")?,
                text: args.text("text")?,
            },
        };

        Ok(command)
    }
}

fn put_coords(out: &mut Vec<u8>, values: &[i64]) {
    for &value in values {
        out.put_slice(&to16(value));
    }
}

// One byte per character; code points above 0xFF keep their low byte.
fn put_text(out: &mut Vec<u8>, text: &str) -> Result<(), FormatError> {
    for ch in text.chars() {
        let byte = u8::try_from(ch).map_err(|_| FormatError::NonLatin1Text { ch })?;
        out.put_u8(byte);
    }
    Ok(())
}

fn check_text(text: &str) -> Result<(), FormatError> {
    match text.chars().find(|&ch| u8::try_from(ch).is_err()) {
        Some(ch) => Err(FormatError::NonLatin1Text { ch }),
        None => Ok(()),
    }
}

struct Fields<F> {
    lookup: F,
}

impl<'a, F> Fields<F>
where
    F: FnMut(&str) -> Option<&'a str>,
{
    fn raw(&mut self, field: &'static str) -> Result<&'a str, FormatError> {
        (self.lookup)(field).ok_or(FormatError::MissingField { field })
    }

    fn int(&mut self, field: &'static str) -> Result<i64, FormatError> {
        parse_int(self.raw(field)?).map_err(|err| err.in_field(field))
    }

    fn color(&mut self, field: &'static str) -> Result<Color, FormatError> {
        parse_color(self.raw(field)?).map_err(|err| err.in_field(field))
    }

    fn flag(&mut self, field: &'static str) -> Result<bool, FormatError> {
        Ok(parse_bool(self.raw(field)?))
    }

    fn text(&mut self, field: &'static str) -> Result<String, FormatError> {
        let raw = self.raw(field)?;
        check_text(raw).map_err(|err| err.in_field(field))?;
        Ok(raw.to_string())
    }
}
