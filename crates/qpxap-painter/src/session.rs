use qpxap_frame::{FrameConfig, FrameError, FrameTransport, MAX_PAYLOAD};
use qpxap_transport::HidChannel;
use tracing::{debug, info, warn};

use crate::codec::Color;
use crate::command::{Command, Operation};
use crate::error::{PainterError, Result};

/// Size of the target screen, used by `clear`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenSize {
    pub width: u16,
    pub height: u16,
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self {
            width: 480,
            height: 320,
        }
    }
}

/// Configuration for a painter session.
#[derive(Debug, Clone, Default)]
pub struct SessionConfig {
    /// Screen covered by `clear`. Default: 480x320.
    pub screen: ScreenSize,
    /// Clear this display as soon as the session opens. Default: off.
    pub clear_on_open: Option<u8>,
    /// Framing options for the underlying transport.
    pub frame: FrameConfig,
}

/// A drawing session over one HID channel.
///
/// The session owns the channel and releases it exactly once: on the first
/// [`close`](Self::close), or on drop if it was never closed.
pub struct Painter<C: HidChannel> {
    transport: Option<FrameTransport<C>>,
    config: SessionConfig,
}

impl<C: HidChannel> Painter<C> {
    /// Open a session with default configuration.
    pub fn new(channel: C) -> Result<Self> {
        Self::open(channel, SessionConfig::default())
    }

    /// Open a session with explicit configuration.
    ///
    /// If `clear_on_open` is set and the clear fails, the channel is released
    /// before the error is returned.
    pub fn open(channel: C, config: SessionConfig) -> Result<Self> {
        info!(device = %channel.describe(), "opening painter session");
        let transport = FrameTransport::with_config(channel, config.frame.clone());
        let mut painter = Self {
            transport: Some(transport),
            config,
        };

        if let Some(display) = painter.config.clear_on_open {
            painter.clear(i64::from(display))?;
        }
        Ok(painter)
    }

    /// Encode and send every payload of `command`, in order.
    ///
    /// All payloads are encoded and checked against the frame size before
    /// the first write. Multi-step commands stop at the first failed step; earlier
    /// steps stay applied on the device.
    pub fn execute(&mut self, command: &Command) -> Result<()> {
        let op = command.name();
        let payloads = command
            .payloads(self.config.screen)
            .map_err(|source| PainterError::Format { op, source })?;
        let transport = self.transport.as_mut().ok_or(PainterError::Closed)?;

        if let Some(oversized) = payloads.iter().find(|p| p.len() > MAX_PAYLOAD) {
            return Err(PainterError::Send {
                op,
                source: FrameError::PayloadTooLarge {
                    size: oversized.len(),
                    max: MAX_PAYLOAD,
                },
            });
        }

        for (step, payload) in payloads.iter().enumerate() {
            match transport.send(payload) {
                Ok(reply) => {
                    debug!(op, step, replied = reply.is_some(), "command sent");
                }
                Err(source) => {
                    if step > 0 {
                        warn!(op, step, "command interrupted after partial output");
                    }
                    return Err(PainterError::Send { op, source });
                }
            }
        }
        Ok(())
    }

    /// Parse textual arguments for `op` and execute the result.
    pub fn call<'a, F>(&mut self, op: Operation, lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<&'a str>,
    {
        let command = Command::from_fields(op, lookup).map_err(|source| PainterError::Format {
            op: op.name(),
            source,
        })?;
        self.execute(&command)
    }

    /// Fill the display black.
    pub fn clear(&mut self, display: i64) -> Result<()> {
        self.execute(&Command::Clear { display })
    }

    /// Draw a single pixel.
    pub fn setpixel(&mut self, display: i64, x: i64, y: i64, color: Color) -> Result<()> {
        self.execute(&Command::SetPixel {
            display,
            x,
            y,
            color,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn line(
        &mut self,
        display: i64,
        x0: i64,
        y0: i64,
        x1: i64,
        y1: i64,
        color: Color,
    ) -> Result<()> {
        self.execute(&Command::Line {
            display,
            x0,
            y0,
            x1,
            y1,
            color,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn rect(
        &mut self,
        display: i64,
        left: i64,
        top: i64,
        right: i64,
        bottom: i64,
        color: Color,
        filled: bool,
    ) -> Result<()> {
        self.execute(&Command::Rect {
            display,
            left,
            top,
            right,
            bottom,
            color,
            filled,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn circle(
        &mut self,
        display: i64,
        x: i64,
        y: i64,
        radius: i64,
        color: Color,
        filled: bool,
    ) -> Result<()> {
        self.execute(&Command::Circle {
            display,
            x,
            y,
            radius,
            color,
            filled,
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn ellipse(
        &mut self,
        display: i64,
        x: i64,
        y: i64,
        sizex: i64,
        sizey: i64,
        color: Color,
        filled: bool,
    ) -> Result<()> {
        self.execute(&Command::Ellipse {
            display,
            x,
            y,
            sizex,
            sizey,
            color,
            filled,
        })
    }

    /// Draw an image, by its index in the firmware's image table.
    pub fn drawimage(&mut self, display: i64, x: i64, y: i64, img: i64) -> Result<()> {
        self.execute(&Command::DrawImage { display, x, y, img })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn drawimage_recolor(
        &mut self,
        display: i64,
        x: i64,
        y: i64,
        img: i64,
        fg: Color,
        bg: Color,
    ) -> Result<()> {
        self.execute(&Command::DrawImageRecolor {
            display,
            x,
            y,
            img,
            fg,
            bg,
        })
    }

    /// Start an animation, by its index in the firmware's image table.
    pub fn animate(&mut self, display: i64, x: i64, y: i64, img: i64) -> Result<()> {
        self.execute(&Command::Animate { display, x, y, img })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn animate_recolor(
        &mut self,
        display: i64,
        x: i64,
        y: i64,
        img: i64,
        fg: Color,
        bg: Color,
    ) -> Result<()> {
        self.execute(&Command::AnimateRecolor {
            display,
            x,
            y,
            img,
            fg,
            bg,
        })
    }

    /// Write text with a font from the firmware's font table.
    ///
    /// Text longer than the frame allows fails with
    /// [`FrameError::PayloadTooLarge`] before anything is written.
    pub fn drawtext(&mut self, display: i64, x: i64, y: i64, font: i64, text: &str) -> Result<()> {
        self.execute(&Command::DrawText {
            display,
            x,
            y,
            font,
            text: text.to_string(),
        })
    }

    #[allow(clippy::too_many_arguments)]
    pub fn drawtext_recolor(
        &mut self,
        display: i64,
        x: i64,
        y: i64,
        font: i64,
        fg: Color,
        bg: Color,
        text: &str,
    ) -> Result<()> {
        self.execute(&Command::DrawTextRecolor {
            display,
            x,
            y,
            font,
            fg,
            bg,
            text: text.to_string(),
        })
    }

    /// Release the channel. Later calls do nothing.
    pub fn close(&mut self) -> Result<()> {
        let Some(transport) = self.transport.take() else {
            return Ok(());
        };
        let mut channel = transport.into_inner();
        let description = channel.describe();
        channel.close()?;
        info!(device = %description, "painter session closed");
        Ok(())
    }

    /// The channel, while the session is open.
    pub fn channel(&self) -> Option<&C> {
        self.transport.as_ref().map(FrameTransport::get_ref)
    }

    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }
}

impl<C: HidChannel> Drop for Painter<C> {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            warn!(%err, "failed to release channel");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use qpxap_frame::FRAME_SIZE;
    use qpxap_transport::TransportError;

    use super::*;
    use crate::error::FormatError;

    #[derive(Default)]
    struct Log {
        writes: Vec<Vec<u8>>,
        closes: usize,
    }

    /// Records frames into a log shared with the test.
    struct FakeDevice {
        log: Rc<RefCell<Log>>,
        fail_write_at: Option<usize>,
        fail_close: bool,
    }

    impl FakeDevice {
        fn new() -> (Self, Rc<RefCell<Log>>) {
            let log = Rc::new(RefCell::new(Log::default()));
            let device = Self {
                log: Rc::clone(&log),
                fail_write_at: None,
                fail_close: false,
            };
            (device, log)
        }
    }

    impl HidChannel for FakeDevice {
        fn write(&mut self, data: &[u8]) -> qpxap_transport::Result<usize> {
            let mut log = self.log.borrow_mut();
            if self.fail_write_at == Some(log.writes.len()) {
                return Err(TransportError::Hid("write failed".to_string()));
            }
            log.writes.push(data.to_vec());
            Ok(data.len())
        }

        fn read_timeout(
            &mut self,
            _buf: &mut [u8],
            _timeout: Duration,
        ) -> qpxap_transport::Result<usize> {
            Ok(0)
        }

        fn close(&mut self) -> qpxap_transport::Result<()> {
            self.log.borrow_mut().closes += 1;
            if self.fail_close {
                return Err(TransportError::Hid("close failed".to_string()));
            }
            Ok(())
        }
    }

    fn config() -> SessionConfig {
        SessionConfig {
            frame: FrameConfig {
                report_id_prefix: false,
                ..FrameConfig::default()
            },
            ..SessionConfig::default()
        }
    }

    fn payload_of(frame: &[u8]) -> &[u8] {
        &frame[3..3 + frame[2] as usize]
    }

    #[test]
    fn rect_writes_expected_frame() {
        let (device, log) = FakeDevice::new();
        let mut painter = Painter::open(device, config()).unwrap();
        painter.rect(0, 0, 0, 480, 320, Color::BLACK, true).unwrap();

        let log = log.borrow();
        assert_eq!(log.writes.len(), 1);
        assert_eq!(log.writes[0].len(), FRAME_SIZE);
        assert_eq!(
            payload_of(&log.writes[0]),
            &[2, 2, 4, 0, 0, 0, 0, 0, 224, 1, 64, 1, 0, 0, 0, 1]
        );
    }

    #[test]
    fn clear_sends_two_frames_in_order() {
        let (device, log) = FakeDevice::new();
        let mut painter = Painter::open(device, config()).unwrap();
        painter.clear(0).unwrap();

        let log = log.borrow();
        assert_eq!(log.writes.len(), 2);
        assert_eq!(payload_of(&log.writes[0]), &[2, 2, 1, 0]);
        assert_eq!(
            payload_of(&log.writes[1]),
            &[2, 2, 4, 0, 0, 0, 0, 0, 224, 1, 64, 1, 0, 0, 0, 1]
        );
    }

    #[test]
    fn clear_stops_after_failed_first_step() {
        let (mut device, log) = FakeDevice::new();
        device.fail_write_at = Some(0);
        let mut painter = Painter::open(device, config()).unwrap();

        let err = painter.clear(0).unwrap_err();
        assert!(matches!(err, PainterError::Send { op: "clear", .. }));
        assert!(log.borrow().writes.is_empty());
    }

    #[test]
    fn clear_failing_second_step_keeps_first() {
        let (mut device, log) = FakeDevice::new();
        device.fail_write_at = Some(1);
        let mut painter = Painter::open(device, config()).unwrap();

        assert!(painter.clear(0).is_err());
        assert_eq!(log.borrow().writes.len(), 1);
    }

    #[test]
    fn overlong_text_is_rejected_before_write() {
        let (device, log) = FakeDevice::new();
        let mut painter = Painter::open(device, config()).unwrap();

        let text = "x".repeat(MAX_PAYLOAD);
        let err = painter.drawtext(0, 0, 0, 0, &text).unwrap_err();

        assert!(matches!(
            err,
            PainterError::Send {
                op: "drawtext",
                source: FrameError::PayloadTooLarge { .. }
            }
        ));
        assert!(log.borrow().writes.is_empty());
    }

    #[test]
    fn wide_text_is_rejected_before_write() {
        let (device, log) = FakeDevice::new();
        let mut painter = Painter::open(device, config()).unwrap();

        let err = painter.drawtext(0, 0, 0, 0, "\u{141}\u{20ac}").unwrap_err();
        assert!(matches!(
            err,
            PainterError::Format {
                op: "drawtext",
                source: FormatError::NonLatin1Text { ch: '\u{141}' }
            }
        ));

        let err = painter
            .drawtext_recolor(0, 0, 0, 0, Color::BLACK, Color::BLACK, "ok \u{2713}")
            .unwrap_err();
        assert!(matches!(
            err,
            PainterError::Format {
                op: "drawtext_recolor",
                ..
            }
        ));
        assert!(log.borrow().writes.is_empty());
    }

    #[test]
    fn longest_text_that_fits() {
        let (device, log) = FakeDevice::new();
        let mut painter = Painter::open(device, config()).unwrap();

        // 9 header/argument bytes leave 52 for text.
        painter.drawtext(0, 0, 0, 0, &"x".repeat(52)).unwrap();
        assert!(painter.drawtext(0, 0, 0, 0, &"x".repeat(53)).is_err());
        assert_eq!(log.borrow().writes.len(), 1);
    }

    #[test]
    fn every_operation_sends_its_command_id() {
        let (device, log) = FakeDevice::new();
        let mut painter = Painter::open(device, config()).unwrap();
        let c = Color::new(1, 2, 3);

        painter.setpixel(0, 1, 1, c).unwrap();
        painter.line(0, 1, 1, 2, 2, c).unwrap();
        painter.rect(0, 1, 1, 2, 2, c, false).unwrap();
        painter.circle(0, 1, 1, 2, c, true).unwrap();
        painter.ellipse(0, 1, 1, 2, 3, c, true).unwrap();
        painter.drawimage(0, 1, 1, 0).unwrap();
        painter.drawimage_recolor(0, 1, 1, 0, c, Color::BLACK).unwrap();
        painter.animate(0, 1, 1, 0).unwrap();
        painter.animate_recolor(0, 1, 1, 0, c, Color::BLACK).unwrap();
        painter.drawtext(0, 1, 1, 0, "a").unwrap();
        painter
            .drawtext_recolor(0, 1, 1, 0, c, Color::BLACK, "a")
            .unwrap();

        let ids: Vec<u8> = log.borrow().writes.iter().map(|w| w[5]).collect();
        assert_eq!(ids, (2..=0x0C).collect::<Vec<u8>>());
    }

    #[test]
    fn call_reports_operation_and_field() {
        let (device, log) = FakeDevice::new();
        let mut painter = Painter::open(device, config()).unwrap();

        let err = painter
            .call(Operation::SetPixel, |f| match f {
                "color" => Some("1,2"),
                _ => Some("0"),
            })
            .unwrap_err();

        match err {
            PainterError::Format { op, source } => {
                assert_eq!(op, "setpixel");
                assert!(matches!(
                    source,
                    FormatError::InvalidArgument { field: "color", .. }
                ));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(log.borrow().writes.is_empty());
    }

    #[test]
    fn close_is_idempotent_and_drop_does_not_release_again() {
        let (device, log) = FakeDevice::new();
        let mut painter = Painter::open(device, config()).unwrap();

        assert!(painter.channel().is_some());
        painter.close().unwrap();
        painter.close().unwrap();
        assert!(painter.is_closed());
        assert!(painter.channel().is_none());
        drop(painter);

        assert_eq!(log.borrow().closes, 1);
    }

    #[test]
    fn drop_releases_once() {
        let (device, log) = FakeDevice::new();
        {
            let mut painter = Painter::open(device, config()).unwrap();
            painter.setpixel(0, 0, 0, Color::BLACK).unwrap();
        }
        assert_eq!(log.borrow().closes, 1);
    }

    #[test]
    fn release_happens_on_error_path() {
        fn draw(painter: &mut Painter<FakeDevice>) -> Result<()> {
            painter.setpixel(0, 0, 0, Color::BLACK)?;
            painter.drawtext(0, 0, 0, 0, &"x".repeat(100))?;
            Ok(())
        }

        let (device, log) = FakeDevice::new();
        let result = {
            let mut painter = Painter::open(device, config()).unwrap();
            draw(&mut painter)
        };

        assert!(result.is_err());
        assert_eq!(log.borrow().closes, 1);
    }

    #[test]
    fn failed_close_still_counts_as_released() {
        let (mut device, log) = FakeDevice::new();
        device.fail_close = true;
        let mut painter = Painter::open(device, config()).unwrap();

        assert!(matches!(painter.close(), Err(PainterError::Transport(_))));
        painter.close().unwrap();
        drop(painter);
        assert_eq!(log.borrow().closes, 1);
    }

    #[test]
    fn operations_after_close_fail() {
        let (device, log) = FakeDevice::new();
        let mut painter = Painter::open(device, config()).unwrap();
        painter.close().unwrap();

        assert!(matches!(painter.clear(0), Err(PainterError::Closed)));
        assert!(log.borrow().writes.is_empty());
    }

    #[test]
    fn clear_on_open_sends_composite() {
        let (device, log) = FakeDevice::new();
        let cfg = SessionConfig {
            clear_on_open: Some(1),
            screen: ScreenSize {
                width: 100,
                height: 50,
            },
            ..config()
        };
        let painter = Painter::open(device, cfg).unwrap();

        let log_ref = log.borrow();
        assert_eq!(log_ref.writes.len(), 2);
        assert_eq!(payload_of(&log_ref.writes[0]), &[2, 2, 1, 1]);
        assert_eq!(&payload_of(&log_ref.writes[1])[8..12], &[100, 0, 50, 0]);
        drop(log_ref);
        drop(painter);
    }

    #[test]
    fn failed_clear_on_open_releases_channel() {
        let (mut device, log) = FakeDevice::new();
        device.fail_write_at = Some(0);
        let cfg = SessionConfig {
            clear_on_open: Some(0),
            ..config()
        };

        assert!(Painter::open(device, cfg).is_err());
        assert_eq!(log.borrow().closes, 1);
    }
}
