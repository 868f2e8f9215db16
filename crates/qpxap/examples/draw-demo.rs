//! Draws a few shapes on the first XAP display found.
//!
//! Run with:
//!   cargo run --example draw-demo --features hid
//!
//! The same drawing as a script:
//!   cargo run --features cli -- run demos/hello.qp

use qpxap::painter::{Color, Painter, SessionConfig};
use qpxap::transport::{open_first, XAP_USAGE, XAP_USAGE_PAGE};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let device = open_first(XAP_USAGE_PAGE, XAP_USAGE)?;
    let mut painter = Painter::open(
        device,
        SessionConfig {
            clear_on_open: Some(0),
            ..SessionConfig::default()
        },
    )?;

    let cyan = Color::new(128, 255, 255);
    let white = Color::new(0, 0, 255);

    painter.rect(0, 10, 10, 470, 310, cyan, false)?;
    painter.line(0, 10, 10, 470, 310, white)?;
    painter.circle(0, 240, 160, 40, cyan, true)?;
    painter.ellipse(0, 240, 160, 80, 20, white, false)?;
    painter.drawtext_recolor(0, 20, 20, 0, white, Color::BLACK, "Hello from qpxap")?;

    painter.close()?;
    eprintln!("done");
    Ok(())
}
