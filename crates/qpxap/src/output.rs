use std::fmt::Write as _;
use std::io::{IsTerminal, Write};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use qpxap_frame::FRAME_SIZE;
use qpxap_transport::DeviceInfo;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct DeviceOutput<'a> {
    path: &'a str,
    manufacturer: &'a str,
    product: &'a str,
    vendor_id: String,
    product_id: String,
    usage_page: String,
    usage: String,
}

impl<'a> From<&'a DeviceInfo> for DeviceOutput<'a> {
    fn from(dev: &'a DeviceInfo) -> Self {
        Self {
            path: &dev.path,
            manufacturer: &dev.manufacturer,
            product: &dev.product,
            vendor_id: format!("{:04x}", dev.vendor_id),
            product_id: format!("{:04x}", dev.product_id),
            usage_page: format!("{:#06x}", dev.usage_page),
            usage: format!("{:#06x}", dev.usage),
        }
    }
}

pub fn print_devices(devices: &[DeviceInfo], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out: Vec<DeviceOutput<'_>> = devices.iter().map(DeviceOutput::from).collect();
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "[]".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["DEVICE", "VID:PID", "USAGE", "PATH"]);
            for dev in devices {
                let out = DeviceOutput::from(dev);
                table.add_row(vec![
                    dev.display_name(),
                    format!("{}:{}", out.vendor_id, out.product_id),
                    format!("{}/{}", out.usage_page, out.usage),
                    dev.path.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for (index, dev) in devices.iter().enumerate() {
                println!(
                    "{index}: {} [{:04x}:{:04x}] {}",
                    dev.display_name(),
                    dev.vendor_id,
                    dev.product_id,
                    dev.path
                );
            }
        }
        OutputFormat::Raw => {
            for dev in devices {
                println!("{}", dev.path);
            }
        }
    }
}

/// One frame as it would be written to the device.
#[derive(Debug, Clone)]
pub struct EncodedFrame {
    pub op: &'static str,
    pub step: usize,
    pub payload_len: usize,
    pub bytes: [u8; FRAME_SIZE],
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    op: &'a str,
    step: usize,
    payload_size: usize,
    frame: String,
}

pub fn print_frames(frames: &[EncodedFrame], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            for frame in frames {
                let out = FrameOutput {
                    op: frame.op,
                    step: frame.step,
                    payload_size: frame.payload_len,
                    frame: hex(&frame.bytes),
                };
                println!(
                    "{}",
                    serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["OP", "STEP", "SIZE", "FRAME"]);
            for frame in frames {
                table.add_row(vec![
                    frame.op.to_string(),
                    frame.step.to_string(),
                    frame.payload_len.to_string(),
                    hex(used_bytes(frame)),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for frame in frames {
                println!(
                    "{}[{}] size={} frame={}",
                    frame.op,
                    frame.step,
                    frame.payload_len,
                    hex(used_bytes(frame))
                );
            }
        }
        OutputFormat::Raw => {
            for frame in frames {
                print_raw(&frame.bytes);
            }
        }
    }
}

#[derive(Serialize)]
struct DrawOutput<'a> {
    device: &'a str,
    commands: &'a [&'static str],
    completed: bool,
}

/// Summary of what was sent to a device.
pub fn print_drawn(device: &str, commands: &[&'static str], completed: bool, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = DrawOutput {
                device,
                commands,
                completed,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => {
            let status = if completed { "done" } else { "stopped" };
            println!("{status}: {} command(s) on {device}", commands.len());
        }
        OutputFormat::Raw => {}
    }
}

pub fn print_raw(data: &[u8]) {
    let mut out = std::io::stdout();
    let _ = out.write_all(data);
    let _ = out.flush();
}

/// Lowercase hex, one space between bytes.
pub fn hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 3);
    for (i, byte) in bytes.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let _ = write!(out, "{byte:02x}");
    }
    out
}

// Header plus payload; the zero padding is left out.
fn used_bytes(frame: &EncodedFrame) -> &[u8] {
    &frame.bytes[..qpxap_frame::HEADER_SIZE + frame.payload_len]
}
