use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Subcommand};
use qpxap_frame::FrameConfig;
use qpxap_painter::{Command as DrawCommand, Operation, ScreenSize, SessionConfig};

use crate::exit::{format_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod draw;
pub mod encode;
pub mod list;
pub mod run;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List HID interfaces exposing the XAP usage page and usage.
    List(ListArgs),
    /// Run one drawing operation on the device.
    Draw(DrawArgs),
    /// Run a drawing script on the device.
    Run(RunArgs),
    /// Print the frames an operation or script would write. No device needed.
    Encode(EncodeArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, settings: &DeviceSettings, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::List(args) => list::run(args, settings, format),
        Command::Draw(args) => draw::run(args, settings, format),
        Command::Run(args) => run::run(args, settings, format),
        Command::Encode(args) => encode::run(args, settings, format),
        Command::Version(args) => version::run(args),
    }
}

/// Device and session settings shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct DeviceSettings {
    /// HID usage page of the XAP interface (hex with 0x, or decimal).
    #[arg(long, env = "QPXAP_USAGE_PAGE", default_value = "0xFF51", global = true)]
    pub usage_page: String,
    /// HID usage of the XAP interface (hex with 0x, or decimal).
    #[arg(long, env = "QPXAP_USAGE", default_value = "0x0058", global = true)]
    pub usage: String,
    /// Screen width covered by `clear`.
    #[arg(long, env = "QPXAP_SCREEN_WIDTH", default_value_t = 480, global = true)]
    pub screen_width: u16,
    /// Screen height covered by `clear`.
    #[arg(long, env = "QPXAP_SCREEN_HEIGHT", default_value_t = 320, global = true)]
    pub screen_height: u16,
    /// How long to wait for each reply (e.g. 1000ms, 2s; bare numbers are ms).
    #[arg(long, env = "QPXAP_TIMEOUT", default_value = "1000ms", global = true)]
    pub timeout: String,
    /// Open this interface path instead of picking the only match.
    #[arg(long, env = "QPXAP_DEVICE", global = true)]
    pub device: Option<String>,
    /// Clear this display as soon as the device is opened.
    #[arg(long, value_name = "DISPLAY", global = true)]
    pub clear_on_open: Option<u8>,
}

impl DeviceSettings {
    pub fn usage_page(&self) -> CliResult<u16> {
        parse_u16("usage page", &self.usage_page)
    }

    pub fn usage(&self) -> CliResult<u16> {
        parse_u16("usage", &self.usage)
    }

    pub fn screen(&self) -> ScreenSize {
        ScreenSize {
            width: self.screen_width,
            height: self.screen_height,
        }
    }

    pub fn session_config(&self) -> CliResult<SessionConfig> {
        Ok(SessionConfig {
            screen: self.screen(),
            clear_on_open: self.clear_on_open,
            frame: FrameConfig {
                read_timeout: parse_duration(&self.timeout)?,
                ..FrameConfig::default()
            },
        })
    }
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {}

#[derive(Args, Debug)]
pub struct DrawArgs {
    /// Operation: clear, setpixel, line, rect, circle, ellipse, drawimage,
    /// drawimage_recolor, animate, animate_recolor, drawtext, drawtext_recolor.
    #[arg(value_name = "OP")]
    pub op: Operation,
    /// Arguments as key=value (e.g. display=0 x=10 color="0, 255, 255").
    #[arg(value_name = "KEY=VALUE")]
    pub args: Vec<String>,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Script file, or `-` for stdin.
    pub script: PathBuf,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Operation to encode (see `draw --help`).
    #[arg(value_name = "OP", required_unless_present = "script")]
    pub op: Option<Operation>,
    /// Arguments as key=value.
    #[arg(value_name = "KEY=VALUE")]
    pub args: Vec<String>,
    /// Encode every command of a script file (`-` for stdin) instead.
    #[arg(long, conflicts_with = "op")]
    pub script: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

/// Build a command from `key=value` arguments.
pub fn build_command(op: Operation, args: &[String]) -> CliResult<DrawCommand> {
    let mut values: HashMap<&str, &str> = HashMap::new();
    for arg in args {
        let (key, value) = arg.split_once('=').ok_or_else(|| {
            CliError::new(USAGE, format!("{op}: expected key=value, got {arg:?}"))
        })?;
        if !op.fields().contains(&key) {
            return Err(CliError::new(
                USAGE,
                format!(
                    "{op}: unexpected argument `{key}` (takes {})",
                    op.fields().join(", ")
                ),
            ));
        }
        values.insert(key, value);
    }

    DrawCommand::from_fields(op, |field| values.get(field).copied())
        .map_err(|err| format_error(op.name(), err))
}

/// Read a script from a file, or from stdin for `-`.
pub fn read_script(path: &Path) -> CliResult<String> {
    if path.as_os_str() == "-" {
        return std::io::read_to_string(std::io::stdin())
            .map_err(|err| crate::exit::io_error("read script from stdin", err));
    }
    std::fs::read_to_string(path)
        .map_err(|err| crate::exit::io_error(&format!("read {}", path.display()), err))
}

fn parse_u16(what: &str, input: &str) -> CliResult<u16> {
    let input = input.trim();
    let parsed = match input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
    {
        Some(hex) => u16::from_str_radix(hex, 16),
        None => input.parse(),
    };
    parsed.map_err(|_| CliError::new(USAGE, format!("invalid {what}: {input}")))
}

fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "timeout must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "ms")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid timeout value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "timeout must be greater than zero"));
    }

    match unit {
        "ms" => Ok(Duration::from_millis(value)),
        _ => Ok(Duration::from_secs(value)),
    }
}
