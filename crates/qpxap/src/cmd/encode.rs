use qpxap_frame::{encode_frame, FRAME_SIZE};
use qpxap_painter::{parse_script, Command, ScreenSize};

use crate::cmd::{build_command, read_script, DeviceSettings, EncodeArgs};
use crate::exit::{format_error, frame_error, script_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_frames, EncodedFrame, OutputFormat};

pub fn run(args: EncodeArgs, settings: &DeviceSettings, format: OutputFormat) -> CliResult<i32> {
    let commands = match (&args.script, args.op) {
        (Some(path), _) => {
            if !args.args.is_empty() {
                return Err(CliError::new(
                    USAGE,
                    "key=value arguments cannot be combined with --script",
                ));
            }
            let text = read_script(path)?;
            parse_script(&text).map_err(|err| script_error(&path.display().to_string(), err))?
        }
        (None, Some(op)) => vec![build_command(op, &args.args)?],
        (None, None) => return Err(CliError::new(USAGE, "nothing to encode")),
    };

    let frames = encode_commands(&commands, settings.screen())?;
    print_frames(&frames, format);
    Ok(SUCCESS)
}

/// Every frame the commands would write, in wire order.
fn encode_commands(commands: &[Command], screen: ScreenSize) -> CliResult<Vec<EncodedFrame>> {
    let mut frames = Vec::new();
    for command in commands {
        let payloads = command
            .payloads(screen)
            .map_err(|err| format_error(command.name(), err))?;
        for (step, payload) in payloads.iter().enumerate() {
            let mut bytes = [0u8; FRAME_SIZE];
            encode_frame(payload, &mut bytes).map_err(|err| frame_error(command.name(), err))?;
            frames.push(EncodedFrame {
                op: command.name(),
                step,
                payload_len: payload.len(),
                bytes,
            });
        }
    }
    Ok(frames)
}
