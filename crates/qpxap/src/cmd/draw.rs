use crate::cmd::{build_command, DeviceSettings, DrawArgs};
use crate::device::{describe, open_painter};
use crate::exit::{painter_error, CliResult, SUCCESS};
use crate::output::{print_drawn, OutputFormat};

pub fn run(args: DrawArgs, settings: &DeviceSettings, format: OutputFormat) -> CliResult<i32> {
    // Bad arguments are reported before the device is touched.
    let command = build_command(args.op, &args.args)?;

    let mut painter = open_painter(settings)?;
    let device = describe(&painter);
    painter
        .execute(&command)
        .map_err(|err| painter_error("draw", err))?;
    painter.close().map_err(|err| painter_error("close", err))?;

    print_drawn(&device, &[command.name()], true, format);
    Ok(SUCCESS)
}
