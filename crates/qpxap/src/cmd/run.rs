use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use qpxap_painter::parse_script;
use tracing::{info, warn};

use crate::cmd::{read_script, DeviceSettings, RunArgs};
use crate::device::{describe, open_painter};
use crate::exit::{
    painter_error, script_error, CliError, CliResult, INTERNAL, INTERRUPTED, SUCCESS,
};
use crate::output::{print_drawn, OutputFormat};

pub fn run(args: RunArgs, settings: &DeviceSettings, format: OutputFormat) -> CliResult<i32> {
    // The whole script is parsed before the device is opened.
    let text = read_script(&args.script)?;
    let commands =
        parse_script(&text).map_err(|err| script_error(&args.script.display().to_string(), err))?;
    info!(count = commands.len(), "script parsed");

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(Arc::clone(&running))?;

    let mut painter = open_painter(settings)?;
    let device = describe(&painter);
    let mut sent = Vec::with_capacity(commands.len());

    for (index, command) in commands.iter().enumerate() {
        // Checked between commands only; an exchange in flight always completes.
        if !running.load(Ordering::SeqCst) {
            warn!(done = index, total = commands.len(), "interrupted, stopping script");
            break;
        }
        painter
            .execute(command)
            .map_err(|err| painter_error(&format!("command {}", index + 1), err))?;
        sent.push(command.name());
    }

    painter.close().map_err(|err| painter_error("close", err))?;

    let completed = sent.len() == commands.len();
    print_drawn(&device, &sent, completed, format);
    Ok(if completed { SUCCESS } else { INTERRUPTED })
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
