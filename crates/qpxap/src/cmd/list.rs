use tracing::info;

use crate::cmd::{DeviceSettings, ListArgs};
use crate::device::matching_devices;
use crate::exit::{CliResult, NOT_FOUND, SUCCESS};
use crate::output::{print_devices, OutputFormat};

pub fn run(_args: ListArgs, settings: &DeviceSettings, format: OutputFormat) -> CliResult<i32> {
    let devices = matching_devices(settings)?;
    info!(count = devices.len(), "xap interfaces found");

    print_devices(&devices, format);
    Ok(if devices.is_empty() { NOT_FOUND } else { SUCCESS })
}
