use qpxap_painter::Painter;
use qpxap_transport::{discover, open, DeviceInfo, HidChannel, HidDevice};
use tracing::{debug, info};

use crate::cmd::DeviceSettings;
use crate::exit::{painter_error, transport_error, CliError, CliResult, NOT_FOUND, USAGE};

/// Discover XAP interfaces for the configured usage page / usage.
pub fn matching_devices(settings: &DeviceSettings) -> CliResult<Vec<DeviceInfo>> {
    let usage_page = settings.usage_page()?;
    let usage = settings.usage()?;
    discover(usage_page, usage).map_err(|err| transport_error("discover", err))
}

/// Pick the interface to draw on.
///
/// With `--device`, the path must be among the matches. Without it, exactly
/// one interface must match.
pub fn select_device(settings: &DeviceSettings) -> CliResult<DeviceInfo> {
    let devices = matching_devices(settings)?;
    pick(devices, settings)
}

/// Open the selected interface and start a painter session on it.
pub fn open_painter(settings: &DeviceSettings) -> CliResult<Painter<HidDevice>> {
    let config = settings.session_config()?;
    let info = select_device(settings)?;
    let device = open(&info).map_err(|err| transport_error("open", err))?;
    info!(device = %info.display_name(), "drawing on device");
    Painter::open(device, config).map_err(|err| painter_error("open", err))
}

/// Name of the device a painter is drawing on.
pub fn describe<C: HidChannel>(painter: &Painter<C>) -> String {
    painter
        .channel()
        .map(HidChannel::describe)
        .unwrap_or_else(|| "closed".to_string())
}

fn pick(mut devices: Vec<DeviceInfo>, settings: &DeviceSettings) -> CliResult<DeviceInfo> {
    debug!(count = devices.len(), "candidate interfaces");

    if let Some(path) = &settings.device {
        return devices
            .into_iter()
            .find(|dev| &dev.path == path)
            .ok_or_else(|| {
                CliError::new(
                    NOT_FOUND,
                    format!("no XAP interface at {path} (run `qpxap list`)"),
                )
            });
    }

    match devices.len() {
        0 => Err(CliError::new(
            NOT_FOUND,
            format!(
                "no device with usage page {} and usage {}",
                settings.usage_page, settings.usage
            ),
        )),
        1 => Ok(devices.remove(0)),
        n => Err(CliError::new(
            USAGE,
            format!("{n} matching devices, choose one with --device (run `qpxap list`)"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(device: Option<&str>) -> DeviceSettings {
        DeviceSettings {
            usage_page: "0xFF51".to_string(),
            usage: "0x0058".to_string(),
            screen_width: 480,
            screen_height: 320,
            timeout: "1000ms".to_string(),
            device: device.map(str::to_string),
            clear_on_open: None,
        }
    }

    fn info(path: &str) -> DeviceInfo {
        DeviceInfo {
            path: path.to_string(),
            manufacturer: "elpekenin".to_string(),
            product: "access".to_string(),
            vendor_id: 0xFEED,
            product_id: 0x0001,
            usage_page: 0xFF51,
            usage: 0x0058,
        }
    }

    #[test]
    fn single_match_is_picked() {
        let picked = pick(vec![info("/dev/hidraw3")], &settings(None)).unwrap();
        assert_eq!(picked.path, "/dev/hidraw3");
    }

    #[test]
    fn no_match_is_not_found() {
        let err = pick(Vec::new(), &settings(None)).unwrap_err();
        assert_eq!(err.code, NOT_FOUND);
    }

    #[test]
    fn several_matches_need_device_flag() {
        let devices = vec![info("/dev/hidraw3"), info("/dev/hidraw5")];
        let err = pick(devices.clone(), &settings(None)).unwrap_err();
        assert_eq!(err.code, USAGE);

        let picked = pick(devices, &settings(Some("/dev/hidraw5"))).unwrap();
        assert_eq!(picked.path, "/dev/hidraw5");
    }

    #[test]
    fn unknown_device_path_is_not_found() {
        let err = pick(vec![info("/dev/hidraw3")], &settings(Some("/dev/hidraw9"))).unwrap_err();
        assert_eq!(err.code, NOT_FOUND);
    }
}
