use std::ffi::CString;
use std::time::Duration;

use hidapi::HidApi;
use tracing::{debug, info};

use crate::error::{Result, TransportError};
use crate::traits::HidChannel;

/// A HID interface found during discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Platform path used to open the interface.
    pub path: String,
    pub manufacturer: String,
    pub product: String,
    pub vendor_id: u16,
    pub product_id: u16,
    pub usage_page: u16,
    pub usage: u16,
}

impl DeviceInfo {
    /// `"<manufacturer>, <product>"`, as shown when picking a device.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.manufacturer, self.product)
    }
}

/// Enumerate the HID interfaces exposing `usage_page` / `usage`.
///
/// Returns an empty list when nothing matches.
pub fn discover(usage_page: u16, usage: u16) -> Result<Vec<DeviceInfo>> {
    let api = HidApi::new().map_err(hid_error)?;
    let found: Vec<DeviceInfo> = api
        .device_list()
        .filter(|dev| dev.usage_page() == usage_page && dev.usage() == usage)
        .map(|dev| DeviceInfo {
            path: dev.path().to_string_lossy().into_owned(),
            manufacturer: dev.manufacturer_string().unwrap_or_default().to_string(),
            product: dev.product_string().unwrap_or_default().to_string(),
            vendor_id: dev.vendor_id(),
            product_id: dev.product_id(),
            usage_page: dev.usage_page(),
            usage: dev.usage(),
        })
        .collect();

    debug!(
        usage_page = format_args!("{usage_page:#06x}"),
        usage = format_args!("{usage:#06x}"),
        count = found.len(),
        "hid discovery finished"
    );
    Ok(found)
}

/// Open a previously discovered interface.
pub fn open(device: &DeviceInfo) -> Result<HidDevice> {
    let api = HidApi::new().map_err(hid_error)?;
    let path = CString::new(device.path.as_str()).map_err(|err| TransportError::Open {
        path: device.path.clone(),
        reason: err.to_string(),
    })?;
    let handle = api.open_path(&path).map_err(|err| TransportError::Open {
        path: device.path.clone(),
        reason: err.to_string(),
    })?;

    info!(device = %device.display_name(), path = %device.path, "opened hid interface");
    Ok(HidDevice {
        inner: Some(handle),
        name: device.display_name(),
        path: device.path.clone(),
    })
}

/// Open the first interface exposing `usage_page` / `usage`.
///
/// Fails with [`TransportError::DeviceNotFound`] when nothing matches.
pub fn open_first(usage_page: u16, usage: u16) -> Result<HidDevice> {
    let devices = discover(usage_page, usage)?;
    let first = devices
        .first()
        .ok_or(TransportError::DeviceNotFound { usage_page, usage })?;
    open(first)
}

/// An open HID interface.
pub struct HidDevice {
    inner: Option<hidapi::HidDevice>,
    name: String,
    path: String,
}

impl HidDevice {
    /// The platform path this interface was opened from.
    pub fn path(&self) -> &str {
        &self.path
    }

    fn handle(&self) -> Result<&hidapi::HidDevice> {
        self.inner.as_ref().ok_or(TransportError::Closed)
    }
}

impl HidChannel for HidDevice {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.handle()?.write(data).map_err(hid_error)
    }

    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        let millis = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        self.handle()?.read_timeout(buf, millis).map_err(hid_error)
    }

    fn close(&mut self) -> Result<()> {
        if self.inner.take().is_some() {
            info!(device = %self.name, "closed hid interface");
        }
        Ok(())
    }

    fn describe(&self) -> String {
        format!("{} ({})", self.name, self.path)
    }
}

impl std::fmt::Debug for HidDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HidDevice")
            .field("name", &self.name)
            .field("path", &self.path)
            .field("open", &self.inner.is_some())
            .finish()
    }
}

fn hid_error(err: hidapi::HidError) -> TransportError {
    TransportError::Hid(err.to_string())
}
