use std::time::Duration;

use crate::error::Result;

/// A half-duplex report channel to a HID interface.
///
/// Every exchange is one [`write`](HidChannel::write) of a whole output
/// report followed by at most one
/// [`read_timeout`](HidChannel::read_timeout) of an input report. The
/// channel is not safe to share between in-flight exchanges; implementations
/// take `&mut self` so the borrow checker serializes callers.
pub trait HidChannel {
    /// Write one output report. Returns the number of bytes accepted.
    fn write(&mut self, data: &[u8]) -> Result<usize>;

    /// Read one input report into `buf`, waiting at most `timeout`.
    ///
    /// Returns `Ok(0)` when nothing arrived before the timeout elapsed.
    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize>;

    /// Release the underlying handle.
    ///
    /// Called at most once by the owning session. The default does nothing,
    /// for channels that release on drop.
    fn close(&mut self) -> Result<()> {
        Ok(())
    }

    /// Human-readable description for logs.
    fn describe(&self) -> String {
        "hid-channel".to_string()
    }
}

impl<T: HidChannel + ?Sized> HidChannel for Box<T> {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        (**self).write(data)
    }

    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        (**self).read_timeout(buf, timeout)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<T: HidChannel + ?Sized> HidChannel for &mut T {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        (**self).write(data)
    }

    fn read_timeout(&mut self, buf: &mut [u8], timeout: Duration) -> Result<usize> {
        (**self).read_timeout(buf, timeout)
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}
