use efm8_bootloader::{Error, Transport, MAX_REPORT_LENGTH};
use hidapi::{HidApi, HidDevice};
use log::debug;

// Silicon Labs EFM8UB1 factory bootloader endpoint.
pub const VENDOR_ID: u16 = 0x10C4;
pub const PRODUCT_ID: u16 = 0xEAC9;

/// Blocking HID transport over the first matching USB device. The device
/// handle closes when the transport is dropped, so the programmer's
/// ownership scope doubles as the open/close scope.
pub struct HidTransport {
    device: HidDevice,
}

impl HidTransport {
    pub fn open() -> anyhow::Result<Self> {
        let api = HidApi::new()?;
        let info = api
            .device_list()
            .find(|d| d.vendor_id() == VENDOR_ID && d.product_id() == PRODUCT_ID)
            .ok_or(Error::DeviceNotFound)?;

        debug!(
            "opening {:04x}:{:04x} at {:?}",
            info.vendor_id(),
            info.product_id(),
            info.path()
        );
        let device = info.open_device(&api)?;
        Ok(Self { device })
    }
}

impl Transport for HidTransport {
    fn write(&mut self, report: &[u8]) -> Result<(), Error> {
        let written = self
            .device
            .write(report)
            .map_err(|e| Error::WriteFailed(e.to_string()))?;
        if written != report.len() {
            return Err(Error::WriteFailed(format!(
                "short write: {written} of {} bytes",
                report.len()
            )));
        }
        Ok(())
    }

    fn read(&mut self) -> Result<Vec<u8>, Error> {
        let mut buf = [0u8; MAX_REPORT_LENGTH];
        let n = self
            .device
            .read(&mut buf)
            .map_err(|e| Error::ReadFailed(e.to_string()))?;
        Ok(buf[..n].to_vec())
    }
}
