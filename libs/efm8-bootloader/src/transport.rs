use crate::error::Result;

/// HID-style report transport the bootloader client drives. One `write` is
/// one output report (the report-number byte included); one `read` is one
/// input report as returned by the device.
///
/// Implementations block; the client issues exactly one request at a time
/// and reads the response before the next request.
pub trait Transport {
    fn write(&mut self, report: &[u8]) -> Result<()>;
    fn read(&mut self) -> Result<Vec<u8>>;
}
