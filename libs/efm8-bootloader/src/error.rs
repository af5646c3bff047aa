use light_format::FormatError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a device operation. All variants are fatal to
/// the operation in progress; a failed upload may leave the device memory
/// partially erased.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no matching USB HID device found")]
    DeviceNotFound,
    #[error("HID write failed: {0}")]
    WriteFailed(String),
    #[error("HID read failed: {0}")]
    ReadFailed(String),
    #[error("response from device too short: {0:02x?}")]
    ShortResponse(Vec<u8>),
    #[error("device did not acknowledge the previous command, response was {response:02x?}")]
    NoAck { response: Vec<u8> },
    #[error("device reports product code {0}, only the validated product is supported")]
    UnsupportedDevice(u8),
    #[error("erase address {0:#06x} is not page aligned")]
    UnalignedEraseAddress(u16),
    #[error(transparent)]
    Format(#[from] FormatError),
}
