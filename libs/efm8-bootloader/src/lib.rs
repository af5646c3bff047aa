//! Driver for the EFM8 factory-bootloader protocol spoken by the light over
//! a HID-style report transport, plus the programmer that moves whole light
//! configurations on and off the device.
//!
//! The protocol is a synchronous request/acknowledge cycle: every command is
//! one frame (chunked to report size on the wire), and erase/setup commands
//! must be acknowledged before the next request goes out. Failures are fatal
//! to the running operation; nothing is retried.

mod client;
mod error;
mod frame;
mod programmer;
mod transport;

pub use client::BootloaderClient;
pub use error::{Error, Result};
pub use frame::{Command, ACK, FRAME_START, MAX_REPORT_LENGTH, PAGE_SIZE, REPORT_NUMBER};
pub use programmer::{
    LightProgrammer, LIGHT_MODES_START_ADDRESS, MEMORY_DUMP_END_ADDRESS, PRODUCT_CODE_ADDRESS,
    STEP_DATA_START_ADDRESS, SUPPORTED_PRODUCT_CODE,
};
pub use transport::Transport;
