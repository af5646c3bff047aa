use log::{debug, trace};

use crate::error::{Error, Result};
use crate::frame::{build_reports, Command, ACK, PAGE_SIZE, SETUP_MAGIC};
use crate::transport::Transport;

/// Synchronous request/acknowledge driver for the bootloader commands. Owns
/// the transport for the duration of an operation; dropping the client
/// releases it.
pub struct BootloaderClient<T: Transport> {
    transport: T,
}

impl<T: Transport> BootloaderClient<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// Releases the underlying transport.
    pub fn into_transport(self) -> T {
        self.transport
    }

    fn write_frame(&mut self, command: Command, payload: &[u8]) -> Result<()> {
        for report in build_reports(command, payload) {
            trace!("-> {report:02x?}");
            self.transport.write(&report)?;
        }
        Ok(())
    }

    /// Reads one byte of device memory. The response carries the value at
    /// offset 1; offset 0 is the transport's report-number echo.
    pub fn read_byte(&mut self, address: u16) -> Result<u8> {
        let [hi, lo] = address.to_be_bytes();
        self.write_frame(Command::ReadMemory, &[hi, lo, 0x01])?;

        let response = self.transport.read()?;
        if response.len() < 2 {
            return Err(Error::ShortResponse(response));
        }
        Ok(response[1])
    }

    /// Reads `count` consecutive bytes starting at `start`, one read-byte
    /// round trip per byte.
    pub fn read_range(&mut self, start: u16, count: usize) -> Result<Vec<u8>> {
        debug!("reading {count} bytes at {start:#06x}");
        (0..count)
            .map(|i| self.read_byte(start.wrapping_add(i as u16)))
            .collect()
    }

    /// Puts the bootloader into programming mode. Must precede any erase.
    pub fn setup(&mut self) -> Result<()> {
        debug!("sending bootloader setup");
        self.write_frame(Command::Setup, &SETUP_MAGIC)?;
        self.expect_ack()
    }

    /// Erases and rewrites device memory at `address`, one page per command,
    /// requiring an acknowledgement after every page. The address must be
    /// page aligned.
    pub fn erase(&mut self, address: u16, data: &[u8]) -> Result<()> {
        if address % PAGE_SIZE as u16 != 0 {
            return Err(Error::UnalignedEraseAddress(address));
        }

        debug!("erase-writing {} bytes at {address:#06x}", data.len());
        let mut address = address;
        for page in data.chunks(PAGE_SIZE) {
            let mut payload = Vec::with_capacity(2 + page.len());
            payload.extend_from_slice(&address.to_be_bytes());
            payload.extend_from_slice(page);

            self.write_frame(Command::Erase, &payload)?;
            self.expect_ack()?;
            address = address.wrapping_add(PAGE_SIZE as u16);
        }
        Ok(())
    }

    fn expect_ack(&mut self) -> Result<()> {
        let response = self.transport.read()?;
        if response.len() < 2 {
            return Err(Error::ShortResponse(response));
        }
        if response[1] != ACK {
            return Err(Error::NoAck { response });
        }
        Ok(())
    }
}
