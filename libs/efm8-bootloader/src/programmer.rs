use light_format::{LightConfig, MODE_DATA_SIZE, STEP_DATA_MAX_SIZE};
use log::info;

use crate::client::BootloaderClient;
use crate::error::{Error, Result};
use crate::transport::Transport;

/// Base address of the mode metadata region.
pub const LIGHT_MODES_START_ADDRESS: u16 = 0xF800;
/// Base address of the flat step-data region.
pub const STEP_DATA_START_ADDRESS: u16 = 0xF840;
/// Address of the single product-identifier byte.
pub const PRODUCT_CODE_ADDRESS: u16 = 0xFB40;
/// Last address covered by a diagnostic memory dump.
pub const MEMORY_DUMP_END_ADDRESS: u16 = 0xFB7F;

/// The one product variant this layout has been validated against
/// (Cobber Mid Rear).
pub const SUPPORTED_PRODUCT_CODE: u8 = 8;

/// Moves whole light configurations on and off the device. Takes exclusive
/// ownership of the transport for the lifetime of the operation.
pub struct LightProgrammer<T: Transport> {
    client: BootloaderClient<T>,
}

impl<T: Transport> LightProgrammer<T> {
    pub fn new(transport: T) -> Self {
        Self {
            client: BootloaderClient::new(transport),
        }
    }

    /// Releases the underlying transport.
    pub fn into_transport(self) -> T {
        self.client.into_transport()
    }

    /// Reads both memory regions off the device and decodes them. Refuses
    /// to touch a device with an unexpected product code.
    pub fn download(&mut self) -> Result<LightConfig> {
        self.check_product_code()?;

        let mode_data = self
            .client
            .read_range(LIGHT_MODES_START_ADDRESS, MODE_DATA_SIZE)?;
        let step_data = self
            .client
            .read_range(STEP_DATA_START_ADDRESS, STEP_DATA_MAX_SIZE)?;

        let config = LightConfig::decode(&mode_data, &step_data)?;
        info!("downloaded {} light mode(s)", config.modes.len());
        Ok(config)
    }

    /// Encodes the configuration and writes both regions. Setup must come
    /// first; the mode region is erased before the step region.
    pub fn upload(&mut self, config: &LightConfig) -> Result<()> {
        let step_data = config.encode_step_data()?;
        let mode_data = config.encode_mode_data()?;

        self.client.setup()?;
        self.client.erase(LIGHT_MODES_START_ADDRESS, &mode_data)?;
        self.client.erase(STEP_DATA_START_ADDRESS, &step_data)?;
        info!("uploaded {} light mode(s)", config.modes.len());
        Ok(())
    }

    /// Reads every byte of the pattern memory range, for diagnostics. Pairs
    /// come back in ascending address order.
    pub fn dump_memory(&mut self) -> Result<Vec<(u16, u8)>> {
        (LIGHT_MODES_START_ADDRESS..=MEMORY_DUMP_END_ADDRESS)
            .map(|address| self.client.read_byte(address).map(|value| (address, value)))
            .collect()
    }

    fn check_product_code(&mut self) -> Result<()> {
        let code = self.client.read_byte(PRODUCT_CODE_ADDRESS)?;
        if code != SUPPORTED_PRODUCT_CODE {
            return Err(Error::UnsupportedDevice(code));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::testing::ScriptedTransport;

    // Same captured regions as the light-format tests.
    const MODE_DATA: [u8; MODE_DATA_SIZE] = [
        0x00, 0x00, //
        0x05, 0x06, 0x0A, 0x16, 0x16, 0x16, 0x16, 0x16, //
        0x2F, 0x50, 0x64, 0xFF, 0x0D, 0x64, 0x07, 0x3C, //
        0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, //
        0x01, 0x01, 0x01, 0x01, 0x07, 0x07, 0x07, 0x07, //
        0x02, 0x07, 0x07, 0xFF, 0xFF, 0xFF,
    ];

    const STEP_DATA: [u8; 22] = [
        0x3E, 0x3E, 0x3E, 0x3E, 0xEE, 0x3E, 0x1E, 0x34, 0x1E, 0x3A, 0x28, 0x1E, 0x1E, 0x24, 0x1E,
        0x1E, 0x22, 0x1E, 0x1E, 0x24, 0x1E, 0x1E,
    ];

    fn expect_read_byte(t: &mut ScriptedTransport, address: u16, value: u8) {
        let [hi, lo] = address.to_be_bytes();
        t.expect_write([0x00, 0x24, 0x04, 0x38, hi, lo, 0x01]);
        t.push_read([0x00, value]);
    }

    #[test]
    fn download_reads_both_regions_byte_by_byte() {
        let mut t = ScriptedTransport::new();
        expect_read_byte(&mut t, PRODUCT_CODE_ADDRESS, SUPPORTED_PRODUCT_CODE);
        for (i, &b) in MODE_DATA.iter().enumerate() {
            expect_read_byte(&mut t, LIGHT_MODES_START_ADDRESS + i as u16, b);
        }
        for i in 0..STEP_DATA_MAX_SIZE {
            let b = STEP_DATA.get(i).copied().unwrap_or(0xFF);
            expect_read_byte(&mut t, STEP_DATA_START_ADDRESS + i as u16, b);
        }

        let mut programmer = LightProgrammer::new(t);
        let config = programmer.download().unwrap();

        assert_eq!(config.modes.len(), 4);
        assert_eq!(config.encode_mode_data().unwrap(), MODE_DATA);
        assert_eq!(config.encode_step_data().unwrap(), STEP_DATA);
        programmer.into_transport().assert_exhausted();
    }

    #[test]
    fn download_refuses_unexpected_product_code() {
        let mut t = ScriptedTransport::new();
        expect_read_byte(&mut t, PRODUCT_CODE_ADDRESS, 0x07);

        let mut programmer = LightProgrammer::new(t);
        let err = programmer.download().unwrap_err();
        assert!(matches!(err, Error::UnsupportedDevice(0x07)));
        programmer.into_transport().assert_exhausted();
    }

    #[test]
    fn upload_transcript_matches_the_wire_exactly() {
        let mut t = ScriptedTransport::new();
        t.expect_write([0x00, 0x24, 0x04, 0x31, 0xA5, 0xF1, 0x01]);
        t.push_read([0x00, 0x40]);

        let mut mode_frame = vec![0x00, 0x24, 0x2B, 0x32, 0xF8, 0x00];
        mode_frame.extend_from_slice(&MODE_DATA);
        t.expect_write(mode_frame);
        t.push_read([0x00, 0x40]);

        let mut step_frame = vec![0x00, 0x24, 0x19, 0x32, 0xF8, 0x40];
        step_frame.extend_from_slice(&STEP_DATA);
        t.expect_write(step_frame);
        t.push_read([0x00, 0x40]);

        let config = LightConfig::decode(&MODE_DATA, &STEP_DATA).unwrap();
        let mut programmer = LightProgrammer::new(t);
        programmer.upload(&config).unwrap();
        programmer.into_transport().assert_exhausted();
    }

    #[test]
    fn upload_stops_after_setup_ack_mismatch() {
        let mut t = ScriptedTransport::new();
        t.expect_write([0x00, 0x24, 0x04, 0x31, 0xA5, 0xF1, 0x01]);
        t.push_read([0x00, 0x41]);
        // Nothing further scripted: an erase write would panic the test.

        let config = LightConfig::decode(&MODE_DATA, &STEP_DATA).unwrap();
        let mut programmer = LightProgrammer::new(t);
        let err = programmer.upload(&config).unwrap_err();
        assert!(matches!(err, Error::NoAck { response } if response == [0x00, 0x41]));
        programmer.into_transport().assert_exhausted();
    }

    #[test]
    fn dump_covers_the_whole_range_in_ascending_order() {
        let mut t = ScriptedTransport::new();
        for address in LIGHT_MODES_START_ADDRESS..=MEMORY_DUMP_END_ADDRESS {
            expect_read_byte(&mut t, address, address as u8);
        }

        let mut programmer = LightProgrammer::new(t);
        let dump = programmer.dump_memory().unwrap();

        assert_eq!(dump.len(), 0x380);
        assert_eq!(dump.first(), Some(&(0xF800, 0x00)));
        assert_eq!(dump.last(), Some(&(0xFB7F, 0x7F)));
        assert!(dump.windows(2).all(|w| w[0].0 < w[1].0));
        programmer.into_transport().assert_exhausted();
    }
}
