/// Report-number byte prefixed to every output report.
pub const REPORT_NUMBER: u8 = 0x00;

/// Marker byte opening every bootloader frame.
pub const FRAME_START: u8 = 0x24;

/// Maximum length of one transport write, report-number byte included.
pub const MAX_REPORT_LENGTH: usize = 64;

/// Erase/write granularity of the device's pattern memory.
pub const PAGE_SIZE: usize = 64;

/// ACK status byte returned at response offset 1 after a successful command.
pub const ACK: u8 = 0x40;

/// Fixed payload of the Setup command (AN945 section 7.1).
pub const SETUP_MAGIC: [u8; 3] = [0xA5, 0xF1, 0x01];

/// The three bootloader commands the light needs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Setup = 0x31,
    Erase = 0x32,
    ReadMemory = 0x38,
}

impl Command {
    pub const fn opcode(self) -> u8 {
        self as u8
    }
}

/// Builds the transport reports for one command frame.
///
/// The frame is `[FRAME_START][payload len + 1][opcode][payload]`; anything
/// longer than one report is split into successive report-sized chunks, each
/// re-prefixed with the report-number byte. The device reassembles chunked
/// frames transparently.
pub fn build_reports(command: Command, payload: &[u8]) -> Vec<Vec<u8>> {
    debug_assert!(payload.len() + 1 <= u8::MAX as usize);

    let mut frame = Vec::with_capacity(3 + payload.len());
    frame.push(FRAME_START);
    frame.push((payload.len() + 1) as u8);
    frame.push(command.opcode());
    frame.extend_from_slice(payload);

    frame
        .chunks(MAX_REPORT_LENGTH - 1)
        .map(|chunk| {
            let mut report = Vec::with_capacity(chunk.len() + 1);
            report.push(REPORT_NUMBER);
            report.extend_from_slice(chunk);
            report
        })
        .collect()
}
