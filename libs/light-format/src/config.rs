use serde::{Deserialize, Serialize};

use crate::step::Step;
use crate::FormatError;

pub const MAX_MODE_COUNT: usize = 8;

/// Size of the flat step-data region as read from the device. The step offset
/// table stores cumulative counts in single bytes, so at most 255 of these
/// bytes are actually addressable by the mode metadata.
pub const STEP_DATA_MAX_SIZE: usize = 256;

// Offsets within the mode region, relative to its base address.
const STEP_OFFSET_OFFSET: usize = 1;
const DELAY_OFFSET: usize = STEP_OFFSET_OFFSET + MAX_MODE_COUNT + 1;
const STATUS_OFFSET: usize = DELAY_OFFSET + MAX_MODE_COUNT * 2;
const BUTTON_DATA_OFFSET: usize = STATUS_OFFSET + MAX_MODE_COUNT;

const BUTTON_DATA: [u8; 6] = [0x02, 0x07, 0x07, 0xFF, 0xFF, 0xFF];

/// Total size of the mode region: 2 reserved bytes, the step offset table,
/// the delay table, the status table and the fixed button data.
pub const MODE_DATA_SIZE: usize = BUTTON_DATA_OFFSET + BUTTON_DATA.len();

const ENABLED_MODE_STATUS: u8 = 0x01;
const DISABLED_MODE_STATUS: u8 = 0x07;

// The firmware has been seen emitting status variants besides the two
// canonical values, so disabled is detected by this bit rather than by
// exact comparison. Anything without the bit counts as enabled.
const DISABLED_STATUS_BIT: u8 = 0x04;

/// One light pattern program selectable on the device: a pair of delay
/// periods (device-specific time units) and the playback sequence of steps.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    #[serde(default = "enabled_by_default")]
    pub is_enabled: bool,
    pub short_delay: u8,
    pub long_delay: u8,
    pub steps: Vec<Step>,
}

fn enabled_by_default() -> bool {
    true
}

/// The whole light configuration: the enabled modes in playback-slot order.
/// Disabled slots only exist as padding in the encoded form.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightConfig {
    pub modes: Vec<Mode>,
}

fn disabled_mode() -> Mode {
    Mode {
        is_enabled: false,
        short_delay: 0xFF,
        long_delay: 0xFF,
        steps: Vec::new(),
    }
}

impl LightConfig {
    /// Decodes the two raw memory regions into the structured model. Only
    /// modes whose status byte marks them enabled are retained, in slot
    /// order.
    pub fn decode(mode_data: &[u8], step_data: &[u8]) -> Result<Self, FormatError> {
        if mode_data.len() != MODE_DATA_SIZE {
            return Err(FormatError::ModeRegionLength {
                actual: mode_data.len(),
                expected: MODE_DATA_SIZE,
            });
        }
        // Sanity check on the two reserved bytes at the region base.
        if mode_data[0] != 0 || mode_data[1] != 0 {
            return Err(FormatError::NonZeroReserved);
        }
        if mode_data[BUTTON_DATA_OFFSET..] != BUTTON_DATA {
            return Err(FormatError::ButtonDataMismatch);
        }

        let mut modes = Vec::with_capacity(MAX_MODE_COUNT);
        for i in 0..MAX_MODE_COUNT {
            let start = mode_data[STEP_OFFSET_OFFSET + i] as usize;
            let end = mode_data[STEP_OFFSET_OFFSET + i + 1] as usize;
            let steps = step_data
                .get(start..end)
                .ok_or(FormatError::StepOffsetsOutOfRange)?
                .iter()
                .map(|&b| Step::from_byte(b))
                .collect();

            let delay = DELAY_OFFSET + i * 2;
            modes.push(Mode {
                is_enabled: mode_data[STATUS_OFFSET + i] & DISABLED_STATUS_BIT == 0,
                short_delay: mode_data[delay],
                long_delay: mode_data[delay + 1],
                steps,
            });
        }

        modes.retain(|m| m.is_enabled);
        Ok(Self { modes })
    }

    /// Encodes the mode region: reserved bytes, cumulative step offsets,
    /// delay pairs, status bytes and the fixed button data. The mode list is
    /// padded to [`MAX_MODE_COUNT`] slots with disabled placeholders.
    pub fn encode_mode_data(&self) -> Result<Vec<u8>, FormatError> {
        if self.modes.len() > MAX_MODE_COUNT {
            return Err(FormatError::TooManyModes(self.modes.len()));
        }
        self.check_step_budget()?;

        let placeholder = disabled_mode();
        let slot = |i: usize| self.modes.get(i).unwrap_or(&placeholder);

        let mut bytes = Vec::with_capacity(MODE_DATA_SIZE);
        bytes.extend_from_slice(&[0, 0]);

        let mut offset = 0usize;
        for i in 0..MAX_MODE_COUNT {
            offset += slot(i).steps.len();
            bytes.push(offset as u8);
        }

        for i in 0..MAX_MODE_COUNT {
            bytes.push(slot(i).short_delay);
            bytes.push(slot(i).long_delay);
        }

        for i in 0..MAX_MODE_COUNT {
            bytes.push(if slot(i).is_enabled {
                ENABLED_MODE_STATUS
            } else {
                DISABLED_MODE_STATUS
            });
        }

        bytes.extend_from_slice(&BUTTON_DATA);
        debug_assert_eq!(bytes.len(), MODE_DATA_SIZE);
        Ok(bytes)
    }

    /// Encodes the step-data region: every mode's packed steps concatenated
    /// in mode order.
    pub fn encode_step_data(&self) -> Result<Vec<u8>, FormatError> {
        self.check_step_budget()?;
        Ok(self
            .modes
            .iter()
            .flat_map(|m| m.steps.iter().map(Step::to_byte))
            .collect())
    }

    // The offset table holds cumulative counts as single bytes; a total that
    // does not fit in one byte would silently wrap, so it is rejected here.
    fn check_step_budget(&self) -> Result<(), FormatError> {
        let total: usize = self.modes.iter().map(|m| m.steps.len()).sum();
        if total > u8::MAX as usize {
            return Err(FormatError::TooManySteps(total));
        }
        Ok(())
    }
}
