//! Structured model and byte-layout codec for the light-pattern memory of a
//! USB light. A configuration is a list of modes, each an ordered sequence of
//! steps; the device stores it as two fixed-layout memory regions (mode
//! metadata and packed step data).

mod config;
mod step;

pub use config::{LightConfig, Mode, MAX_MODE_COUNT, MODE_DATA_SIZE, STEP_DATA_MAX_SIZE};
pub use step::{Step, MAX_BRIGHTNESS};

use thiserror::Error;

/// Validation failures while converting between the structured model and the
/// raw memory regions or pattern strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("brightness {0} is out of range 0-{max}", max = MAX_BRIGHTNESS)]
    BrightnessOutOfRange(u8),
    #[error("step pattern {0:?} is malformed, expected e.g. \"3 L -O-\"")]
    BadStepPattern(String),
    #[error("mode region is {actual} bytes, expected exactly {expected}")]
    ModeRegionLength { actual: usize, expected: usize },
    #[error("reserved leading bytes of the mode region are not zero")]
    NonZeroReserved,
    #[error("trailing button data does not match the expected constant")]
    ButtonDataMismatch,
    #[error("step offset table points outside the step data region")]
    StepOffsetsOutOfRange,
    #[error("{0} modes supplied, at most {max} can be encoded", max = MAX_MODE_COUNT)]
    TooManyModes(usize),
    #[error("{0} step bytes do not fit the one-byte step offset table")]
    TooManySteps(usize),
}
