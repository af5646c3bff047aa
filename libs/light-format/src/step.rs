use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::FormatError;

pub const MAX_BRIGHTNESS: u8 = 7;

const BRIGHTNESS_SHIFT: u8 = 5;
const USE_LONG_DELAY_BIT: u8 = 1 << 4;
const CHANNEL1_BIT: u8 = 1 << 3;
const CHANNEL2_BIT: u8 = 1 << 2;
const CHANNEL3_BIT: u8 = 1 << 1;

/// One atomic lighting instruction: a brightness level, a delay-length choice
/// and per-channel on/off state.
///
/// Packs into a single byte: bits 7-5 brightness, bit 4 long-delay flag,
/// bits 3-1 channels 1-3. Bit 0 is unused and always encodes as 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    brightness: u8,
    pub use_long_delay: bool,
    pub channel1: bool,
    pub channel2: bool,
    pub channel3: bool,
}

impl Step {
    pub fn new(
        brightness: u8,
        use_long_delay: bool,
        channel1: bool,
        channel2: bool,
        channel3: bool,
    ) -> Result<Self, FormatError> {
        if brightness > MAX_BRIGHTNESS {
            return Err(FormatError::BrightnessOutOfRange(brightness));
        }
        Ok(Self {
            brightness,
            use_long_delay,
            channel1,
            channel2,
            channel3,
        })
    }

    /// Brightness level, always within `0..=MAX_BRIGHTNESS`.
    pub fn brightness(&self) -> u8 {
        self.brightness
    }

    pub fn from_byte(b: u8) -> Self {
        Self {
            brightness: b >> BRIGHTNESS_SHIFT,
            use_long_delay: b & USE_LONG_DELAY_BIT != 0,
            channel1: b & CHANNEL1_BIT != 0,
            channel2: b & CHANNEL2_BIT != 0,
            channel3: b & CHANNEL3_BIT != 0,
        }
    }

    pub fn to_byte(&self) -> u8 {
        let mut b = self.brightness << BRIGHTNESS_SHIFT;
        if self.use_long_delay {
            b |= USE_LONG_DELAY_BIT;
        }
        if self.channel1 {
            b |= CHANNEL1_BIT;
        }
        if self.channel2 {
            b |= CHANNEL2_BIT;
        }
        if self.channel3 {
            b |= CHANNEL3_BIT;
        }
        b
    }
}

fn parse_channel(pattern: &str, c: u8) -> Result<bool, FormatError> {
    match c {
        b'O' => Ok(true),
        b'-' => Ok(false),
        _ => Err(FormatError::BadStepPattern(pattern.to_owned())),
    }
}

impl FromStr for Step {
    type Err = FormatError;

    /// Parses the 7-character pattern form, e.g. `"3 L -O-"`: a brightness
    /// digit, `L`/`S` for the delay choice, then one `O`/`-` per channel.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || FormatError::BadStepPattern(s.to_owned());

        let b = s.as_bytes();
        if b.len() != 7 || b[1] != b' ' || b[3] != b' ' {
            return Err(bad());
        }

        let brightness = match b[0] {
            digit @ b'0'..=b'9' => digit - b'0',
            _ => return Err(bad()),
        };
        let use_long_delay = match b[2] {
            b'L' => true,
            b'S' => false,
            _ => return Err(bad()),
        };

        Self::new(
            brightness,
            use_long_delay,
            parse_channel(s, b[4])?,
            parse_channel(s, b[5])?,
            parse_channel(s, b[6])?,
        )
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let channel = |on: bool| if on { 'O' } else { '-' };
        write!(
            f,
            "{} {} {}{}{}",
            self.brightness,
            if self.use_long_delay { 'L' } else { 'S' },
            channel(self.channel1),
            channel(self.channel2),
            channel(self.channel3),
        )
    }
}

// Steps travel through JSON as their pattern string, not as a struct.
impl Serialize for Step {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Step {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}
