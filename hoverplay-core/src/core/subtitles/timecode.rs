use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

use log::warn;
use serde::{Serialize, Serializer};

use crate::core::subtitles::SubtitleParseError;

const HOUR_MILLIS: u64 = 60 * MINUTE_MILLIS;
const MINUTE_MILLIS: u64 = 60 * SECOND_MILLIS;
const SECOND_MILLIS: u64 = 1000;

/// An elapsed time within a media item, with millisecond precision.
///
/// The value is stored as a whole number of milliseconds so that a textual
/// `HH:MM:SS,mmm` value converts to seconds without accumulating rounding errors,
/// e.g. `01:02:03,004` is exactly `3723.004` seconds.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timecode(u64);

impl Timecode {
    /// The zero timecode.
    pub const ZERO: Timecode = Timecode(0);

    /// Create a new timecode from the given milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Create a timecode from the individual `HH:MM:SS,mmm` groups.
    /// It returns [None] when the total doesn't fit in the millisecond range.
    pub fn from_parts(hours: u64, minutes: u64, seconds: u64, millis: u64) -> Option<Self> {
        hours
            .checked_mul(HOUR_MILLIS)?
            .checked_add(minutes.checked_mul(MINUTE_MILLIS)?)?
            .checked_add(seconds.checked_mul(SECOND_MILLIS)?)?
            .checked_add(millis)
            .map(Self)
    }

    /// Returns the total number of milliseconds of this timecode.
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Returns the timecode as (fractional) seconds.
    pub fn as_secs_f64(&self) -> f64 {
        self.0 as f64 / SECOND_MILLIS as f64
    }

    /// Returns the time between this timecode and the given later one.
    /// A later timecode which lies before this one results in a zero duration.
    pub fn duration_until(&self, end: &Timecode) -> Duration {
        Duration::from_millis(end.0.saturating_sub(self.0))
    }

    /// Parse the given text, substituting zero for every group that could not be read.
    ///
    /// A malformed value is never silent, it's reported as a warning and flagged
    /// through [LossyTimecode::malformed].
    pub fn parse_lossy(value: &str) -> LossyTimecode {
        let groups = TimecodeGroups::scan(value);

        match groups.timecode() {
            Some(timecode) if groups.complete() => LossyTimecode {
                value: timecode,
                malformed: false,
            },
            Some(timecode) => {
                warn!(
                    "Timecode \"{}\" is malformed, unreadable groups have been replaced with zero ({})",
                    value, timecode
                );
                LossyTimecode {
                    value: timecode,
                    malformed: true,
                }
            }
            None => {
                warn!("Timecode \"{}\" is out of range, using {} instead", value, Timecode::ZERO);
                LossyTimecode {
                    value: Timecode::ZERO,
                    malformed: true,
                }
            }
        }
    }
}

impl FromStr for Timecode {
    type Err = SubtitleParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let groups = TimecodeGroups::scan(value);

        groups
            .timecode()
            .filter(|_| groups.complete())
            .ok_or_else(|| SubtitleParseError::InvalidTime(value.to_string()))
    }
}

impl Display for Timecode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let hours = self.0 / HOUR_MILLIS;
        let minutes = (self.0 % HOUR_MILLIS) / MINUTE_MILLIS;
        let seconds = (self.0 % MINUTE_MILLIS) / SECOND_MILLIS;
        let millis = self.0 % SECOND_MILLIS;

        write!(f, "{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }
}

impl From<Timecode> for Duration {
    fn from(value: Timecode) -> Self {
        Duration::from_millis(value.0)
    }
}

impl Serialize for Timecode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_secs_f64())
    }
}

/// The result of a lossy timecode parse.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LossyTimecode {
    /// The parsed timecode, unreadable groups count as zero.
    pub value: Timecode,
    /// Indicates if one or more groups were missing or invalid.
    pub malformed: bool,
}

/// Parse the given `H+:MM:SS,mmm` text into seconds.
///
/// Malformed groups are treated as zero, see [Timecode::parse_lossy].
pub fn parse_timecode(value: &str) -> f64 {
    Timecode::parse_lossy(value).value.as_secs_f64()
}

/// The four numeric groups of a timecode, scanned positionally.
#[derive(Debug, Default)]
struct TimecodeGroups {
    values: [Option<u64>; 4],
}

impl TimecodeGroups {
    fn scan(value: &str) -> Self {
        let value = value.trim();
        let mut groups = Self::default();
        let (clock, millis) = match value.split_once(',') {
            Some((clock, millis)) => (clock, Some(millis)),
            None => (value, None),
        };

        let mut clock_parts = clock.splitn(3, ':');
        for (index, width) in [(0usize, None), (1, Some(2)), (2, Some(2))] {
            groups.values[index] = clock_parts
                .next()
                .and_then(|e| Self::parse_group(e, width));
        }
        groups.values[3] = millis.and_then(|e| Self::parse_group(e, Some(3)));

        groups
    }

    /// Parse a single unsigned group, `width` being the required number of digits when fixed.
    fn parse_group(value: &str, width: Option<usize>) -> Option<u64> {
        if value.is_empty() || !value.chars().all(|e| e.is_ascii_digit()) {
            return None;
        }
        if width.map(|width| value.len() != width).unwrap_or(false) {
            return None;
        }

        value.parse::<u64>().ok()
    }

    fn complete(&self) -> bool {
        self.values.iter().all(Option::is_some)
    }

    fn timecode(&self) -> Option<Timecode> {
        let [hours, minutes, seconds, millis] = self.values.map(|e| e.unwrap_or(0));
        Timecode::from_parts(hours, minutes, seconds, millis)
    }
}
