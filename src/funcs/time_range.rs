use tracing::debug;

use super::temporal::{in_circular_range, split_gmt};
use super::{PacFunctions, PacValue};
use crate::interface::DateTimeSample;

/// Accepted call shapes of `timeRange`. Every range wraps past midnight
/// when its start is later than its end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRangeArgs {
    Hour(u32),
    Hours(u32, u32),
    /// `(hour, minute)` bounds.
    HourMinutes { start: (u32, u32), end: (u32, u32) },
    /// `(hour, minute, second)` bounds.
    HourMinuteSeconds {
        start: (u32, u32, u32),
        end: (u32, u32, u32),
    },
}

fn bounded(value: &PacValue, max: i64) -> Option<u32> {
    value
        .as_number()
        .filter(|n| (0..=max).contains(n))
        .and_then(|n| u32::try_from(n).ok())
}

fn hour(value: &PacValue) -> Option<u32> {
    bounded(value, 23)
}

fn minute(value: &PacValue) -> Option<u32> {
    bounded(value, 59)
}

impl TimeRangeArgs {
    /// Classifies arguments that have already had `"GMT"` removed. Hours
    /// must be 0-23, minutes and seconds 0-59.
    pub fn classify(args: &[PacValue]) -> Option<Self> {
        match args {
            [h] => Some(Self::Hour(hour(h)?)),
            [h1, h2] => Some(Self::Hours(hour(h1)?, hour(h2)?)),
            [h1, m1, h2, m2] => Some(Self::HourMinutes {
                start: (hour(h1)?, minute(m1)?),
                end: (hour(h2)?, minute(m2)?),
            }),
            [h1, m1, s1, h2, m2, s2] => Some(Self::HourMinuteSeconds {
                start: (hour(h1)?, minute(m1)?, minute(s1)?),
                end: (hour(h2)?, minute(m2)?, minute(s2)?),
            }),
            _ => None,
        }
    }

    pub fn matches(&self, now: &DateTimeSample) -> bool {
        match *self {
            Self::Hour(h) => now.hour == h,
            Self::Hours(start, end) => in_circular_range(now.hour, start, end),
            Self::HourMinutes { start, end } => {
                in_circular_range((now.hour, now.minute), start, end)
            }
            Self::HourMinuteSeconds { start, end } => {
                in_circular_range((now.hour, now.minute, now.second), start, end)
            }
        }
    }
}

impl PacFunctions {
    /// `timeRange(...)` with 1, 2, 4 or 6 arguments plus an optional `"GMT"`.
    pub fn time_range(&self, args: &[PacValue]) -> bool {
        let (rest, gmt) = split_gmt(args);
        let Some(shape) = TimeRangeArgs::classify(rest) else {
            debug!("timeRange: unsupported arguments {:?}", args);
            return false;
        };
        shape.matches(&self.clock.now(gmt))
    }
}
