//! Pieces shared by `weekdayRange`, `dateRange` and `timeRange`.

use chrono::{Month, Weekday};
use tracing::debug;

use super::{PacFunctions, PacValue};

const GMT: &str = "GMT";

/// Strips a trailing `"GMT"` argument. Returns the remaining arguments and
/// whether UTC was requested.
pub(super) fn split_gmt(args: &[PacValue]) -> (&[PacValue], bool) {
    match args.split_last() {
        Some((PacValue::Str(last), rest)) if last == GMT => (rest, true),
        _ => (args, false),
    }
}

/// Inclusive range check on a cyclic scale. When `start > end` the range
/// runs past the top of the cycle and restarts at the bottom.
pub(super) fn in_circular_range<T: PartialOrd>(value: T, start: T, end: T) -> bool {
    if start <= end {
        start <= value && value <= end
    } else {
        start <= value || value <= end
    }
}

/// Inclusive range check on a scale that does not wrap.
pub(super) fn in_linear_range<T: PartialOrd>(value: T, start: T, end: T) -> bool {
    start <= value && value <= end
}

/// Parses the three-letter upper-case weekday codes PAC scripts use.
pub fn weekday_from_code(code: &str) -> Option<Weekday> {
    let day = match code {
        "SUN" => Weekday::Sun,
        "MON" => Weekday::Mon,
        "TUE" => Weekday::Tue,
        "WED" => Weekday::Wed,
        "THU" => Weekday::Thu,
        "FRI" => Weekday::Fri,
        "SAT" => Weekday::Sat,
        _ => return None,
    };
    Some(day)
}

/// Parses the three-letter upper-case month codes PAC scripts use.
pub fn month_from_code(code: &str) -> Option<Month> {
    let month = match code {
        "JAN" => Month::January,
        "FEB" => Month::February,
        "MAR" => Month::March,
        "APR" => Month::April,
        "MAY" => Month::May,
        "JUN" => Month::June,
        "JUL" => Month::July,
        "AUG" => Month::August,
        "SEP" => Month::September,
        "OCT" => Month::October,
        "NOV" => Month::November,
        "DEC" => Month::December,
        _ => return None,
    };
    Some(month)
}

/// Month ordinal 0-11 of a script value, if it is a month code.
pub(super) fn month_ordinal(value: &PacValue) -> Option<u32> {
    value
        .as_str()
        .and_then(month_from_code)
        .map(|m| m.number_from_month() - 1)
}

/// Weekday ordinal 0-6 (Sunday = 0) of a script value, if it is a day code.
fn weekday_ordinal(value: &PacValue) -> Option<u32> {
    value
        .as_str()
        .and_then(weekday_from_code)
        .map(|d| d.num_days_from_sunday())
}

/// Accepted call shapes of `weekdayRange`, as weekday ordinals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeekdayRangeArgs {
    Single(u32),
    Range(u32, u32),
}

impl WeekdayRangeArgs {
    /// Classifies arguments that have already had `"GMT"` removed.
    pub fn classify(args: &[PacValue]) -> Option<Self> {
        match args {
            [wd] => Some(Self::Single(weekday_ordinal(wd)?)),
            [wd1, wd2] => Some(Self::Range(weekday_ordinal(wd1)?, weekday_ordinal(wd2)?)),
            _ => None,
        }
    }

    pub fn matches(&self, weekday: u32) -> bool {
        match *self {
            Self::Single(wd) => weekday == wd,
            Self::Range(start, end) => in_circular_range(weekday, start, end),
        }
    }
}

impl PacFunctions {
    /// `weekdayRange(wd1 [, wd2] [, "GMT"])`.
    pub fn weekday_range(&self, args: &[PacValue]) -> bool {
        let (rest, gmt) = split_gmt(args);
        let Some(shape) = WeekdayRangeArgs::classify(rest) else {
            debug!("weekdayRange: unsupported arguments {:?}", args);
            return false;
        };
        shape.matches(self.clock.now(gmt).weekday)
    }
}
