use tracing::debug;

use super::temporal::{in_circular_range, in_linear_range, month_ordinal, split_gmt};
use super::{PacFunctions, PacValue};
use crate::interface::DateTimeSample;

/// Accepted call shapes of `dateRange`.
///
/// Days are 1-31, months are ordinals 0-11 and years are full years.
/// Compound bounds are ordered tuples, most significant field first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateRangeArgs {
    Day(u32),
    Month(u32),
    Year(i64),
    Days(u32, u32),
    Months(u32, u32),
    Years(i64, i64),
    /// `(month, day)` bounds, wrapping over new year.
    DayMonths { start: (u32, u32), end: (u32, u32) },
    /// `(year, month)` bounds.
    MonthYears { start: (i64, u32), end: (i64, u32) },
    /// `(year, month, day)` bounds.
    Dates {
        start: (i64, u32, u32),
        end: (i64, u32, u32),
    },
}

/// A number usable as a day of the month.
fn day_of_month(value: &PacValue) -> Option<u32> {
    value
        .as_number()
        .filter(|n| (1..=31).contains(n))
        .and_then(|n| u32::try_from(n).ok())
}

impl DateRangeArgs {
    /// Classifies arguments that have already had `"GMT"` removed.
    ///
    /// Arity picks the family, argument types pick the shape. A lone number
    /// outside 1-31 is a year, and a pair of numbers that are not both days
    /// is a year range.
    pub fn classify(args: &[PacValue]) -> Option<Self> {
        match args {
            [a] => day_of_month(a)
                .map(Self::Day)
                .or_else(|| month_ordinal(a).map(Self::Month))
                .or_else(|| a.as_number().map(Self::Year)),
            [a, b] => {
                if let (Some(d1), Some(d2)) = (day_of_month(a), day_of_month(b)) {
                    Some(Self::Days(d1, d2))
                } else if let (Some(m1), Some(m2)) = (month_ordinal(a), month_ordinal(b)) {
                    Some(Self::Months(m1, m2))
                } else {
                    Some(Self::Years(a.as_number()?, b.as_number()?))
                }
            }
            [a, b, c, d] => {
                if let (Some(d1), Some(m1), Some(d2), Some(m2)) =
                    (day_of_month(a), month_ordinal(b), day_of_month(c), month_ordinal(d))
                {
                    Some(Self::DayMonths {
                        start: (m1, d1),
                        end: (m2, d2),
                    })
                } else {
                    Some(Self::MonthYears {
                        start: (b.as_number()?, month_ordinal(a)?),
                        end: (d.as_number()?, month_ordinal(c)?),
                    })
                }
            }
            [d1, m1, y1, d2, m2, y2] => Some(Self::Dates {
                start: (y1.as_number()?, month_ordinal(m1)?, day_of_month(d1)?),
                end: (y2.as_number()?, month_ordinal(m2)?, day_of_month(d2)?),
            }),
            _ => None,
        }
    }

    pub fn matches(&self, now: &DateTimeSample) -> bool {
        let year = i64::from(now.year);
        match *self {
            Self::Day(day) => now.day == day,
            Self::Month(month) => now.month == month,
            Self::Year(y) => year == y,
            Self::Days(start, end) => in_circular_range(now.day, start, end),
            Self::Months(start, end) => in_circular_range(now.month, start, end),
            Self::Years(start, end) => in_linear_range(year, start, end),
            Self::DayMonths { start, end } => {
                in_circular_range((now.month, now.day), start, end)
            }
            Self::MonthYears { start, end } => in_linear_range((year, now.month), start, end),
            Self::Dates { start, end } => {
                in_linear_range((year, now.month, now.day), start, end)
            }
        }
    }
}

impl PacFunctions {
    /// `dateRange(...)` with 1, 2, 4 or 6 arguments plus an optional `"GMT"`.
    pub fn date_range(&self, args: &[PacValue]) -> bool {
        let (rest, gmt) = split_gmt(args);
        let Some(shape) = DateRangeArgs::classify(rest) else {
            debug!("dateRange: unsupported arguments {:?}", args);
            return false;
        };
        shape.matches(&self.clock.now(gmt))
    }
}
