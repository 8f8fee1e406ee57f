//! Inquiry number generation: `INQ-YYYYMMDD-NNNN`, sequenced per calendar
//! month (UTC).

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::store::InquiryStore;
use crate::db::DatabaseError;

pub const INQUIRY_PREFIX: &str = "INQ";

/// How the monthly ordinal is derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumberingStrategy {
    /// Count the month's existing inquiries and add one. Not atomic with the
    /// insert: concurrent creations, or a deletion earlier in the month, can
    /// yield a number that is already taken.
    MonthlyCount,
    /// Atomically increment a per-month counter row. Numbers are never
    /// handed out twice, even after deletions.
    #[default]
    MonthlyCounter,
}

impl NumberingStrategy {
    /// Derives the number for an inquiry created at `at`.
    pub fn next_number<S>(&self, store: &S, at: DateTime<Utc>) -> Result<InquiryNumber, DatabaseError>
    where
        S: InquiryStore + ?Sized,
    {
        let window = MonthWindow::containing(at);
        let sequence = match self {
            NumberingStrategy::MonthlyCount => {
                let existing = store.count_created_between(window.start, window.end)?;
                u32::try_from(existing + 1).unwrap_or(u32::MAX)
            }
            NumberingStrategy::MonthlyCounter => store.next_sequence(&window.period_key())?,
        };
        Ok(InquiryNumber {
            date: at.date_naive(),
            sequence,
        })
    }
}

/// The calendar month containing an instant, as the half-open range
/// `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl MonthWindow {
    pub fn containing(at: DateTime<Utc>) -> Self {
        let (year, month) = (at.year(), at.month());
        let (next_year, next_month) = if month == 12 {
            (year + 1, 1)
        } else {
            (year, month + 1)
        };
        Self {
            start: first_instant(year, month),
            end: first_instant(next_year, next_month),
        }
    }

    /// `YYYYMM`, the key of the month's sequence counter.
    pub fn period_key(&self) -> String {
        self.start.format("%Y%m").to_string()
    }
}

fn first_instant(year: i32, month: u32) -> DateTime<Utc> {
    // Day 1 at midnight exists for every month of every representable year.
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// A parsed inquiry number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct InquiryNumber {
    pub date: NaiveDate,
    pub sequence: u32,
}

impl fmt::Display for InquiryNumber {
    /// Sequences above 9999 widen rather than truncate.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{}-{:04}",
            INQUIRY_PREFIX,
            self.date.format("%Y%m%d"),
            self.sequence
        )
    }
}

/// Error returned when a string is not a well-formed inquiry number.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Malformed inquiry number '{0}'")]
pub struct MalformedInquiryNumber(pub String);

impl FromStr for InquiryNumber {
    type Err = MalformedInquiryNumber;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MalformedInquiryNumber(s.to_string());

        let mut parts = s.splitn(3, '-');
        let (prefix, date, seq) = match (parts.next(), parts.next(), parts.next()) {
            (Some(p), Some(d), Some(n)) => (p, d, n),
            _ => return Err(malformed()),
        };
        if prefix != INQUIRY_PREFIX
            || date.len() != 8
            || seq.len() < 4
            || !seq.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(malformed());
        }

        let date = NaiveDate::parse_from_str(date, "%Y%m%d").map_err(|_| malformed())?;
        let sequence: u32 = seq.parse().map_err(|_| malformed())?;
        if sequence == 0 {
            return Err(malformed());
        }
        Ok(Self { date, sequence })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_month_window_regular_month() {
        let w = MonthWindow::containing(utc(2024, 5, 10, 12, 0, 0));
        assert_eq!(w.start, utc(2024, 5, 1, 0, 0, 0));
        assert_eq!(w.end, utc(2024, 6, 1, 0, 0, 0));
        assert_eq!(w.period_key(), "202405");
    }

    #[test]
    fn test_month_window_december_rolls_year() {
        let w = MonthWindow::containing(utc(2024, 12, 31, 23, 59, 59));
        assert_eq!(w.start, utc(2024, 12, 1, 0, 0, 0));
        assert_eq!(w.end, utc(2025, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_month_window_includes_last_instant() {
        let last = utc(2024, 2, 29, 23, 59, 59);
        let w = MonthWindow::containing(last);
        assert!(last >= w.start && last < w.end);
        assert_eq!(w.end, utc(2024, 3, 1, 0, 0, 0));
    }

    #[test]
    fn test_display_pads_to_four_digits() {
        let n = InquiryNumber {
            date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            sequence: 1,
        };
        assert_eq!(n.to_string(), "INQ-20240510-0001");
    }

    #[test]
    fn test_display_widens_past_9999() {
        let n = InquiryNumber {
            date: NaiveDate::from_ymd_opt(2024, 5, 10).unwrap(),
            sequence: 12345,
        };
        assert_eq!(n.to_string(), "INQ-20240510-12345");
    }

    #[test]
    fn test_parse_valid() {
        let n: InquiryNumber = "INQ-20240510-0042".parse().unwrap();
        assert_eq!(n.date, NaiveDate::from_ymd_opt(2024, 5, 10).unwrap());
        assert_eq!(n.sequence, 42);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "INQ-20240510",
            "ABC-20240510-0001",
            "INQ-2024051-0001",
            "INQ-20241301-0001",
            "INQ-20240510-001",
            "INQ-20240510-00a1",
            "INQ-20240510-0000",
        ] {
            assert!(bad.parse::<InquiryNumber>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_ordering_follows_date_then_sequence() {
        let a: InquiryNumber = "INQ-20240510-0002".parse().unwrap();
        let b: InquiryNumber = "INQ-20240511-0001".parse().unwrap();
        let c: InquiryNumber = "INQ-20240511-0003".parse().unwrap();
        assert!(a < b && b < c);
    }
}
