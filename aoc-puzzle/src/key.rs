//! Puzzle identity and release schedule

use crate::error::KeyError;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, Utc};
use std::fmt;

/// First year of Advent of Code
pub const FIRST_YEAR: u16 = 2015;
/// Number of years the registry has room for (2015-2034)
pub const MAX_YEARS: u16 = 20;
/// Days per year in the calendar (1-25)
pub const DAYS_PER_YEAR: u8 = 25;
/// Total number of addressable puzzles
pub const CAPACITY: usize = MAX_YEARS as usize * DAYS_PER_YEAR as usize;

/// Puzzles unlock at midnight US-Eastern; December is always standard time.
const RELEASE_HOUR_UTC: u32 = 5;
const EASTERN_OFFSET_SECS: i32 = 5 * 3600;

/// Unique (year, day) identifier of one puzzle
///
/// Ordering is by year, then day, which is the order every sweep and report uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PuzzleKey {
    year: u16,
    day: u8,
}

impl PuzzleKey {
    /// Create a key, validating the year and day ranges
    ///
    /// # Example
    ///
    /// ```
    /// use aoc_puzzle::{KeyError, PuzzleKey};
    ///
    /// let key = PuzzleKey::new(2023, 7).unwrap();
    /// assert_eq!(key.to_string(), "2023/07");
    /// assert_eq!(PuzzleKey::new(2014, 1), Err(KeyError::Year(2014)));
    /// assert_eq!(PuzzleKey::new(2023, 26), Err(KeyError::Day(26)));
    /// ```
    pub fn new(year: u16, day: u8) -> Result<Self, KeyError> {
        if !(FIRST_YEAR..FIRST_YEAR + MAX_YEARS).contains(&year) {
            return Err(KeyError::Year(year));
        }
        if !(1..=DAYS_PER_YEAR).contains(&day) {
            return Err(KeyError::Day(day));
        }
        Ok(Self { year, day })
    }

    /// All 25 keys of a year, in day order
    pub fn days_of(year: u16) -> Result<impl Iterator<Item = PuzzleKey>, KeyError> {
        Self::new(year, 1)?;
        Ok((1..=DAYS_PER_YEAR).map(move |day| PuzzleKey { year, day }))
    }

    pub fn year(self) -> u16 {
        self.year
    }

    pub fn day(self) -> u8 {
        self.day
    }

    /// Flat slot index used by the registry storage
    #[inline]
    pub(crate) fn index(self) -> usize {
        (self.year - FIRST_YEAR) as usize * DAYS_PER_YEAR as usize + (self.day - 1) as usize
    }

    /// Inverse of [`PuzzleKey::index`]
    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        Self {
            year: FIRST_YEAR + (index / DAYS_PER_YEAR as usize) as u16,
            day: (index % DAYS_PER_YEAR as usize) as u8 + 1,
        }
    }

    /// Instant the puzzle (and its input) becomes available upstream
    pub fn release_time(self) -> DateTime<Utc> {
        NaiveDate::from_ymd_opt(i32::from(self.year), 12, u32::from(self.day))
            .and_then(|date| date.and_hms_opt(RELEASE_HOUR_UTC, 0, 0))
            .map(|naive| naive.and_utc())
            .expect("validated keys are always real December dates")
    }

    /// Whether the puzzle has been released at `now`
    pub fn is_released_at(self, now: DateTime<Utc>) -> bool {
        now >= self.release_time()
    }

    /// The puzzle of the current US-Eastern calendar day, if one is running
    ///
    /// Returns `None` outside December 1-25 or for years the registry cannot hold.
    pub fn today(now: DateTime<Utc>) -> Option<PuzzleKey> {
        let eastern = now.with_timezone(&FixedOffset::west_opt(EASTERN_OFFSET_SECS)?);
        if eastern.month() != 12 {
            return None;
        }
        let year = u16::try_from(eastern.year()).ok()?;
        let day = u8::try_from(eastern.day()).ok()?;
        PuzzleKey::new(year, day).ok()
    }
}

impl fmt::Display for PuzzleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}", self.year, self.day)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use proptest::prelude::*;

    #[test]
    fn test_release_time_is_midnight_eastern() {
        let key = PuzzleKey::new(2023, 1).unwrap();
        assert_eq!(
            key.release_time(),
            Utc.with_ymd_and_hms(2023, 12, 1, 5, 0, 0).unwrap()
        );
        assert!(!key.is_released_at(Utc.with_ymd_and_hms(2023, 12, 1, 4, 59, 59).unwrap()));
        assert!(key.is_released_at(Utc.with_ymd_and_hms(2023, 12, 1, 5, 0, 0).unwrap()));
    }

    #[test]
    fn test_today_uses_eastern_calendar() {
        // 03:00 UTC on Dec 2 is still Dec 1 in New York
        let now = Utc.with_ymd_and_hms(2024, 12, 2, 3, 0, 0).unwrap();
        assert_eq!(PuzzleKey::today(now), PuzzleKey::new(2024, 1).ok());

        let now = Utc.with_ymd_and_hms(2024, 12, 26, 12, 0, 0).unwrap();
        assert_eq!(PuzzleKey::today(now), None);

        let now = Utc.with_ymd_and_hms(2024, 7, 4, 12, 0, 0).unwrap();
        assert_eq!(PuzzleKey::today(now), None);
    }

    #[test]
    fn test_days_of_year() {
        let keys: Vec<_> = PuzzleKey::days_of(2020).unwrap().collect();
        assert_eq!(keys.len(), 25);
        assert_eq!(keys[0], PuzzleKey::new(2020, 1).unwrap());
        assert_eq!(keys[24], PuzzleKey::new(2020, 25).unwrap());
        assert!(PuzzleKey::days_of(1999).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_index_roundtrip(year in 2015u16..2035, day in 1u8..=25) {
            let key = PuzzleKey::new(year, day).unwrap();
            prop_assert!(key.index() < CAPACITY);
            prop_assert_eq!(PuzzleKey::from_index(key.index()), key);
        }

        #[test]
        fn prop_index_order_matches_key_order(
            a in (2015u16..2035, 1u8..=25),
            b in (2015u16..2035, 1u8..=25),
        ) {
            let a = PuzzleKey::new(a.0, a.1).unwrap();
            let b = PuzzleKey::new(b.0, b.1).unwrap();
            prop_assert_eq!(a.cmp(&b), a.index().cmp(&b.index()));
        }
    }
}
