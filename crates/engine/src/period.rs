//! Calendar-month periods used to filter expenses, incomes and budgets.
//!
//! Callers pass `month`/`year` where `0` means "current", resolved against
//! the UTC clock at the call site. `0` is the only sentinel.

use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Period {
    pub month: u32,
    pub year: i32,
}

impl Period {
    /// Resolves `0` sentinels against the current UTC month/year.
    pub fn resolve(month: u32, year: i32) -> ResultEngine<Self> {
        Self::resolve_at(month, year, Utc::now())
    }

    /// Like [`Period::resolve`] with an explicit clock.
    pub fn resolve_at(month: u32, year: i32, now: DateTime<Utc>) -> ResultEngine<Self> {
        let month = if month == 0 { now.month() } else { month };
        let year = if year == 0 { now.year() } else { year };

        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidPeriod(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        if !(1..=9999).contains(&year) {
            return Err(EngineError::InvalidPeriod(format!(
                "year must be between 1 and 9999, got {year}"
            )));
        }

        Ok(Self { month, year })
    }

    /// Returns the half-open UTC range `[start, end)` covering the month.
    pub fn bounds(&self) -> ResultEngine<(DateTime<Utc>, DateTime<Utc>)> {
        let (next_month, next_year) = if self.month == 12 {
            (1, self.year + 1)
        } else {
            (self.month + 1, self.year)
        };
        let start = first_of_month(self.year, self.month)?;
        let end = first_of_month(next_year, next_month)?;
        Ok((start, end))
    }
}

fn first_of_month(year: i32, month: u32) -> ResultEngine<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| EngineError::InvalidPeriod(format!("{year}-{month:02} is not a valid month")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 15, 10, 30, 0).unwrap()
    }

    #[test]
    fn zero_resolves_to_current_month_and_year() {
        let period = Period::resolve_at(0, 0, now()).unwrap();
        assert_eq!(period, Period { month: 7, year: 2024 });
    }

    #[test]
    fn sentinels_resolve_independently() {
        assert_eq!(
            Period::resolve_at(3, 0, now()).unwrap(),
            Period { month: 3, year: 2024 }
        );
        assert_eq!(
            Period::resolve_at(0, 2021, now()).unwrap(),
            Period { month: 7, year: 2021 }
        );
    }

    #[test]
    fn out_of_range_month_is_rejected() {
        let err = Period::resolve_at(13, 2024, now()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPeriod(_)));
    }

    #[test]
    fn negative_year_is_rejected() {
        let err = Period::resolve_at(1, -5, now()).unwrap_err();
        assert!(matches!(err, EngineError::InvalidPeriod(_)));
    }

    #[test]
    fn december_bounds_roll_into_next_year() {
        let (start, end) = Period { month: 12, year: 2023 }.bounds().unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }
}
