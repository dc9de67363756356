use chrono::{Datelike, NaiveDate};

use crate::{EngineError, ResultEngine};

/// Inclusive first and last day of the calendar month containing `anchor`.
pub(crate) fn month_bounds(anchor: NaiveDate) -> ResultEngine<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(anchor.year(), anchor.month(), 1)
        .ok_or_else(|| EngineError::Validation("invalid date".to_string()))?;
    let (next_year, next_month) = if anchor.month() == 12 {
        (anchor.year() + 1, 1)
    } else {
        (anchor.year(), anchor.month() + 1)
    };
    let last = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .ok_or_else(|| EngineError::Validation("invalid date".to_string()))?;
    Ok((first, last))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn mid_month() {
        let (first, last) = month_bounds(date(2024, 1, 15)).unwrap();
        assert_eq!(first, date(2024, 1, 1));
        assert_eq!(last, date(2024, 1, 31));
    }

    #[test]
    fn leap_february() {
        let (first, last) = month_bounds(date(2024, 2, 10)).unwrap();
        assert_eq!(first, date(2024, 2, 1));
        assert_eq!(last, date(2024, 2, 29));
    }

    #[test]
    fn december_rolls_into_next_year() {
        let (first, last) = month_bounds(date(2023, 12, 31)).unwrap();
        assert_eq!(first, date(2023, 12, 1));
        assert_eq!(last, date(2023, 12, 31));
    }
}
