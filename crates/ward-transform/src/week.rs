//! Calendar-week bucketing for admission and discharge dates.

use chrono::{Datelike, Duration, NaiveDate};

/// Monday-aligned start of the week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

#[cfg(test)]
mod tests {
    use super::week_start;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monday_maps_to_itself() {
        assert_eq!(week_start(date(2025, 1, 6)), date(2025, 1, 6));
    }

    #[test]
    fn midweek_and_sunday_map_back_to_monday() {
        assert_eq!(week_start(date(2025, 1, 8)), date(2025, 1, 6));
        assert_eq!(week_start(date(2025, 1, 12)), date(2025, 1, 6));
    }

    #[test]
    fn week_start_crosses_month_and_year_boundaries() {
        // 2025-01-01 is a Wednesday; its week starts in December 2024.
        assert_eq!(week_start(date(2025, 1, 1)), date(2024, 12, 30));
    }
}
