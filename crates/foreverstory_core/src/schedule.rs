//! crates/foreverstory_core/src/schedule.rs
//!
//! Date arithmetic for question deliveries.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDateTime, TimeZone};

use crate::domain::DeliveryFrequency;
use crate::validation::{validate_preferred_day, ValidationError, ValidationResult};

/// Local hour at which questions are delivered.
pub const DELIVERY_HOUR: i64 = 9;

/// Computes the next delivery time from the last one, in local wall-clock time.
///
/// Adds 7 or 14 days, then moves to `preferred_day` (1 = Monday .. 7 = Sunday) within the
/// Sunday-started week the naive date landed in, and sets the time to 09:00.
/// The weekday shift may go backwards, so the gap can be shorter than a full period.
pub fn next_delivery_date(
    last_delivery: NaiveDateTime,
    frequency: DeliveryFrequency,
    preferred_day: u8,
) -> ValidationResult<NaiveDateTime> {
    validate_preferred_day(preferred_day)?;

    let landed = last_delivery
        .date()
        .checked_add_signed(Duration::days(frequency.interval_days()))
        .ok_or(ValidationError::DateOutOfRange)?;

    let current_day = i64::from(landed.weekday().num_days_from_sunday());
    let target_day = if preferred_day == 7 { 0 } else { i64::from(preferred_day) };

    let date = landed
        .checked_add_signed(Duration::days(target_day - current_day))
        .ok_or(ValidationError::DateOutOfRange)?;

    date.and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.checked_add_signed(Duration::hours(DELIVERY_HOUR)))
        .ok_or(ValidationError::DateOutOfRange)
}

/// Same as [`next_delivery_date`], evaluated in the offset carried by `last_delivery`.
pub fn next_delivery_at(
    last_delivery: DateTime<FixedOffset>,
    frequency: DeliveryFrequency,
    preferred_day: u8,
) -> ValidationResult<DateTime<FixedOffset>> {
    let offset = *last_delivery.offset();
    let local = next_delivery_date(last_delivery.naive_local(), frequency, preferred_day)?;
    offset
        .from_local_datetime(&local)
        .single()
        .ok_or(ValidationError::DateOutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc, Weekday};

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    #[test]
    fn weekly_on_the_same_weekday() {
        // 2024-01-01 is a Monday.
        let next = next_delivery_date(at(2024, 1, 1, 14, 30), DeliveryFrequency::Weekly, 1).unwrap();
        assert_eq!(next, at(2024, 1, 8, 9, 0));
    }

    #[test]
    fn biweekly_on_the_same_weekday() {
        let next = next_delivery_date(at(2024, 1, 1, 9, 0), DeliveryFrequency::Biweekly, 1).unwrap();
        assert_eq!(next, at(2024, 1, 15, 9, 0));
    }

    #[test]
    fn later_preferred_day_moves_forward() {
        // Lands on Monday 2024-01-08, Wednesday is two days later.
        let next = next_delivery_date(at(2024, 1, 1, 9, 0), DeliveryFrequency::Weekly, 3).unwrap();
        assert_eq!(next, at(2024, 1, 10, 9, 0));
        assert_eq!(next.weekday(), Weekday::Wed);
    }

    #[test]
    fn earlier_preferred_day_moves_backward_within_the_week() {
        // Lands on Saturday 2024-01-13; Monday of that Sunday-started week is the 8th,
        // only two days after the previous delivery.
        let next = next_delivery_date(at(2024, 1, 6, 9, 0), DeliveryFrequency::Weekly, 1).unwrap();
        assert_eq!(next, at(2024, 1, 8, 9, 0));
    }

    #[test]
    fn sunday_is_the_start_of_the_week() {
        // Lands on Monday 2024-01-08; preferred day 7 (Sunday) is the day before.
        let next = next_delivery_date(at(2024, 1, 1, 9, 0), DeliveryFrequency::Weekly, 7).unwrap();
        assert_eq!(next, at(2024, 1, 7, 9, 0));
        assert_eq!(next.weekday(), Weekday::Sun);
    }

    #[test]
    fn invalid_weekday_is_rejected() {
        assert_eq!(
            next_delivery_date(at(2024, 1, 1, 9, 0), DeliveryFrequency::Weekly, 0),
            Err(ValidationError::InvalidPreferredDay(0))
        );
        assert_eq!(
            next_delivery_date(at(2024, 1, 1, 9, 0), DeliveryFrequency::Weekly, 8),
            Err(ValidationError::InvalidPreferredDay(8))
        );
    }

    #[test]
    fn offset_aware_schedule_keeps_local_nine_o_clock() {
        let cet = FixedOffset::east_opt(3600).unwrap();
        // 2024-01-01 23:30 UTC is already Tuesday 00:30 in Central European time.
        let last = Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap().with_timezone(&cet);
        let next = next_delivery_at(last, DeliveryFrequency::Weekly, 2).unwrap();

        assert_eq!(next.naive_local(), at(2024, 1, 9, 9, 0));
        assert_eq!(next.with_timezone(&Utc), Utc.with_ymd_and_hms(2024, 1, 9, 8, 0, 0).unwrap());
    }
}
