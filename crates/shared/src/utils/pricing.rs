use chrono::{DateTime, Utc};

const SECONDS_PER_HOUR: i64 = 60 * 60;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Price of a booking in paise.
///
/// Whole days are charged at `daily_rate`; the remainder is charged per started hour at
/// `hourly_rate`, never more than one `daily_rate`. Returns `None` for an empty or inverted
/// range and on overflow.
pub fn booking_amount(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    hourly_rate: i64,
    daily_rate: i64,
) -> Option<i64> {
    let seconds = (end - start).num_seconds();
    if seconds <= 0 {
        return None;
    }

    let days = seconds / SECONDS_PER_DAY;
    let remainder = seconds % SECONDS_PER_DAY;
    let hours = (remainder + SECONDS_PER_HOUR - 1) / SECONDS_PER_HOUR;

    let remainder_cost = hours.checked_mul(hourly_rate)?.min(daily_rate);

    days.checked_mul(daily_rate)?.checked_add(remainder_cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(hour: u32, minute: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, minute, 0).unwrap()
    }

    #[test]
    fn started_hours_round_up() {
        assert_eq!(booking_amount(at(10, 0), at(11, 30), 5_000, 40_000), Some(10_000));
        assert_eq!(booking_amount(at(10, 0), at(10, 1), 5_000, 40_000), Some(5_000));
        assert_eq!(booking_amount(at(10, 0), at(12, 0), 5_000, 40_000), Some(10_000));
    }

    #[test]
    fn partial_day_is_capped_at_daily_rate() {
        assert_eq!(booking_amount(at(0, 0), at(23, 0), 5_000, 40_000), Some(40_000));
    }

    #[test]
    fn whole_days_plus_remaining_hours() {
        let start = at(9, 0);
        let end = start + Duration::days(2) + Duration::minutes(90);

        assert_eq!(booking_amount(start, end, 5_000, 40_000), Some(90_000));
        assert_eq!(
            booking_amount(start, start + Duration::days(1), 5_000, 40_000),
            Some(40_000)
        );
    }

    #[test]
    fn empty_or_inverted_range_has_no_price() {
        assert_eq!(booking_amount(at(10, 0), at(10, 0), 5_000, 40_000), None);
        assert_eq!(booking_amount(at(11, 0), at(10, 0), 5_000, 40_000), None);
    }
}
