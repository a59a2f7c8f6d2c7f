use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Timelike, Utc, Weekday};

/// Days of the week on which a new clue image unlocks.
pub const RELEASE_DAYS: [Weekday; 3] = [Weekday::Mon, Weekday::Thu, Weekday::Fri];

/// Hour of day (UTC) at which clues unlock.
pub const RELEASE_HOUR: u32 = 20;

/// Find the nearest release slot strictly after `now`.
///
/// A slot on the current day still counts while the clock is before
/// [`RELEASE_HOUR`]; once every slot of the week has passed, the schedule
/// wraps to the following Monday. Pure function of `now`.
pub fn next_release_after(now: DateTime<Utc>) -> DateTime<Utc> {
    let today = now.weekday().num_days_from_monday();

    let days_ahead = RELEASE_DAYS
        .iter()
        .map(|day| day.num_days_from_monday())
        .find(|&slot| slot > today || (slot == today && now.hour() < RELEASE_HOUR))
        .map(|slot| slot - today)
        .unwrap_or(7 - today); // no slot left this week: next Monday

    let date = now.date_naive() + Duration::days(days_ahead as i64);
    let release = date.and_time(NaiveTime::from_hms_opt(RELEASE_HOUR, 0, 0).unwrap());
    Utc.from_utc_datetime(&release)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    // 2024-01-15 is a Monday.

    #[test]
    fn test_tuesday_morning_targets_thursday() {
        let now = utc(2024, 1, 16, 10, 0);
        assert_eq!(next_release_after(now), utc(2024, 1, 18, 20, 0));
    }

    #[test]
    fn test_friday_evening_wraps_to_monday() {
        let now = utc(2024, 1, 19, 21, 0);
        assert_eq!(next_release_after(now), utc(2024, 1, 22, 20, 0));
    }

    #[test]
    fn test_release_day_before_hour_counts_same_day() {
        let now = utc(2024, 1, 15, 10, 0);
        assert_eq!(next_release_after(now), utc(2024, 1, 15, 20, 0));
    }

    #[test]
    fn test_exactly_on_slot_moves_to_next() {
        let now = utc(2024, 1, 15, 20, 0);
        assert_eq!(next_release_after(now), utc(2024, 1, 18, 20, 0));
    }

    #[test]
    fn test_weekend_wraps_to_monday() {
        assert_eq!(next_release_after(utc(2024, 1, 20, 12, 0)), utc(2024, 1, 22, 20, 0));
        assert_eq!(next_release_after(utc(2024, 1, 21, 12, 0)), utc(2024, 1, 22, 20, 0));
    }

    #[test]
    fn test_thursday_after_hour_targets_friday() {
        let now = utc(2024, 1, 18, 20, 1);
        assert_eq!(next_release_after(now), utc(2024, 1, 19, 20, 0));
    }

    #[test]
    fn test_result_is_strictly_in_the_future() {
        // Sweep a full week hour by hour
        let mut now = utc(2024, 1, 15, 0, 0);
        for _ in 0..(7 * 24) {
            let release = next_release_after(now);
            assert!(release > now, "release {release} not after {now}");
            assert_eq!(release.hour(), RELEASE_HOUR);
            assert!(RELEASE_DAYS.contains(&release.weekday()));
            now += Duration::hours(1);
        }
    }
}
