//! Pure schedule arithmetic.
//!
//! All functions are total for validated rules: month-relative rules clamp
//! to the length of the target month (a day-31 rule fires on Feb 28/29) but
//! the rule keeps its nominal day, so the schedule returns to the 31st in
//! longer months.

use chrono::{Datelike, Duration, NaiveDate};

use super::recurring_model::Frequency;

/// Number of days in the given month, leap years included.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

fn clamped_date(year: i32, month: u32, day: u32, fallback: NaiveDate) -> NaiveDate {
    let day = day.clamp(1, days_in_month(year, month).max(1));
    // The day is within the month by construction; the fallback is
    // unreachable for validated rules.
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(fallback)
}

/// The occurrence strictly after `current` for the given rule.
///
/// - Daily advances one day.
/// - Weekly lands on the rule's weekday (0 = Monday), always moving forward
///   by 1..=7 days; when `current` already sits on that weekday it advances
///   a full week.
/// - Monthly moves to the following month on the rule's nominal day,
///   clamped.
/// - Yearly moves to the rule's month/day in the following year, clamped
///   (a Feb 29 rule fires on Feb 28 in common years).
pub fn next_occurrence(current: NaiveDate, frequency: &Frequency) -> NaiveDate {
    match *frequency {
        Frequency::Daily => current + Duration::days(1),
        Frequency::Weekly { day_of_week } => {
            let current_dow = current.weekday().num_days_from_monday();
            let target = u32::from(day_of_week);
            let ahead = (target + 7 - current_dow - 1) % 7 + 1;
            current + Duration::days(i64::from(ahead))
        }
        Frequency::Monthly { day_of_month } => {
            let (year, month) = if current.month() == 12 {
                (current.year() + 1, 1)
            } else {
                (current.year(), current.month() + 1)
            };
            clamped_date(year, month, day_of_month, current)
        }
        Frequency::Yearly {
            month_of_year,
            day_of_month,
        } => clamped_date(current.year() + 1, month_of_year, day_of_month, current),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn daily_advances_one_day() {
        assert_eq!(next_occurrence(d(2026, 3, 15), &Frequency::Daily), d(2026, 3, 16));
        assert_eq!(next_occurrence(d(2026, 12, 31), &Frequency::Daily), d(2027, 1, 1));
        // Leap day.
        assert_eq!(next_occurrence(d(2028, 2, 28), &Frequency::Daily), d(2028, 2, 29));
    }

    #[test]
    fn weekly_lands_on_target_weekday() {
        // 2026-03-18 is a Wednesday; next Monday is 5 days out.
        let rule = Frequency::Weekly { day_of_week: 0 };
        assert_eq!(next_occurrence(d(2026, 3, 18), &rule), d(2026, 3, 23));
        assert_eq!(next_occurrence(d(2026, 3, 23), &rule).weekday(), chrono::Weekday::Mon);
    }

    #[test]
    fn weekly_on_target_weekday_advances_full_week() {
        // 2026-03-16 is a Monday.
        let rule = Frequency::Weekly { day_of_week: 0 };
        assert_eq!(next_occurrence(d(2026, 3, 16), &rule), d(2026, 3, 23));
    }

    #[test]
    fn weekly_never_stalls() {
        for dow in 0u8..=6 {
            let rule = Frequency::Weekly { day_of_week: dow };
            let next = next_occurrence(d(2026, 3, 18), &rule);
            let gap = (next - d(2026, 3, 18)).num_days();
            assert!((1..=7).contains(&gap), "dow {} jumped {} days", dow, gap);
            assert_eq!(next.weekday().num_days_from_monday(), u32::from(dow));
        }
    }

    #[test]
    fn monthly_clamps_to_short_months() {
        let rule = Frequency::Monthly { day_of_month: 31 };
        // Jan 31 -> Feb 28 in a common year.
        assert_eq!(next_occurrence(d(2026, 1, 31), &rule), d(2026, 2, 28));
        // The rule keeps its nominal day: Feb 28 -> Mar 31.
        assert_eq!(next_occurrence(d(2026, 2, 28), &rule), d(2026, 3, 31));
    }

    #[test]
    fn monthly_clamps_to_leap_february() {
        let rule = Frequency::Monthly { day_of_month: 30 };
        assert_eq!(next_occurrence(d(2028, 1, 30), &rule), d(2028, 2, 29));
    }

    #[test]
    fn monthly_rolls_over_year_end() {
        let rule = Frequency::Monthly { day_of_month: 15 };
        assert_eq!(next_occurrence(d(2026, 12, 15), &rule), d(2027, 1, 15));
    }

    #[test]
    fn yearly_clamps_leap_day() {
        let rule = Frequency::Yearly {
            month_of_year: 2,
            day_of_month: 29,
        };
        assert_eq!(next_occurrence(d(2028, 2, 29), &rule), d(2029, 2, 28));
        // And back onto the 29th when the target year is a leap year.
        assert_eq!(next_occurrence(d(2027, 2, 28), &rule), d(2028, 2, 29));
    }

    #[test]
    fn february_lengths() {
        assert_eq!(days_in_month(2026, 2), 28);
        assert_eq!(days_in_month(2028, 2), 29);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
    }
}
