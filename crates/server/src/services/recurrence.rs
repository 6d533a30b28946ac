//! Recurring-event expansion.
//!
//! [`expand`] turns a start date plus a [`RecurrenceRule`] into the bounded,
//! ordered list of occurrence dates that get materialized as event rows. It
//! is pure: no clock, no database.
//!
//! Bounds: an explicit `count` is the occurrence bound, clamped to the
//! [`DEFAULT_CAP`] hard cap that applies throughout. An explicit `end_date`
//! is an inclusive ceiling; absent both it and a count, generation stops one
//! year after the start date.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::models::{Frequency, MonthlyPattern, RecurrenceRule};

/// Hard cap on generated occurrences; an explicit count cannot exceed it.
pub const DEFAULT_CAP: usize = 100;

/// Expand a rule into its ordered occurrence dates, starting at `start`.
///
/// The start date is always the first occurrence, even when a weekly rule's
/// weekday set doesn't include it.
#[must_use]
pub fn expand(start: NaiveDate, rule: &RecurrenceRule) -> Vec<NaiveDate> {
    let cap = rule
        .count
        .map_or(DEFAULT_CAP, |c| usize::try_from(c.max(1)).unwrap_or(1))
        .min(DEFAULT_CAP);
    let horizon = match (rule.end_date, rule.count) {
        (Some(end), _) => Some(end),
        // An explicit count is the sole bound.
        (None, Some(_)) => None,
        (None, None) => start.checked_add_months(Months::new(12)),
    };

    let mut dates = Vec::new();
    let mut i: u32 = 0;
    let mut cursor = start;
    loop {
        let Some(date) = occurrence(start, cursor, i, rule) else {
            break;
        };
        if horizon.is_some_and(|h| date > h) {
            break;
        }
        dates.push(date);
        if dates.len() >= cap {
            break;
        }
        cursor = date;
        i += 1;
    }
    dates
}

/// The `i`-th occurrence (0-based). `cursor` is the previous occurrence,
/// used by the weekly weekday scan; everything else derives from `start` so
/// clamping in one month or year never shifts later occurrences.
fn occurrence(
    start: NaiveDate,
    cursor: NaiveDate,
    i: u32,
    rule: &RecurrenceRule,
) -> Option<NaiveDate> {
    let step = rule.step();
    match rule.frequency {
        Frequency::Daily => start.checked_add_days(Days::new(u64::from(i) * u64::from(step))),
        Frequency::Weekly => {
            if i == 0 {
                return Some(start);
            }
            if let Some(days) = rule.days_of_week.as_deref().filter(|d| !d.is_empty()) {
                for offset in 1..=7 {
                    let candidate = cursor.checked_add_days(Days::new(offset))?;
                    if days.contains(&weekday_index(candidate)) {
                        return Some(candidate);
                    }
                }
            }
            cursor.checked_add_days(Days::new(7 * u64::from(step)))
        }
        Frequency::Monthly => {
            let months = i.checked_mul(step)?;
            match rule.monthly_pattern {
                MonthlyPattern::DayOfMonth => add_months_clamped(start, months),
                MonthlyPattern::NthWeekday => {
                    let first = start.with_day(1)?.checked_add_months(Months::new(months))?;
                    Some(nth_weekday_in_month(
                        first,
                        weekday_index(start),
                        (start.day() - 1) / 7,
                    ))
                }
            }
        }
        Frequency::Yearly => {
            let years = i.checked_mul(step)?;
            // checked_add_months clamps Feb 29 to Feb 28 off leap years.
            add_months_clamped(start, years.checked_mul(12)?)
        }
    }
}

/// Weekday as 0 = Sunday .. 6 = Saturday.
fn weekday_index(date: NaiveDate) -> u8 {
    u8::try_from(date.weekday().num_days_from_sunday()).unwrap_or(0)
}

/// `start` plus `months` months, day-of-month clamped to the target month.
fn add_months_clamped(start: NaiveDate, months: u32) -> Option<NaiveDate> {
    start.checked_add_months(Months::new(months))
}

/// The `nth` (0-based) occurrence of `weekday` in the month containing
/// `first` (which must be the 1st). Falls back to the month's last such
/// weekday when the month has no nth one.
fn nth_weekday_in_month(first: NaiveDate, weekday: u8, nth: u32) -> NaiveDate {
    let mut matched = first;
    let mut seen: u32 = 0;
    let mut day = first;
    while day.month() == first.month() {
        if weekday_index(day) == weekday {
            matched = day;
            if seen == nth {
                return day;
            }
            seen += 1;
        }
        match day.checked_add_days(Days::new(1)) {
            Some(next) => day = next,
            None => break,
        }
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn rule(frequency: Frequency) -> RecurrenceRule {
        RecurrenceRule {
            frequency,
            interval: 1,
            days_of_week: None,
            monthly_pattern: MonthlyPattern::DayOfMonth,
            end_date: None,
            count: None,
        }
    }

    #[test]
    fn test_daily_count_five() {
        let r = RecurrenceRule {
            count: Some(5),
            ..rule(Frequency::Daily)
        };
        let dates = expand(date(2024, 1, 1), &r);
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 1),
                date(2024, 1, 2),
                date(2024, 1, 3),
                date(2024, 1, 4),
                date(2024, 1, 5),
            ]
        );
    }

    #[test]
    fn test_daily_interval_skips_days() {
        let r = RecurrenceRule {
            interval: 3,
            count: Some(3),
            ..rule(Frequency::Daily)
        };
        let dates = expand(date(2024, 1, 1), &r);
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 4), date(2024, 1, 7)]
        );
    }

    #[test]
    fn test_weekly_weekday_set_alternates() {
        // 2024-01-01 is a Monday; Mon=1, Wed=3.
        let r = RecurrenceRule {
            days_of_week: Some(vec![1, 3]),
            count: Some(6),
            ..rule(Frequency::Weekly)
        };
        let dates = expand(date(2024, 1, 1), &r);
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 1),  // Mon
                date(2024, 1, 3),  // Wed
                date(2024, 1, 8),  // Mon
                date(2024, 1, 10), // Wed
                date(2024, 1, 15), // Mon
                date(2024, 1, 17), // Wed
            ]
        );
    }

    #[test]
    fn test_weekly_without_set_steps_whole_weeks() {
        let r = RecurrenceRule {
            interval: 2,
            count: Some(3),
            ..rule(Frequency::Weekly)
        };
        let dates = expand(date(2024, 1, 1), &r);
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 15), date(2024, 1, 29)]
        );
    }

    #[test]
    fn test_weekly_start_outside_set_still_first() {
        // 2024-01-02 is a Tuesday; only Fridays (5) in the set.
        let r = RecurrenceRule {
            days_of_week: Some(vec![5]),
            count: Some(3),
            ..rule(Frequency::Weekly)
        };
        let dates = expand(date(2024, 1, 2), &r);
        assert_eq!(
            dates,
            vec![date(2024, 1, 2), date(2024, 1, 5), date(2024, 1, 12)]
        );
    }

    #[test]
    fn test_monthly_day_clamps_short_months() {
        let r = RecurrenceRule {
            count: Some(4),
            ..rule(Frequency::Monthly)
        };
        let dates = expand(date(2024, 1, 31), &r);
        assert_eq!(
            dates,
            vec![
                date(2024, 1, 31),
                date(2024, 2, 29), // leap year clamp
                date(2024, 3, 31), // not shifted by February's clamp
                date(2024, 4, 30),
            ]
        );
    }

    #[test]
    fn test_monthly_nth_weekday() {
        // 2024-01-09 is the second Tuesday of January.
        let r = RecurrenceRule {
            monthly_pattern: MonthlyPattern::NthWeekday,
            count: Some(3),
            ..rule(Frequency::Monthly)
        };
        let dates = expand(date(2024, 1, 9), &r);
        assert_eq!(
            dates,
            vec![date(2024, 1, 9), date(2024, 2, 13), date(2024, 3, 12)]
        );
    }

    #[test]
    fn test_monthly_fifth_weekday_falls_back_to_last() {
        // 2024-01-29 is the fifth Monday of January; February 2024 has only
        // four Mondays, so the fallback picks the last one.
        let r = RecurrenceRule {
            monthly_pattern: MonthlyPattern::NthWeekday,
            count: Some(2),
            ..rule(Frequency::Monthly)
        };
        let dates = expand(date(2024, 1, 29), &r);
        assert_eq!(dates, vec![date(2024, 1, 29), date(2024, 2, 26)]);
    }

    #[test]
    fn test_yearly_leap_day_clamps() {
        let r = RecurrenceRule {
            count: Some(3),
            ..rule(Frequency::Yearly)
        };
        let dates = expand(date(2024, 2, 29), &r);
        assert_eq!(
            dates,
            vec![date(2024, 2, 29), date(2025, 2, 28), date(2026, 2, 28)]
        );
    }

    #[test]
    fn test_default_cap_without_count() {
        let dates = expand(date(2024, 1, 1), &rule(Frequency::Daily));
        assert_eq!(dates.len(), DEFAULT_CAP);
    }

    #[test]
    fn test_oversized_count_clamps_to_cap() {
        let r = RecurrenceRule {
            count: Some(500),
            ..rule(Frequency::Daily)
        };
        let dates = expand(date(2024, 1, 1), &r);
        assert_eq!(dates.len(), DEFAULT_CAP);
        assert_eq!(dates.last(), Some(&date(2024, 4, 9)));
    }

    #[test]
    fn test_one_year_horizon_without_end_date() {
        let r = rule(Frequency::Monthly);
        let dates = expand(date(2024, 1, 15), &r);
        assert_eq!(dates.len(), 13); // Jan 2024 through Jan 2025 inclusive
        assert_eq!(dates.last(), Some(&date(2025, 1, 15)));
    }

    #[test]
    fn test_end_date_is_inclusive() {
        let r = RecurrenceRule {
            end_date: Some(date(2024, 1, 3)),
            ..rule(Frequency::Daily)
        };
        let dates = expand(date(2024, 1, 1), &r);
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]
        );
    }

    #[test]
    fn test_count_beats_end_date_when_reached_first() {
        let r = RecurrenceRule {
            end_date: Some(date(2024, 12, 31)),
            count: Some(2),
            ..rule(Frequency::Daily)
        };
        let dates = expand(date(2024, 1, 1), &r);
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2)]);
    }

    #[test]
    fn test_zero_interval_treated_as_one() {
        let r = RecurrenceRule {
            interval: 0,
            count: Some(3),
            ..rule(Frequency::Daily)
        };
        let dates = expand(date(2024, 1, 1), &r);
        assert_eq!(
            dates,
            vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]
        );
    }
}
