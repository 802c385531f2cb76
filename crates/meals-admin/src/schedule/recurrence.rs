use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// First calendar day of each week-of-month window, indexed by `week_of_month - 1`.
///
/// Windows are fixed seven-day spans, so the fifth window (29th onward) only exists in months
/// long enough to hold it.
const WINDOW_STARTS: [u32; 5] = [1, 8, 15, 22, 29];

/// Reason a recurrence has no date in the requested month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RecurrenceError {
    #[error("week of month must be between 1 and 5, got {0}")]
    InvalidWeekOfMonth(i32),
    #[error("day of week must be between 1 (Monday) and 7 (Sunday), got {0}")]
    InvalidDayOfWeek(i32),
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
    #[error("no occurrence in {year}-{month:02} for the window starting on day {window_start}")]
    NoOccurrence {
        year: i32,
        month: u32,
        window_start: u32,
    },
}

/// Day of month on which the given week-of-month window opens.
pub fn window_start(week_of_month: i32) -> Option<u32> {
    let index = usize::try_from(week_of_month).ok()?.checked_sub(1)?;
    WINDOW_STARTS.get(index).copied()
}

/// Maps the 1-indexed weekday used by assignments (Monday = 1 .. Sunday = 7).
pub fn weekday_from_ordinal(day_of_week: i32) -> Option<Weekday> {
    match day_of_week {
        1 => Some(Weekday::Mon),
        2 => Some(Weekday::Tue),
        3 => Some(Weekday::Wed),
        4 => Some(Weekday::Thu),
        5 => Some(Weekday::Fri),
        6 => Some(Weekday::Sat),
        7 => Some(Weekday::Sun),
        _ => None,
    }
}

/// Resolve the day of month on which a recurrence falls, explaining failures.
///
/// The year is always taken from `today`; `month` defaults to the month of `today`. Inputs are
/// accepted unvalidated and out-of-range values are reported as errors rather than panicking.
pub fn try_resolve_day(
    week_of_month: i32,
    day_of_week: i32,
    month: Option<u32>,
    today: NaiveDate,
) -> Result<u32, RecurrenceError> {
    let first_possible_day =
        window_start(week_of_month).ok_or(RecurrenceError::InvalidWeekOfMonth(week_of_month))?;
    let target =
        weekday_from_ordinal(day_of_week).ok_or(RecurrenceError::InvalidDayOfWeek(day_of_week))?;

    let year = today.year();
    let month = month.unwrap_or_else(|| today.month());
    if !(1..=12).contains(&month) {
        return Err(RecurrenceError::InvalidMonth(month));
    }

    let no_occurrence = RecurrenceError::NoOccurrence {
        year,
        month,
        window_start: first_possible_day,
    };

    let candidate = NaiveDate::from_ymd_opt(year, month, first_possible_day).ok_or(no_occurrence)?;
    let current = candidate.weekday().num_days_from_monday();
    let wanted = target.num_days_from_monday();
    if current == wanted {
        return Ok(first_possible_day);
    }

    let offset = (wanted + 7 - current) % 7;
    NaiveDate::from_ymd_opt(year, month, first_possible_day + offset)
        .map(|date| date.day())
        .ok_or(no_occurrence)
}

/// Resolve the day of month on which a recurrence falls.
///
/// `None` means the recurrence does not occur in that month; callers should skip it rather
/// than surface an error.
pub fn resolve_day(
    week_of_month: i32,
    day_of_week: i32,
    month: Option<u32>,
    today: NaiveDate,
) -> Option<u32> {
    try_resolve_day(week_of_month, day_of_week, month, today).ok()
}

/// Week-of-month recurrence attached to an assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub week_of_month: i32,
    pub day_of_week: i32,
}

impl RecurrenceRule {
    pub const fn new(week_of_month: i32, day_of_week: i32) -> Self {
        Self {
            week_of_month,
            day_of_week,
        }
    }

    /// Checks both ordinals are within the ranges offered to staff when editing assignments.
    pub fn validate(&self) -> Result<(), RecurrenceError> {
        window_start(self.week_of_month)
            .ok_or(RecurrenceError::InvalidWeekOfMonth(self.week_of_month))?;
        weekday_from_ordinal(self.day_of_week)
            .ok_or(RecurrenceError::InvalidDayOfWeek(self.day_of_week))?;
        Ok(())
    }

    pub fn try_resolve(
        &self,
        month: Option<u32>,
        today: NaiveDate,
    ) -> Result<u32, RecurrenceError> {
        try_resolve_day(self.week_of_month, self.day_of_week, month, today)
    }

    pub fn resolve(&self, month: Option<u32>, today: NaiveDate) -> Option<u32> {
        self.try_resolve(month, today).ok()
    }

    /// Full calendar date of the occurrence in the year of `today`.
    pub fn resolve_date(&self, month: Option<u32>, today: NaiveDate) -> Option<NaiveDate> {
        let month = month.unwrap_or_else(|| today.month());
        let day = self.resolve(Some(month), today)?;
        NaiveDate::from_ymd_opt(today.year(), month, day)
    }

    pub fn label(&self) -> String {
        let ordinal = match self.week_of_month {
            1 => "1st",
            2 => "2nd",
            3 => "3rd",
            4 => "4th",
            5 => "5th",
            _ => "?",
        };
        match weekday_from_ordinal(self.day_of_week) {
            Some(weekday) => format!("{ordinal} {weekday}"),
            None => format!("{ordinal} ?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_in(year: i32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, 6, 15).expect("valid reference date")
    }

    #[test]
    fn first_week_returns_day_one_when_it_already_matches() {
        // 2024-01-01 is a Monday.
        assert_eq!(resolve_day(1, 1, Some(1), day_in(2024)), Some(1));
    }

    #[test]
    fn first_week_advances_to_the_next_matching_weekday() {
        // 2025-01-01 is a Wednesday.
        assert_eq!(resolve_day(1, 1, Some(1), day_in(2025)), Some(6));
    }

    #[test]
    fn third_week_lands_inside_its_window() {
        // 2025-03-15 is a Saturday; the following Monday is the 17th.
        assert_eq!(resolve_day(3, 1, Some(3), day_in(2025)), Some(17));
        assert_eq!(resolve_day(3, 6, Some(3), day_in(2025)), Some(15));
        assert_eq!(resolve_day(3, 5, Some(3), day_in(2025)), Some(21));
    }

    #[test]
    fn out_of_range_week_of_month_is_rejected() {
        assert_eq!(resolve_day(6, 1, None, day_in(2025)), None);
        assert_eq!(resolve_day(0, 1, None, day_in(2025)), None);
        assert_eq!(
            try_resolve_day(-3, 1, None, day_in(2025)),
            Err(RecurrenceError::InvalidWeekOfMonth(-3))
        );
    }

    #[test]
    fn out_of_range_day_of_week_is_rejected() {
        assert_eq!(
            try_resolve_day(1, 0, Some(1), day_in(2025)),
            Err(RecurrenceError::InvalidDayOfWeek(0))
        );
        assert_eq!(resolve_day(1, 8, Some(1), day_in(2025)), None);
    }

    #[test]
    fn invalid_month_is_rejected() {
        assert_eq!(
            try_resolve_day(1, 1, Some(13), day_in(2025)),
            Err(RecurrenceError::InvalidMonth(13))
        );
        assert_eq!(resolve_day(1, 1, Some(0), day_in(2025)), None);
    }

    #[test]
    fn fifth_week_does_not_exist_in_a_common_february() {
        assert_eq!(resolve_day(5, 1, Some(2), day_in(2025)), None);
        assert_eq!(
            try_resolve_day(5, 1, Some(2), day_in(2025)),
            Err(RecurrenceError::NoOccurrence {
                year: 2025,
                month: 2,
                window_start: 29,
            })
        );
    }

    #[test]
    fn fifth_week_in_a_leap_february_only_matches_the_29th() {
        // 2024-02-29 is a Thursday.
        assert_eq!(resolve_day(5, 4, Some(2), day_in(2024)), Some(29));
        assert_eq!(resolve_day(5, 1, Some(2), day_in(2024)), None);
    }

    #[test]
    fn fifth_week_never_spills_into_the_next_month() {
        // 2025-04-29 is a Tuesday and April has 30 days.
        assert_eq!(resolve_day(5, 2, Some(4), day_in(2025)), Some(29));
        assert_eq!(resolve_day(5, 3, Some(4), day_in(2025)), Some(30));
        assert_eq!(resolve_day(5, 4, Some(4), day_in(2025)), None);
        assert_eq!(resolve_day(5, 1, Some(4), day_in(2025)), None);
    }

    #[test]
    fn missing_month_uses_the_month_of_today() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 20).expect("valid date");
        assert_eq!(resolve_day(1, 1, None, today), Some(6));
    }

    #[test]
    fn rule_resolves_full_dates_in_the_current_year() {
        let rule = RecurrenceRule::new(2, 2);
        let today = NaiveDate::from_ymd_opt(2025, 1, 20).expect("valid date");
        // 2025-03-08 is a Saturday; the next Tuesday is the 11th.
        assert_eq!(
            rule.resolve_date(Some(3), today),
            NaiveDate::from_ymd_opt(2025, 3, 11)
        );
        assert_eq!(rule.label(), "2nd Tue");
    }

    #[test]
    fn rule_validation_matches_resolver_ranges() {
        assert!(RecurrenceRule::new(5, 7).validate().is_ok());
        assert_eq!(
            RecurrenceRule::new(5, 9).validate(),
            Err(RecurrenceError::InvalidDayOfWeek(9))
        );
        assert_eq!(
            RecurrenceRule::new(7, 1).validate(),
            Err(RecurrenceError::InvalidWeekOfMonth(7))
        );
    }
}
