use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, OffsetDateTime};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RecurrenceFrequency {
    #[serde(rename = "Daily")]
    Daily,
    #[serde(rename = "Weekly")]
    Weekly,
    #[serde(rename = "Monthly")]
    Monthly,
    #[serde(rename = "Yearly")]
    Yearly,
    #[serde(rename = "None")]
    None,
}

/// Repetition rule attached to a task. Occurrence dates are computed at
/// calendar-day resolution; times of day are not part of the rule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurrenceRule {
    pub frequency: RecurrenceFrequency,
    /// Every N days/weeks/months/years.
    pub interval: u32,
    pub end_date: Option<OffsetDateTime>,
    /// Remaining occurrences, when bounded by count.
    pub occurrences: Option<u32>,
    /// For weekly rules: 1 = Sunday .. 7 = Saturday.
    pub weekdays: Option<Vec<u8>>,
    /// For monthly rules: 1..=31, clamped to the month length.
    pub day_of_month: Option<u8>,
}

impl RecurrenceRule {
    pub fn every(frequency: RecurrenceFrequency, interval: u32) -> Self {
        Self {
            frequency,
            interval,
            end_date: None,
            occurrences: None,
            weekdays: None,
            day_of_month: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.frequency != RecurrenceFrequency::None
    }

    /// Next occurrence strictly derived from `from`, or None when the rule
    /// is inactive or the result falls past the end date.
    pub fn next_occurrence(&self, from: OffsetDateTime) -> Option<OffsetDateTime> {
        if !self.is_active() {
            return None;
        }

        let start = from.date();
        let interval = self.interval.max(1) as i64;

        let next = match self.frequency {
            RecurrenceFrequency::Daily => start + Duration::days(interval),
            RecurrenceFrequency::Weekly => match &self.weekdays {
                Some(weekdays) if !weekdays.is_empty() => {
                    next_matching_weekday(start, weekdays).unwrap_or(start)
                }
                _ => start + Duration::days(interval * 7),
            },
            RecurrenceFrequency::Monthly => match self.day_of_month {
                Some(day) => next_month_day(start, day, interval as i32),
                None => add_months(start, interval as i32),
            },
            RecurrenceFrequency::Yearly => add_months(start, interval as i32 * 12),
            RecurrenceFrequency::None => return None,
        };

        let next = next.midnight().assume_utc();
        if let Some(end) = self.end_date {
            if next > end {
                return None;
            }
        }
        Some(next)
    }
}

/// 1 = Sunday .. 7 = Saturday, matching the stored weekday numbering.
fn weekday_number(date: Date) -> u8 {
    date.weekday().number_days_from_sunday() + 1
}

fn next_matching_weekday(start: Date, weekdays: &[u8]) -> Option<Date> {
    (1..14)
        .map(|offset| start + Duration::days(offset))
        .find(|candidate| weekdays.contains(&weekday_number(*candidate)))
}

fn next_month_day(start: Date, day: u8, interval_months: i32) -> Date {
    if let Some(candidate) = date_with_day(start.year(), start.month(), day) {
        if candidate > start {
            return candidate;
        }
    }
    let shifted = add_months(start, interval_months);
    date_with_day(shifted.year(), shifted.month(), day).unwrap_or(shifted)
}

fn add_months(start: Date, months: i32) -> Date {
    let zero_based = start.month() as i32 - 1 + months;
    let year = start.year() + zero_based.div_euclid(12);
    let month = Month::try_from((zero_based.rem_euclid(12) + 1) as u8)
        .unwrap_or(start.month());
    let day = start.day().min(time::util::days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).unwrap_or(start)
}

fn date_with_day(year: i32, month: Month, day: u8) -> Option<Date> {
    let day = day.min(time::util::days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).ok()
}
