//! Calendar event domain types, including the recurrence rule.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use cadence_core::{EventId, ProjectId, UserId};

/// How often a recurring event repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

/// How a monthly rule picks the day in each target month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MonthlyPattern {
    /// Same day-of-month as the start date (clamped to short months).
    #[default]
    DayOfMonth,
    /// Same "kth weekday of the month" as the start date.
    NthWeekday,
}

/// A recurrence rule attached to the parent occurrence of a series.
///
/// `days_of_week` uses 0 = Sunday .. 6 = Saturday. The end condition is
/// either an explicit `end_date` or an occurrence `count`; absent both, the
/// expander applies its own horizon and cap (see `services::recurrence`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub frequency: Frequency,
    /// Step between occurrences (days/weeks/months/years). Minimum 1.
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// Explicit weekdays for weekly rules (0 = Sunday .. 6 = Saturday).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<u8>>,
    /// Day-selection mode for monthly rules.
    #[serde(default)]
    pub monthly_pattern: MonthlyPattern,
    /// Inclusive last date to generate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    /// Total number of occurrences to generate (including the first).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
}

const fn default_interval() -> u32 {
    1
}

impl RecurrenceRule {
    /// The effective interval, never below 1.
    #[must_use]
    pub const fn step(&self) -> u32 {
        if self.interval == 0 { 1 } else { self.interval }
    }
}

/// Which occurrences of a series an edit or delete applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EventScope {
    /// Just the addressed occurrence.
    #[default]
    Single,
    /// The addressed occurrence and everything after it in the series.
    Future,
    /// The entire series.
    All,
}

/// A calendar event, optionally scoped to a project.
///
/// Occurrences of a recurring series are fully independent rows sharing a
/// `parent_id`; `is_parent` marks the first occurrence, which also carries
/// the rule the series was generated from.
#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: EventId,
    pub user_id: UserId,
    pub project_id: Option<ProjectId>,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub location: Option<String>,
    /// Shared identifier linking all occurrences of one series.
    pub parent_id: Option<Uuid>,
    /// True only on the first occurrence of a series.
    pub is_parent: bool,
    /// The rule the series was generated from (parent occurrence only).
    pub recurrence: Option<RecurrenceRule>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_defaults() {
        let rule: RecurrenceRule = serde_json::from_str(r#"{"frequency": "daily"}"#)
            .expect("deserialize");
        assert_eq!(rule.frequency, Frequency::Daily);
        assert_eq!(rule.interval, 1);
        assert_eq!(rule.monthly_pattern, MonthlyPattern::DayOfMonth);
        assert!(rule.days_of_week.is_none());
        assert!(rule.end_date.is_none());
        assert!(rule.count.is_none());
    }

    #[test]
    fn test_step_floors_zero_interval() {
        let rule = RecurrenceRule {
            frequency: Frequency::Weekly,
            interval: 0,
            days_of_week: None,
            monthly_pattern: MonthlyPattern::DayOfMonth,
            end_date: None,
            count: None,
        };
        assert_eq!(rule.step(), 1);
    }

    #[test]
    fn test_scope_parses_snake_case() {
        let scope: EventScope = serde_json::from_str(r#""future""#).expect("deserialize");
        assert_eq!(scope, EventScope::Future);
    }
}
