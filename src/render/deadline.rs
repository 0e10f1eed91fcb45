use crate::models::{Program, ProgramStatus};
use crate::utils::parse_close_date;
use chrono::{DateTime, Utc};
use serde::Serialize;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// How pressing a deadline is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    Soon,
    Normal,
}

impl Urgency {
    /// CSS modifier class; `Normal` has none.
    pub fn css_class(&self) -> &'static str {
        match self {
            Self::Urgent => "urgent",
            Self::Soon => "soon",
            Self::Normal => "",
        }
    }

    fn for_days(days: i64) -> Self {
        match days {
            ..=3 => Self::Urgent,
            4..=10 => Self::Soon,
            _ => Self::Normal,
        }
    }
}

/// Countdown badge contents for one close date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeadlineInfo {
    pub days_remaining: Option<i64>,
    pub label: String,
    pub urgency: Urgency,
    pub visible: bool,
}

impl DeadlineInfo {
    pub fn hidden() -> Self {
        Self {
            days_remaining: None,
            label: String::new(),
            urgency: Urgency::Normal,
            visible: false,
        }
    }

    /// Badge for an already-parsed close instant.
    pub fn for_instant(close: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let days = ceil_days((close - now).num_milliseconds());
        if days < 0 {
            return Self::hidden();
        }
        let label = match days {
            0 => "closes today".to_string(),
            1 => "closes in 1 day".to_string(),
            n => format!("closes in {n} days"),
        };
        Self {
            days_remaining: Some(days),
            label,
            urgency: Urgency::for_days(days),
            visible: true,
        }
    }
}

/// Whole days left, rounding any partial day up.
fn ceil_days(ms: i64) -> i64 {
    // Integer division truncates toward zero, which already rounds negatives up.
    let days = ms / MS_PER_DAY;
    if ms > 0 && ms % MS_PER_DAY != 0 {
        days + 1
    } else {
        days
    }
}

/// Computes the countdown badge for a raw close date relative to `now`.
///
/// Missing, blank, unparseable or past dates produce a hidden badge.
pub fn deadline_info(close_date: Option<&str>, now: DateTime<Utc>) -> DeadlineInfo {
    close_date
        .and_then(parse_close_date)
        .map(|close| DeadlineInfo::for_instant(close, now))
        .unwrap_or_else(DeadlineInfo::hidden)
}

/// Countdown badge for a program; closed (and unrecognized) statuses never show one.
pub fn program_deadline(program: &Program, now: DateTime<Utc>) -> DeadlineInfo {
    match program.status {
        ProgramStatus::Closed | ProgramStatus::Unknown => DeadlineInfo::hidden(),
        ProgramStatus::Open | ProgramStatus::Upcoming => {
            deadline_info(program.close_date.as_deref(), now)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn close() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 11, 30, 0, 0, 0).unwrap()
    }

    fn info_at(now: DateTime<Utc>) -> DeadlineInfo {
        deadline_info(Some("2025-11-30"), now)
    }

    #[test]
    fn now_equal_to_close_date_closes_today() {
        let info = info_at(close());
        assert_eq!(info.days_remaining, Some(0));
        assert_eq!(info.label, "closes today");
        assert_eq!(info.urgency, Urgency::Urgent);
        assert!(info.visible);
    }

    #[test]
    fn partial_day_past_close_still_closes_today() {
        let info = info_at(close() + Duration::hours(5));
        assert_eq!(info.days_remaining, Some(0));
        assert!(info.visible);
    }

    #[test]
    fn a_full_day_past_close_is_hidden() {
        let info = info_at(close() + Duration::days(1));
        assert!(!info.visible);
        assert_eq!(info.days_remaining, None);
    }

    #[test]
    fn fractional_hours_round_up() {
        let info = info_at(close() - Duration::hours(1));
        assert_eq!(info.days_remaining, Some(1));
        assert_eq!(info.label, "closes in 1 day");
        assert_eq!(info.urgency, Urgency::Urgent);

        let info = info_at(close() - Duration::hours(25));
        assert_eq!(info.days_remaining, Some(2));
        assert_eq!(info.label, "closes in 2 days");
    }

    #[test]
    fn urgency_thresholds() {
        let at = |days: i64| info_at(close() - Duration::days(days));
        assert_eq!(at(3).urgency, Urgency::Urgent);
        assert_eq!(at(4).urgency, Urgency::Soon);
        assert_eq!(at(10).urgency, Urgency::Soon);
        assert_eq!(at(11).urgency, Urgency::Normal);
        assert_eq!(at(11).urgency.css_class(), "");
        assert_eq!(at(30).label, "closes in 30 days");
    }

    #[test]
    fn missing_or_invalid_dates_are_hidden() {
        assert!(!deadline_info(None, close()).visible);
        assert!(!deadline_info(Some(""), close()).visible);
        assert!(!deadline_info(Some("mañana"), close()).visible);
    }

    #[test]
    fn closed_programs_never_show_a_badge() {
        let program: Program = toml::from_str(
            r#"
            name = "Circular 33"
            benef_group = "municipalities"
            status = "closed"
            close_date = "2025-12-01"
            has_deadline_badge = true
            "#,
        )
        .unwrap();
        assert!(!program_deadline(&program, close()).visible);
    }

    #[test]
    fn open_program_uses_its_close_date() {
        let program: Program = toml::from_str(
            r#"
            name = "FNDR 8%"
            benef_group = "organizations"
            status = "open"
            close_date = "2025-12-15"
            "#,
        )
        .unwrap();
        let info = program_deadline(&program, close());
        assert_eq!(info.days_remaining, Some(15));
        assert_eq!(info.urgency, Urgency::Normal);
    }
}
