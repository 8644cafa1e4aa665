//! Human-readable validity text derived from a service calendar entry.

use itertools::Itertools;

use crate::gtfs::Calendar;

pub const DAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceSummary {
    pub date_range: String,
    pub days: String,
}

/// Both fields stay empty when the feed carries no calendar entry for the
/// service; calendar data is optional.
pub fn summarize(entry: Option<&Calendar>) -> ServiceSummary {
    match entry {
        None => ServiceSummary::default(),
        Some(calendar) => ServiceSummary {
            date_range: date_range(
                calendar.start_date.as_deref(),
                calendar.end_date.as_deref(),
            ),
            days: day_summary(&calendar.weekdays()),
        },
    }
}

fn date_range(start: Option<&str>, end: Option<&str>) -> String {
    match (
        start.and_then(reformat_date),
        end.and_then(reformat_date),
    ) {
        (Some(start), Some(end)) => format!("{start} - {end}"),
        _ => String::new(),
    }
}

/// `YYYYMMDD` to `DD/MM/YYYY`; anything not exactly eight characters is
/// rejected rather than guessed at.
fn reformat_date(raw: &str) -> Option<String> {
    if raw.len() != 8 || !raw.is_ascii() {
        return None;
    }
    Some(format!("{}/{}/{}", &raw[6..8], &raw[4..6], &raw[0..4]))
}

fn day_summary(active: &[bool; 7]) -> String {
    let days: Vec<usize> = active.iter().positions(|&day| day).collect();
    match days.as_slice() {
        [] => String::new(),
        _ if days.len() == 7 => String::from("every day"),
        [only] => format!("on {}", DAY_NAMES[*only]),
        // one unbroken run of consecutive weekdays
        [first, .., last] if last - first + 1 == days.len() => {
            format!("from {} to {}", DAY_NAMES[*first], DAY_NAMES[*last])
        }
        _ => days.iter().map(|&day| DAY_NAMES[day]).join(", "),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn calendar(active: [u8; 7], start: &str, end: &str) -> Calendar {
        Calendar {
            service_id: "svc".to_string(),
            monday: active[0],
            tuesday: active[1],
            wednesday: active[2],
            thursday: active[3],
            friday: active[4],
            saturday: active[5],
            sunday: active[6],
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
        }
    }

    #[test]
    fn consecutive_run_reads_as_a_span() {
        let entry = calendar([1, 1, 1, 0, 0, 0, 0], "20240101", "20241231");
        assert_eq!(
            summarize(Some(&entry)).days,
            "from Monday to Wednesday"
        );
    }

    #[test]
    fn all_seven_days_is_the_fixed_phrase() {
        let entry = calendar([1, 1, 1, 1, 1, 1, 1], "20240101", "20241231");
        assert_eq!(summarize(Some(&entry)).days, "every day");
    }

    #[test]
    fn a_single_day_reads_as_on() {
        let entry = calendar([0, 0, 0, 0, 0, 0, 1], "20240101", "20241231");
        assert_eq!(summarize(Some(&entry)).days, "on Sunday");
    }

    #[test]
    fn gapped_days_are_comma_joined() {
        let entry = calendar([1, 0, 1, 0, 0, 0, 0], "20240101", "20241231");
        assert_eq!(summarize(Some(&entry)).days, "Monday, Wednesday");
    }

    #[test]
    fn no_active_days_is_empty() {
        let entry = calendar([0; 7], "20240101", "20241231");
        assert_eq!(summarize(Some(&entry)).days, "");
    }

    #[test]
    fn date_range_is_day_month_year() {
        let entry = calendar([1; 7], "20240101", "20241231");
        let summary = summarize(Some(&entry));
        assert!(summary.date_range.contains("01/01/2024"));
        assert!(summary.date_range.contains("31/12/2024"));
    }

    #[test]
    fn malformed_dates_yield_an_empty_range() {
        let entry = calendar([1; 7], "2024-01-01", "20241231");
        assert_eq!(summarize(Some(&entry)).date_range, "");
    }

    #[test]
    fn missing_entry_yields_empty_summary() {
        assert_eq!(summarize(None), ServiceSummary::default());
    }
}
