//! Aggregate statistics over the visit log

use chrono::{DateTime, Local, TimeZone};
use std::collections::HashSet;

use crate::visitor::models::{LogEntry, Stats};

/// Compute stats with "today" taken from the local calendar day
pub fn compute(entries: &[LogEntry]) -> Stats {
    compute_at(entries, &Local::now())
}

/// Compute stats with "today" being the calendar day of `now` in its own timezone
pub fn compute_at<Tz: TimeZone>(entries: &[LogEntry], now: &DateTime<Tz>) -> Stats {
    let today = now.date_naive();
    let tz = now.timezone();

    let unique_pages = entries
        .iter()
        .map(|entry| entry.url.as_str())
        .collect::<HashSet<_>>()
        .len();

    // Entries with unparseable timestamps never count as today
    let today_visits = entries
        .iter()
        .filter_map(|entry| DateTime::parse_from_rfc3339(&entry.timestamp).ok())
        .filter(|visited| visited.with_timezone(&tz).date_naive() == today)
        .count();

    Stats {
        total_visits: entries.len(),
        unique_pages,
        today_visits,
        last_visit: entries.last().map(|entry| entry.timestamp.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn visit(url: &str, timestamp: &str) -> LogEntry {
        LogEntry {
            url: url.to_string(),
            timestamp: timestamp.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_log() {
        let stats = compute(&[]);
        assert_eq!(stats, Stats::default());
    }

    #[test]
    fn test_counts_and_last_visit() {
        let entries = vec![
            visit("/home", "2024-05-01T01:00:00.000Z"),
            visit("/about", "2024-05-01T02:00:00.000Z"),
            visit("/home", "2024-05-01T03:00:00.000Z"),
        ];

        let stats = compute(&entries);
        assert_eq!(stats.total_visits, 3);
        assert_eq!(stats.unique_pages, 2);
        assert_eq!(stats.last_visit.as_deref(), Some("2024-05-01T03:00:00.000Z"));
    }

    #[test]
    fn test_today_uses_local_calendar_day() {
        // 2024-05-01 23:30 UTC is already 2024-05-02 in Seoul
        let seoul = FixedOffset::east_opt(9 * 3600).unwrap();
        let now = seoul.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();

        let entries = vec![
            visit("/a", "2024-05-01T14:59:59.000Z"),
            visit("/b", "2024-05-01T23:30:00.000Z"),
            visit("/c", "2024-05-02T10:00:00.000Z"),
            visit("/d", "2024-05-02T16:00:00.000Z"),
        ];

        let stats = compute_at(&entries, &now);
        assert_eq!(stats.today_visits, 2);
    }

    #[test]
    fn test_bad_timestamps_are_not_today() {
        let now = chrono::Utc::now();
        let entries = vec![
            visit("/a", "yesterday-ish"),
            visit("/b", ""),
            visit("/c", &now.to_rfc3339()),
        ];

        let stats = compute_at(&entries, &now);
        assert_eq!(stats.total_visits, 3);
        assert_eq!(stats.today_visits, 1);
    }
}
