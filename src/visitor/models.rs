//! Data models for visitor logging

use serde::{Deserialize, Serialize};

/// Ambient environment of a page load
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageContext {
    /// Full URL of the visited page
    pub url: String,

    /// URL of the referring page, empty for direct visits
    pub referrer: String,

    /// Client user-agent string
    pub user_agent: String,

    /// Screen width in pixels
    pub screen_width: u32,

    /// Screen height in pixels
    pub screen_height: u32,

    /// IANA timezone name (e.g., "Asia/Seoul")
    pub timezone: String,

    /// BCP-47 language tag (e.g., "ko-KR")
    pub language: String,
}

/// Context of a visit captured at a single moment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitSnapshot {
    /// ISO-8601 timestamp with millisecond precision
    pub timestamp: String,
    pub url: String,
    pub referrer: String,
    pub user_agent: String,
    /// "WxH"
    pub screen_resolution: String,
    pub timezone: String,
    pub language: String,
}

/// One recorded visit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LogEntry {
    pub timestamp: String,
    pub url: String,
    pub referrer: String,
    pub user_agent: String,
    pub screen_resolution: String,
    pub timezone: String,
    pub language: String,
    pub session_id: String,
    pub visit_id: String,
}

impl LogEntry {
    pub fn from_snapshot(snapshot: &VisitSnapshot, session_id: &str, visit_id: &str) -> Self {
        Self {
            timestamp: snapshot.timestamp.clone(),
            url: snapshot.url.clone(),
            referrer: snapshot.referrer.clone(),
            user_agent: snapshot.user_agent.clone(),
            screen_resolution: snapshot.screen_resolution.clone(),
            timezone: snapshot.timezone.clone(),
            language: snapshot.language.clone(),
            session_id: session_id.to_string(),
            visit_id: visit_id.to_string(),
        }
    }
}

/// Chronological visit log, oldest entry first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LogStore {
    entries: Vec<LogEntry>,
}

impl LogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    /// Whether `session_id` already has a visit recorded for `url`
    pub fn contains_visit(&self, session_id: &str, url: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.session_id == session_id && entry.url == url)
    }

    /// Append `entry`, evicting the oldest entries beyond `capacity`
    ///
    /// Returns the number of evicted entries.
    pub fn append(&mut self, entry: LogEntry, capacity: usize) -> usize {
        self.entries.push(entry);

        let excess = self.entries.len().saturating_sub(capacity);
        if excess > 0 {
            self.entries.drain(..excess);
        }
        excess
    }
}

impl From<Vec<LogEntry>> for LogStore {
    fn from(entries: Vec<LogEntry>) -> Self {
        Self { entries }
    }
}

/// Aggregate counts derived from the visit log
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_visits: usize,
    pub unique_pages: usize,
    pub today_visits: usize,
    /// Timestamp of the most recent entry, absent when the log is empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_visit: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(session_id: &str, url: &str) -> LogEntry {
        LogEntry {
            url: url.to_string(),
            session_id: session_id.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_append_evicts_oldest() {
        let mut store = LogStore::new();
        for i in 0..5 {
            store.append(entry("s", &format!("/page/{i}")), 3);
        }

        let urls: Vec<&str> = store.entries().iter().map(|e| e.url.as_str()).collect();
        assert_eq!(urls, vec!["/page/2", "/page/3", "/page/4"]);
    }

    #[test]
    fn test_append_reports_evictions() {
        let mut store = LogStore::from(vec![entry("s", "/a"), entry("s", "/b")]);
        assert_eq!(store.append(entry("s", "/c"), 3), 0);
        assert_eq!(store.append(entry("s", "/d"), 3), 1);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_contains_visit_matches_session_and_url() {
        let store = LogStore::from(vec![entry("session_1_a", "/home")]);

        assert!(store.contains_visit("session_1_a", "/home"));
        assert!(!store.contains_visit("session_2_b", "/home"));
        assert!(!store.contains_visit("session_1_a", "/home?ref=x"));
    }

    #[test]
    fn test_log_entry_wire_format() {
        let entry = LogEntry {
            timestamp: "2024-05-01T09:30:00.000Z".to_string(),
            url: "http://localhost:8000/".to_string(),
            referrer: String::new(),
            user_agent: "Mozilla/5.0".to_string(),
            screen_resolution: "1920x1080".to_string(),
            timezone: "Asia/Seoul".to_string(),
            language: "ko-KR".to_string(),
            session_id: "session_1714555800000_k2j4h5g6f".to_string(),
            visit_id: "visit_1714555800000_a1b2c3d4e".to_string(),
        };

        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["userAgent"], "Mozilla/5.0");
        assert_eq!(json["screenResolution"], "1920x1080");
        assert_eq!(json["sessionId"], "session_1714555800000_k2j4h5g6f");
        assert_eq!(json["visitId"], "visit_1714555800000_a1b2c3d4e");
    }

    #[test]
    fn test_log_entry_missing_fields_default() {
        let entry: LogEntry = serde_json::from_str(r#"{"url": "/home"}"#).unwrap();
        assert_eq!(entry.url, "/home");
        assert!(entry.session_id.is_empty());
    }

    #[test]
    fn test_empty_stats_omit_last_visit() {
        let json = serde_json::to_value(Stats::default()).unwrap();
        assert!(json.get("lastVisit").is_none());
        assert_eq!(json["totalVisits"], 0);
    }
}
