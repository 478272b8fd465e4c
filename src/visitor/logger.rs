//! Visit recording
//!
//! Every operation reads the stored log fresh, so the derived stats always
//! describe what is actually persisted. Concurrent writers to the same origin
//! are not coordinated: the last write wins.

use chrono::Utc;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info};

use crate::storage::{read_json, write_json, KeyValueStore, StorageResult};
use crate::visitor::export::ExportDocument;
use crate::visitor::ids::{generate_visit_id, resolve_session_id};
use crate::visitor::models::{LogEntry, LogStore, Stats, VisitSnapshot};
use crate::visitor::{stats, DEFAULT_MAX_ENTRIES, LOGS_KEY, STATS_KEY};

/// What `log_visit` did with a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisitOutcome {
    /// A new entry was appended and the stats refreshed
    Recorded {
        entry: LogEntry,
        stats: Stats,
        /// Entries dropped from the front to stay within capacity
        evicted: usize,
    },
    /// This session already visited the URL; nothing was written
    Duplicate { session_id: String },
}

impl VisitOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, VisitOutcome::Recorded { .. })
    }
}

pub struct VisitorLogger {
    /// Durable, origin-scoped storage holding the log and stats
    local: Arc<dyn KeyValueStore>,
    /// Session-scoped storage holding the session id
    session: Arc<dyn KeyValueStore>,
    max_entries: usize,
}

impl VisitorLogger {
    pub fn new(local: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self::with_capacity(local, session, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(
        local: Arc<dyn KeyValueStore>,
        session: Arc<dyn KeyValueStore>,
        max_entries: usize,
    ) -> Self {
        Self {
            local,
            session,
            max_entries: max_entries.max(1),
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Prepare both stores for use
    pub async fn init(&self) -> StorageResult<()> {
        self.local.init().await?;
        self.session.init().await?;
        Ok(())
    }

    /// Release both stores
    pub async fn shutdown(&self) {
        self.local.close().await;
        self.session.close().await;
    }

    /// Current stored log, empty when absent or unreadable
    pub async fn load_logs(&self) -> StorageResult<LogStore> {
        Ok(read_json::<LogStore>(self.local.as_ref(), LOGS_KEY)
            .await?
            .unwrap_or_default())
    }

    /// Record `snapshot` unless this session already visited its URL
    pub async fn log_visit(&self, snapshot: &VisitSnapshot) -> StorageResult<VisitOutcome> {
        let mut logs = self.load_logs().await?;
        let session_id = resolve_session_id(self.session.as_ref()).await?;

        if logs.contains_visit(&session_id, &snapshot.url) {
            debug!(
                "Skipping repeat visit to {} in session {}",
                snapshot.url, session_id
            );
            return Ok(VisitOutcome::Duplicate { session_id });
        }

        let entry = LogEntry::from_snapshot(snapshot, &session_id, &generate_visit_id());
        let evicted = logs.append(entry.clone(), self.max_entries);
        if evicted > 0 {
            debug!("Evicted {} oldest visit(s) from the log", evicted);
        }

        write_json(self.local.as_ref(), LOGS_KEY, &logs).await?;
        let stats = self.update_stats().await?;

        info!(
            visit_id = %entry.visit_id,
            session_id = %entry.session_id,
            url = %entry.url,
            referrer = %entry.referrer,
            "📊 Visit logged"
        );

        Ok(VisitOutcome::Recorded {
            entry,
            stats,
            evicted,
        })
    }

    /// Recompute stats from the stored log and store them
    pub async fn update_stats(&self) -> StorageResult<Stats> {
        let logs = self.load_logs().await?;
        let stats = stats::compute(logs.entries());

        write_json(self.local.as_ref(), STATS_KEY, &stats).await?;
        Ok(stats)
    }

    /// Bundle the stored log and stats into an export document
    ///
    /// Does not modify anything.
    pub async fn export_logs(&self) -> StorageResult<ExportDocument> {
        let logs = self.load_logs().await?;
        let stored_stats = read_json::<Map<String, Value>>(self.local.as_ref(), STATS_KEY)
            .await?
            .unwrap_or_default();

        Ok(ExportDocument::new(
            Utc::now(),
            stored_stats,
            logs.entries().to_vec(),
        ))
    }

    /// Remove the stored log and stats, returning how many keys were removed
    pub async fn clear(&self) -> StorageResult<u64> {
        let mut removed = 0;
        for key in [LOGS_KEY, STATS_KEY] {
            if self.local.remove(key).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Forget the current session so the next visit starts a new one
    pub async fn end_session(&self) -> StorageResult<bool> {
        self.session.remove(crate::visitor::SESSION_ID_KEY).await
    }
}
