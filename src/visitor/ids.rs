//! Session and visit identifiers
//!
//! Both have the form `<prefix><epoch-ms>_<suffix>` where the suffix is nine
//! random base-36 characters. Uniqueness is practical, not guaranteed.

use rand::Rng;
use tracing::debug;

use crate::storage::{KeyValueStore, StorageResult};
use crate::visitor::SESSION_ID_KEY;

pub const SESSION_PREFIX: &str = "session_";
pub const VISIT_PREFIX: &str = "visit_";

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Build an identifier for `prefix` at `epoch_ms`
pub fn generate_id(prefix: &str, epoch_ms: i64) -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();

    format!("{prefix}{epoch_ms}_{suffix}")
}

pub fn generate_session_id() -> String {
    generate_id(SESSION_PREFIX, chrono::Utc::now().timestamp_millis())
}

pub fn generate_visit_id() -> String {
    generate_id(VISIT_PREFIX, chrono::Utc::now().timestamp_millis())
}

/// Current session id, created and stored on first use
pub async fn resolve_session_id(session: &dyn KeyValueStore) -> StorageResult<String> {
    if let Some(existing) = session.get(SESSION_ID_KEY).await? {
        if !existing.is_empty() {
            return Ok(existing);
        }
    }

    let session_id = generate_session_id();
    session.set(SESSION_ID_KEY, &session_id).await?;
    debug!("Started session {}", session_id);

    Ok(session_id)
}
