//! Capturing the visit context
//!
//! Nothing here fails: values the environment cannot provide are left empty.

use chrono::{DateTime, SecondsFormat, Utc};
use url::Url;

use crate::visitor::models::{PageContext, VisitSnapshot};

const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

impl PageContext {
    /// Context for `url` with everything else detected from the process environment
    pub fn detect(url: &str) -> Self {
        let locale = ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .find_map(|key| std::env::var(key).ok().filter(|v| !v.is_empty()))
            .unwrap_or_default();

        Self {
            url: url.to_string(),
            referrer: String::new(),
            user_agent: USER_AGENT.to_string(),
            screen_width: 0,
            screen_height: 0,
            timezone: detect_timezone(),
            language: language_tag(&locale),
        }
    }
}

/// Snapshot `context` at the current time
pub fn capture(context: &PageContext) -> VisitSnapshot {
    capture_at(context, Utc::now())
}

/// Snapshot `context` at `now`
pub fn capture_at(context: &PageContext, now: DateTime<Utc>) -> VisitSnapshot {
    VisitSnapshot {
        timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        url: context.url.clone(),
        referrer: context.referrer.clone(),
        user_agent: context.user_agent.clone(),
        screen_resolution: format!("{}x{}", context.screen_width, context.screen_height),
        timezone: context.timezone.clone(),
        language: context.language.clone(),
    }
}

/// Serialized origin (`scheme://host[:port]`) of `page_url`
pub fn origin_of(page_url: &str) -> Option<String> {
    let url = Url::parse(page_url).ok()?;
    let origin = url.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

/// Host name of `page_url`
pub fn host_of(page_url: &str) -> Option<String> {
    Url::parse(page_url)
        .ok()?
        .host_str()
        .map(|host| host.to_string())
}

/// Convert a POSIX locale such as `ko_KR.UTF-8` into a BCP-47 tag
pub fn language_tag(locale: &str) -> String {
    let base = locale
        .split(['.', '@'])
        .next()
        .unwrap_or_default()
        .trim();

    if base.is_empty() || base == "C" || base == "POSIX" {
        return String::new();
    }

    base.replace('_', "-")
}

fn detect_timezone() -> String {
    if let Ok(tz) = std::env::var("TZ") {
        let tz = tz.trim_start_matches(':').trim();
        if !tz.is_empty() {
            return tz.to_string();
        }
    }

    std::fs::read_to_string("/etc/timezone")
        .map(|tz| tz.trim().to_string())
        .unwrap_or_default()
}
