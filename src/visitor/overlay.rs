//! Debug stats overlay, shown only while developing locally

use std::io::Write;

use crate::visitor::models::Stats;
use crate::visitor::snapshot::host_of;

/// Whether `host` belongs to a local development server
pub fn is_dev_host(host: &str) -> bool {
    host == "localhost" || host.contains("127.0.0.1")
}

pub fn render(stats: &Stats) -> String {
    format!(
        "📊 Stats: {} visits | {} pages | {} today",
        stats.total_visits, stats.unique_pages, stats.today_visits
    )
}

/// Write the overlay line to `out` when `page_url` is served from a dev host
///
/// Returns whether anything was written.
pub fn display_stats<W: Write>(stats: &Stats, page_url: &str, out: &mut W) -> std::io::Result<bool> {
    let Some(host) = host_of(page_url) else {
        return Ok(false);
    };

    if !is_dev_host(&host) {
        return Ok(false);
    }

    writeln!(out, "{}", render(stats))?;
    Ok(true)
}
