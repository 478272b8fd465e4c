use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use visitlog::config::Config;
use visitlog::storage::open_stores;
use visitlog::visitor::{capture, display_stats, origin_of, PageContext, VisitOutcome, VisitorLogger};

/// Record a page visit, once per session and page
#[derive(Parser)]
#[command(name = "visitlog")]
#[command(about = "Record a page visit into the local visitor log", long_about = None)]
struct Cli {
    /// Full URL of the visited page
    #[arg(long)]
    url: String,

    /// URL of the referring page
    #[arg(long, default_value = "")]
    referrer: String,

    /// User-agent string (defaults to this tool's name and version)
    #[arg(long)]
    user_agent: Option<String>,

    /// Screen resolution as WIDTHxHEIGHT
    #[arg(long, value_parser = parse_resolution)]
    screen: Option<(u32, u32)>,

    /// IANA timezone (defaults to TZ or the system timezone)
    #[arg(long)]
    timezone: Option<String>,

    /// BCP-47 language tag (defaults to the locale)
    #[arg(long)]
    language: Option<String>,
}

fn parse_resolution(value: &str) -> Result<(u32, u32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;

    let width = width.trim().parse::<u32>().map_err(|e| e.to_string())?;
    let height = height.trim().parse::<u32>().map_err(|e| e.to_string())?;
    Ok((width, height))
}

impl Cli {
    fn page_context(self) -> PageContext {
        let mut context = PageContext::detect(&self.url);
        context.referrer = self.referrer;

        if let Some(user_agent) = self.user_agent {
            context.user_agent = user_agent;
        }
        if let Some((width, height)) = self.screen {
            context.screen_width = width;
            context.screen_height = height;
        }
        if let Some(timezone) = self.timezone {
            context.timezone = timezone;
        }
        if let Some(language) = self.language {
            context.language = language;
        }
        context
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    let context = cli.page_context();
    let origin = origin_of(&context.url).unwrap_or_else(|| config.site.origin.clone());

    // Initialize storage
    let stores = open_stores(&config, &origin).await?;
    let logger = VisitorLogger::with_capacity(stores.local, stores.session, config.logger.max_entries);
    logger
        .init()
        .await
        .context("Failed to initialize visitor storage")?;
    info!("📊 Visitor Logger initialized for {}. Use `visitlog-admin export` to download logs.", origin);

    let snapshot = capture(&context);
    let outcome = logger.log_visit(&snapshot).await;
    logger.shutdown().await;

    match outcome.context("Failed to record visit")? {
        VisitOutcome::Recorded { stats, .. } => {
            display_stats(&stats, &snapshot.url, &mut std::io::stderr())?;
        }
        VisitOutcome::Duplicate { session_id } => {
            info!("Visit to {} already logged in session {}", snapshot.url, session_id);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_resolution() {
        assert_eq!(parse_resolution("1920x1080"), Ok((1920, 1080)));
        assert_eq!(parse_resolution("800X600"), Ok((800, 600)));
        assert!(parse_resolution("1920").is_err());
        assert!(parse_resolution("widex1080").is_err());
    }

    #[test]
    fn test_flags_override_detected_context() {
        let cli = Cli::parse_from([
            "visitlog",
            "--url",
            "http://localhost:8000/pages/blog.html",
            "--referrer",
            "http://localhost:8000/",
            "--screen",
            "1280x720",
            "--timezone",
            "Asia/Seoul",
            "--language",
            "ko-KR",
        ]);

        let context = cli.page_context();
        assert_eq!(context.url, "http://localhost:8000/pages/blog.html");
        assert_eq!(context.referrer, "http://localhost:8000/");
        assert_eq!((context.screen_width, context.screen_height), (1280, 720));
        assert_eq!(context.timezone, "Asia/Seoul");
        assert_eq!(context.language, "ko-KR");
        assert!(context.user_agent.starts_with("visitlog/"));
    }
}
