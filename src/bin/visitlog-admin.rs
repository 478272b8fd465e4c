use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use visitlog::blog::{self, format_display_date, post_link, BlogBrowser, Post};
use visitlog::config::Config;
use visitlog::storage::open_stores;
use visitlog::visitor::{overlay, write_export, VisitorLogger};

#[derive(Parser)]
#[command(name = "visitlog-admin")]
#[command(about = "Visitor log developer tools", long_about = None)]
struct Cli {
    /// Site origin to operate on (defaults to SITE_ORIGIN)
    #[arg(long, global = true)]
    origin: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Log(LogCommand),
    /// List blog posts, newest first
    Posts {
        /// Show posts in this category (or category family)
        #[arg(long, conflicts_with = "tag")]
        category: Option<String>,
        /// Show posts carrying this tag
        #[arg(long)]
        tag: Option<String>,
        /// Path to posts.json (defaults to BLOG_FEED_PATH)
        #[arg(long)]
        feed: Option<PathBuf>,
    },
}

/// Commands that operate on the stored visitor log
#[derive(Subcommand)]
enum LogCommand {
    /// Export the visit log and stats to visitor-logs-<date>.json
    Export {
        /// Output directory (defaults to EXPORT_DIR)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Recompute and print the visit stats
    Stats,
    /// Delete the stored visit log and stats
    Clear,
    /// Forget the current session id
    EndSession,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let command = match cli.command {
        Commands::Posts { category, tag, feed } => {
            let path = feed.unwrap_or_else(|| PathBuf::from(&config.site.blog_feed_path));
            list_posts(&path, category.as_deref(), tag.as_deref()).await;
            return Ok(());
        }
        Commands::Log(command) => command,
    };

    let origin = cli.origin.unwrap_or_else(|| config.site.origin.clone());
    let stores = open_stores(&config, &origin).await?;
    let logger = VisitorLogger::with_capacity(stores.local, stores.session, config.logger.max_entries);

    // Ensure storage is initialized
    logger.init().await?;

    let result = run(command, &logger, &config, &origin).await;
    logger.shutdown().await;
    result
}

async fn run(command: LogCommand, logger: &VisitorLogger, config: &Config, origin: &str) -> Result<()> {
    match command {
        LogCommand::Export { dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from(&config.site.export_dir));
            let document = logger.export_logs().await?;
            let path = write_export(&document, &dir)
                .await
                .context("Failed to export visitor logs")?;
            println!(
                "✓ Exported {} visit(s) for {} to {}",
                document.logs.len(),
                origin,
                path.display()
            );
        }
        LogCommand::Stats => {
            let stats = logger.update_stats().await?;
            println!("{}", overlay::render(&stats));
            if let Some(last_visit) = stats.last_visit {
                println!("Last visit: {}", last_visit);
            }
        }
        LogCommand::Clear => {
            let removed = logger.clear().await?;
            if removed > 0 {
                println!("✓ Cleared visitor log for {}", origin);
            } else {
                println!("⚠ No visitor log stored for {}", origin);
            }
        }
        LogCommand::EndSession => {
            if logger.end_session().await? {
                println!("✓ Session ended for {}", origin);
            } else {
                println!("⚠ No active session for {}", origin);
            }
        }
    }

    Ok(())
}

async fn list_posts(path: &std::path::Path, category: Option<&str>, tag: Option<&str>) {
    let mut browser = BlogBrowser::new(blog::load_feed(path).await.unwrap_or_default());

    let posts: Vec<&Post> = match (category, tag) {
        (Some(category), _) => browser.filter_by_category(category),
        (None, Some(tag)) => browser.filter_by_tag(tag),
        (None, None) => browser.visible_posts(),
    };

    if posts.is_empty() {
        println!("No posts found.");
        return;
    }

    println!("{:<16} {:<18} {:<24} {}", "Date", "Category", "Title", "Link");
    println!("{}", "-".repeat(80));
    for post in posts {
        println!(
            "{:<16} {:<18} {:<24} {}",
            format_display_date(&post.date),
            post.category.as_deref().unwrap_or("-"),
            post.title,
            post_link(post).unwrap_or_else(|| "-".to_string())
        );
    }
}
