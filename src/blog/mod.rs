//! Blog post list browsing over the static JSON feed

pub mod filter;
pub mod models;

pub use filter::{
    category_family, filter_posts, format_display_date, post_link, sort_newest_first, top_tags,
    PostFilter, TOP_TAG_COUNT,
};
pub use models::{BlogFeed, CategoryCount, Post, TagCount};

use std::path::Path;
use tracing::warn;

use crate::storage::Decoded;

/// Load the feed at `path`; an unreadable or malformed feed comes back empty
pub async fn load_feed(path: &Path) -> Decoded<BlogFeed> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => Decoded::from_json(&path.display().to_string(), Some(raw.as_str())),
        Err(e) => {
            warn!("Failed to load blog data from {}: {}", path.display(), e);
            Decoded::Empty
        }
    }
}

/// Blog feed together with the filter currently applied to it
#[derive(Debug, Clone, Default)]
pub struct BlogBrowser {
    feed: BlogFeed,
    current_filter: PostFilter,
}

impl BlogBrowser {
    pub fn new(feed: BlogFeed) -> Self {
        Self {
            feed,
            current_filter: PostFilter::All,
        }
    }

    pub fn feed(&self) -> &BlogFeed {
        &self.feed
    }

    pub fn current_filter(&self) -> &PostFilter {
        &self.current_filter
    }

    /// Posts matching the current filter, newest first
    pub fn visible_posts(&self) -> Vec<&Post> {
        let mut posts = filter_posts(&self.feed, &self.current_filter);
        sort_newest_first(&mut posts);
        posts
    }

    /// Apply a filter button (`all` or a category family label)
    pub fn select_button(&mut self, value: &str) -> Vec<&Post> {
        self.current_filter = PostFilter::from_button(value);
        self.visible_posts()
    }

    /// Show a category from the category list, resolving it to its family
    pub fn filter_by_category(&mut self, category: &str) -> Vec<&Post> {
        let family = category_family(category).to_string();

        let mut posts: Vec<&Post> = self
            .feed
            .posts
            .iter()
            .filter(|post| {
                post.category.as_deref() == Some(category)
                    || filter::matches_category(post, &family)
            })
            .collect();
        sort_newest_first(&mut posts);

        self.current_filter = PostFilter::Category(family);
        posts
    }

    /// Show posts carrying `tag`; the button filter resets to `all`
    pub fn filter_by_tag(&mut self, tag: &str) -> Vec<&Post> {
        self.current_filter = PostFilter::All;

        let mut posts = filter_posts(&self.feed, &PostFilter::Tag(tag.to_string()));
        sort_newest_first(&mut posts);
        posts
    }

    pub fn top_tags(&self) -> Vec<&TagCount> {
        top_tags(&self.feed, TOP_TAG_COUNT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed() -> BlogFeed {
        serde_json::from_str(
            r#"{
                "posts": [
                    {"id": "post-1", "title": "ViT review", "date": "2024-02-01",
                     "category": "Computer Vision 논문", "tags": ["Vision", "DL"],
                     "excerpt": "", "filename": "1.html", "content": "<p></p>", "images": []},
                    {"id": "post-2", "title": "BERT", "date": "2024-03-01",
                     "category": "NLP", "tags": ["DL"], "excerpt": "", "filename": "2.html"},
                    {"id": "post-3", "title": "Arm control", "date": "2023-12-24",
                     "category": "robotics", "tags": ["RL"], "excerpt": ""}
                ],
                "categories": [{"name": "NLP", "count": 1}],
                "tags": [{"name": "DL", "count": 2}, {"name": "RL", "count": 1}]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_visible_posts_default_to_all_newest_first() {
        let browser = BlogBrowser::new(feed());

        let ids: Vec<&str> = browser.visible_posts().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["post-2", "post-1", "post-3"]);
    }

    #[test]
    fn test_filter_by_category_resolves_family() {
        let mut browser = BlogBrowser::new(feed());

        let posts = browser.filter_by_category("Computer Vision 논문");
        assert_eq!(posts.len(), 1);
        assert_eq!(
            browser.current_filter(),
            &PostFilter::Category("Computer Vision".to_string())
        );
    }

    #[test]
    fn test_robot_button_matches_case_insensitively() {
        let mut browser = BlogBrowser::new(feed());

        let posts = browser.select_button("Robot");
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, "post-3");
    }

    #[test]
    fn test_filter_by_tag_resets_button_filter() {
        let mut browser = BlogBrowser::new(feed());
        browser.select_button("NLP");

        let ids: Vec<String> = browser
            .filter_by_tag("DL")
            .iter()
            .map(|p| p.id.clone())
            .collect();
        assert_eq!(ids, vec!["post-2", "post-1"]);
        assert_eq!(browser.current_filter(), &PostFilter::All);
    }

    #[tokio::test]
    async fn test_load_missing_feed_is_empty() {
        let decoded = load_feed(Path::new("/nonexistent/blog/posts.json")).await;
        assert!(decoded.is_empty());
    }
}
