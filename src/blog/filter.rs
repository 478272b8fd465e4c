//! Post filtering, ordering and presentation helpers

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::cmp::Reverse;

use crate::blog::models::{BlogFeed, Post, TagCount};

/// Category labels that also match any category containing them
pub const CATEGORY_FAMILIES: [&str; 3] = ["Computer Vision", "NLP", "Robot"];

/// Number of tags shown in the tag list
pub const TOP_TAG_COUNT: usize = 10;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PostFilter {
    #[default]
    All,
    Category(String),
    Tag(String),
}

impl PostFilter {
    /// Filter selected by a filter button value; `all` selects everything
    pub fn from_button(value: &str) -> Self {
        if value == "all" {
            PostFilter::All
        } else {
            PostFilter::Category(value.to_string())
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        match self {
            PostFilter::All => true,
            PostFilter::Category(category) => matches_category(post, category),
            PostFilter::Tag(tag) => post.tags.iter().any(|t| t == tag),
        }
    }
}

/// Family label for `category`, or the category itself when it has none
pub fn category_family(category: &str) -> &str {
    CATEGORY_FAMILIES
        .iter()
        .find(|family| category.contains(*family))
        .copied()
        .unwrap_or(category)
}

/// Whether `post` belongs to `filter`, either directly or through its family
pub fn matches_category(post: &Post, filter: &str) -> bool {
    let Some(category) = post.category.as_deref().filter(|c| !c.is_empty()) else {
        return false;
    };

    if category == filter {
        return true;
    }

    match filter {
        "Computer Vision" | "NLP" => category.contains(filter),
        "Robot" => category.to_lowercase().contains("robot"),
        _ => false,
    }
}

pub fn filter_posts<'a>(feed: &'a BlogFeed, filter: &PostFilter) -> Vec<&'a Post> {
    feed.posts.iter().filter(|post| filter.matches(post)).collect()
}

/// Parse a post date, accepting `YYYY-MM-DD` and RFC 3339
pub fn parse_post_date(date: &str) -> Option<NaiveDateTime> {
    if let Ok(day) = NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        return day.and_hms_opt(0, 0, 0);
    }

    DateTime::parse_from_rfc3339(date)
        .ok()
        .map(|at| at.naive_utc())
}

/// Newest first; posts without a readable date go last in their original order
pub fn sort_newest_first(posts: &mut [&Post]) {
    posts.sort_by_key(|post| {
        let date = parse_post_date(&post.date);
        (date.is_none(), Reverse(date))
    });
}

/// The `n` most used tags, most used first
pub fn top_tags(feed: &BlogFeed, n: usize) -> Vec<&TagCount> {
    let mut tags: Vec<&TagCount> = feed.tags.iter().collect();
    tags.sort_by_key(|tag| Reverse(tag.count));
    tags.truncate(n);
    tags
}

/// Relative link to the post's own page
pub fn post_link(post: &Post) -> Option<String> {
    post.filename
        .as_deref()
        .filter(|filename| !filename.is_empty())
        .map(|filename| format!("./blog/posts/{filename}"))
}

/// Korean long-form date (`2024년 1월 5일`), or the input when it is not a date
pub fn format_display_date(date: &str) -> String {
    match parse_post_date(date) {
        Some(at) => format!("{}년 {}월 {}일", at.year(), at.month(), at.day()),
        None => date.to_string(),
    }
}
