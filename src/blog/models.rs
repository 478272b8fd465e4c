//! Static blog feed (`posts.json`)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogFeed {
    pub posts: Vec<Post>,
    pub categories: Vec<CategoryCount>,
    pub tags: Vec<TagCount>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Post {
    pub id: String,
    pub title: String,
    /// `YYYY-MM-DD` or RFC 3339
    pub date: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub excerpt: String,
    /// Page file under `blog/posts/`
    pub filename: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryCount {
    pub name: String,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TagCount {
    pub name: String,
    pub count: u32,
}
