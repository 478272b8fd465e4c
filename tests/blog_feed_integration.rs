//! Integration tests for loading and browsing the blog feed

use visitlog::blog::{load_feed, post_link, BlogBrowser, PostFilter};

const FEED: &str = r#"{
  "posts": [
    {
      "id": "post-3",
      "title": "SLAM 정리",
      "date": "2024-04-20",
      "category": "Robot / SLAM",
      "tags": ["Robotics", "SLAM"],
      "excerpt": "SLAM 정리",
      "content": "<p>...</p>",
      "images": [],
      "original_url": "",
      "filename": "3.html"
    },
    {
      "id": "post-2",
      "title": "Attention Is All You Need",
      "date": "2024-05-02",
      "category": "NLP 논문 리뷰",
      "tags": ["DL", "NLP"],
      "excerpt": "Transformer",
      "filename": "2.html"
    },
    {
      "id": "post-1",
      "title": "ResNet",
      "date": "2023-11-30",
      "category": "Computer Vision",
      "tags": ["DL", "Vision"],
      "excerpt": "Residual learning",
      "filename": "1.html"
    }
  ],
  "categories": [
    {"name": "Computer Vision", "count": 1},
    {"name": "NLP 논문 리뷰", "count": 1},
    {"name": "Robot / SLAM", "count": 1}
  ],
  "tags": [
    {"name": "SLAM", "count": 1},
    {"name": "DL", "count": 2},
    {"name": "Vision", "count": 1}
  ]
}"#;

async fn browser_from(contents: &str) -> BlogBrowser {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("posts.json");
    tokio::fs::write(&path, contents).await.unwrap();

    BlogBrowser::new(load_feed(&path).await.unwrap_or_default())
}

#[tokio::test]
async fn test_feed_loads_and_lists_newest_first() {
    let browser = browser_from(FEED).await;

    let ids: Vec<&str> = browser
        .visible_posts()
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(ids, vec!["post-2", "post-3", "post-1"]);
    assert_eq!(browser.feed().categories.len(), 3);
}

#[tokio::test]
async fn test_category_family_navigation() {
    let mut browser = browser_from(FEED).await;

    let nlp = browser.filter_by_category("NLP 논문 리뷰");
    assert_eq!(nlp.len(), 1);
    assert_eq!(post_link(nlp[0]).as_deref(), Some("./blog/posts/2.html"));
    assert_eq!(browser.current_filter(), &PostFilter::Category("NLP".to_string()));

    let robot = browser.select_button("Robot");
    assert_eq!(robot.len(), 1);
    assert_eq!(robot[0].id, "post-3");

    let all = browser.select_button("all");
    assert_eq!(all.len(), 3);
}

#[tokio::test]
async fn test_tag_navigation_and_top_tags() {
    let mut browser = browser_from(FEED).await;

    let dl: Vec<String> = browser
        .filter_by_tag("DL")
        .iter()
        .map(|p| p.id.clone())
        .collect();
    assert_eq!(dl, vec!["post-2", "post-1"]);

    let top: Vec<&str> = browser.top_tags().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(top, vec!["DL", "SLAM", "Vision"]);
}

#[tokio::test]
async fn test_malformed_feed_is_empty() {
    let browser = browser_from("<html>404</html>").await;
    assert!(browser.visible_posts().is_empty());
    assert!(browser.top_tags().is_empty());
}
