//! Post record model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A blog post as seen by the feed.
///
/// Records are immutable once handed to the feed; the collection is shared
/// as `Arc<[Post]>` and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Unique slug, also the URL path of the article
    pub path: String,

    /// Post title
    pub title: String,

    /// Short summary shown in the list
    #[serde(default)]
    pub description: String,

    /// Publication date
    pub date: NaiveDate,

    /// Post author
    #[serde(default)]
    pub author: String,

    /// Post tags
    #[serde(default)]
    pub tags: Vec<String>,

    /// Cover image reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl Post {
    /// Create a new post with minimal required fields
    pub fn new(title: impl Into<String>, date: NaiveDate) -> Self {
        let title = title.into();
        Self {
            path: slug::slugify(&title),
            title,
            description: String::new(),
            date,
            author: String::new(),
            tags: Vec::new(),
            image: None,
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the author
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Set the tags
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Set the cover image
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Sort posts by date descending (newest first), ties by path
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.path.cmp(&b.path)));
}
