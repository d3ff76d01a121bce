//! Declarative description of what the feed shows

use chrono::Locale;
use serde::Serialize;

use super::FeedState;
use crate::content::Post;
use crate::helpers::localized_date;

/// One rendered list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryView {
    pub path: String,
    /// Long, localized date, e.g. "February 15, 2024"
    pub date: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl EntryView {
    pub fn from_post(post: &Post, date_format: &str, locale: Locale) -> Self {
        Self {
            path: post.path.clone(),
            date: localized_date(post.date, date_format, locale),
            title: post.title.clone(),
            description: post.description.clone(),
            tags: post.tags.clone(),
            image: post.image.clone(),
        }
    }
}

/// What is shown below the entries
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FeedStatus {
    /// Non-blank query without matches
    NoResults { query: String },
    /// A reveal is in flight
    Loading { shown: usize, total: usize },
    /// Sentinel plus the "X of Y shown" counter
    More { shown: usize, total: usize },
    /// Everything is shown for a blank query
    End { total: usize },
    /// Nothing more to show and nothing to announce
    Settled,
}

/// Full view of the feed for one state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedView {
    pub state: FeedState,
    pub entries: Vec<EntryView>,
    pub status: FeedStatus,
}

impl FeedView {
    /// Whether the sentinel element should be rendered
    pub fn has_sentinel(&self) -> bool {
        matches!(self.status, FeedStatus::More { .. })
    }

    /// Text of the status line, if any
    pub fn status_line(&self) -> Option<String> {
        match &self.status {
            FeedStatus::NoResults { query } => Some(format!("No articles found for {}.", query)),
            FeedStatus::Loading { shown, total } => {
                Some(format!("Loading more articles… ({} of {} shown)", shown, total))
            }
            FeedStatus::More { shown, total } => Some(format!("{} of {} shown", shown, total)),
            FeedStatus::End { total } => Some(format!(
                "You've reached the end. {} {} in total.",
                total,
                if *total == 1 { "article" } else { "articles" }
            )),
            FeedStatus::Settled => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn view(status: FeedStatus) -> FeedView {
        FeedView {
            state: FeedState::default(),
            entries: Vec::new(),
            status,
        }
    }

    #[test]
    fn test_entry_formats_long_date() {
        let post = Post::new("Hello", NaiveDate::from_ymd_opt(2024, 2, 15).unwrap())
            .with_tags(["intro"])
            .with_image("/img/hello.png");
        let entry = EntryView::from_post(&post, "%B %-d, %Y", Locale::en_US);
        assert_eq!(entry.date, "February 15, 2024");
        assert_eq!(entry.tags, vec!["intro"]);
        assert_eq!(entry.image.as_deref(), Some("/img/hello.png"));
    }

    #[test]
    fn test_status_lines() {
        let no_results = view(FeedStatus::NoResults {
            query: "zzz-nonexistent-zzz".to_string(),
        });
        assert_eq!(
            no_results.status_line().as_deref(),
            Some("No articles found for zzz-nonexistent-zzz.")
        );

        let more = view(FeedStatus::More { shown: 4, total: 6 });
        assert_eq!(more.status_line().as_deref(), Some("4 of 6 shown"));
        assert!(more.has_sentinel());

        let end = view(FeedStatus::End { total: 6 });
        assert_eq!(
            end.status_line().as_deref(),
            Some("You've reached the end. 6 articles in total.")
        );
        assert!(!end.has_sentinel());

        assert_eq!(view(FeedStatus::Settled).status_line(), None);
    }

    #[test]
    fn test_status_serializes_with_kind_tag() {
        let json = serde_json::to_value(FeedStatus::More { shown: 4, total: 6 }).unwrap();
        assert_eq!(json["kind"], "more");
        assert_eq!(json["shown"], 4);
    }
}
