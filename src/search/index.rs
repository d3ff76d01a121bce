//! Relevance index over a fixed post collection

use std::sync::Arc;

use super::{FuzzyRanker, Match, Ranker, SearchDocument};
use crate::config::SearchConfig;
use crate::content::Post;

/// Whether a query selects the whole collection
pub fn is_blank(query: &str) -> bool {
    query.trim().is_empty()
}

/// Searchable view of one post collection.
///
/// The index is tied to the identity of the `Arc` it was built from:
/// [`RelevanceIndex::rebuild`] only does work when handed a different
/// allocation.
pub struct RelevanceIndex<R = FuzzyRanker> {
    posts: Arc<[Post]>,
    documents: Vec<SearchDocument>,
    ranker: R,
}

impl RelevanceIndex<FuzzyRanker> {
    /// Build an index with the default fuzzy ranker
    pub fn new(posts: Arc<[Post]>, config: &SearchConfig) -> Self {
        Self::with_ranker(posts, FuzzyRanker::from_config(config))
    }
}

impl<R: Ranker> RelevanceIndex<R> {
    /// Build an index with a custom ranker
    pub fn with_ranker(posts: Arc<[Post]>, ranker: R) -> Self {
        let documents = build_documents(&posts);
        Self {
            posts,
            documents,
            ranker,
        }
    }

    /// The indexed collection
    pub fn posts(&self) -> &Arc<[Post]> {
        &self.posts
    }

    /// Whether this index was built from exactly this collection
    pub fn is_built_from(&self, posts: &Arc<[Post]>) -> bool {
        Arc::ptr_eq(&self.posts, posts)
    }

    /// Re-index when the collection reference changed. Returns whether a
    /// rebuild happened.
    pub fn rebuild(&mut self, posts: Arc<[Post]>) -> bool {
        if self.is_built_from(&posts) {
            return false;
        }
        self.documents = build_documents(&posts);
        self.posts = posts;
        true
    }

    /// Ranked matches for a query. A blank query returns every post in
    /// collection order with a perfect score and no field hits.
    pub fn ranked(&self, query: &str) -> Vec<Match> {
        if is_blank(query) {
            return (0..self.posts.len())
                .map(|index| Match {
                    index,
                    score: 0.0,
                    hits: Vec::new(),
                })
                .collect();
        }
        self.ranker.rank(query, &self.documents)
    }

    /// Positions of the matching posts, best first
    pub fn search(&self, query: &str) -> Vec<usize> {
        if is_blank(query) {
            return (0..self.posts.len()).collect();
        }
        self.ranker
            .rank(query, &self.documents)
            .into_iter()
            .map(|m| m.index)
            .collect()
    }
}

fn build_documents(posts: &[Post]) -> Vec<SearchDocument> {
    let documents: Vec<_> = posts.iter().map(SearchDocument::from_post).collect();
    tracing::debug!("Indexed {} posts", documents.len());
    documents
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample() -> Arc<[Post]> {
        let d = |day| NaiveDate::from_ymd_opt(2024, 2, day).unwrap();
        Arc::from(vec![
            Post::new("Getting Started with Rust", d(20))
                .with_description("Ownership and borrowing")
                .with_tags(["rust"])
                .with_author("Ferris"),
            Post::new("Advanced React Hooks", d(15))
                .with_description("Custom hooks for data fetching")
                .with_tags(["react", "javascript"])
                .with_author("Jane Doe"),
            Post::new("CSS Grid in Practice", d(10))
                .with_description("Layouts without frameworks")
                .with_tags(["css"])
                .with_author("Sam"),
        ])
    }

    #[test]
    fn test_blank_query_returns_everything_in_order() {
        let index = RelevanceIndex::new(sample(), &SearchConfig::default());
        for query in ["", "   ", "\t\n"] {
            assert_eq!(index.search(query), vec![0, 1, 2]);
        }
        assert!(index.ranked("").iter().all(|m| m.hits.is_empty()));
    }

    #[test]
    fn test_empty_collection_is_always_empty() {
        let index = RelevanceIndex::new(Arc::from(Vec::new()), &SearchConfig::default());
        assert!(index.search("").is_empty());
        assert!(index.search("rust").is_empty());
    }

    #[test]
    fn test_typo_query_ranks_match_above_unrelated() {
        let index = RelevanceIndex::new(sample(), &SearchConfig::default());
        let titles: Vec<_> = index
            .search("Hoks")
            .into_iter()
            .map(|i| index.posts()[i].title.as_str())
            .collect();
        assert_eq!(titles, vec!["Advanced React Hooks"]);
    }

    #[test]
    fn test_results_are_within_threshold_and_ordered() {
        let config = SearchConfig::default();
        let index = RelevanceIndex::new(sample(), &config);
        for query in ["rust", "react", "layout", "jane", "css grid", "hooks"] {
            let ranked = index.ranked(query);
            assert!(!ranked.is_empty(), "query {:?}", query);
            for m in &ranked {
                assert!(!m.hits.is_empty());
                assert!(m.hits.iter().all(|h| h.score <= config.threshold));
            }
            for pair in ranked.windows(2) {
                assert!(pair[0].quality() >= pair[1].quality());
            }
        }
    }

    #[test]
    fn test_rebuild_only_on_new_collection() {
        let posts = sample();
        let mut index = RelevanceIndex::new(posts.clone(), &SearchConfig::default());
        assert!(index.is_built_from(&posts));
        assert!(!index.rebuild(posts.clone()));

        // Same contents, different allocation
        let copy: Arc<[Post]> = Arc::from(posts.to_vec());
        assert!(index.rebuild(copy.clone()));
        assert!(index.is_built_from(&copy));
        assert!(!index.is_built_from(&posts));
    }

    struct ReverseTitle;

    impl Ranker for ReverseTitle {
        fn rank(&self, _query: &str, corpus: &[SearchDocument]) -> Vec<Match> {
            (0..corpus.len())
                .rev()
                .map(|index| Match {
                    index,
                    score: 0.5,
                    hits: Vec::new(),
                })
                .collect()
        }
    }

    #[test]
    fn test_custom_ranker_is_used_for_non_blank_queries() {
        let index = RelevanceIndex::with_ranker(sample(), ReverseTitle);
        assert_eq!(index.search("anything"), vec![2, 1, 0]);
        assert_eq!(index.search(""), vec![0, 1, 2]);
    }
}
