//! Relevance search over the post collection
//!
//! The index precomputes a [`SearchDocument`] per post and delegates ranking
//! to a [`Ranker`]. [`FuzzyRanker`] is the default: weighted, typo-tolerant
//! substring matching over title, description, tags and author.

mod fuzzy;
mod index;

use serde::Serialize;

use crate::config::WeightsConfig;
use crate::content::Post;

pub use fuzzy::{approx_substring_distance, FuzzyRanker};
pub use index::{is_blank, RelevanceIndex};

/// A searchable post field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Title,
    Description,
    Tags,
    Author,
}

impl Field {
    pub const ALL: [Field; 4] = [Field::Title, Field::Description, Field::Tags, Field::Author];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Description => "description",
            Field::Tags => "tags",
            Field::Author => "author",
        }
    }

    fn slot(self) -> usize {
        match self {
            Field::Title => 0,
            Field::Description => 1,
            Field::Tags => 2,
            Field::Author => 3,
        }
    }
}

/// Field weights, normalized to sum to 1
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldWeights([f64; 4]);

impl FieldWeights {
    /// Build normalized weights. Negative or non-finite weights count as zero;
    /// an all-zero set falls back to the defaults.
    pub fn new(title: f64, description: f64, tags: f64, author: f64) -> Self {
        let clean = |w: f64| if w.is_finite() && w > 0.0 { w } else { 0.0 };
        let raw = [clean(title), clean(description), clean(tags), clean(author)];
        let sum: f64 = raw.iter().sum();
        if sum <= 0.0 {
            return Self::default();
        }
        Self(raw.map(|w| w / sum))
    }

    pub fn get(&self, field: Field) -> f64 {
        self.0[field.slot()]
    }
}

impl Default for FieldWeights {
    fn default() -> Self {
        Self([0.4, 0.3, 0.2, 0.1])
    }
}

impl From<&WeightsConfig> for FieldWeights {
    fn from(w: &WeightsConfig) -> Self {
        Self::new(w.title, w.description, w.tags, w.author)
    }
}

/// Lowercased character form of a post, ready for matching
#[derive(Debug, Clone)]
pub struct SearchDocument {
    fields: [Vec<Vec<char>>; 4],
}

impl SearchDocument {
    pub fn from_post(post: &Post) -> Self {
        Self {
            fields: [
                vec![normalize(&post.title)],
                vec![normalize(&post.description)],
                post.tags.iter().map(|t| normalize(t)).collect(),
                vec![normalize(&post.author)],
            ],
        }
    }

    /// The values of a field; tags have one value per tag
    pub fn values(&self, field: Field) -> &[Vec<char>] {
        &self.fields[field.slot()]
    }
}

/// Case-folded characters used for comparisons
pub fn normalize(text: &str) -> Vec<char> {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// How well one field matched
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldHit {
    pub field: Field,
    /// Normalized edit distance, 0.0 is an exact substring hit
    pub score: f64,
}

/// A ranked search result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Match {
    /// Position of the post in the indexed collection
    pub index: usize,
    /// Combined score, lower is better
    pub score: f64,
    /// Fields that matched within the threshold
    pub hits: Vec<FieldHit>,
}

impl Match {
    /// Match quality in `[0, 1]`, higher is better
    pub fn quality(&self) -> f64 {
        1.0 - self.score
    }
}

/// Ranks a corpus against a non-blank query.
///
/// Implementations return only matching documents, best first, and must be
/// pure functions of their inputs.
pub trait Ranker: Send + Sync {
    fn rank(&self, query: &str, corpus: &[SearchDocument]) -> Vec<Match>;
}
