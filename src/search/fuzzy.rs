//! Weighted fuzzy ranking

use super::{Field, FieldHit, FieldWeights, Match, Ranker, SearchDocument};
use crate::config::SearchConfig;

/// Floor for a perfect field score so the weight still orders results
const PERFECT_SCORE: f64 = 0.001;

/// Typo-tolerant ranker.
///
/// A field scores `d / len(query)` where `d` is the edit distance between the
/// query and its best-matching substring of the field. Fields at or under the
/// threshold match; the post's score is the product of `score^weight` over
/// matching fields, so heavier fields dominate and several hits beat one.
#[derive(Debug, Clone)]
pub struct FuzzyRanker {
    threshold: f64,
    weights: FieldWeights,
}

impl FuzzyRanker {
    pub fn new(threshold: f64, weights: FieldWeights) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            weights,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(config.threshold, FieldWeights::from(&config.weights))
    }

    fn score_document(&self, pattern: &[char], doc: &SearchDocument) -> Option<(f64, Vec<FieldHit>)> {
        let mut total = 1.0;
        let mut hits = Vec::new();

        for field in Field::ALL {
            let weight = self.weights.get(field);
            if weight <= 0.0 {
                continue;
            }

            let best = doc
                .values(field)
                .iter()
                .map(|value| field_score(pattern, value))
                .min_by(f64::total_cmp);

            if let Some(score) = best.filter(|s| *s <= self.threshold) {
                total *= score.max(PERFECT_SCORE).powf(weight);
                hits.push(FieldHit { field, score });
            }
        }

        if hits.is_empty() {
            None
        } else {
            Some((total, hits))
        }
    }
}

impl Default for FuzzyRanker {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl Ranker for FuzzyRanker {
    fn rank(&self, query: &str, corpus: &[SearchDocument]) -> Vec<Match> {
        let pattern = super::normalize(query.trim());
        if pattern.is_empty() {
            return Vec::new();
        }

        let mut matches: Vec<Match> = corpus
            .iter()
            .enumerate()
            .filter_map(|(index, doc)| {
                self.score_document(&pattern, doc)
                    .map(|(score, hits)| Match { index, score, hits })
            })
            .collect();

        // Stable on ties: collection order wins
        matches.sort_by(|a, b| a.score.total_cmp(&b.score).then(a.index.cmp(&b.index)));
        matches
    }
}

/// Normalized distance in `[0, 1]`
fn field_score(pattern: &[char], text: &[char]) -> f64 {
    let distance = approx_substring_distance(pattern, text);
    (distance as f64 / pattern.len() as f64).min(1.0)
}

/// Edit distance between `pattern` and its closest substring of `text`.
///
/// Levenshtein DP where skipping a prefix or suffix of the text is free, one
/// column per text character.
pub fn approx_substring_distance(pattern: &[char], text: &[char]) -> usize {
    let m = pattern.len();
    if m == 0 {
        return 0;
    }

    // col[i]: cost of matching pattern[..i] ending at the current text position
    let mut col: Vec<usize> = (0..=m).collect();
    let mut best = m;

    for &c in text {
        let mut diag = col[0];
        for i in 1..=m {
            let left = col[i];
            let cost = usize::from(pattern[i - 1] != c);
            col[i] = (left + 1).min(col[i - 1] + 1).min(diag + cost);
            diag = left;
        }
        best = best.min(col[m]);
        if best == 0 {
            break;
        }
    }

    best
}
