//! Site configuration (_config.yml)

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub author: String,
    /// Locale used for long dates, e.g. `en_US` or `de-DE`
    pub language: String,

    // Directory
    /// Directory of Markdown/MDX posts, or a JSON file of post records
    pub posts_dir: String,

    // Date format (chrono strftime, localized month and weekday names)
    pub date_format: String,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub feed: FeedConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Folio".to_string(),
            author: "Anonymous".to_string(),
            language: "en_US".to_string(),
            posts_dir: "posts".to_string(),
            date_format: "%B %-d, %Y".to_string(),
            search: SearchConfig::default(),
            feed: FeedConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.validate()?;
        tracing::debug!("Loaded site config from {:?}", path.as_ref());
        Ok(config)
    }

    /// Reject settings the feed cannot work with
    pub fn validate(&self) -> Result<()> {
        ensure!(self.feed.page_width > 0, "feed.page_width must be at least 1");
        ensure!(
            (0.0..=1.0).contains(&self.search.threshold),
            "search.threshold must be within [0, 1], got {}",
            self.search.threshold
        );

        let w = &self.search.weights;
        let weights = [w.title, w.description, w.tags, w.author];
        ensure!(
            weights.iter().all(|w| w.is_finite() && *w >= 0.0),
            "search.weights must be finite and non-negative"
        );
        ensure!(
            weights.iter().any(|w| *w > 0.0),
            "at least one search weight must be positive"
        );
        Ok(())
    }
}

/// Relevance index tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum normalized edit distance for a field to count as a match
    pub threshold: f64,
    #[serde(default)]
    pub weights: WeightsConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: 0.3,
            weights: WeightsConfig::default(),
        }
    }
}

/// Per-field search weights
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightsConfig {
    pub title: f64,
    pub description: f64,
    pub tags: f64,
    pub author: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            title: 0.4,
            description: 0.3,
            tags: 0.2,
            author: 0.1,
        }
    }
}

/// Progressive reveal tunables
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Posts revealed per page
    pub page_width: usize,
    /// Artificial wait before a reveal completes
    pub reveal_delay_ms: u64,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_width: 4,
            reveal_delay_ms: 2000,
        }
    }
}

impl FeedConfig {
    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }
}
