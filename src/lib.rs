//! folio: a searchable, progressively revealed post feed
//!
//! Posts are loaded once from Markdown/MDX front matter (or a JSON array),
//! ranked by a weighted fuzzy [`search::RelevanceIndex`] and shown a page at
//! a time by a [`feed::FeedController`], driven on tokio by a
//! [`feed::FeedSession`].

pub mod commands;
pub mod config;
pub mod content;
pub mod feed;
pub mod helpers;
pub mod search;

use anyhow::Result;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use content::{ContentLoader, Post};
use feed::{FeedController, FeedOptions};
use search::RelevanceIndex;

/// The main application: site configuration plus where posts come from
#[derive(Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Posts directory or JSON collection
    pub posts_source: PathBuf,
}

impl Folio {
    /// Create a new instance from a directory, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        let posts_source = content::loader::resolve_source(&base_dir, Path::new(&config.posts_dir));

        Ok(Self {
            config,
            base_dir,
            posts_source,
        })
    }

    /// Read posts from somewhere other than the configured source
    pub fn with_posts_source<P: AsRef<Path>>(mut self, source: P) -> Self {
        self.posts_source = content::loader::resolve_source(&self.base_dir, source.as_ref());
        self
    }

    /// Load the post collection, newest first
    pub fn load_posts(&self) -> Result<Arc<[Post]>> {
        ContentLoader::new(&self.config).load(&self.posts_source)
    }

    /// Build a relevance index over a collection
    pub fn index(&self, posts: Arc<[Post]>) -> RelevanceIndex {
        RelevanceIndex::new(posts, &self.config.search)
    }

    /// Build a feed controller over a collection
    pub fn controller(&self, posts: Arc<[Post]>) -> FeedController {
        FeedController::new(self.index(posts), FeedOptions::from_config(&self.config))
    }
}
