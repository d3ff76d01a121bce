//! Content loader - builds the post collection from a posts directory or a JSON file

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use super::excerpt::{plain_excerpt, DEFAULT_EXCERPT_CHARS};
use super::post::sort_newest_first;
use super::{ContentError, FrontMatter, Post};
use crate::config::SiteConfig;

/// Loads post records for the feed
pub struct ContentLoader<'a> {
    config: &'a SiteConfig,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// Load posts from a directory of Markdown/MDX files or from a JSON array,
    /// depending on what `source` points at.
    pub fn load(&self, source: &Path) -> Result<Arc<[Post]>> {
        if source.is_file() {
            self.load_json(source)
        } else {
            self.load_dir(source)
        }
    }

    /// Load all posts from a directory, newest first
    pub fn load_dir(&self, posts_dir: &Path) -> Result<Arc<[Post]>> {
        if !posts_dir.exists() {
            tracing::warn!("Posts directory {:?} does not exist", posts_dir);
            return Ok(Arc::from(Vec::new()));
        }

        let mut posts = Vec::new();

        for entry in WalkDir::new(posts_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_post_file(path) {
                continue;
            }

            match self.load_post(path) {
                Ok(Some(post)) => posts.push(post),
                Ok(None) => tracing::debug!("Skipping unlisted post {:?}", path),
                Err(e) => tracing::warn!("Failed to load post {:?}: {}", path, e),
            }
        }

        self.finish(posts, posts_dir)
    }

    /// Load posts from a JSON array of post records
    pub fn load_json(&self, file: &Path) -> Result<Arc<[Post]>> {
        let content = fs::read_to_string(file)
            .with_context(|| format!("Failed to read post collection {:?}", file))?;
        let posts: Vec<Post> =
            serde_json::from_str(&content).map_err(|source| ContentError::InvalidCollection {
                file: file.to_path_buf(),
                source,
            })?;

        self.finish(posts, file)
    }

    fn finish(&self, mut posts: Vec<Post>, origin: &Path) -> Result<Arc<[Post]>> {
        ensure_unique_paths(&posts)?;
        sort_newest_first(&mut posts);
        tracing::info!("Loaded {} posts from {:?}", posts.len(), origin);
        Ok(Arc::from(posts))
    }

    /// Load a single post; `None` when the post is a draft or unpublished
    fn load_post(&self, path: &Path) -> Result<Option<Post>> {
        let content = fs::read_to_string(path)?;
        let (fm, body) = FrontMatter::parse(&content)?;

        if !fm.is_listed() {
            return Ok(None);
        }

        let date = match fm.parse_date() {
            Some(date) => date,
            None => file_date(path)?,
        };

        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();

        let post_path = fm
            .slug
            .as_deref()
            .map(slug::slugify)
            .unwrap_or_else(|| slug::slugify(&stem));

        let title = fm.title.unwrap_or(stem);

        let description = fm
            .description
            .unwrap_or_else(|| plain_excerpt(body, DEFAULT_EXCERPT_CHARS));

        let author = fm.author.unwrap_or_else(|| self.config.author.clone());

        Ok(Some(Post {
            path: post_path,
            title,
            description,
            date,
            author,
            tags: fm.tags,
            image: fm.image,
        }))
    }
}

/// Fall back to the file's modification date
fn file_date(path: &Path) -> Result<NaiveDate> {
    let modified = fs::metadata(path)?.modified()?;
    Ok(chrono::DateTime::<Local>::from(modified).date_naive())
}

/// Check if a file is a markdown or MDX file
fn is_post_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| matches!(e, "md" | "markdown" | "mdx"))
        .unwrap_or(false)
}

fn ensure_unique_paths(posts: &[Post]) -> Result<(), ContentError> {
    let mut seen = HashSet::with_capacity(posts.len());
    for post in posts {
        if !seen.insert(post.path.as_str()) {
            return Err(ContentError::DuplicatePath(post.path.clone()));
        }
    }
    Ok(())
}

/// Resolve the posts source relative to the base directory
pub fn resolve_source(base_dir: &Path, source: &Path) -> PathBuf {
    if source.is_absolute() {
        source.to_path_buf()
    } else {
        base_dir.join(source)
    }
}
