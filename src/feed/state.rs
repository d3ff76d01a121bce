//! Feed state and reveal bookkeeping

use chrono::Locale;
use serde::Serialize;
use std::time::Duration;

use crate::config::SiteConfig;
use crate::helpers::{resolve_locale, LONG_DATE_FORMAT};

/// UI state owned by one feed controller
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedState {
    /// Free-text search query
    pub query: String,
    /// Number of page widths revealed, at least 1
    pub page: usize,
    /// True only while a reveal is in flight
    pub is_loading: bool,
}

impl Default for FeedState {
    fn default() -> Self {
        Self {
            query: String::new(),
            page: 1,
            is_loading: false,
        }
    }
}

impl FeedState {
    pub fn phase(&self) -> Phase {
        if self.is_loading {
            Phase::LoadingMore
        } else {
            Phase::Idle
        }
    }
}

/// Reveal state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    LoadingMore,
}

/// Handle for one in-flight reveal.
///
/// Carries the query generation it was issued under so a completion that
/// arrives after the query changed can be recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTicket {
    pub(crate) seq: u64,
    pub(crate) generation: u64,
}

/// What completing a reveal did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealOutcome {
    /// The window grew to `page`
    Applied { page: usize },
    /// The query changed since the reveal started; only the loading flag was cleared
    Stale,
    /// Unknown ticket or torn-down controller; nothing changed
    Ignored,
}

/// Feed tunables
#[derive(Debug, Clone)]
pub struct FeedOptions {
    /// Posts revealed per page
    pub page_width: usize,
    /// Wait before a reveal completes
    pub reveal_delay: Duration,
    /// Long date format for entries
    pub date_format: String,
    /// Locale for month and weekday names
    pub locale: Locale,
}

impl Default for FeedOptions {
    fn default() -> Self {
        Self {
            page_width: 4,
            reveal_delay: Duration::from_millis(2000),
            date_format: LONG_DATE_FORMAT.to_string(),
            locale: Locale::en_US,
        }
    }
}

impl FeedOptions {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            page_width: config.feed.page_width.max(1),
            reveal_delay: config.feed.reveal_delay(),
            date_format: config.date_format.clone(),
            locale: resolve_locale(&config.language),
        }
    }
}
