//! Paginated list controller
//!
//! Owns `{query, page, is_loading}` for one rendered list and derives the
//! visible window from the relevance index. The controller is synchronous;
//! timing lives in [`super::FeedSession`], which hands tickets back through
//! [`FeedController::complete_reveal`] once the reveal delay has elapsed.

use std::sync::Arc;

use super::state::{FeedOptions, FeedState, Phase, RevealOutcome, RevealTicket};
use super::view::{EntryView, FeedStatus, FeedView};
use crate::content::Post;
use crate::search::{is_blank, FuzzyRanker, Ranker, RelevanceIndex};

pub struct FeedController<R = FuzzyRanker> {
    index: RelevanceIndex<R>,
    options: FeedOptions,
    state: FeedState,
    /// Index output for the current query
    matched: Vec<usize>,
    /// Bumped on every query change
    generation: u64,
    next_seq: u64,
    pending: Option<RevealTicket>,
    sentinel_visible: bool,
    torn_down: bool,
}

impl<R: Ranker> FeedController<R> {
    pub fn new(index: RelevanceIndex<R>, options: FeedOptions) -> Self {
        let matched = index.search("");
        Self {
            index,
            options,
            state: FeedState::default(),
            matched,
            generation: 0,
            next_seq: 0,
            pending: None,
            sentinel_visible: false,
            torn_down: false,
        }
    }

    pub fn state(&self) -> &FeedState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn options(&self) -> &FeedOptions {
        &self.options
    }

    pub fn index(&self) -> &RelevanceIndex<R> {
        &self.index
    }

    /// Positions of the matched posts for the current query, best first
    pub fn matched(&self) -> &[usize] {
        &self.matched
    }

    pub fn window_size(&self) -> usize {
        self.options.page_width.saturating_mul(self.state.page)
    }

    pub fn visible_len(&self) -> usize {
        self.window_size().min(self.matched.len())
    }

    pub fn has_more(&self) -> bool {
        self.visible_len() < self.matched.len()
    }

    /// The revealed posts, in match order
    pub fn visible_posts(&self) -> impl Iterator<Item = &Post> + '_ {
        let posts = self.index.posts();
        self.matched[..self.visible_len()]
            .iter()
            .map(move |&i| &posts[i])
    }

    /// Change the query. The window goes back to the first page; an in-flight
    /// reveal keeps running. Returns whether the query actually changed.
    pub fn set_query(&mut self, query: impl Into<String>) -> bool {
        let query = query.into();
        if self.torn_down || query == self.state.query {
            return false;
        }

        self.matched = self.index.search(&query);
        self.state.query = query;
        self.state.page = 1;
        self.generation += 1;
        tracing::debug!(
            query = %self.state.query,
            matched = self.matched.len(),
            "Query changed"
        );
        true
    }

    /// Swap the post collection. The index is rebuilt only for a different
    /// `Arc`; returns whether that happened.
    pub fn set_posts(&mut self, posts: Arc<[Post]>) -> bool {
        if self.torn_down || !self.index.rebuild(posts) {
            return false;
        }
        self.matched = self.index.search(&self.state.query);
        true
    }

    /// Record the latest sentinel visibility reported by the observer
    pub fn set_sentinel_visible(&mut self, visible: bool) {
        if !self.torn_down {
            self.sentinel_visible = visible;
        }
    }

    pub fn sentinel_visible(&self) -> bool {
        self.sentinel_visible
    }

    /// Start revealing the next page. No-op while a reveal is in flight,
    /// when nothing is left to reveal, or after teardown.
    pub fn begin_reveal(&mut self) -> Option<RevealTicket> {
        if self.torn_down || self.state.is_loading || !self.has_more() {
            return None;
        }

        let ticket = RevealTicket {
            seq: self.next_seq,
            generation: self.generation,
        };
        self.next_seq += 1;
        self.pending = Some(ticket);
        self.state.is_loading = true;
        tracing::debug!(page = self.state.page, "Reveal started");
        Some(ticket)
    }

    /// Start a reveal if the sentinel is currently visible
    pub fn poll_reveal(&mut self) -> Option<RevealTicket> {
        if self.sentinel_visible {
            self.begin_reveal()
        } else {
            None
        }
    }

    /// Finish a reveal once its delay has elapsed
    pub fn complete_reveal(&mut self, ticket: RevealTicket) -> RevealOutcome {
        if self.torn_down || self.pending != Some(ticket) {
            return RevealOutcome::Ignored;
        }

        self.pending = None;
        self.state.is_loading = false;

        if ticket.generation != self.generation {
            tracing::debug!("Dropping reveal issued for an earlier query");
            return RevealOutcome::Stale;
        }

        self.state.page += 1;
        tracing::debug!(page = self.state.page, "Reveal completed");
        RevealOutcome::Applied {
            page: self.state.page,
        }
    }

    /// Stop reacting to anything; pending reveals are dropped
    pub fn teardown(&mut self) {
        self.torn_down = true;
        self.pending = None;
        self.sentinel_visible = false;
    }

    /// Derive the view for the current state
    pub fn view(&self) -> FeedView {
        let total = self.matched.len();

        if total == 0 && !is_blank(&self.state.query) {
            return FeedView {
                state: self.state.clone(),
                entries: Vec::new(),
                status: FeedStatus::NoResults {
                    query: self.state.query.clone(),
                },
            };
        }

        let entries: Vec<EntryView> = self
            .visible_posts()
            .map(|post| EntryView::from_post(post, &self.options.date_format, self.options.locale))
            .collect();
        let shown = entries.len();

        let status = if self.state.is_loading {
            FeedStatus::Loading { shown, total }
        } else if self.has_more() {
            FeedStatus::More { shown, total }
        } else if shown > 0 && is_blank(&self.state.query) {
            FeedStatus::End { total }
        } else {
            FeedStatus::Settled
        };

        FeedView {
            state: self.state.clone(),
            entries,
            status,
        }
    }
}
