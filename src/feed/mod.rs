//! Searchable, progressively revealed post feed
//!
//! [`FeedController`] is the synchronous state machine (`Idle` /
//! `LoadingMore`) over a [`crate::search::RelevanceIndex`];
//! [`FeedSession`] drives it on tokio with the reveal timer and a
//! [`VisibilityObserver`] for the sentinel.

mod controller;
mod session;
mod state;
mod view;

pub use controller::FeedController;
pub use session::{FeedError, FeedSession, ManualSentinel, VisibilityCallback, VisibilityObserver};
pub use state::{FeedOptions, FeedState, Phase, RevealOutcome, RevealTicket};
pub use view::{EntryView, FeedStatus, FeedView};
