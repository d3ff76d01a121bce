//! Async driver for a mounted feed
//!
//! A [`FeedSession`] runs one [`FeedController`] as a single cooperative
//! event loop on the tokio runtime. Commands, visibility changes and the one
//! outstanding reveal timer are handled in arrival order; the derived view is
//! published on a watch channel after every event.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use super::{FeedController, FeedState, FeedView, RevealTicket};
use crate::content::Post;
use crate::search::Ranker;

/// Callback an observer invokes when the sentinel crosses the viewport threshold
pub type VisibilityCallback = Box<dyn Fn(bool) + Send + Sync>;

/// Source of sentinel visibility changes.
///
/// Implementations call the callback with `true` when the sentinel comes into
/// view and `false` when it leaves.
pub trait VisibilityObserver: Send + 'static {
    fn observe(&mut self, notify: VisibilityCallback);

    /// Stop reporting. Called once when the session ends.
    fn disconnect(&mut self) {}
}

/// Observer driven by hand: terminals, tests, anything without a real viewport.
///
/// Clones share one handle. It reports to the most recently mounted session
/// and goes quiet once that session ends.
#[derive(Clone, Default)]
pub struct ManualSentinel {
    inner: Arc<SentinelInner>,
    /// Registration this handle made in `observe`
    id: u64,
}

#[derive(Default)]
struct SentinelInner {
    notify: Mutex<Option<(u64, VisibilityCallback)>>,
    registrations: AtomicU64,
    disconnected: AtomicBool,
}

impl SentinelInner {
    fn notify(&self) -> MutexGuard<'_, Option<(u64, VisibilityCallback)>> {
        self.notify.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ManualSentinel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report a visibility change. Returns whether a session received it.
    pub fn set_visible(&self, visible: bool) -> bool {
        match self.inner.notify().as_ref() {
            Some((_, notify)) => {
                notify(visible);
                true
            }
            None => false,
        }
    }

    /// The sentinel scrolls into view and back out, asking for one page
    pub fn scroll_past(&self) -> bool {
        self.set_visible(true) && self.set_visible(false)
    }

    pub fn is_disconnected(&self) -> bool {
        self.inner.disconnected.load(Ordering::SeqCst)
    }
}

impl VisibilityObserver for ManualSentinel {
    fn observe(&mut self, notify: VisibilityCallback) {
        self.id = self.inner.registrations.fetch_add(1, Ordering::SeqCst) + 1;
        if self.inner.notify().replace((self.id, notify)).is_some() {
            tracing::debug!("Sentinel moved to a new session");
        }
        self.inner.disconnected.store(false, Ordering::SeqCst);
    }

    /// Only the session holding the current registration can end it
    fn disconnect(&mut self) {
        let mut slot = self.inner.notify();
        if matches!(slot.as_ref(), Some((id, _)) if *id == self.id) {
            slot.take();
            self.inner.disconnected.store(true, Ordering::SeqCst);
        }
    }
}

/// Disconnects the observer however the session task ends
struct ObserverGuard<O: VisibilityObserver>(O);

impl<O: VisibilityObserver> Drop for ObserverGuard<O> {
    fn drop(&mut self) {
        self.0.disconnect();
    }
}

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed session task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

enum Command {
    SetQuery(String),
    Visibility(bool),
    LoadMore,
    ReplacePosts(Arc<[Post]>),
    Unmount,
}

/// A mounted feed
pub struct FeedSession {
    commands: mpsc::UnboundedSender<Command>,
    views: watch::Receiver<FeedView>,
    task: JoinHandle<FeedState>,
}

impl FeedSession {
    /// Mount a controller and start observing the sentinel.
    ///
    /// Must be called from within a tokio runtime.
    pub fn mount<R, O>(controller: FeedController<R>, mut observer: O) -> Self
    where
        R: Ranker + 'static,
        O: VisibilityObserver,
    {
        let (commands, receiver) = mpsc::unbounded_channel();
        let (view_tx, views) = watch::channel(controller.view());

        let tx = commands.clone();
        observer.observe(Box::new(move |visible| {
            let _ = tx.send(Command::Visibility(visible));
        }));

        let task = tokio::spawn(run(controller, ObserverGuard(observer), receiver, view_tx));
        tracing::debug!("Feed session mounted");

        Self {
            commands,
            views,
            task,
        }
    }

    /// Change the search query
    pub fn set_query(&self, query: impl Into<String>) {
        self.send(Command::SetQuery(query.into()));
    }

    /// Ask for the next page without waiting for the sentinel
    pub fn load_more(&self) {
        self.send(Command::LoadMore);
    }

    /// Swap the post collection
    pub fn replace_posts(&self, posts: Arc<[Post]>) {
        self.send(Command::ReplacePosts(posts));
    }

    /// The latest published view
    pub fn view(&self) -> FeedView {
        self.views.borrow().clone()
    }

    /// Receive every view the session publishes
    pub fn subscribe(&self) -> watch::Receiver<FeedView> {
        self.views.clone()
    }

    /// Tear the feed down and return its final state. A pending reveal is
    /// dropped without touching the state.
    pub async fn unmount(mut self) -> Result<FeedState, FeedError> {
        self.send(Command::Unmount);
        Ok((&mut self.task).await?)
    }

    fn send(&self, command: Command) {
        if self.commands.send(command).is_err() {
            tracing::debug!("Feed session is no longer running");
        }
    }
}

impl Drop for FeedSession {
    fn drop(&mut self) {
        // No-op once the task has finished
        self.task.abort();
    }
}

async fn run<R, O>(
    mut controller: FeedController<R>,
    _observer: ObserverGuard<O>,
    mut commands: mpsc::UnboundedReceiver<Command>,
    views: watch::Sender<FeedView>,
) -> FeedState
where
    R: Ranker,
    O: VisibilityObserver,
{
    let delay = controller.options().reveal_delay;
    let mut pending: Option<(RevealTicket, Instant)> = None;

    loop {
        let deadline = pending.map(|(_, at)| at);

        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::SetQuery(query)) => {
                    controller.set_query(query);
                }
                Some(Command::Visibility(visible)) => controller.set_sentinel_visible(visible),
                Some(Command::LoadMore) => {
                    if pending.is_none() {
                        pending = controller.begin_reveal().map(|t| (t, Instant::now() + delay));
                    }
                }
                Some(Command::ReplacePosts(posts)) => {
                    controller.set_posts(posts);
                }
                Some(Command::Unmount) | None => break,
            },
            _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some((ticket, _)) = pending.take() {
                    let outcome = controller.complete_reveal(ticket);
                    tracing::debug!(?outcome, "Reveal timer fired");
                }
            }
        }

        // The sentinel may still be in view after the event
        if pending.is_none() {
            pending = controller
                .poll_reveal()
                .map(|t| (t, Instant::now() + delay));
        }

        views.send_replace(controller.view());
    }

    controller.teardown();
    tracing::debug!("Feed session unmounted");
    controller.state().clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SearchConfig;
    use crate::feed::{FeedOptions, FeedStatus};
    use crate::search::RelevanceIndex;
    use chrono::NaiveDate;
    use std::time::Duration;

    fn controller(n: usize) -> FeedController {
        let date = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let posts: Arc<[Post]> = (0..n)
            .map(|i| Post::new(format!("Entry {}", i), date).with_tags(["notes"]))
            .collect::<Vec<_>>()
            .into();
        let index = RelevanceIndex::new(posts, &SearchConfig::default());
        FeedController::new(index, FeedOptions::default())
    }

    async fn next_view(views: &mut watch::Receiver<FeedView>) -> FeedView {
        views.changed().await.expect("session stopped publishing");
        views.borrow_and_update().clone()
    }

    #[tokio::test(start_paused = true)]
    async fn test_reveal_completes_after_delay() {
        let sentinel = ManualSentinel::new();
        let session = FeedSession::mount(controller(6), sentinel.clone());
        let mut views = session.subscribe();

        let initial = views.borrow_and_update().clone();
        assert_eq!(initial.status, FeedStatus::More { shown: 4, total: 6 });

        assert!(sentinel.set_visible(true));
        let loading = next_view(&mut views).await;
        assert!(loading.state.is_loading);
        assert_eq!(loading.state.page, 1);
        assert_eq!(loading.entries.len(), 4);

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(session.view().state.page, 1);
        assert!(session.view().state.is_loading);

        let done = next_view(&mut views).await;
        assert_eq!(done.state.page, 2);
        assert!(!done.state.is_loading);
        assert_eq!(done.entries.len(), 6);
        assert_eq!(done.status, FeedStatus::End { total: 6 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_rapid_triggers_reveal_one_page() {
        let sentinel = ManualSentinel::new();
        let session = FeedSession::mount(controller(12), sentinel.clone());
        let mut views = session.subscribe();

        sentinel.set_visible(true);
        sentinel.set_visible(true);
        session.load_more();
        sentinel.set_visible(false);

        let mut view = next_view(&mut views).await;
        while view.state.is_loading || view.state.page == 1 {
            view = next_view(&mut views).await;
        }
        assert_eq!(view.state.page, 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(session.view().state.page, 2);
        assert!(!session.view().state.is_loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_visible_sentinel_keeps_loading() {
        let sentinel = ManualSentinel::new();
        let session = FeedSession::mount(controller(12), sentinel.clone());

        sentinel.set_visible(true);
        tokio::time::sleep(Duration::from_millis(6100)).await;

        let view = session.view();
        assert_eq!(view.state.page, 3);
        assert_eq!(view.entries.len(), 12);
        assert_eq!(view.status, FeedStatus::End { total: 12 });
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_change_during_reveal_is_not_over_revealed() {
        let sentinel = ManualSentinel::new();
        let session = FeedSession::mount(controller(12), sentinel.clone());
        let mut views = session.subscribe();

        sentinel.set_visible(true);
        sentinel.set_visible(false);
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(views.borrow_and_update().state.is_loading);

        session.set_query("entry");
        let view = next_view(&mut views).await;
        assert_eq!(view.state.query, "entry");
        assert_eq!(view.state.page, 1);
        assert!(view.state.is_loading);

        tokio::time::sleep(Duration::from_millis(2000)).await;
        let view = session.view();
        assert_eq!(view.state.page, 1);
        assert!(!view.state.is_loading);
        assert_eq!(view.entries.len(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_results_view() {
        let session = FeedSession::mount(controller(6), ManualSentinel::new());
        let mut views = session.subscribe();

        session.set_query("zzz-nonexistent-zzz");
        let view = next_view(&mut views).await;
        assert!(view.entries.is_empty());
        assert_eq!(
            view.status_line().as_deref(),
            Some("No articles found for zzz-nonexistent-zzz.")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmount_drops_pending_reveal() {
        let sentinel = ManualSentinel::new();
        let session = FeedSession::mount(controller(12), sentinel.clone());
        let mut views = session.subscribe();

        sentinel.set_visible(true);
        assert!(next_view(&mut views).await.state.is_loading);

        let state = session.unmount().await.unwrap();
        assert_eq!(state.page, 1);
        assert!(sentinel.is_disconnected());
        assert!(!sentinel.set_visible(true));

        tokio::time::sleep(Duration::from_secs(5)).await;
        views.borrow_and_update();
        assert!(views.changed().await.is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_disconnects_observer() {
        let sentinel = ManualSentinel::new();
        let session = FeedSession::mount(controller(6), sentinel.clone());
        sentinel.set_visible(true);
        drop(session);

        tokio::time::sleep(Duration::from_millis(1)).await;
        assert!(sentinel.is_disconnected());
    }

    #[tokio::test(start_paused = true)]
    async fn test_sentinel_moves_to_next_session() {
        let sentinel = ManualSentinel::new();
        assert!(!sentinel.set_visible(true));

        let first = FeedSession::mount(controller(6), sentinel.clone());
        first.unmount().await.unwrap();
        assert!(sentinel.is_disconnected());
        assert!(!sentinel.set_visible(true));

        let second = FeedSession::mount(controller(6), sentinel.clone());
        assert!(!sentinel.is_disconnected());
        let mut views = second.subscribe();
        assert!(sentinel.set_visible(true));
        assert!(next_view(&mut views).await.state.is_loading);

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(second.view().state.page, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_old_session_does_not_silence_new_one() {
        let sentinel = ManualSentinel::new();
        let old = FeedSession::mount(controller(6), sentinel.clone());
        let new = FeedSession::mount(controller(6), sentinel.clone());

        old.unmount().await.unwrap();
        assert!(!sentinel.is_disconnected());

        let mut views = new.subscribe();
        assert!(sentinel.set_visible(true));
        assert!(next_view(&mut views).await.state.is_loading);

        new.unmount().await.unwrap();
        assert!(sentinel.is_disconnected());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replace_posts_keeps_query() {
        let session = FeedSession::mount(controller(2), ManualSentinel::new());
        let mut views = session.subscribe();

        session.set_query("entry");
        next_view(&mut views).await;

        let bigger = controller(9).index().posts().clone();
        session.replace_posts(bigger);
        let view = next_view(&mut views).await;
        assert_eq!(view.state.query, "entry");
        assert_eq!(view.status, FeedStatus::More { shown: 4, total: 9 });
    }
}
