use crate::news::category::CategorySelection;
use crate::news::fetcher::HeadlineFetcher;
use crate::news::types::{Article, Feed};
use futures::future::join_all;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Whether a refresh is currently in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshState {
    Idle,
    Fetching,
}

/// Turns a category selection into one merged, newest-first feed.
///
/// Cloning is cheap and clones share the in-flight state, so a clone handed
/// to a background task still blocks a second refresh from the UI.
#[derive(Clone)]
pub struct AggregationPipeline {
    fetcher: HeadlineFetcher,
    state: Arc<Mutex<RefreshState>>,
}

/// Returns the pipeline to `Idle` when the refresh completes, panics, or is dropped.
struct RefreshGuard {
    state: Arc<Mutex<RefreshState>>,
}

impl Drop for RefreshGuard {
    fn drop(&mut self) {
        *lock_state(&self.state) = RefreshState::Idle;
    }
}

fn lock_state(state: &Mutex<RefreshState>) -> MutexGuard<'_, RefreshState> {
    // A panic while holding this lock cannot leave a half-written enum behind
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl AggregationPipeline {
    pub fn new(fetcher: HeadlineFetcher) -> Self {
        Self {
            fetcher,
            state: Arc::new(Mutex::new(RefreshState::Idle)),
        }
    }

    pub fn state(&self) -> RefreshState {
        *lock_state(&self.state)
    }

    /// Run one refresh cycle.
    ///
    /// Returns `None` without doing any I/O when another refresh is still in
    /// flight; requests are dropped, not queued. Otherwise every resolved
    /// category is fetched concurrently and the results are merged only after
    /// all of them complete.
    pub async fn refresh(&self, selection: &CategorySelection) -> Option<Feed> {
        let _guard = self.try_begin()?;

        let categories = selection.resolve();
        if categories.is_empty() {
            tracing::info!(
                selection = ?selection.to_stored(),
                "Selection resolved to no known categories"
            );
            return Some(Feed::NothingSelected);
        }

        tracing::debug!(
            categories = ?categories.iter().map(|c| c.id).collect::<Vec<_>>(),
            "Refreshing headlines"
        );

        let results = join_all(categories.iter().map(|c| self.fetcher.fetch(c))).await;
        let articles = merge(results);

        tracing::info!(articles = articles.len(), "Refresh complete");
        Some(Feed::Articles(articles))
    }

    fn try_begin(&self) -> Option<RefreshGuard> {
        let mut state = lock_state(&self.state);
        if *state == RefreshState::Fetching {
            tracing::debug!("Refresh already in flight, dropping request");
            return None;
        }
        *state = RefreshState::Fetching;
        Some(RefreshGuard {
            state: Arc::clone(&self.state),
        })
    }
}

/// Flatten per-category results, drop repeated URLs, and sort newest first.
///
/// The first occurrence of a URL wins. The sort is stable, so articles with
/// equal timestamps keep their category order; missing timestamps sort last.
pub fn merge(results: Vec<Vec<Article>>) -> Vec<Article> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut articles: Vec<Article> = results
        .into_iter()
        .flatten()
        .filter(|a| a.url.is_empty() || seen.insert(a.url.clone()))
        .collect();
    articles.sort_by_key(|a| std::cmp::Reverse(a.timestamp()));
    articles
}
