use crate::keybindings::KeybindingRegistry;
use crate::news::{
    AggregationPipeline, Article, CategorySelection, Feed, ImageHandle, ImageResolver,
    RefreshState, CATEGORIES,
};
use crate::preferences::PreferenceManager;
use crate::storage::Database;
use anyhow::Result;
use std::borrow::Cow;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

// ============================================================================
// View and Feed State
// ============================================================================

/// Current view mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    News,     // Card list
    Settings, // Category checkboxes
}

/// What the news view has to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    /// No refresh has completed yet.
    Loading,
    /// The selection resolved to zero known categories.
    NothingSelected,
    /// Every selected category came back empty.
    Empty,
    /// `App::cards` holds at least one card.
    Articles,
    /// The refresh task died; the message is shown as an `Error:` row.
    Error(String),
}

/// One article plus the state of its image.
///
/// `image` stays `None` until the resolver reports back. The token is
/// cancelled when the card is replaced or the app quits.
pub struct Card {
    pub article: Article,
    pub image: Option<ImageHandle>,
    pub cancel: CancellationToken,
}

impl Card {
    fn new(article: Article) -> Self {
        Self {
            article,
            image: None,
            cancel: CancellationToken::new(),
        }
    }
}

/// Events from background tasks
pub enum AppEvent {
    /// A refresh finished. `None` means it was dropped because another
    /// refresh was still in flight.
    FeedLoaded(Option<Feed>),
    /// An image resolved for card `index` of card generation `generation`.
    ImageResolved {
        generation: u64,
        index: usize,
        image: ImageHandle,
    },
    /// A background task panicked.
    ///
    /// Fields:
    /// - `task`: Name of the task that panicked ("refresh", "image")
    /// - `error`: The panic message extracted from the panic payload
    TaskPanicked { task: &'static str, error: String },
}

// ============================================================================
// Application State
// ============================================================================

/// Central application state
pub struct App {
    pub db: Database,
    pub prefs: PreferenceManager,
    pub pipeline: AggregationPipeline,
    pub images: ImageResolver,
    pub keybindings: KeybindingRegistry,
    /// Category selection, read once from the settings store and kept in
    /// step with every successful write.
    pub selection: CategorySelection,

    // UI State
    pub view: View,
    pub feed_state: FeedState,
    pub cards: Vec<Card>,
    pub selected_card: usize,
    /// Row in the settings view, indexes `CATEGORIES`.
    pub settings_cursor: usize,

    /// Generation counter for the card list.
    ///
    /// Incremented every time the list is replaced. Image results carry the
    /// generation they were spawned for and are dropped when it no longer
    /// matches, so a slow image from the previous list never lands on a
    /// card of the new one.
    pub card_generation: u64,

    /// A refresh task has been spawned and has not reported back.
    pub refreshing: bool,
    /// When the last refresh was spawned, for the periodic timer.
    pub last_refresh: Option<Instant>,
    /// Periodic refresh interval; `None` = manual only.
    pub refresh_interval: Option<Duration>,

    pub status_message: Option<(Cow<'static, str>, Instant)>,

    /// Dirty flag to skip unnecessary frame renders
    pub needs_redraw: bool,
}

impl App {
    pub fn new(
        db: Database,
        prefs: PreferenceManager,
        pipeline: AggregationPipeline,
        images: ImageResolver,
    ) -> Self {
        let refresh_interval = prefs.refresh_interval();

        let selection = prefs.categories();

        Self {
            db,
            prefs,
            pipeline,
            images,
            keybindings: KeybindingRegistry::new(),
            selection,
            view: View::News,
            feed_state: FeedState::Loading,
            cards: Vec::new(),
            selected_card: 0,
            settings_cursor: 0,
            card_generation: 0,
            refreshing: false,
            last_refresh: None,
            refresh_interval,
            status_message: None,
            needs_redraw: true,
        }
    }

    /// Replace the whole card list with a freshly aggregated feed.
    ///
    /// Every outstanding image load of the old list is cancelled first.
    pub fn replace_feed(&mut self, feed: Feed) {
        self.cancel_cards();
        self.card_generation = self.card_generation.wrapping_add(1);
        self.selected_card = 0;

        match feed {
            Feed::NothingSelected => {
                self.cards = Vec::new();
                self.feed_state = FeedState::NothingSelected;
            }
            Feed::Articles(articles) if articles.is_empty() => {
                self.cards = Vec::new();
                self.feed_state = FeedState::Empty;
            }
            Feed::Articles(articles) => {
                self.cards = articles.into_iter().map(Card::new).collect();
                self.feed_state = FeedState::Articles;
            }
        }
    }

    /// Mark a refresh as started and swap the card list for the loading
    /// placeholder.
    ///
    /// Returns false and keeps the current list when the pipeline is already
    /// fetching; that refresh will replace the list when it lands.
    pub fn begin_refresh(&mut self) -> bool {
        self.refreshing = true;
        self.last_refresh = Some(Instant::now());

        if self.pipeline.state() == RefreshState::Fetching {
            return false;
        }

        self.cancel_cards();
        self.card_generation = self.card_generation.wrapping_add(1);
        self.cards = Vec::new();
        self.selected_card = 0;
        self.feed_state = FeedState::Loading;
        true
    }

    /// Show a refresh failure in place of the card list.
    pub fn fail_feed(&mut self, error: impl Into<String>) {
        self.cancel_cards();
        self.card_generation = self.card_generation.wrapping_add(1);
        self.cards = Vec::new();
        self.selected_card = 0;
        self.feed_state = FeedState::Error(error.into());
    }

    /// Attach a resolved image to its card.
    ///
    /// Returns false when the result is stale: the list was replaced since
    /// the load started, the index is out of range, or the card's token was
    /// cancelled.
    pub fn apply_image(&mut self, generation: u64, index: usize, image: ImageHandle) -> bool {
        if generation != self.card_generation {
            return false;
        }
        match self.cards.get_mut(index) {
            Some(card) if !card.cancel.is_cancelled() => {
                card.image = Some(image);
                true
            }
            _ => false,
        }
    }

    /// Cancel every card's image load.
    pub fn cancel_cards(&self) {
        for card in &self.cards {
            card.cancel.cancel();
        }
    }

    pub fn selected_article(&self) -> Option<&Article> {
        self.cards.get(self.selected_card).map(|card| &card.article)
    }

    /// Navigate up in the current list
    pub fn nav_up(&mut self) {
        match self.view {
            View::News => self.selected_card = self.selected_card.saturating_sub(1),
            View::Settings => self.settings_cursor = self.settings_cursor.saturating_sub(1),
        }
    }

    /// Navigate down in the current list
    pub fn nav_down(&mut self) {
        match self.view {
            View::News => {
                if !self.cards.is_empty() {
                    let max_index = self.cards.len().saturating_sub(1);
                    self.selected_card = self.selected_card.saturating_add(1).min(max_index);
                }
            }
            View::Settings => {
                let max_index = CATEGORIES.len().saturating_sub(1);
                self.settings_cursor = self.settings_cursor.saturating_add(1).min(max_index);
            }
        }
    }

    /// Toggle the category under the settings cursor and persist the result.
    ///
    /// The in-memory selection only changes once the DB write succeeded.
    pub async fn toggle_category_at_cursor(&mut self) -> Result<CategorySelection> {
        let Some(category) = CATEGORIES.get(self.settings_cursor) else {
            return Ok(self.selection.clone());
        };

        let next = self.selection.toggle(category.id);
        self.prefs.set_categories(&self.db, &next).await?;
        self.selection = next.clone();
        tracing::debug!(
            category = %category.id,
            selection = %next.describe(),
            "Category toggled"
        );
        Ok(next)
    }

    /// Whether the periodic timer says a refresh is due.
    pub fn refresh_due(&self) -> bool {
        match (self.refresh_interval, self.last_refresh) {
            (Some(interval), Some(last)) => last.elapsed() >= interval,
            _ => false,
        }
    }

    /// Set status message (will auto-expire after 3 seconds)
    pub fn set_status(&mut self, msg: impl Into<Cow<'static, str>>) {
        self.status_message = Some((msg.into(), Instant::now()));
    }

    /// Clear status message if expired (older than 3 seconds)
    /// Returns true if a message was actually cleared
    pub fn clear_expired_status(&mut self) -> bool {
        if let Some((_, time)) = &self.status_message {
            if time.elapsed() >= STATUS_TTL {
                self.status_message = None;
                return true;
            }
        }
        false
    }
}

// ============================================================================
// Resource Cleanup
// ============================================================================

/// Cancel outstanding image loads when the app goes away.
impl Drop for App {
    fn drop(&mut self) {
        self.cancel_cards();
        tracing::debug!(cards = self.cards.len(), "Cancelled card image loads on App drop");
    }
}
