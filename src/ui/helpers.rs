//! Helper functions for UI operations.
//!
//! Background task spawning (refresh, image loads) and opening articles in
//! the system browser.

use crate::app::{App, AppEvent};
use crate::util::{caught, validate_url_for_open};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tokio::sync::mpsc;

/// Error message for articles without URLs
pub(super) const ERR_ARTICLE_NO_URL: &str = "Article has no URL";

/// Wraps a future to catch panics and convert them to errors.
///
/// Spawned tasks that panic would otherwise vanish inside the runtime; this
/// turns the panic payload into `Err(message)` so the task can report it
/// over the event channel.
pub(super) async fn catch_task_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(caught(future))
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic payload".to_string()
            }
        })
}

/// Spawn one aggregation refresh for the current selection.
///
/// The list switches to the loading placeholder unless a refresh is already
/// in flight. The pipeline itself rejects the overlapping refresh; the
/// rejected task reports `FeedLoaded(None)` and the UI keeps waiting for the
/// one already running.
pub(super) fn spawn_refresh(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    let selection = app.selection.clone();
    let pipeline = app.pipeline.clone();
    let tx = event_tx.clone();

    if !app.begin_refresh() {
        tracing::debug!("Refresh already in flight, keeping current list");
    }
    tracing::debug!(selection = %selection.describe(), "Spawning refresh task");

    tokio::spawn(async move {
        match catch_task_panic(pipeline.refresh(&selection)).await {
            Ok(feed) => {
                if let Err(e) = tx.send(AppEvent::FeedLoaded(feed)).await {
                    tracing::warn!(error = %e, "Failed to send refresh result (receiver dropped)");
                }
            }
            Err(panic_msg) => {
                tracing::error!(task = "refresh", error = %panic_msg, "Refresh task panicked");
                let _ = tx
                    .send(AppEvent::TaskPanicked {
                        task: "refresh",
                        error: panic_msg,
                    })
                    .await;
            }
        }
    });
}

/// Spawn one image load per card of the current generation.
///
/// Each load runs under its card's cancellation token; a cancelled load
/// sends nothing.
pub(super) fn spawn_image_loads(app: &App, event_tx: &mpsc::Sender<AppEvent>) {
    let generation = app.card_generation;

    for (index, card) in app.cards.iter().enumerate() {
        let resolver = app.images.clone();
        let image_url = card.article.image_url.clone();
        let cancel = card.cancel.clone();
        let tx = event_tx.clone();

        tokio::spawn(async move {
            match catch_task_panic(resolver.resolve(image_url.as_deref(), &cancel)).await {
                Ok(Some(image)) => {
                    let _ = tx
                        .send(AppEvent::ImageResolved {
                            generation,
                            index,
                            image,
                        })
                        .await;
                }
                Ok(None) => {
                    tracing::debug!(generation, index, "Image load cancelled");
                }
                Err(panic_msg) => {
                    tracing::error!(task = "image", error = %panic_msg, "Image task panicked");
                    let _ = tx
                        .send(AppEvent::TaskPanicked {
                            task: "image",
                            error: panic_msg,
                        })
                        .await;
                }
            }
        });
    }

    tracing::debug!(generation, cards = app.cards.len(), "Spawned image loads");
}

/// Open the selected article in the system browser.
pub(super) fn open_selected_article(app: &mut App) {
    let Some(link) = app.selected_article().map(|a| a.url.clone()) else {
        return;
    };
    if link.is_empty() {
        app.set_status(ERR_ARTICLE_NO_URL);
        return;
    }

    // Validate before open::that() so nothing but http(s) reaches the OS
    match validate_url_for_open(&link) {
        Err(e) => {
            tracing::warn!(url = %link, error = %e, "Refusing to open article link");
            app.set_status(format!("Cannot open link: {}", e));
        }
        Ok(url) => {
            if let Err(e) = open::that(url.as_str()) {
                app.set_status(format!("Failed to open browser: {}", e));
            } else {
                tracing::info!(url = %url, "Opened article in browser");
                app.set_status("Opened in browser");
            }
        }
    }
}
