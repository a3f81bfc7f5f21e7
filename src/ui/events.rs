//! Application event handling.
//!
//! Applies refresh and image results from background tasks to the app state.

use crate::app::{App, AppEvent};
use tokio::sync::mpsc;

use super::helpers::spawn_image_loads;

/// Handle application events from background tasks.
pub(super) async fn handle_app_event(
    app: &mut App,
    event: AppEvent,
    event_tx: &mpsc::Sender<AppEvent>,
) {
    match event {
        AppEvent::FeedLoaded(Some(feed)) => {
            app.refreshing = false;
            app.replace_feed(feed);
            spawn_image_loads(app, event_tx);
        }
        AppEvent::FeedLoaded(None) => {
            // The refresh already in flight will report on its own
            app.set_status("Refresh already in progress");
        }
        AppEvent::ImageResolved {
            generation,
            index,
            image,
        } => {
            if !app.apply_image(generation, index, image) {
                tracing::debug!(generation, index, "Dropped stale image result");
            }
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error = %error, "Background task panicked");
            if task == "refresh" {
                app.refreshing = false;
                app.fail_feed(error);
            } else {
                app.set_status(format!("Internal error in {} task", task));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::FeedState;
    use crate::config::Config;
    use crate::news::{
        build_client, AggregationPipeline, Article, DisplayBox, Feed, HeadlineFetcher,
        ImageHandle, ImageResolver,
    };
    use crate::preferences::PreferenceManager;
    use crate::storage::Database;

    async fn test_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        let prefs = PreferenceManager::load(&Config::default(), &db).await.unwrap();
        let client = build_client(None).unwrap();
        let pipeline =
            AggregationPipeline::new(HeadlineFetcher::new(client.clone(), "http://127.0.0.1:9"));
        let images = ImageResolver::new(client, DisplayBox::default(), None);
        App::new(db, prefs, pipeline, images)
    }

    fn article(title: &str) -> Article {
        Article {
            title: title.to_string(),
            description: None,
            url: format!("https://example.com/{title}"),
            image_url: None,
            published_at: None,
            source_name: None,
        }
    }

    #[tokio::test]
    async fn test_feed_loaded_replaces_cards_and_loads_default_images() {
        let mut app = test_app().await;
        let (tx, mut rx) = mpsc::channel(8);
        app.refreshing = true;

        handle_app_event(
            &mut app,
            AppEvent::FeedLoaded(Some(Feed::Articles(vec![article("a")]))),
            &tx,
        )
        .await;

        assert!(!app.refreshing);
        assert_eq!(app.feed_state, FeedState::Articles);

        // No image URL: the default image resolves without network I/O
        let Some(event) = rx.recv().await else {
            panic!("expected an image event");
        };
        handle_app_event(&mut app, event, &tx).await;
        assert!(matches!(app.cards[0].image, Some(ImageHandle::Default(_))));
    }

    #[tokio::test]
    async fn test_dropped_refresh_keeps_waiting() {
        let mut app = test_app().await;
        let (tx, _rx) = mpsc::channel(8);
        app.refreshing = true;

        handle_app_event(&mut app, AppEvent::FeedLoaded(None), &tx).await;

        assert!(app.refreshing);
        assert_eq!(app.feed_state, FeedState::Loading);
        assert!(app.status_message.is_some());
    }

    #[tokio::test]
    async fn test_refresh_panic_renders_error_row() {
        let mut app = test_app().await;
        let (tx, _rx) = mpsc::channel(8);
        app.refreshing = true;

        handle_app_event(
            &mut app,
            AppEvent::TaskPanicked {
                task: "refresh",
                error: "index out of bounds".to_string(),
            },
            &tx,
        )
        .await;

        assert!(!app.refreshing);
        assert_eq!(
            app.feed_state,
            FeedState::Error("index out of bounds".to_string())
        );
    }

    #[tokio::test]
    async fn test_stale_image_is_dropped() {
        let mut app = test_app().await;
        let (tx, _rx) = mpsc::channel(8);
        app.replace_feed(Feed::Articles(vec![article("a")]));
        let stale = app.card_generation;
        app.replace_feed(Feed::Articles(vec![article("b")]));

        handle_app_event(
            &mut app,
            AppEvent::ImageResolved {
                generation: stale,
                index: 0,
                image: ImageHandle::Placeholder,
            },
            &tx,
        )
        .await;

        assert_eq!(app.cards[0].image, None);
    }
}
