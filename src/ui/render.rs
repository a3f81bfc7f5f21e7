//! Render functions for the TUI.
//!
//! Header, the active view, and the status bar, top to bottom.

use crate::app::{App, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};

use super::{articles, settings, status};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 8;

/// Main render dispatch function.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    let header = match app.view {
        View::News => "Top Headlines",
        View::Settings => "Settings",
    };
    f.render_widget(
        Paragraph::new(header)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        chunks[0],
    );

    match app.view {
        View::News => articles::render(f, app, chunks[1]),
        View::Settings => settings::render(f, app, chunks[1]),
    }

    status::render(f, app, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::news::{
        build_client, AggregationPipeline, Article, DisplayBox, Feed, HeadlineFetcher,
        ImageResolver,
    };
    use crate::preferences::PreferenceManager;
    use crate::storage::Database;
    use ratatui::{backend::TestBackend, Terminal};

    async fn test_app() -> App {
        let db = Database::open(":memory:").await.unwrap();
        let prefs = PreferenceManager::load(&Config::default(), &db).await.unwrap();
        let client = build_client(None).unwrap();
        let pipeline =
            AggregationPipeline::new(HeadlineFetcher::new(client.clone(), "http://127.0.0.1:9"));
        let images = ImageResolver::new(client, DisplayBox::default(), None);
        App::new(db, prefs, pipeline, images)
    }

    fn screen(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(80, 24)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_loading_placeholder() {
        let app = test_app().await;
        let text = screen(&app);
        assert!(text.contains("Top Headlines"));
        assert!(text.contains("Loading..."));
    }

    #[tokio::test]
    async fn test_empty_and_nothing_selected_messages() {
        let mut app = test_app().await;

        app.replace_feed(Feed::NothingSelected);
        assert!(screen(&app).contains("No categories selected. Please check settings."));

        app.replace_feed(Feed::Articles(Vec::new()));
        assert!(screen(&app).contains("No news found from selected categories"));
    }

    #[tokio::test]
    async fn test_error_row() {
        let mut app = test_app().await;
        app.fail_feed("task crashed");
        assert!(screen(&app).contains("Error: task crashed"));
    }

    #[tokio::test]
    async fn test_cards_render() {
        let mut app = test_app().await;
        app.replace_feed(Feed::Articles(vec![Article {
            title: "Launch window opens".to_string(),
            description: None,
            url: "https://example.com/launch".to_string(),
            image_url: None,
            published_at: None,
            source_name: Some("Orbit Daily".to_string()),
        }]));

        let text = screen(&app);
        assert!(text.contains("Launch window opens"));
        assert!(text.contains("Orbit Daily"));
        assert!(text.contains("No description"));
        assert!(text.contains("[image loading]"));
    }

    #[tokio::test]
    async fn test_settings_view() {
        let mut app = test_app().await;
        app.view = View::Settings;
        let text = screen(&app);
        assert!(text.contains("Settings"));
        assert!(text.contains("Select Categories"));
        assert!(text.contains("[ ] All Categories"));
        assert!(text.contains("[ ] Technology"));
    }

    #[tokio::test]
    async fn test_too_small() {
        let app = test_app().await;
        let mut terminal = Terminal::new(TestBackend::new(10, 2)).unwrap();
        terminal.draw(|f| render(f, &app)).unwrap();
        let buffer = terminal.backend().buffer();
        let first_row: String = buffer.content()[..9]
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert_eq!(first_row, "Too small");
    }
}
