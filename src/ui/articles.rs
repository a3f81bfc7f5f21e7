use crate::app::{App, Card, FeedState};
use crate::news::{Article, ImageHandle};
use crate::util::{sanitize_line, truncate_chars, truncate_to_width};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

/// Card titles are cut to this many characters before layout.
const MAX_TITLE_CHARS: usize = 100;
const MAX_DESCRIPTION_CHARS: usize = 200;

pub(super) const MSG_LOADING: &str = "Loading...";
pub(super) const MSG_NOTHING_SELECTED: &str = "No categories selected. Please check settings.";
pub(super) const MSG_NO_NEWS: &str = "No news found from selected categories";

/// Card title: sanitized, "No Title" when missing, cut to 100 characters.
pub fn card_title(article: &Article) -> String {
    let title = sanitize_line(&article.title);
    if title.is_empty() {
        return "No Title".to_string();
    }
    truncate_chars(&title, MAX_TITLE_CHARS).into_owned()
}

/// `YYYY-MM-DD • Publisher`, with "Unknown" for a missing publisher.
pub fn meta_line(article: &Article) -> String {
    let publisher = article
        .source_name
        .as_deref()
        .map(sanitize_line)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    match article.published_at {
        Some(dt) => format!("{} • {}", dt.format("%Y-%m-%d"), publisher),
        None => publisher,
    }
}

pub fn description_line(article: &Article) -> String {
    let description = article
        .description
        .as_deref()
        .map(sanitize_line)
        .unwrap_or_default();
    if description.is_empty() {
        return "No description".to_string();
    }
    truncate_chars(&description, MAX_DESCRIPTION_CHARS).into_owned()
}

/// Text shown in a card's image cell.
pub fn image_label(image: Option<&ImageHandle>) -> String {
    match image {
        None => "[image loading]".to_string(),
        Some(ImageHandle::Thumbnail(t)) => format!("[image {}x{}]", t.width, t.height),
        Some(ImageHandle::Default(_)) => "[default image]".to_string(),
        Some(ImageHandle::Placeholder) => "[no image]".to_string(),
    }
}

fn card_item(card: &Card, selected: bool, width: usize) -> ListItem<'static> {
    let title_style = if selected {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let dim = Style::default().fg(Color::DarkGray);

    let title = card_title(&card.article);
    let meta = meta_line(&card.article);
    let image = image_label(card.image.as_ref());
    let meta_width = width.saturating_sub(image.chars().count() + 2);
    let description = description_line(&card.article);

    ListItem::new(vec![
        Line::from(Span::styled(
            truncate_to_width(&title, width).into_owned(),
            title_style,
        )),
        Line::from(vec![
            Span::styled(truncate_to_width(&meta, meta_width).into_owned(), dim),
            Span::raw("  "),
            Span::styled(image, Style::default().fg(Color::Blue)),
        ]),
        Line::from(truncate_to_width(&description, width).into_owned()),
        Line::from(""),
    ])
}

/// Render the card list, or the message that stands in for it.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let title = format!("Top Headlines - {}", app.selection.describe());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(title);

    let message = match &app.feed_state {
        FeedState::Loading => Some(MSG_LOADING.to_string()),
        FeedState::NothingSelected => Some(MSG_NOTHING_SELECTED.to_string()),
        FeedState::Empty => Some(MSG_NO_NEWS.to_string()),
        FeedState::Error(e) => Some(format!("Error: {}", sanitize_line(e))),
        FeedState::Articles => None,
    };

    if let Some(message) = message {
        let style = if matches!(app.feed_state, FeedState::Error(_)) {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Gray)
        };
        f.render_widget(Paragraph::new(message).style(style).block(block), area);
        return;
    }

    let width = area.width.saturating_sub(2) as usize;
    let items: Vec<ListItem> = app
        .cards
        .iter()
        .enumerate()
        .map(|(i, card)| card_item(card, i == app.selected_card, width))
        .collect();

    let list = List::new(items).block(block);
    let mut state = ListState::default().with_selected(Some(app.selected_card));
    f.render_stateful_widget(list, area, &mut state);
}
