use crate::app::{App, View};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 1 || area.height < 1 {
        return;
    }

    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(msg.as_ref())
    } else if app.refreshing {
        Cow::Borrowed("Refreshing...")
    } else {
        match app.view {
            View::News => Cow::Borrowed("[r]efresh [s]ettings [j/k]move [o/Enter]open [q]uit"),
            View::Settings => {
                Cow::Borrowed("[Space/Enter]toggle [j/k]move [s/Esc]back to news [q]uit")
            }
        }
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    f.render_widget(Paragraph::new(text).style(style), area);
}
