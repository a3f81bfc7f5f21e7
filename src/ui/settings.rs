use crate::app::App;
use crate::news::{CategorySelection, CATEGORIES};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

/// Checkbox rows for the category table, in table order.
pub fn checkbox_rows(selection: &CategorySelection) -> Vec<(bool, &'static str)> {
    CATEGORIES
        .iter()
        .map(|c| (selection.checkbox_state(c.id), c.display_name))
        .collect()
}

/// Render the "Select Categories" checkbox list.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let style_selected = Style::default().bg(Color::DarkGray).fg(Color::White);
    let style_checked = Style::default().add_modifier(Modifier::BOLD);

    let items: Vec<ListItem> = checkbox_rows(&app.selection)
        .into_iter()
        .enumerate()
        .map(|(i, (checked, name))| {
            let mark = if checked { "[x] " } else { "[ ] " };
            let style = if i == app.settings_cursor {
                style_selected
            } else if checked {
                style_checked
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, style),
                Span::styled(name, style),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title("Select Categories"),
    );

    let mut state = ListState::default().with_selected(Some(app.settings_cursor));
    f.render_stateful_widget(list, area, &mut state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selection_shows_no_checks() {
        let rows = checkbox_rows(&CategorySelection::general());
        assert_eq!(rows.len(), CATEGORIES.len());
        assert!(rows.iter().all(|(checked, _)| !checked));
        assert_eq!(rows[0].1, "All Categories");
    }

    #[test]
    fn test_all_concrete_checks_everything() {
        let rows = checkbox_rows(&CategorySelection::all_concrete());
        assert!(rows.iter().all(|(checked, _)| *checked));
    }

    #[test]
    fn test_partial_selection() {
        let rows = checkbox_rows(&CategorySelection::from_stored(["science", "sports"]));
        let checked: Vec<&str> = rows
            .iter()
            .filter(|(checked, _)| *checked)
            .map(|(_, name)| *name)
            .collect();
        assert_eq!(checked, vec!["Science", "Sports"]);
    }
}
