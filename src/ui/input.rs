//! Input handling for the TUI.
//!
//! Resolves key presses through the keybinding registry and dispatches on
//! the current view.

use crate::app::{App, AppEvent, View};
use crate::keybindings::{Action as KbAction, Context as KbContext};
use anyhow::Result;
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::helpers::{open_selected_article, spawn_refresh};
use super::Action;

fn view_to_context(view: View) -> KbContext {
    match view {
        View::News => KbContext::News,
        View::Settings => KbContext::Settings,
    }
}

/// Main input dispatch function.
pub(super) async fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Result<Action> {
    let context = view_to_context(app.view);
    let Some(action) = app.keybindings.action_for_key(code, modifiers, context) else {
        return Ok(Action::Continue);
    };

    match action {
        KbAction::Quit => return Ok(Action::Quit),
        KbAction::NavDown => app.nav_down(),
        KbAction::NavUp => app.nav_up(),
        KbAction::Refresh => spawn_refresh(app, event_tx),
        KbAction::ToggleSettings => toggle_settings(app, event_tx),
        KbAction::OpenInBrowser => open_selected_article(app),
        KbAction::ToggleCategory => {
            let selection = app.toggle_category_at_cursor().await?;
            app.set_status(format!("Showing: {}", selection.describe()));
        }
    }

    Ok(Action::Continue)
}

/// Switch between the news and settings views.
///
/// Leaving settings refreshes so the card list matches the new selection.
fn toggle_settings(app: &mut App, event_tx: &mpsc::Sender<AppEvent>) {
    match app.view {
        View::News => {
            app.view = View::Settings;
        }
        View::Settings => {
            app.view = View::News;
            spawn_refresh(app, event_tx);
        }
    }
}
