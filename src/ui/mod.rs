//! Terminal User Interface module.
//!
//! - `loop_runner` - Main event loop and terminal management
//! - `input` - Keyboard input handling
//! - `events` - Background task event processing
//! - `render` - Header, view dispatch, and status bar
//! - `helpers` - Task spawning and browser launch
//! - `articles` - Headline cards
//! - `settings` - Category checkboxes
//! - `status` - Status bar widget

mod articles;
mod events;
mod helpers;
mod input;
mod loop_runner;
mod render;
mod settings;
mod status;

pub use loop_runner::{run, Action};
