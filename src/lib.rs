//! Terminal news reader that aggregates categorized top headlines.
//!
//! - [`news`]: category selection, per-category fetching, aggregation, and
//!   image resolution
//! - [`storage`] and [`preferences`]: the SQLite settings store and the
//!   config/DB layering over it
//! - [`app`] and `ui`: the ratatui front end

pub mod app;
pub mod config;
pub mod keybindings;
pub mod news;
pub mod preferences;
pub mod storage;
pub mod ui;
pub mod util;
