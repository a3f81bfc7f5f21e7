//! Text and link helpers shared by the terminal front end.
//!
//! - **Text**: card truncation, column-aware truncation, and stripping of
//!   terminal escape sequences from text that arrived over the network
//! - **Links**: validation of article URLs before they reach the browser
//! - **Panics**: the marker that tells the panic hook a panic will be caught
//!
//! ```
//! use headlines::util::{truncate_chars, validate_url_for_open};
//!
//! let title = "x".repeat(120);
//! assert_eq!(truncate_chars(&title, 100).chars().count(), 103);
//! assert!(validate_url_for_open("https://example.com/story").is_ok());
//! ```

mod panic_marker;
mod text;
mod url_validator;

pub use panic_marker::{caught, caught_sync, panic_is_caught};
pub use text::{
    display_width, sanitize_line, strip_control_chars, truncate_chars, truncate_to_width,
};
pub use url_validator::{validate_url_for_open, UrlValidationError};
