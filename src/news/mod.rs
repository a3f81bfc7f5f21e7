//! News aggregation core.
//!
//! Everything here is independent of the terminal UI:
//!
//! - [`category`] - Category table and the tri-state selection rules
//! - [`fetcher`] - One HTTP request per category, failures folded into empty lists
//! - [`pipeline`] - Concurrent fetch, merge, and newest-first ordering
//! - [`image`] - Thumbnail fetch, validation, scaling, and default-image fallback
//!
//! # Example
//!
//! ```ignore
//! use headlines::news::{AggregationPipeline, CategorySelection, HeadlineFetcher};
//!
//! let fetcher = HeadlineFetcher::new(client, "https://news.example.com/data");
//! let pipeline = AggregationPipeline::new(fetcher);
//! let selection = CategorySelection::from_stored(["technology", "business"]);
//!
//! if let Some(feed) = pipeline.refresh(&selection).await {
//!     for article in feed.articles() {
//!         println!("{}", article.title);
//!     }
//! }
//! ```

pub mod category;
mod fetcher;
mod http;
pub mod image;
mod pipeline;
mod types;

pub use category::{Category, CategorySelection, CATEGORIES, GENERAL};
pub use fetcher::{FetchError, HeadlineFetcher, CATEGORY_PLACEHOLDER};
pub use http::{build_client, USER_AGENT};
pub use self::image::{DisplayBox, ImageHandle, ImageResolver, Thumbnail};
pub use pipeline::{merge, AggregationPipeline, RefreshState};
pub use types::{Article, Feed};
