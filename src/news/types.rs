use chrono::{DateTime, Utc};
use serde::Deserialize;

// ============================================================================
// Wire Types
// ============================================================================

/// Body of one category's headline document.
///
/// Every field is optional on the wire; a missing `articles` array is the
/// same as an empty one. Entries stay untyped here so one malformed entry
/// can be skipped without losing the rest.
#[derive(Debug, Deserialize)]
pub(crate) struct HeadlinesResponse {
    #[serde(default)]
    pub articles: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct WireArticle {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub url_to_image: Option<String>,
    pub published_at: Option<String>,
    pub source: Option<WireSource>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct WireSource {
    pub name: Option<String>,
}

// ============================================================================
// Article
// ============================================================================

/// A single headline as fetched for the current session.
///
/// Never persisted: the whole list is dropped and rebuilt on every refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub image_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub source_name: Option<String>,
}

impl Article {
    /// Sort key in seconds. Missing or unparseable timestamps count as the epoch.
    pub fn timestamp(&self) -> i64 {
        self.published_at.map(|dt| dt.timestamp()).unwrap_or(0)
    }
}

impl From<WireArticle> for Article {
    fn from(wire: WireArticle) -> Self {
        let published_at = wire.published_at.as_deref().and_then(parse_timestamp);
        Self {
            title: wire.title.unwrap_or_default(),
            description: non_empty(wire.description),
            url: wire.url.unwrap_or_default(),
            image_url: non_empty(wire.url_to_image),
            published_at,
            source_name: non_empty(wire.source.and_then(|s| s.name)),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Parse an ISO-8601 timestamp. Accepts RFC 3339 and the offset-less
/// `YYYY-MM-DDTHH:MM:SS` form some sources emit (read as UTC).
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

// ============================================================================
// Feed
// ============================================================================

/// Outcome of one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Feed {
    /// The selection resolved to zero known categories.
    NothingSelected,
    /// Articles newest first. Empty means every category came back empty.
    Articles(Vec<Article>),
}

impl Feed {
    pub fn articles(&self) -> &[Article] {
        match self {
            Feed::NothingSelected => &[],
            Feed::Articles(articles) => articles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_article_full() {
        let json = r#"{
            "title": "Rust 2.0 released",
            "description": "Big news",
            "url": "https://example.com/rust",
            "urlToImage": "https://example.com/rust.png",
            "publishedAt": "2024-05-01T12:30:00Z",
            "source": { "id": null, "name": "Example News" }
        }"#;
        let wire: WireArticle = serde_json::from_str(json).unwrap();
        let article = Article::from(wire);

        assert_eq!(article.title, "Rust 2.0 released");
        assert_eq!(article.description.as_deref(), Some("Big news"));
        assert_eq!(article.url, "https://example.com/rust");
        assert_eq!(
            article.image_url.as_deref(),
            Some("https://example.com/rust.png")
        );
        assert_eq!(article.source_name.as_deref(), Some("Example News"));
        assert_eq!(article.timestamp(), 1_714_566_600);
    }

    #[test]
    fn test_wire_article_nulls_and_blanks() {
        let json = r#"{
            "title": null,
            "description": "",
            "url": "https://example.com/a",
            "urlToImage": "  ",
            "publishedAt": null,
            "source": null
        }"#;
        let wire: WireArticle = serde_json::from_str(json).unwrap();
        let article = Article::from(wire);

        assert_eq!(article.title, "");
        assert!(article.description.is_none());
        assert!(article.image_url.is_none());
        assert!(article.source_name.is_none());
        assert_eq!(article.timestamp(), 0);
    }

    #[test]
    fn test_unparseable_timestamp_is_epoch() {
        let wire = WireArticle {
            published_at: Some("yesterday".to_string()),
            ..Default::default()
        };
        assert_eq!(Article::from(wire).timestamp(), 0);
    }

    #[test]
    fn test_offsetless_timestamp_read_as_utc() {
        let wire = WireArticle {
            published_at: Some("2024-05-01T12:30:00".to_string()),
            ..Default::default()
        };
        assert_eq!(Article::from(wire).timestamp(), 1_714_566_600);
    }

    #[test]
    fn test_response_missing_articles_field() {
        let response: HeadlinesResponse = serde_json::from_str(r#"{"status":"ok"}"#).unwrap();
        assert!(response.articles.is_none());

        let response: HeadlinesResponse = serde_json::from_str(r#"{"articles":null}"#).unwrap();
        assert!(response.articles.is_none());
    }

    #[test]
    fn test_response_keeps_malformed_entries_undecoded() {
        let response: HeadlinesResponse =
            serde_json::from_str(r#"{"articles":[{"title":"ok"},{"title":42},"junk"]}"#).unwrap();
        let entries = response.articles.unwrap();
        assert_eq!(entries.len(), 3);

        let decoded: Vec<_> = entries
            .into_iter()
            .filter_map(|v| serde_json::from_value::<WireArticle>(v).ok())
            .collect();
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].title.as_deref(), Some("ok"));
    }

    #[test]
    fn test_nothing_selected_has_no_articles() {
        assert!(Feed::NothingSelected.articles().is_empty());
        assert_ne!(Feed::NothingSelected, Feed::Articles(Vec::new()));
    }
}
