use crate::news::category::Category;
use crate::news::http::{read_limited_bytes, BodyError, USER_AGENT};
use crate::news::types::{Article, HeadlinesResponse, WireArticle};
use thiserror::Error;

const MAX_HEADLINES_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Placeholder replaced by the category id in a source URL template.
pub const CATEGORY_PLACEHOLDER: &str = "{category}";

/// Errors that can occur while fetching one category.
///
/// None of these leave [`HeadlineFetcher::fetch`]: they are logged and the
/// category contributes no articles.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, timeout)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Any status other than 200
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Body could not be read in full or exceeded the size limit
    #[error("Body error: {0}")]
    Body(#[from] BodyError),
    /// Body was not the expected JSON document
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Fetches the headline list of a single category.
#[derive(Clone)]
pub struct HeadlineFetcher {
    client: reqwest::Client,
    url_template: String,
}

impl HeadlineFetcher {
    /// `source` is either a URL template containing `{category}` or a base
    /// URL, which is read as `<base>/{category}.json`.
    pub fn new(client: reqwest::Client, source: impl Into<String>) -> Self {
        let source = source.into();
        let url_template = if source.contains(CATEGORY_PLACEHOLDER) {
            source
        } else {
            format!(
                "{}/{}.json",
                source.trim_end_matches('/'),
                CATEGORY_PLACEHOLDER
            )
        };
        Self {
            client,
            url_template,
        }
    }

    pub fn endpoint(&self, category: &Category) -> String {
        self.url_template.replace(CATEGORY_PLACEHOLDER, category.id)
    }

    /// Fetch one category. Never fails: any error is logged and yields an
    /// empty list, so one broken category cannot abort an aggregation.
    pub async fn fetch(&self, category: &Category) -> Vec<Article> {
        let url = self.endpoint(category);
        match self.try_fetch(category, &url).await {
            Ok(articles) => {
                tracing::debug!(
                    category = %category.id,
                    count = articles.len(),
                    "Fetched headlines"
                );
                articles
            }
            Err(e) => {
                tracing::warn!(
                    category = %category.id,
                    url = %url,
                    error = %e,
                    "Headline fetch failed, treating category as empty"
                );
                Vec::new()
            }
        }
    }

    async fn try_fetch(&self, category: &Category, url: &str) -> Result<Vec<Article>, FetchError> {
        let response = self
            .client
            .get(url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Err(FetchError::HttpStatus(response.status().as_u16()));
        }

        let bytes = read_limited_bytes(response, MAX_HEADLINES_SIZE).await?;
        let body: HeadlinesResponse = serde_json::from_slice(&bytes)?;

        let entries = body.articles.unwrap_or_default();
        let mut articles = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            match serde_json::from_value::<WireArticle>(entry) {
                Ok(wire) => articles.push(Article::from(wire)),
                Err(e) => tracing::warn!(
                    category = %category.id,
                    index,
                    error = %e,
                    "Skipping malformed article entry"
                ),
            }
        }
        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::category::find_category;
    use crate::news::http::build_client;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TWO_ARTICLES: &str = r#"{
        "status": "ok",
        "articles": [
            {"title": "First", "url": "https://example.com/1", "publishedAt": "2024-01-01T00:00:00Z", "source": {"name": "A"}},
            {"title": "Second", "url": "https://example.com/2", "publishedAt": "2024-01-02T00:00:00Z", "source": {"name": "B"}}
        ]
    }"#;

    fn technology() -> &'static Category {
        find_category("technology").unwrap()
    }

    fn fetcher(server: &MockServer) -> HeadlineFetcher {
        HeadlineFetcher::new(build_client(None).unwrap(), server.uri())
    }

    #[test]
    fn test_endpoint_template() {
        let fetcher = HeadlineFetcher::new(reqwest::Client::new(), "https://news.example.com/data/");
        assert_eq!(
            fetcher.endpoint(technology()),
            "https://news.example.com/data/technology.json"
        );
    }

    #[tokio::test]
    async fn test_fetch_success_sends_user_agent() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/technology.json"))
            .and(header("user-agent", USER_AGENT))
            .respond_with(ResponseTemplate::new(200).set_body_string(TWO_ARTICLES))
            .expect(1)
            .mount(&mock_server)
            .await;

        let articles = fetcher(&mock_server).fetch(technology()).await;
        assert_eq!(articles.len(), 2);
        assert_eq!(articles[0].title, "First");
        assert_eq!(articles[1].source_name.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn test_fetch_404_is_empty() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let articles = fetcher(&mock_server).fetch(technology()).await;
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_non_200_success_is_empty() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let articles = fetcher(&mock_server).fetch(technology()).await;
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_malformed_json_is_empty() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
            .mount(&mock_server)
            .await;

        let articles = fetcher(&mock_server).fetch(technology()).await;
        assert!(articles.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_missing_articles_field_is_empty() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status":"ok"}"#))
            .mount(&mock_server)
            .await;

        let articles = fetcher(&mock_server).fetch(technology()).await;
        assert!(articles.is_empty());
    }

    #[test]
    fn test_endpoint_from_template() {
        let fetcher = HeadlineFetcher::new(
            reqwest::Client::new(),
            "https://news.example.com/category/{category}/us.json",
        );
        assert_eq!(
            fetcher.endpoint(technology()),
            "https://news.example.com/category/technology/us.json"
        );
    }

    #[tokio::test]
    async fn test_fetch_skips_malformed_entries() {
        let mock_server = MockServer::start().await;
        let body = r#"{
            "articles": [
                {"title": "First", "url": "https://example.com/1"},
                {"title": 42, "url": "https://example.com/bad"},
                {"title": "Second", "url": "https://example.com/2", "source": "not an object"},
                "junk",
                {"title": "Third", "url": "https://example.com/3"}
            ]
        }"#;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let articles = fetcher(&mock_server).fetch(technology()).await;
        let titles: Vec<&str> = articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Third"]);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_is_empty() {
        // Nothing listens on port 9 (discard) on a test host
        let fetcher = HeadlineFetcher::new(build_client(None).unwrap(), "http://127.0.0.1:9");
        let articles = fetcher.fetch(technology()).await;
        assert!(articles.is_empty());
    }
}
