//! # GitHub ([https://docs.github.com/en/rest/search](https://docs.github.com/en/rest/search))
//!
//! Search for issues and pull requests through the GitHub REST API.
//!
//!  - [api_response]: Format of the `search/issues` endpoint responses.
//!  - [queries]: Query builders for the searches we run regularly ("everything a user was involved in lately").
//!  - [progress]: Progress bar decoration for any [crate::search::SearchApi].
//!
//! [GithubSearchClient] only fetches single pages. Paging, bounds and deduplication are handled by
//! [crate::search::search].

pub mod api_response;
pub mod progress;
pub mod queries;

use async_trait::async_trait;
use serde::Deserialize;

use crate::{
    config::Config,
    search::{PageRequest, PageResponse, SearchApi},
};

use api_response::{IssueSearchItem, IssueSearchResponse};

pub const SEARCH_ISSUES_PATH: &str = "/search/issues";

#[derive(thiserror::Error, Debug)]
pub enum GithubApiError {
    #[error("Reqwest HTTP Error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("GitHub API returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },
    #[error("Failed to deserialize GitHub response:\n{0}")]
    Deserialization(#[from] serde_json::Error),
}

impl GithubApiError {
    /// GitHub reports exhausted rate limits as 403 or 429
    pub fn is_rate_limit(&self) -> bool {
        matches!(
            self,
            Self::Status { status, .. }
                if *status == reqwest::StatusCode::TOO_MANY_REQUESTS
                    || *status == reqwest::StatusCode::FORBIDDEN
        )
    }
}

// error body format for every GitHub REST endpoint
#[derive(Deserialize)]
struct GithubErrorBody {
    message: String,
}

/// Single page client for `GET /search/issues`
pub struct GithubSearchClient<'a> {
    client: &'a reqwest::Client,
    api_url: &'a str,
    token: &'a str,
    api_version: &'a str,
    user_agent: &'a str,
}

impl<'a> GithubSearchClient<'a> {
    pub fn new(client: &'a reqwest::Client, config: &'a Config, token: &'a str) -> Self {
        Self {
            client,
            api_url: &config.github.api_url,
            token,
            api_version: &config.github.api_version,
            user_agent: &config.github.user_agent,
        }
    }

    fn build_request(&self, request: &PageRequest<'_>) -> Result<reqwest::Request, reqwest::Error> {
        let url = format!("{}{}", self.api_url.trim_end_matches('/'), SEARCH_ISSUES_PATH);
        self.client
            .get(url)
            .bearer_auth(self.token)
            .header("X-GitHub-Api-Version", self.api_version)
            .header(reqwest::header::USER_AGENT, self.user_agent)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .query(&[
                ("q", request.text),
                ("sort", request.sort.api_str()),
                ("order", request.order.api_str()),
            ])
            .query(&[("per_page", request.page_size), ("page", request.page)])
            .build()
    }
}

#[async_trait]
impl SearchApi for GithubSearchClient<'_> {
    type Item = IssueSearchItem;
    type Error = GithubApiError;

    async fn fetch_page(
        &self,
        request: &PageRequest<'_>,
    ) -> Result<PageResponse<IssueSearchItem>, GithubApiError> {
        let http_request = self.build_request(request)?;
        log::debug!("Requesting search page {}: {}", request.page, http_request.url());

        let response = self.client.execute(http_request).await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<GithubErrorBody>(&body)
                .map(|err| err.message)
                .unwrap_or(body);
            return Err(GithubApiError::Status { status, message });
        }

        let data: IssueSearchResponse = serde_json::from_str(&body)?;
        if data.incomplete_results {
            log::warn!(
                "GitHub timed out on page {} of \"{}\", results may be incomplete",
                request.page,
                request.text
            );
        }
        Ok(PageResponse::new(data.items, data.total_count))
    }
}

#[cfg(test)]
mod tests {
    use mockito::{Matcher, Server};
    use serde_json::json;

    use super::*;
    use crate::search::{search_with_outcome, Order, SearchQuery, SortField, StopReason};

    use super::api_response::tests::issue_json;

    fn config_for(server: &Server) -> Config {
        let mut config = Config::default();
        config.github.api_url = server.url();
        config
    }

    fn page_body(total: u64, ids: std::ops::Range<u64>) -> String {
        let items: Vec<_> = ids.map(|id| issue_json(id, "octo/repo", id, id % 2 == 0)).collect();
        json!({"total_count": total, "incomplete_results": false, "items": items}).to_string()
    }

    #[tokio::test]
    async fn fetches_single_page_with_headers_and_query() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search/issues")
            .match_header("authorization", "Bearer secret")
            .match_header("x-github-api-version", "2022-11-28")
            .match_header("accept", "application/vnd.github+json")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "involves:octocat is:issue".into()),
                Matcher::UrlEncoded("sort".into(), "created".into()),
                Matcher::UrlEncoded("order".into(), "asc".into()),
                Matcher::UrlEncoded("per_page".into(), "2".into()),
                Matcher::UrlEncoded("page".into(), "3".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(page_body(10, 0..2))
            .create_async()
            .await;

        let config = config_for(&server);
        let http = reqwest::Client::new();
        let client = GithubSearchClient::new(&http, &config, "secret");
        let query = SearchQuery::new("involves:octocat is:issue")
            .unwrap()
            .with_sort(SortField::Created)
            .with_order(Order::Asc)
            .with_page_size(2)
            .unwrap();

        let page = client.fetch_page(&query.page_request(3)).await.unwrap();
        assert_eq!(page.total_count, 10);
        assert_eq!(page.items.len(), 2);
        assert!(page.items[0].is_pull_request());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn aggregates_pages_from_server() {
        let mut server = Server::new_async().await;
        let first = server
            .mock("GET", "/search/issues")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(page_body(5, 0..2))
            .create_async()
            .await;
        // item 1 shows up again after the index shifted
        let second = server
            .mock("GET", "/search/issues")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(page_body(5, 1..3))
            .create_async()
            .await;
        let third = server
            .mock("GET", "/search/issues")
            .match_query(Matcher::UrlEncoded("page".into(), "3".into()))
            .with_status(200)
            .with_body(page_body(5, 3..4))
            .create_async()
            .await;

        let config = config_for(&server);
        let http = reqwest::Client::new();
        let client = GithubSearchClient::new(&http, &config, "secret");
        let query = SearchQuery::new("involves:octocat")
            .unwrap()
            .with_page_size(2)
            .unwrap();

        let outcome = search_with_outcome(&client, &query).await.unwrap();
        let ids: Vec<u64> = outcome.items.iter().map(|item| item.id).collect();
        assert_eq!(ids, [0, 1, 2, 3]);
        assert_eq!(outcome.raw_count, 5);
        assert_eq!(outcome.pages_fetched, 3);
        assert_eq!(outcome.stop_reason, StopReason::TotalReached);
        assert!(outcome.is_complete());

        first.assert_async().await;
        second.assert_async().await;
        third.assert_async().await;
    }

    #[tokio::test]
    async fn incomplete_short_page_keeps_paging() {
        let mut server = Server::new_async().await;
        let items: Vec<_> = (0..1).map(|id| issue_json(id, "octo/repo", id, false)).collect();
        let first = server
            .mock("GET", "/search/issues")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(
                json!({"total_count": 5, "incomplete_results": true, "items": items}).to_string(),
            )
            .create_async()
            .await;
        let second = server
            .mock("GET", "/search/issues")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(200)
            .with_body(page_body(5, 1..3))
            .create_async()
            .await;
        let third = server
            .mock("GET", "/search/issues")
            .match_query(Matcher::UrlEncoded("page".into(), "3".into()))
            .with_status(200)
            .with_body(page_body(5, 3..5))
            .create_async()
            .await;

        let config = config_for(&server);
        let http = reqwest::Client::new();
        let client = GithubSearchClient::new(&http, &config, "secret");
        let query = SearchQuery::new("involves:octocat")
            .unwrap()
            .with_page_size(2)
            .unwrap();

        let outcome = search_with_outcome(&client, &query).await.unwrap();
        let ids: Vec<u64> = outcome.items.iter().map(|item| item.id).collect();
        assert_eq!(ids, [0, 1, 2, 3, 4]);
        assert_eq!(outcome.pages_fetched, 3);
        assert_eq!(outcome.stop_reason, StopReason::TotalReached);
        assert!(outcome.is_complete());

        first.assert_async().await;
        second.assert_async().await;
        third.assert_async().await;
    }

    #[tokio::test]
    async fn error_status_carries_github_message() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/search/issues")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"message": "API rate limit exceeded"}"#)
            .create_async()
            .await;

        let config = config_for(&server);
        let http = reqwest::Client::new();
        let client = GithubSearchClient::new(&http, &config, "secret");
        let query = SearchQuery::new("involves:octocat").unwrap();

        let err = crate::search::search(&client, &query).await.unwrap_err();
        assert!(err.is_rate_limit());
        match err {
            GithubApiError::Status { status, message } => {
                assert_eq!(status, reqwest::StatusCode::FORBIDDEN);
                assert_eq!(message, "API rate limit exceeded");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[tokio::test]
    async fn failure_on_second_page_drops_everything() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/search/issues")
            .match_query(Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(page_body(4, 0..2))
            .create_async()
            .await;
        server
            .mock("GET", "/search/issues")
            .match_query(Matcher::UrlEncoded("page".into(), "2".into()))
            .with_status(502)
            .with_body("Bad gateway")
            .create_async()
            .await;

        let config = config_for(&server);
        let http = reqwest::Client::new();
        let client = GithubSearchClient::new(&http, &config, "secret");
        let query = SearchQuery::new("involves:octocat")
            .unwrap()
            .with_page_size(2)
            .unwrap();

        let err = crate::search::search(&client, &query).await.unwrap_err();
        assert!(!err.is_rate_limit());
        assert!(matches!(
            err,
            GithubApiError::Status { status, ref message }
                if status == reqwest::StatusCode::BAD_GATEWAY && message == "Bad gateway"
        ));
    }
}
