//! Search GitHub for issues and pull requests, store them and report on them.
//!
//! The interesting part is [search]: bounded, deduplicating pagination over any [search::SearchApi].
//! Everything else wires it to GitHub ([github]), SQLite ([db_api]) and files ([report], [csv_export]).

pub mod config;
pub mod csv_export;
pub mod db_api;
pub mod default_config;
pub mod github;
pub mod report;
pub mod search;
pub mod state;
pub mod utils;

use futures_util::future::try_join_all;

use config::Config;
use github::{
    api_response::IssueSearchItem, progress::ProgressSearchApi, queries::InvolvementQuery,
    GithubApiError, GithubSearchClient,
};
use search::{QueryError, SearchOutcome, SearchQuery};

pub use db_api::db_connection::get_db_connection;

#[derive(thiserror::Error, Debug)]
pub enum ScoutError {
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Github(#[from] GithubApiError),
}

fn page_progress_bar(pg_bars: &indicatif::MultiProgress, label: String) -> indicatif::ProgressBar {
    let bar = pg_bars.add(indicatif::ProgressBar::no_length());
    bar.set_style(
        indicatif::ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len} pages")
            .unwrap_or_else(|_| indicatif::ProgressStyle::default_bar()),
    );
    bar.set_message(label);
    bar
}

/// Run a raw search query against GitHub, bounded by the configured page size and page limit.
pub async fn search_github(
    config: &Config,
    client: &reqwest::Client,
    token: &str,
    query: SearchQuery,
    pg_bars: &indicatif::MultiProgress,
) -> Result<SearchOutcome<IssueSearchItem>, ScoutError> {
    let query = config.github.bounded(query)?;
    let bar = page_progress_bar(pg_bars, query.text().to_owned());
    let api = ProgressSearchApi::new(
        GithubSearchClient::new(client, config, token),
        bar.clone(),
        query.max_pages(),
    );

    let result = search::search_with_outcome(&api, &query).await;
    bar.finish();
    pg_bars.remove(&bar);
    let outcome = result?;

    if outcome.is_complete() {
        log::info!(
            "\"{}\": {} items from {} pages",
            query.text(),
            outcome.items.len(),
            outcome.pages_fetched
        );
    } else {
        log::warn!(
            "\"{}\": stopped after {} pages ({:?}), {} of {} advertised items retrieved",
            query.text(),
            outcome.pages_fetched,
            outcome.stop_reason,
            outcome.raw_count,
            outcome.total_count
        );
    }
    Ok(outcome)
}

/// Everything `query.user` was involved in that was updated since `query.since`
pub async fn recent_involved_issues(
    config: &Config,
    client: &reqwest::Client,
    token: &str,
    query: &InvolvementQuery,
    pg_bars: &indicatif::MultiProgress,
) -> Result<SearchOutcome<IssueSearchItem>, ScoutError> {
    search_github(config, client, token, query.to_search_query()?, pg_bars).await
}

/// Run [recent_involved_issues] for several users at once.
///
/// Each search pages sequentially on its own, they only share the HTTP client. The first error aborts all
/// of them. Results are in the same order as `queries`.
pub async fn involved_issues_for_users(
    config: &Config,
    client: &reqwest::Client,
    token: &str,
    queries: &[InvolvementQuery],
    pg_bars: &indicatif::MultiProgress,
) -> Result<Vec<SearchOutcome<IssueSearchItem>>, ScoutError> {
    try_join_all(
        queries
            .iter()
            .map(|query| recent_involved_issues(config, client, token, query, pg_bars)),
    )
    .await
}
