use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::search::SearchItem;

static REPOSITORY_FROM_API_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/repos/([A-Za-z0-9_.-]+/[A-Za-z0-9_.-]+)/?$").expect("valid repository regex")
});

// https://docs.github.com/en/rest/search/search?apiVersion=2022-11-28#search-issues-and-pull-requests
#[derive(Debug, serde::Deserialize, serde::Serialize)]
pub struct IssueSearchResponse {
    pub total_count: u64,
    pub incomplete_results: bool,
    pub items: Vec<IssueSearchItem>,
}

/// One issue or pull request from the search endpoint. Only the fields we use are kept.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct IssueSearchItem {
    pub id: u64,
    pub node_id: String,
    pub number: u64,
    pub title: String,
    pub url: String,
    pub html_url: String,
    pub repository_url: String,
    pub state: IssueState,
    pub user: Option<IssueSearchUser>,
    #[serde(default)]
    pub labels: Vec<IssueSearchLabel>,
    #[serde(default)]
    pub comments: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
    /// Only present for pull requests
    #[serde(default)]
    pub pull_request: Option<IssueSearchPullRequest>,
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueState {
    Open,
    Closed,
}

impl IssueState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct IssueSearchUser {
    pub login: String,
    pub id: u64,
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct IssueSearchLabel {
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct IssueSearchPullRequest {
    pub url: String,
    pub html_url: String,
    #[serde(default)]
    pub merged_at: Option<DateTime<Utc>>,
}

impl IssueSearchItem {
    pub fn is_pull_request(&self) -> bool {
        self.pull_request.is_some()
    }

    /// `owner/name` of the repository, taken from `repository_url`
    ///
    /// Falls back to the whole url if it doesn't look like a GitHub API repository url.
    pub fn repository_full_name(&self) -> &str {
        REPOSITORY_FROM_API_URL
            .captures(&self.repository_url)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
            .unwrap_or(&self.repository_url)
    }
}

impl SearchItem for IssueSearchItem {
    fn id(&self) -> Option<String> {
        Some(self.id.to_string())
    }

    fn url(&self) -> Option<&str> {
        Some(&self.html_url)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::search::IdentityKey;

    pub(crate) fn issue_json(
        id: u64,
        repo: &str,
        number: u64,
        pull_request: bool,
    ) -> serde_json::Value {
        let mut value = serde_json::json!({
            "id": id,
            "node_id": format!("I_{id}"),
            "number": number,
            "title": format!("Item {number}"),
            "url": format!("https://api.github.com/repos/{repo}/issues/{number}"),
            "html_url": format!("https://github.com/{repo}/issues/{number}"),
            "repository_url": format!("https://api.github.com/repos/{repo}"),
            "state": "open",
            "user": {"login": "octocat", "id": 1, "html_url": "https://github.com/octocat"},
            "labels": [{"name": "bug", "color": "d73a4a"}],
            "comments": 3,
            "created_at": "2025-01-02T03:04:05Z",
            "updated_at": "2025-02-03T04:05:06Z",
            "closed_at": null,
            "author_association": "OWNER",
            "body": "text"
        });
        if pull_request {
            value["pull_request"] = serde_json::json!({
                "url": format!("https://api.github.com/repos/{repo}/pulls/{number}"),
                "html_url": format!("https://github.com/{repo}/pull/{number}"),
                "merged_at": null
            });
        }
        value
    }

    pub(crate) fn issue(id: u64, repo: &str, number: u64, pull_request: bool) -> IssueSearchItem {
        serde_json::from_value(issue_json(id, repo, number, pull_request)).unwrap()
    }

    #[test]
    fn deserializes_search_item() {
        let item = issue(11, "rust-lang/cargo", 5, true);
        assert_eq!(item.number, 5);
        assert_eq!(item.state, IssueState::Open);
        assert!(item.is_pull_request());
        assert_eq!(item.labels[0].name, "bug");
        assert_eq!(item.user.unwrap().login, "octocat");
    }

    #[test]
    fn repository_name_from_api_url() {
        let item = issue(1, "tokio-rs/tokio", 1, false);
        assert_eq!(item.repository_full_name(), "tokio-rs/tokio");

        let mut odd = item.clone();
        odd.repository_url = "not a url".to_owned();
        assert_eq!(odd.repository_full_name(), "not a url");
    }

    #[test]
    fn identity_is_numeric_id() {
        let item = issue(0, "a/b", 1, false);
        assert_eq!(item.identity_key(), Some(IdentityKey::Id("0".to_owned())));
    }
}
