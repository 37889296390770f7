use std::fmt::Display;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::search::{QueryError, SearchQuery};

// https://docs.github.com/en/search-github/searching-on-github/searching-issues-and-pull-requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Issue,
    PullRequest,
}

impl ItemKind {
    pub fn qualifier(self) -> &'static str {
        match self {
            Self::Issue => "is:issue",
            Self::PullRequest => "is:pr",
        }
    }
}

/// Everything `user` authored, was assigned, mentioned in or commented on, updated since a given day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvolvementQuery {
    pub user: String,
    pub since: NaiveDate,
    pub kind: Option<ItemKind>,
    /// Additional qualifiers appended verbatim, e.g. `org:rust-lang` or `is:open`
    pub extra: Vec<String>,
}

impl InvolvementQuery {
    pub fn new(user: impl Into<String>, since: NaiveDate) -> Self {
        Self {
            user: user.into(),
            since,
            kind: None,
            extra: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: ItemKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.extra.push(qualifier.into());
        self
    }

    /// Validated [SearchQuery] with default sort and bounds, [crate::search_github] applies the configured ones
    pub fn to_search_query(&self) -> Result<SearchQuery, QueryError> {
        if self.user.trim().is_empty() {
            return Err(QueryError::EmptyText);
        }
        SearchQuery::new(self.to_string())
    }
}

impl Display for InvolvementQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "involves:{} updated:>={}",
            self.user.trim(),
            self.since.format("%Y-%m-%d")
        )?;
        if let Some(kind) = self.kind {
            write!(f, " {}", kind.qualifier())?;
        }
        for qualifier in self.extra.iter().filter(|q| !q.trim().is_empty()) {
            write!(f, " {}", qualifier.trim())?;
        }
        Ok(())
    }
}
