//! CSV export of aggregated issues, one row per item.

use std::{fs, path::Path};

use crate::github::api_response::IssueSearchItem;

#[derive(thiserror::Error, Debug)]
pub enum CsvExportError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub const CSV_HEADER: [&str; 8] = [
    "id",
    "repository",
    "number",
    "kind",
    "state",
    "updated_at",
    "html_url",
    "title",
];

/// Row information for a single issue or pull request
#[derive(Debug)]
pub struct IssueCsvRecord {
    id: String,
    repository: String,
    number: String,
    kind: &'static str,
    state: &'static str,
    updated_at: String,
    html_url: String,
    title: String,
}

impl IssueCsvRecord {
    /// Represent data in a row of [CSV_HEADER]
    pub fn as_row(&self) -> [&str; 8] {
        [
            &self.id,
            &self.repository,
            &self.number,
            self.kind,
            self.state,
            &self.updated_at,
            &self.html_url,
            &self.title,
        ]
    }

    pub fn from_search_item(item: &IssueSearchItem) -> Self {
        Self {
            id: item.id.to_string(),
            repository: item.repository_full_name().to_owned(),
            number: item.number.to_string(),
            kind: if item.is_pull_request() { "pull_request" } else { "issue" },
            state: item.state.as_str(),
            updated_at: item.updated_at.to_rfc3339(),
            html_url: item.html_url.clone(),
            title: item.title.clone(),
        }
    }
}

/// Write all items to `csv_file_path`, with a header row. Creates parent directories if needed.
///
/// Returns the number of rows written, header excluded.
pub fn write_issues_csv(
    csv_file_path: &Path,
    items: &[IssueSearchItem],
) -> Result<usize, CsvExportError> {
    if let Some(parent) = csv_file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(csv_file_path)?;

    writer.write_record(CSV_HEADER)?;
    for item in items {
        writer.write_record(IssueCsvRecord::from_search_item(item).as_row())?;
    }
    writer.flush()?;

    log::info!("Wrote {} rows to {csv_file_path:?}", items.len());
    Ok(items.len())
}
