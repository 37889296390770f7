//! Markdown reports of aggregated issues and pull requests.

use std::{
    collections::BTreeMap,
    fmt::Write as _,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};

use crate::github::api_response::{IssueSearchItem, IssueState};

#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Render items grouped by repository, repositories sorted by name.
///
/// Inside a repository, items keep the order they were given in (for search results, most recently updated
/// first).
pub fn render_markdown_report(
    title: &str,
    generated_at: DateTime<Utc>,
    items: &[IssueSearchItem],
) -> String {
    let pull_requests = items.iter().filter(|item| item.is_pull_request()).count();
    let open = items
        .iter()
        .filter(|item| item.state == IssueState::Open)
        .count();

    let mut by_repository: BTreeMap<&str, Vec<&IssueSearchItem>> = BTreeMap::new();
    for item in items {
        by_repository
            .entry(item.repository_full_name())
            .or_default()
            .push(item);
    }

    // writing to a String can't fail
    let mut out = String::new();
    let _ = writeln!(out, "# {title}\n");
    let _ = writeln!(
        out,
        "_Generated {}_\n",
        generated_at.format("%Y-%m-%d %H:%M UTC")
    );
    let _ = writeln!(
        out,
        "{}: {}, {} ({} open, {} closed)",
        counted(items.len(), "item"),
        counted(items.len() - pull_requests, "issue"),
        counted(pull_requests, "pull request"),
        open,
        items.len() - open
    );

    if items.is_empty() {
        let _ = writeln!(out, "\nNothing to report.");
        return out;
    }

    for (repository, repository_items) in by_repository {
        let _ = writeln!(out, "\n## {repository}\n");
        for item in repository_items {
            let _ = writeln!(
                out,
                "- {}[#{} {}]({}) ({}, updated {})",
                if item.is_pull_request() { "PR " } else { "" },
                item.number,
                escape_link_text(&item.title),
                item.html_url,
                item.state.as_str(),
                item.updated_at.format("%Y-%m-%d")
            );
        }
    }
    out
}

fn counted(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("1 {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn escape_link_text(text: &str) -> String {
    text.replace('[', "\\[").replace(']', "\\]")
}

/// Report location under `report_dir` when no explicit path is given: `<timestamp>-<title slug>.md`.
///
/// The timestamp goes first so reports sort chronologically.
pub fn default_report_path(
    report_dir: &Path,
    title: &str,
    generated_at: DateTime<Utc>,
) -> PathBuf {
    let mut slug = String::new();
    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_ascii_alphanumeric() {
            slug.push(c);
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug: String = slug.trim_end_matches('-').chars().take(60).collect();
    let slug = slug.trim_end_matches('-');

    let stamp = generated_at.format("%Y-%m-%d-%H%M%S");
    if slug.is_empty() {
        report_dir.join(format!("{stamp}.md"))
    } else {
        report_dir.join(format!("{stamp}-{slug}.md"))
    }
}

/// Render and write a report. Creates parent directories if needed.
pub fn write_markdown_report(
    path: &Path,
    title: &str,
    generated_at: DateTime<Utc>,
    items: &[IssueSearchItem],
) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut writer = io::BufWriter::new(fs::File::create(path)?);
    writer.write_all(render_markdown_report(title, generated_at, items).as_bytes())?;
    writer.flush()?;
    log::info!("Report written to {path:?}");
    Ok(())
}
