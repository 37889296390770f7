use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, ValueEnum};
use gh_scout::{
    config::Config,
    github::{
        api_response::IssueSearchItem,
        queries::{InvolvementQuery, ItemKind},
    },
    search::{identity::dedup_by_identity, Order, SearchQuery, SortField},
    state::ScoutState,
    utils::env::github_token,
};
use indicatif::MultiProgress;
use indicatif_log_bridge::LogWrapper;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum SortArg {
    Updated,
    Created,
    Comments,
}

impl From<SortArg> for SortField {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Updated => SortField::Updated,
            SortArg::Created => SortField::Created,
            SortArg::Comments => SortField::Comments,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OrderArg {
    Asc,
    Desc,
}

impl From<OrderArg> for Order {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Asc => Order::Asc,
            OrderArg::Desc => Order::Desc,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum KindArg {
    Issue,
    Pr,
}

impl From<KindArg> for ItemKind {
    fn from(value: KindArg) -> Self {
        match value {
            KindArg::Issue => ItemKind::Issue,
            KindArg::Pr => ItemKind::PullRequest,
        }
    }
}

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE")]
    config: PathBuf,
    #[arg(short, long)]
    regenerate_config: bool,

    /// Search everything this user was involved in. Can be repeated.
    #[arg(short, long = "user", value_name = "LOGIN")]
    users: Vec<String>,
    /// Run a raw GitHub search query instead of per-user searches
    #[arg(short, long, conflicts_with = "users")]
    query: Option<String>,
    /// Only items updated on or after this day (YYYY-MM-DD). Defaults to the last search of each user.
    #[arg(long)]
    since: Option<chrono::NaiveDate>,
    /// Only issues or only pull requests, for --user searches
    #[arg(long, value_enum, conflicts_with = "query")]
    kind: Option<KindArg>,
    /// Extra search qualifier for --user searches, e.g. `org:rust-lang`. Can be repeated.
    #[arg(long = "qualifier", value_name = "QUALIFIER", conflicts_with = "query")]
    qualifiers: Vec<String>,

    /// Overrides github.sort from the config
    #[arg(long, value_enum)]
    sort: Option<SortArg>,
    /// Overrides github.order from the config
    #[arg(long, value_enum)]
    order: Option<OrderArg>,

    #[arg(long)]
    page_size: Option<u32>,
    #[arg(long)]
    max_pages: Option<u32>,

    /// Upsert results into the database
    #[arg(long)]
    store: bool,
    /// Write the markdown report here instead of under the configured report_dir
    #[arg(long, value_name = "FILE", conflicts_with = "print")]
    report: Option<PathBuf>,
    /// Print the markdown report to stdout instead of writing it
    #[arg(long)]
    print: bool,
    #[arg(long, value_name = "FILE")]
    csv: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let logger = env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .build();

    // indicatif rust log progress bar initialization
    let level = logger.filter();
    let pg_bars = MultiProgress::new();
    LogWrapper::new(pg_bars.clone(), logger).try_init()?;
    log::set_max_level(level);

    let args = Cli::parse();
    if args.regenerate_config {
        println!("Generating default config at {:?}.", args.config);
        Config::write_default(&args.config)?;
        println!("Config generated successfully. Edit it before running future operations.");
        return Ok(());
    }

    let mut config = Config::read(&args.config)?;
    if let Some(page_size) = args.page_size {
        config.github.page_size = page_size;
    }
    if let Some(max_pages) = args.max_pages {
        config.github.max_pages = max_pages;
    }
    if let Some(sort) = args.sort {
        config.github.sort = sort.into();
    }
    if let Some(order) = args.order {
        config.github.order = order.into();
    }

    let token = github_token(&config)?;
    let client = reqwest::Client::new();
    let started_at = Utc::now();

    let (title, items) = if let Some(query_text) = &args.query {
        let query = SearchQuery::new(query_text.as_str())?;
        let outcome = gh_scout::search_github(&config, &client, &token, query, &pg_bars).await?;
        (format!("Search: {query_text}"), outcome.items)
    } else if !args.users.is_empty() {
        let mut state = ScoutState::read(&config)?;
        let queries: Vec<InvolvementQuery> = args
            .users
            .iter()
            .map(|user| {
                let since = args.since.unwrap_or_else(|| {
                    state.since_for_user(user, started_at, config.github.lookback_days)
                });
                let mut query = InvolvementQuery::new(user.as_str(), since);
                if let Some(kind) = args.kind {
                    query = query.with_kind(kind.into());
                }
                args.qualifiers
                    .iter()
                    .fold(query, |query, qualifier| query.with_qualifier(qualifier.as_str()))
            })
            .collect();

        log::info!("Searching involvement of {} users", queries.len());
        let outcomes =
            gh_scout::involved_issues_for_users(&config, &client, &token, &queries, &pg_bars)
                .await?;

        let mut items: Vec<IssueSearchItem> = Vec::new();
        for (query, outcome) in queries.iter().zip(outcomes) {
            state.save_search(&config, &query.user, started_at, outcome.items.len());
            items.extend(outcome.items);
        }
        // the same item can involve several of the users
        (
            format!("Involved: {}", args.users.join(", ")),
            dedup_by_identity(items),
        )
    } else {
        anyhow::bail!("Nothing to do. Pass --user or --query, or --regenerate-config.");
    };

    if args.store {
        let db_conn = gh_scout::get_db_connection(&config).await?;
        let table_name = &config.database.issues_table_name;
        gh_scout::db_api::create::create_issues_table_if_missing(&db_conn, table_name).await?;
        let rows = gh_scout::db_api::insert::upsert_issues(&db_conn, table_name, &items).await?;
        log::info!("Stored {} items ({rows} rows affected)", items.len());
    }

    if let Some(path) = &args.csv {
        gh_scout::csv_export::write_issues_csv(path, &items)?;
    }
    if args.print {
        print!(
            "{}",
            gh_scout::report::render_markdown_report(&title, started_at, &items)
        );
    } else {
        let path = args.report.clone().unwrap_or_else(|| {
            gh_scout::report::default_report_path(&config.report_dir, &title, started_at)
        });
        gh_scout::report::write_markdown_report(&path, &title, started_at, &items)?;
    }

    Ok(())
}
