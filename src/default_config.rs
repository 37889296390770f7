use const_format::concatcp;

pub const TEMP_DIR_LOCATION: &str = "/tmp/gh_scout/";

pub const STATE_FILE_LOCATION: &str = "./state.json";

pub const REPORT_DIR_LOCATION: &str = "./reports/";

pub mod github {
    use super::concatcp;

    pub const API_URL: &str = "https://api.github.com";
    pub const API_VERSION: &str = "2022-11-28";
    pub const USER_AGENT: &str = concatcp!("gh_scout/", env!("CARGO_PKG_VERSION"));

    pub const PAGE_SIZE: u32 = crate::search::query::DEFAULT_PAGE_SIZE;
    pub const MAX_PAGES: u32 = crate::search::query::DEFAULT_MAX_PAGES;

    /// How far back to look for a user that was never searched before
    pub const LOOKBACK_DAYS: u32 = 7;
}

pub mod database {
    pub const URL: &str = "sqlite://gh_scout.db?mode=rwc";
    pub const ISSUES_TABLE_NAME: &str = "issues";
}
