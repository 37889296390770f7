use std::env;

use dotenv::dotenv;

use crate::config::Config;

pub const GITHUB_TOKEN_VAR: &str = "GITHUB_TOKEN";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("No GitHub token found. Set tokens.github in the config or the GITHUB_TOKEN environment variable")]
    Missing,
}

/// Reads a variable from the environment, loading a `.env` file first if there is one.
///
/// Empty values are treated as unset.
fn env_var(key: &str) -> Option<String> {
    dotenv().ok();
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

/// GitHub token from the config, falling back to `GITHUB_TOKEN`
pub fn github_token(config: &Config) -> Result<String, TokenError> {
    config
        .tokens
        .github
        .clone()
        .filter(|token| !token.trim().is_empty())
        .or_else(|| env_var(GITHUB_TOKEN_VAR))
        .ok_or(TokenError::Missing)
}

/// Database url from `DATABASE_URL`, falling back to the config
pub fn database_url(config: &Config) -> String {
    env_var(DATABASE_URL_VAR).unwrap_or_else(|| {
        log::debug!("{} not set, using {}", DATABASE_URL_VAR, config.database.url);
        config.database.url.clone()
    })
}
