use std::{
    collections::BTreeMap,
    fs,
    io::{self, Write},
};

use chrono::{DateTime, Days, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Config;

const SELF_TEMP_FILE_NAME: &str = "state_temp.json";

/// What was searched for, and when. Lets repeated runs only ask for what changed since.
#[derive(Default, Debug, Serialize, Deserialize)]
pub struct ScoutState {
    pub users: BTreeMap<String, UserSearchState>,
}

#[derive(Default, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSearchState {
    pub last_search: Option<DateTime<Utc>>,
    pub last_result_count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl ScoutState {
    /// Read the state file, or start from scratch if there is none
    pub fn read(config: &Config) -> Result<Self, StateError> {
        let file = match fs::File::open(&config.state_file_location) {
            Ok(file) => file,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                log::warn!("State file not found. Setting state to initial values.");
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_reader(io::BufReader::new(file))?)
    }

    fn save_err(&self, config: &Config) -> Result<(), StateError> {
        fs::create_dir_all(&config.temp_dir_path)?;
        let own_location_temp = config.temp_dir_path.join(SELF_TEMP_FILE_NAME);

        let mut writer = io::BufWriter::new(fs::File::create(&own_location_temp)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        fs::copy(&own_location_temp, &config.state_file_location)?;
        Ok(())
    }

    fn save(&self, config: &Config) {
        match self.save_err(config) {
            Ok(()) => log::info!("Scout state saved."),
            Err(err) => log::error!("FAILED TO UPDATE SCOUT STATE\n{}", err),
        }
    }

    /// Day to search from for `user`: the day of the last search, or `lookback_days` before `now`
    pub fn since_for_user(&self, user: &str, now: DateTime<Utc>, lookback_days: u32) -> NaiveDate {
        match self.users.get(user).and_then(|state| state.last_search) {
            Some(last) => last.date_naive(),
            None => now
                .date_naive()
                .checked_sub_days(Days::new(lookback_days as u64))
                .unwrap_or(NaiveDate::MIN),
        }
    }

    pub fn save_search(
        &mut self,
        config: &Config,
        user: &str,
        start_time: DateTime<Utc>,
        result_count: usize,
    ) {
        self.users.insert(
            user.to_owned(),
            UserSearchState {
                last_search: Some(start_time),
                last_result_count: result_count,
            },
        );
        self.save(config);
    }
}
