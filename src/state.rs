use crate::config::AppConfig;
use crate::db::Db;
use crate::services::events::ChangeFeed;

pub struct AppState {
    pub db: Db,
    pub config: AppConfig,
    pub events: ChangeFeed,
}

impl AppState {
    pub fn new(db: Db, config: AppConfig) -> Self {
        let events = ChangeFeed::new(config.event_buffer_size);
        Self { db, config, events }
    }
}
