use crate::app::error::Result;
use crate::config::Config;
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::Fetcher;
use crate::normalizer::Normalizer;
use crate::store::sqlite::SqliteStore;
use crate::store::Store;

/// Everything one invocation needs, built once from [`Config`].
pub struct AppContext {
    pub config: Config,
    pub store: Box<dyn Store + Send + Sync>,
    pub fetcher: Box<dyn Fetcher + Send + Sync>,
    pub normalizer: Normalizer,
}

impl AppContext {
    /// Open the store at the configured path and build the HTTP fetcher.
    pub fn new(config: Config) -> Result<Self> {
        let store = Box::new(SqliteStore::new(&config.storage.database_path)?);
        let fetcher = Box::new(HttpFetcher::new(&config.fetch)?);

        Ok(Self::with_parts(config, store, fetcher))
    }

    pub fn with_parts(
        config: Config,
        store: Box<dyn Store + Send + Sync>,
        fetcher: Box<dyn Fetcher + Send + Sync>,
    ) -> Self {
        Self {
            config,
            store,
            fetcher,
            normalizer: Normalizer::new(),
        }
    }
}
