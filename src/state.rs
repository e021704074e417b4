use crate::domain::error::AppError;
use crate::domain::traits::SecretStore;
use crate::infrastructure::config::{self, Config};
use crate::infrastructure::network::create_client;
use crate::infrastructure::storage::{HistoryStore, KeyringStore};
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;

/// Process-wide services. Configuration is not held here:
/// every request reads it fresh through [`AppState::load_config`].
#[derive(Clone)]
pub struct AppState {
    pub config_path: Option<PathBuf>,
    pub secrets: Arc<dyn SecretStore>,
    pub history: Arc<HistoryStore>,
    pub http_client: Client,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        Ok(Self {
            config_path: config::get_config_path(),
            secrets: Arc::new(KeyringStore::default()),
            history: Arc::new(HistoryStore::new(config::get_history_path())),
            http_client: create_client(config.http_proxy.as_deref())?,
        })
    }

    pub fn with_parts(
        config_path: Option<PathBuf>,
        secrets: Arc<dyn SecretStore>,
        history: HistoryStore,
        http_client: Client,
    ) -> Self {
        Self {
            config_path,
            secrets,
            history: Arc::new(history),
            http_client,
        }
    }

    pub fn load_config(&self) -> Result<Config, AppError> {
        match &self.config_path {
            Some(path) => config::load_config_from(path),
            None => Ok(Config::default()),
        }
    }
}
