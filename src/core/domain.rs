use std::env;
use std::path::PathBuf;
use crate::core::repository::RepositoryStore;

pub const DEFAULT_CATALOG_FILE: &str = "catalog.json";
pub const DEFAULT_LOG_FILE: &str = "library_log.txt";

const CATALOG_FILE_VAR: &str = "LMS_CATALOG_FILE";
const LOG_FILE_VAR: &str = "LMS_LOG_FILE";
const STORE_VAR: &str = "LMS_STORE";

// Identifiable defines common traits that can be shared by persistent objects
pub trait Identifiable: Sync + Send {
    fn id(&self) -> String;
}

// Configuration abstracts config options for library inventory
#[derive(Debug, PartialEq, Clone)]
pub struct Configuration {
    pub catalog_file: PathBuf,
    pub log_file: PathBuf,
    pub store: RepositoryStore,
}

impl Configuration {
    pub fn new(catalog_file: &str, log_file: &str) -> Self {
        Configuration {
            catalog_file: PathBuf::from(catalog_file),
            log_file: PathBuf::from(log_file),
            store: RepositoryStore::JsonFile,
        }
    }

    // Environment overrides are optional; anything unset keeps the default.
    pub fn from_env() -> Self {
        let mut config = Configuration::default();
        if let Ok(file) = env::var(CATALOG_FILE_VAR) {
            if !file.trim().is_empty() {
                config.catalog_file = PathBuf::from(file.trim());
            }
        }
        if let Ok(file) = env::var(LOG_FILE_VAR) {
            if !file.trim().is_empty() {
                config.log_file = PathBuf::from(file.trim());
            }
        }
        if let Ok(store) = env::var(STORE_VAR) {
            config.store = RepositoryStore::from(store);
        }
        config
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Configuration::new(DEFAULT_CATALOG_FILE, DEFAULT_LOG_FILE)
    }
}
