use async_trait::async_trait;
use crate::core::library::LibraryResult;

#[async_trait]
pub trait Repository<Entity>: Sync + Send {
    // load all entities in stored order
    async fn load(&self) -> LibraryResult<Vec<Entity>>;

    // replace all stored entities
    async fn save(&self, entities: &[Entity]) -> LibraryResult<usize>;
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum RepositoryStore {
    JsonFile,
    Memory,
}

impl From<String> for RepositoryStore {
    fn from(s: String) -> Self {
        match s.trim().to_lowercase().as_str() {
            "memory" => RepositoryStore::Memory,
            _ => RepositoryStore::JsonFile,
        }
    }
}
