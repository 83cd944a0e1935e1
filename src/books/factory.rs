use crate::books::repository::BookRepository;
use crate::books::repository::json_book_repository::JsonBookRepository;
use crate::books::repository::memory_book_repository::MemoryBookRepository;
use crate::core::domain::Configuration;
use crate::core::repository::RepositoryStore;

pub fn create_book_repository(config: &Configuration) -> Box<dyn BookRepository> {
    match config.store {
        RepositoryStore::JsonFile => {
            Box::new(JsonBookRepository::new(&config.catalog_file))
        }
        RepositoryStore::Memory => {
            Box::new(MemoryBookRepository::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::books::factory::create_book_repository;
    use crate::books::repository::BookRepository;
    use crate::core::domain::Configuration;
    use crate::core::repository::RepositoryStore;

    #[tokio::test]
    async fn test_should_create_repository_per_store() {
        let mut config = Configuration::new("books.json", "books.log");
        assert_eq!("books.json", create_book_repository(&config).location());
        config.store = RepositoryStore::Memory;
        assert_eq!("memory", create_book_repository(&config).location());
    }
}
