use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::info;

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::LibraryResult;
use crate::core::repository::Repository;

// MemoryBookRepository is a volatile store; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryBookRepository {
    books: Mutex<Vec<BookEntity>>,
}

impl MemoryBookRepository {
    pub fn new(books: Vec<BookEntity>) -> Self {
        Self {
            books: Mutex::new(books),
        }
    }
}

#[async_trait]
impl Repository<BookEntity> for MemoryBookRepository {
    async fn load(&self) -> LibraryResult<Vec<BookEntity>> {
        let books = self.books.lock().await.clone();
        info!("Loaded {} books from memory", books.len());
        Ok(books)
    }

    async fn save(&self, entities: &[BookEntity]) -> LibraryResult<usize> {
        let mut books = self.books.lock().await;
        *books = entities.to_vec();
        Ok(books.len())
    }
}

impl BookRepository for MemoryBookRepository {
    fn location(&self) -> String {
        "memory".to_string()
    }
}
