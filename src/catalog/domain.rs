pub mod service;

use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::core::library::LibraryResult;

#[async_trait]
pub trait CatalogService: Sync + Send {
    async fn add_book(&self, book: &BookEntity) -> LibraryResult<BookEntity>;
    async fn find_book_by_isbn(&self, isbn: &str) -> LibraryResult<BookEntity>;
    async fn search_by_title(&self, keyword: &str) -> LibraryResult<Vec<BookEntity>>;
    async fn issue_book(&self, isbn: &str) -> LibraryResult<BookEntity>;
    async fn return_book(&self, isbn: &str) -> LibraryResult<BookEntity>;
    async fn list_books(&self) -> LibraryResult<Vec<BookEntity>>;
}
