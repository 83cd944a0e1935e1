pub mod json_book_repository;
pub mod memory_book_repository;

use crate::books::domain::model::BookEntity;
use crate::core::repository::Repository;

pub trait BookRepository: Repository<BookEntity> {
    // human readable location of the backing store, used in logs
    fn location(&self) -> String;
}
