use std::sync::Arc;
use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::library::{LibraryError, LibraryResult};

pub struct AddBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl AddBookCommand {
    pub fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub struct AddBookCommandRequest {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl AddBookCommandRequest {
    pub fn new(title: &str, author: &str, isbn: &str) -> Self {
        Self {
            title: title.trim().to_string(),
            author: author.trim().to_string(),
            isbn: isbn.trim().to_string(),
        }
    }

    pub fn validate(&self) -> LibraryResult<()> {
        if self.title.is_empty() || self.author.is_empty() || self.isbn.is_empty() {
            return Err(LibraryError::validation("title, author and isbn are required", None));
        }
        Ok(())
    }

    pub fn build_book(&self) -> BookEntity {
        BookEntity::new(self.title.as_str(), self.author.as_str(), self.isbn.as_str())
    }
}

#[derive(Debug)]
pub struct AddBookCommandResponse {
    pub book: BookEntity,
}

impl AddBookCommandResponse {
    pub fn new(book: BookEntity) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<AddBookCommandRequest, AddBookCommandResponse> for AddBookCommand {
    async fn execute(&self, req: AddBookCommandRequest) -> Result<AddBookCommandResponse, CommandError> {
        req.validate()?;
        self.catalog_service.add_book(&req.build_book()).await
            .map_err(CommandError::from).map(AddBookCommandResponse::new)
    }
}
