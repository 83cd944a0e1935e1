use std::sync::Arc;
use async_trait::async_trait;
use crate::books::domain::model::BookEntity;
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::library::LibraryError;

pub struct IssueBookCommand {
    catalog_service: Arc<dyn CatalogService>,
}

impl IssueBookCommand {
    pub fn new(catalog_service: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog_service,
        }
    }
}

#[derive(Debug)]
pub struct IssueBookCommandRequest {
    isbn: String,
}

impl IssueBookCommandRequest {
    pub fn new(isbn: &str) -> Self {
        Self {
            isbn: isbn.trim().to_string(),
        }
    }
}

#[derive(Debug)]
pub struct IssueBookCommandResponse {
    pub book: BookEntity,
}

impl IssueBookCommandResponse {
    pub fn new(book: BookEntity) -> Self {
        Self {
            book,
        }
    }
}

#[async_trait]
impl Command<IssueBookCommandRequest, IssueBookCommandResponse> for IssueBookCommand {
    async fn execute(&self, req: IssueBookCommandRequest) -> Result<IssueBookCommandResponse, CommandError> {
        if req.isbn.is_empty() {
            return Err(CommandError::from(LibraryError::validation("isbn is required", None)));
        }
        self.catalog_service.issue_book(req.isbn.as_str())
            .await.map_err(CommandError::from).map(IssueBookCommandResponse::new)
    }
}
