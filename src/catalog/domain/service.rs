use std::collections::HashSet;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use crate::books::domain::Book;
use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::catalog::domain::CatalogService;
use crate::core::domain::Identifiable;
use crate::core::library::{BookStatus, LibraryError, LibraryResult};

// CatalogServiceImpl owns the in-memory catalog; the repository is only a
// write-through mirror of it.
pub struct CatalogServiceImpl {
    book_repository: Box<dyn BookRepository>,
    books: RwLock<Vec<BookEntity>>,
}

impl CatalogServiceImpl {
    // Any load failure leaves the catalog empty instead of failing startup.
    pub async fn load(book_repository: Box<dyn BookRepository>) -> Self {
        let books = match book_repository.load().await {
            Ok(books) => unique_books(books),
            Err(err @ LibraryError::Serialization { .. }) => {
                error!("JSON decode error, starting with empty list: {}", err);
                vec![]
            }
            Err(err) => {
                error!("Error while reading catalog {}, starting with empty list: {}",
                    book_repository.location(), err);
                vec![]
            }
        };
        Self {
            book_repository,
            books: RwLock::new(books),
        }
    }

    // Save failures are logged only; the in-memory catalog stays authoritative.
    async fn persist(&self, books: &[BookEntity]) {
        if let Err(err) = self.book_repository.save(books).await {
            error!("Error while saving catalog {}: {}", self.book_repository.location(), err);
        }
    }
}

#[async_trait]
impl CatalogService for CatalogServiceImpl {
    async fn add_book(&self, book: &BookEntity) -> LibraryResult<BookEntity> {
        let mut books = self.books.write().await;
        if position(&books, book.isbn.as_str()).is_some() {
            warn!("Duplicate ISBN tried: {}", book.isbn);
            return Err(LibraryError::duplicate_key(
                format!("book already exists for {}", book.isbn).as_str()));
        }
        let added = BookEntity::new(book.title.as_str(), book.author.as_str(), book.isbn.as_str());
        books.push(added.clone());
        self.persist(&books).await;
        info!("Book added: {} ({})", added.title, added.isbn);
        Ok(added)
    }

    async fn find_book_by_isbn(&self, isbn: &str) -> LibraryResult<BookEntity> {
        let books = self.books.read().await;
        position(&books, isbn)
            .map(|i| books[i].clone())
            .ok_or_else(|| LibraryError::not_found(format!("book not found for {}", isbn).as_str()))
    }

    async fn search_by_title(&self, keyword: &str) -> LibraryResult<Vec<BookEntity>> {
        let books = self.books.read().await;
        let res: Vec<BookEntity> = books.iter()
            .filter(|b| b.title_contains(keyword))
            .cloned()
            .collect();
        info!("Search by title '{}' found {} result(s)", keyword.to_lowercase(), res.len());
        Ok(res)
    }

    async fn issue_book(&self, isbn: &str) -> LibraryResult<BookEntity> {
        let mut books = self.books.write().await;
        let Some(i) = position(&books, isbn) else {
            warn!("Issue failed, book not found: {}", isbn);
            return Err(LibraryError::not_found(format!("book not found for {}", isbn).as_str()));
        };
        if books[i].is_issued() {
            warn!("Issue failed, already issued: {}", isbn);
            return Err(LibraryError::already_issued(format!("book already issued for {}", isbn).as_str()));
        }
        books[i].status = BookStatus::Issued;
        let issued = books[i].clone();
        self.persist(&books).await;
        info!("Book issued: {}", isbn);
        Ok(issued)
    }

    async fn return_book(&self, isbn: &str) -> LibraryResult<BookEntity> {
        let mut books = self.books.write().await;
        let Some(i) = position(&books, isbn) else {
            warn!("Return failed, book not found: {}", isbn);
            return Err(LibraryError::not_found(format!("book not found for {}", isbn).as_str()));
        };
        if !books[i].is_issued() {
            warn!("Return failed, already available: {}", isbn);
            return Err(LibraryError::not_issued(format!("book not issued for {}", isbn).as_str()));
        }
        books[i].status = BookStatus::Available;
        let returned = books[i].clone();
        self.persist(&books).await;
        info!("Book returned: {}", isbn);
        Ok(returned)
    }

    async fn list_books(&self) -> LibraryResult<Vec<BookEntity>> {
        Ok(self.books.read().await.clone())
    }
}

fn position(books: &[BookEntity], isbn: &str) -> Option<usize> {
    books.iter().position(|b| b.id() == isbn)
}

// keeps the first record per isbn
fn unique_books(books: Vec<BookEntity>) -> Vec<BookEntity> {
    let mut seen = HashSet::new();
    books.into_iter().filter(|b| {
        let fresh = seen.insert(b.id());
        if !fresh {
            warn!("Dropping duplicate ISBN from catalog file: {}", b.isbn);
        }
        fresh
    }).collect()
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::io::Write;
    use std::path::Path;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;
    use tracing::subscriber::DefaultGuard;
    use crate::books::domain::model::BookEntity;
    use crate::books::repository::json_book_repository::JsonBookRepository;
    use crate::books::repository::memory_book_repository::MemoryBookRepository;
    use crate::catalog::domain::CatalogService;
    use crate::catalog::domain::service::CatalogServiceImpl;
    use crate::core::library::{BookStatus, LibraryError};

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().expect("log buffer").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().expect("log buffer")).to_string()
        }
    }

    // routes this thread's events into the buffer until the guard drops
    fn capture_logs(buffer: &LogBuffer) -> DefaultGuard {
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_target(false)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    async fn memory_service() -> CatalogServiceImpl {
        CatalogServiceImpl::load(Box::new(MemoryBookRepository::default())).await
    }

    async fn file_service(path: &Path) -> CatalogServiceImpl {
        CatalogServiceImpl::load(Box::new(JsonBookRepository::new(path))).await
    }

    #[tokio::test]
    async fn test_should_add_find_books() {
        let svc = memory_service().await;
        for i in 0..10 {
            let book = BookEntity::new(format!("title_{}", i).as_str(), "author", format!("isbn_{}", i).as_str());
            svc.add_book(&book).await.expect("should add book");
        }
        assert_eq!(10, svc.list_books().await.expect("should list books").len());
        for i in 0..10 {
            let found = svc.find_book_by_isbn(format!("isbn_{}", i).as_str()).await.expect("should find book");
            assert_eq!(format!("title_{}", i), found.title);
        }
    }

    #[tokio::test]
    async fn test_should_reject_duplicate_isbn() {
        let svc = memory_service().await;
        svc.add_book(&BookEntity::new("Dune", "Frank Herbert", "111")).await.expect("should add book");
        let res = svc.add_book(&BookEntity::new("Dune Messiah", "Frank Herbert", "111")).await;
        assert!(matches!(res, Err(LibraryError::DuplicateKey { .. })));
        let books = svc.list_books().await.expect("should list books");
        assert_eq!(1, books.len());
        assert_eq!("Dune", books[0].title.as_str());
    }

    #[tokio::test]
    async fn test_should_add_as_available() {
        let svc = memory_service().await;
        let mut book = BookEntity::new("Dune", "Frank Herbert", "111");
        book.status = BookStatus::Issued;
        let added = svc.add_book(&book).await.expect("should add book");
        assert_eq!(BookStatus::Available, added.status);
    }

    #[tokio::test]
    async fn test_should_not_find_unknown_isbn() {
        let svc = memory_service().await;
        let res = svc.find_book_by_isbn("404").await;
        assert!(matches!(res, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_search_by_title() {
        let svc = memory_service().await;
        svc.add_book(&BookEntity::new("The Great Gatsby", "F. Scott Fitzgerald", "1")).await.expect("should add book");
        svc.add_book(&BookEntity::new("Dune", "Frank Herbert", "2")).await.expect("should add book");
        svc.add_book(&BookEntity::new("Great Expectations", "Charles Dickens", "3")).await.expect("should add book");

        for keyword in ["great", "GATSBY", "the great gatsby"] {
            let res = svc.search_by_title(keyword).await.expect("should search");
            assert!(res.iter().any(|b| b.isbn == "1"), "{} should match", keyword);
        }
        let res = svc.search_by_title("great").await.expect("should search");
        assert_eq!(vec!["1", "3"], res.iter().map(|b| b.isbn.as_str()).collect::<Vec<_>>());
        assert!(svc.search_by_title("missing").await.expect("should search").is_empty());
    }

    #[tokio::test]
    async fn test_should_issue_and_return() {
        let svc = memory_service().await;
        svc.add_book(&BookEntity::new("Dune", "Frank Herbert", "111")).await.expect("should add book");

        let issued = svc.issue_book("111").await.expect("should issue");
        assert_eq!(BookStatus::Issued, issued.status);
        let res = svc.issue_book("111").await;
        assert!(matches!(res, Err(LibraryError::AlreadyIssued { .. })));
        assert_eq!(BookStatus::Issued, svc.find_book_by_isbn("111").await.expect("should find").status);

        let returned = svc.return_book("111").await.expect("should return");
        assert_eq!(BookStatus::Available, returned.status);
        let res = svc.return_book("111").await;
        assert!(matches!(res, Err(LibraryError::NotIssued { .. })));
        assert_eq!(BookStatus::Available, svc.find_book_by_isbn("111").await.expect("should find").status);
    }

    #[tokio::test]
    async fn test_should_not_issue_or_return_unknown() {
        let svc = memory_service().await;
        assert!(matches!(svc.issue_book("404").await, Err(LibraryError::NotFound { .. })));
        assert!(matches!(svc.return_book("404").await, Err(LibraryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_should_write_through_to_file() {
        let dir = tempdir().expect("should create dir");
        let path = dir.path().join("catalog.json");
        {
            let svc = file_service(&path).await;
            svc.add_book(&BookEntity::new("Dune", "Frank Herbert", "111")).await.expect("should add book");
            svc.add_book(&BookEntity::new("Emma", "Jane Austen", "222")).await.expect("should add book");
            svc.issue_book("222").await.expect("should issue");
        }
        let svc = file_service(&path).await;
        let books = svc.list_books().await.expect("should list books");
        assert_eq!(2, books.len());
        assert_eq!("111", books[0].isbn.as_str());
        assert_eq!(BookStatus::Available, books[0].status);
        assert_eq!("222", books[1].isbn.as_str());
        assert_eq!(BookStatus::Issued, books[1].status);
    }

    #[tokio::test]
    async fn test_should_start_empty_on_malformed_file() {
        let dir = tempdir().expect("should create dir");
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "not json").expect("should write file");
        let svc = file_service(&path).await;
        assert!(svc.list_books().await.expect("should list books").is_empty());
    }

    #[tokio::test]
    async fn test_should_log_error_on_malformed_file() {
        let dir = tempdir().expect("should create dir");
        let path = dir.path().join("catalog.json");
        std::fs::write(&path, "[{\"title\": ").expect("should write file");
        let logs = LogBuffer::default();
        let _guard = capture_logs(&logs);

        let svc = file_service(&path).await;
        assert!(svc.list_books().await.expect("should list books").is_empty());
        let text = logs.contents();
        assert!(text.lines().any(|l| l.contains("ERROR") && l.contains("JSON decode error, starting with empty list")),
                "unexpected log: {}", text);
    }

    #[tokio::test]
    async fn test_should_log_error_on_unreadable_file() {
        let dir = tempdir().expect("should create dir");
        let logs = LogBuffer::default();
        let _guard = capture_logs(&logs);

        let _ = file_service(dir.path()).await;
        let text = logs.contents();
        assert!(text.lines().any(|l| l.contains("ERROR") && l.contains("Error while reading catalog")),
                "unexpected log: {}", text);
        assert!(!text.contains("JSON decode error"));
    }

    #[tokio::test]
    async fn test_should_log_warning_on_duplicate_add() {
        let logs = LogBuffer::default();
        let _guard = capture_logs(&logs);
        let svc = memory_service().await;
        svc.add_book(&BookEntity::new("Dune", "Frank Herbert", "111")).await.expect("should add book");
        let _ = svc.add_book(&BookEntity::new("Dune", "Frank Herbert", "111")).await;

        let text = logs.contents();
        assert!(text.lines().any(|l| l.contains("WARN") && l.contains("Duplicate ISBN tried: 111")),
                "unexpected log: {}", text);
        assert!(text.contains("Book added: Dune (111)"));
    }

    #[tokio::test]
    async fn test_should_start_empty_on_unreadable_file() {
        let dir = tempdir().expect("should create dir");
        let svc = file_service(dir.path()).await;
        assert!(svc.list_books().await.expect("should list books").is_empty());
    }

    #[tokio::test]
    async fn test_should_keep_state_when_save_fails() {
        let dir = tempdir().expect("should create dir");
        let svc = file_service(&dir.path().join("missing").join("catalog.json")).await;
        svc.add_book(&BookEntity::new("Dune", "Frank Herbert", "111")).await.expect("should add book");
        svc.issue_book("111").await.expect("should issue");
        let found = svc.find_book_by_isbn("111").await.expect("should find");
        assert_eq!(BookStatus::Issued, found.status);
    }

    #[tokio::test]
    async fn test_should_drop_duplicate_isbn_on_load() {
        let repo = MemoryBookRepository::new(vec![
            BookEntity::new("Dune", "Frank Herbert", "111"),
            BookEntity::new("Dune copy", "Frank Herbert", "111"),
            BookEntity::new("Emma", "Jane Austen", "222"),
        ]);
        let svc = CatalogServiceImpl::load(Box::new(repo)).await;
        let books = svc.list_books().await.expect("should list books");
        assert_eq!(2, books.len());
        assert_eq!("Dune", books[0].title.as_str());
    }
}
