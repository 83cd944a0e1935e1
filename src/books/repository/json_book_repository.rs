use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Serializer;
use tokio::fs;
use tracing::{info, warn};

use crate::books::domain::model::BookEntity;
use crate::books::repository::BookRepository;
use crate::core::library::{LibraryError, LibraryResult};
use crate::core::repository::Repository;

const JSON_INDENT: &[u8] = b"    ";

// JsonBookRepository keeps the whole catalog in a single json array and
// rewrites the file on every save.
#[derive(Debug)]
pub struct JsonBookRepository {
    path: PathBuf,
}

impl JsonBookRepository {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

#[async_trait]
impl Repository<BookEntity> for JsonBookRepository {
    async fn load(&self) -> LibraryResult<Vec<BookEntity>> {
        let bytes = match fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                warn!("Catalog file not found, starting with empty list");
                return Ok(vec![]);
            }
            Err(err) => return Err(LibraryError::from(err)),
        };
        let books: Vec<BookEntity> = serde_json::from_slice(&bytes)?;
        info!("Loaded {} books from file", books.len());
        Ok(books)
    }

    async fn save(&self, entities: &[BookEntity]) -> LibraryResult<usize> {
        let json = to_pretty_json(entities)?;
        fs::write(&self.path, json).await?;
        info!("Saved {} books to file", entities.len());
        Ok(entities.len())
    }
}

impl BookRepository for JsonBookRepository {
    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

fn to_pretty_json(books: &[BookEntity]) -> LibraryResult<Vec<u8>> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(JSON_INDENT));
    books.serialize(&mut ser)?;
    Ok(buf)
}
