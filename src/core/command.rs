use async_trait::async_trait;
use crate::core::library::LibraryError;

#[derive(Debug)]
pub enum CommandError {
    DuplicateKey {
        message: String,
    },
    NotFound {
        message: String,
    },
    AlreadyIssued {
        message: String,
    },
    NotIssued {
        message: String,
    },
    Persistence {
        message: String,
        reason_code: Option<String>,
    },
    Validation {
        message: String,
        reason_code: Option<String>,
    },
}

#[async_trait]
pub trait Command<Request, Response> {
    async fn execute(&self, req: Request) -> Result<Response, CommandError>;
}

impl From<LibraryError> for CommandError {
    fn from(other: LibraryError) -> Self {
        match other {
            LibraryError::DuplicateKey { message } => {
                CommandError::DuplicateKey { message }
            }
            LibraryError::NotFound { message } => {
                CommandError::NotFound { message }
            }
            LibraryError::AlreadyIssued { message } => {
                CommandError::AlreadyIssued { message }
            }
            LibraryError::NotIssued { message } => {
                CommandError::NotIssued { message }
            }
            LibraryError::Validation { message, reason_code } => {
                CommandError::Validation { message, reason_code }
            }
            LibraryError::Serialization { message } => {
                CommandError::Persistence { message, reason_code: None }
            }
            LibraryError::Runtime { message, reason_code } => {
                CommandError::Persistence { message, reason_code }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::core::command::CommandError;
    use crate::core::library::LibraryError;

    #[tokio::test]
    async fn test_should_convert_library_error() {
        assert!(matches!(CommandError::from(LibraryError::duplicate_key("test")), CommandError::DuplicateKey { .. }));
        assert!(matches!(CommandError::from(LibraryError::not_found("test")), CommandError::NotFound { .. }));
        assert!(matches!(CommandError::from(LibraryError::already_issued("test")), CommandError::AlreadyIssued { .. }));
        assert!(matches!(CommandError::from(LibraryError::not_issued("test")), CommandError::NotIssued { .. }));
        assert!(matches!(CommandError::from(LibraryError::validation("test", None)), CommandError::Validation { .. }));
        assert!(matches!(CommandError::from(LibraryError::serialization("test")), CommandError::Persistence { .. }));
        assert!(matches!(CommandError::from(LibraryError::runtime("test", None)), CommandError::Persistence { .. }));
    }
}
