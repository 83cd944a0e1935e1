use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing::info;
use crate::books::domain::model::BookEntity;
use crate::catalog::command::add_book_cmd::{AddBookCommand, AddBookCommandRequest};
use crate::catalog::command::get_book_cmd::{GetBookCommand, GetBookCommandRequest};
use crate::catalog::command::issue_book_cmd::{IssueBookCommand, IssueBookCommandRequest};
use crate::catalog::command::list_books_cmd::{ListBooksCommand, ListBooksCommandRequest};
use crate::catalog::command::return_book_cmd::{ReturnBookCommand, ReturnBookCommandRequest};
use crate::catalog::command::search_books_cmd::{SearchBooksCommand, SearchBooksCommandRequest};
use crate::catalog::domain::CatalogService;
use crate::core::command::{Command, CommandError};
use crate::core::library::LibraryResult;
use crate::utils::console::{prompt, write_line};

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum MenuChoice {
    AddBook,
    IssueBook,
    ReturnBook,
    ViewAll,
    SearchBook,
    Exit,
}

impl TryFrom<i64> for MenuChoice {
    type Error = i64;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        match n {
            1 => Ok(MenuChoice::AddBook),
            2 => Ok(MenuChoice::IssueBook),
            3 => Ok(MenuChoice::ReturnBook),
            4 => Ok(MenuChoice::ViewAll),
            5 => Ok(MenuChoice::SearchBook),
            6 => Ok(MenuChoice::Exit),
            _ => Err(n),
        }
    }
}

// NumberInput classifies a typed answer; any run of digits counts as a number
// even when it does not fit in an i64.
#[derive(Debug, PartialEq, Clone, Copy)]
pub enum NumberInput {
    Number(i64),
    OutOfRange,
    NotANumber,
}

impl From<&str> for NumberInput {
    fn from(s: &str) -> Self {
        let digits = s.strip_prefix(|c: char| c == '+' || c == '-').unwrap_or(s);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return NumberInput::NotANumber;
        }
        match s.parse::<i64>() {
            Ok(n) => NumberInput::Number(n),
            Err(_) => NumberInput::OutOfRange,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum ShellState {
    AwaitingChoice,
    Exited,
}

// ShellController drives the numbered menu over any line reader and writer.
// Every flow returns to AwaitingChoice except Exit.
pub struct ShellController<R, W> {
    catalog_service: Arc<dyn CatalogService>,
    reader: R,
    writer: W,
    state: ShellState,
}

impl<R, W> ShellController<R, W>
    where R: AsyncBufRead + Unpin + Send, W: AsyncWrite + Unpin + Send {
    pub fn new(catalog_service: Arc<dyn CatalogService>, reader: R, writer: W) -> Self {
        Self {
            catalog_service,
            reader,
            writer,
            state: ShellState::AwaitingChoice,
        }
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    pub async fn run(&mut self) -> LibraryResult<()> {
        while self.state == ShellState::AwaitingChoice {
            self.print_menu().await?;
            let choice = self.read_choice().await?;
            self.dispatch(choice).await?;
        }
        Ok(())
    }

    async fn dispatch(&mut self, choice: MenuChoice) -> LibraryResult<()> {
        match choice {
            MenuChoice::AddBook => self.add_book_flow().await,
            MenuChoice::IssueBook => self.issue_book_flow().await,
            MenuChoice::ReturnBook => self.return_book_flow().await,
            MenuChoice::ViewAll => self.view_all_flow().await,
            MenuChoice::SearchBook => self.search_book_flow().await,
            MenuChoice::Exit => {
                self.say("Exiting program...").await?;
                info!("Program exited by user");
                self.state = ShellState::Exited;
                Ok(())
            }
        }
    }

    async fn print_menu(&mut self) -> LibraryResult<()> {
        self.say("\n==== Library Management System ====").await?;
        self.say("1. Add Book").await?;
        self.say("2. Issue Book").await?;
        self.say("3. Return Book").await?;
        self.say("4. View All Books").await?;
        self.say("5. Search Book").await?;
        self.say("6. Exit").await
    }

    // blocks until a number between 1 and 6 is entered
    async fn read_choice(&mut self) -> LibraryResult<MenuChoice> {
        loop {
            let line = self.ask("Enter your choice (1-6): ").await?;
            match NumberInput::from(line.as_str()) {
                NumberInput::Number(n) => match MenuChoice::try_from(n) {
                    Ok(choice) => return Ok(choice),
                    Err(_) => self.say("Please enter number between 1 and 6.").await?,
                },
                NumberInput::OutOfRange => self.say("Please enter number between 1 and 6.").await?,
                NumberInput::NotANumber => self.say("Invalid input, please enter a number.").await?,
            }
        }
    }

    async fn add_book_flow(&mut self) -> LibraryResult<()> {
        self.say("\n--- Add Book ---").await?;
        let title = self.ask("Enter title: ").await?;
        let author = self.ask("Enter author name: ").await?;
        let isbn = self.ask("Enter ISBN: ").await?;
        if title.is_empty() || author.is_empty() || isbn.is_empty() {
            return self.say("All fields are compulsory.").await;
        }
        let req = AddBookCommandRequest::new(title.as_str(), author.as_str(), isbn.as_str());
        match AddBookCommand::new(self.catalog_service.clone()).execute(req).await {
            Ok(_) => self.say("Book added successfully.").await,
            Err(err) => self.say(error_message(&err).as_str()).await,
        }
    }

    async fn issue_book_flow(&mut self) -> LibraryResult<()> {
        self.say("\n--- Issue Book ---").await?;
        let isbn = self.ask("Enter ISBN to issue: ").await?;
        if isbn.is_empty() {
            return self.say("ISBN cannot be empty.").await;
        }
        let req = IssueBookCommandRequest::new(isbn.as_str());
        match IssueBookCommand::new(self.catalog_service.clone()).execute(req).await {
            Ok(_) => self.say("Book issued successfully.").await,
            Err(err) => self.say(error_message(&err).as_str()).await,
        }
    }

    async fn return_book_flow(&mut self) -> LibraryResult<()> {
        self.say("\n--- Return Book ---").await?;
        let isbn = self.ask("Enter ISBN to return: ").await?;
        if isbn.is_empty() {
            return self.say("ISBN cannot be empty.").await;
        }
        let req = ReturnBookCommandRequest::new(isbn.as_str());
        match ReturnBookCommand::new(self.catalog_service.clone()).execute(req).await {
            Ok(_) => self.say("Book returned successfully.").await,
            Err(err) => self.say(error_message(&err).as_str()).await,
        }
    }

    async fn view_all_flow(&mut self) -> LibraryResult<()> {
        self.say("\n--- All Books ---").await?;
        let books = match ListBooksCommand::new(self.catalog_service.clone())
            .execute(ListBooksCommandRequest {}).await {
            Ok(res) => res.books,
            Err(err) => return self.say(error_message(&err).as_str()).await,
        };
        if books.is_empty() {
            return self.say("No books in library yet.").await;
        }
        for (i, book) in books.iter().enumerate() {
            self.say(format!("{}. {}", i + 1, book).as_str()).await?;
        }
        Ok(())
    }

    async fn search_book_flow(&mut self) -> LibraryResult<()> {
        self.say("\n--- Search Book ---").await?;
        self.say("1. Search by Title").await?;
        self.say("2. Search by ISBN").await?;
        let line = self.ask("Enter your choice (1-2): ").await?;
        match NumberInput::from(line.as_str()) {
            NumberInput::Number(1) => self.search_by_title_flow().await,
            NumberInput::Number(2) => self.search_by_isbn_flow().await,
            NumberInput::Number(_) | NumberInput::OutOfRange => self.say("Wrong choice.").await,
            NumberInput::NotANumber => self.say("Invalid input.").await,
        }
    }

    async fn search_by_title_flow(&mut self) -> LibraryResult<()> {
        let keyword = self.ask("Enter title keyword: ").await?;
        if keyword.is_empty() {
            return self.say("Keyword cannot be empty.").await;
        }
        let req = SearchBooksCommandRequest { keyword };
        let books = match SearchBooksCommand::new(self.catalog_service.clone()).execute(req).await {
            Ok(res) => res.books,
            Err(err) => return self.say(error_message(&err).as_str()).await,
        };
        if books.is_empty() {
            return self.say("No books found.").await;
        }
        self.say(format!("Found {} book(s):", books.len()).as_str()).await?;
        self.say_books(&books).await
    }

    async fn search_by_isbn_flow(&mut self) -> LibraryResult<()> {
        let isbn = self.ask("Enter ISBN: ").await?;
        if isbn.is_empty() {
            return self.say("ISBN cannot be empty.").await;
        }
        let req = GetBookCommandRequest { isbn };
        match GetBookCommand::new(self.catalog_service.clone()).execute(req).await {
            Ok(res) => {
                self.say("Book found:").await?;
                self.say(res.book.to_string().as_str()).await
            }
            Err(CommandError::NotFound { .. }) => self.say("No book found.").await,
            Err(err) => self.say(error_message(&err).as_str()).await,
        }
    }

    async fn say_books(&mut self, books: &[BookEntity]) -> LibraryResult<()> {
        for book in books {
            self.say(book.to_string().as_str()).await?;
        }
        Ok(())
    }

    async fn say(&mut self, text: &str) -> LibraryResult<()> {
        write_line(&mut self.writer, text).await
    }

    async fn ask(&mut self, label: &str) -> LibraryResult<String> {
        prompt(&mut self.reader, &mut self.writer, label).await
    }
}

pub fn error_message(err: &CommandError) -> String {
    match err {
        CommandError::DuplicateKey { .. } => {
            "Book with this ISBN already exists.".to_string()
        }
        CommandError::NotFound { .. } => {
            "Book not found.".to_string()
        }
        CommandError::AlreadyIssued { .. } => {
            "Book is already issued.".to_string()
        }
        CommandError::NotIssued { .. } => {
            "Book was not issued.".to_string()
        }
        CommandError::Validation { message, .. } => {
            format!("Invalid input: {}.", message)
        }
        CommandError::Persistence { .. } => {
            "Some error happened, please check log file.".to_string()
        }
    }
}
