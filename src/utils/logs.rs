use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoLocal;
use crate::core::library::{LibraryError, LibraryResult};

pub const LOG_TIME_FMT: &str = "%Y-%m-%d %H:%M:%S,%3f";

// installs the process-wide subscriber; every component logs through the
// tracing macros into the same appended file
pub fn setup_tracing(log_file: &Path) -> LibraryResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file)?;
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        // disable printing the name of the module in every log line.
        .with_target(false)
        // the log is a plain text file, colour codes would only add noise.
        .with_ansi(false)
        .with_timer(ChronoLocal::new(LOG_TIME_FMT.to_string()))
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| LibraryError::runtime(
            format!("tracing setup failed {}", err).as_str(), None))
}
