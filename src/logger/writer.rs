//! Access log writer
//!
//! Process-wide sink for access log lines, either stdout or an append-mode
//! file. Application logs go through `tracing` instead.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Global access log writer instance
static ACCESS_WRITER: OnceLock<AccessWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stdout,
    File(File),
}

/// Thread-safe access log writer
pub struct AccessWriter {
    target: Mutex<LogTarget>,
}

impl AccessWriter {
    fn new(access_log_file: Option<&str>) -> io::Result<Self> {
        let target = match access_log_file {
            Some(path) => LogTarget::File(open_log_file(path)?),
            None => LogTarget::Stdout,
        };
        Ok(Self {
            target: Mutex::new(target),
        })
    }

    /// Write one line
    pub fn write_line(&self, message: &str) {
        let Ok(mut target) = self.target.lock() else {
            return;
        };
        match &mut *target {
            LogTarget::Stdout => println!("{message}"),
            LogTarget::File(file) => {
                if let Err(e) = writeln!(file, "{message}") {
                    tracing::warn!(error = %e, "access log write failed");
                }
            }
        }
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    // Create parent directories if they don't exist
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the global access writer
///
/// Returns error if the log file cannot be opened or the writer was
/// already set up.
pub fn init(access_log_file: Option<&str>) -> io::Result<()> {
    let writer = AccessWriter::new(access_log_file)?;
    ACCESS_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Access log writer already initialized",
        )
    })
}

/// Get the global writer, if initialized
pub fn get() -> Option<&'static AccessWriter> {
    ACCESS_WRITER.get()
}
