//! Log sinks
//!
//! Access/info lines go to stdout or an access log file, errors and warnings
//! to stderr or an error log file. Installed once, process-wide.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

use super::LogLevel;

static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

enum Sink {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

impl Sink {
    /// Append to `path` if given, otherwise use the console `fallback`
    fn open(path: Option<&str>, fallback: Self) -> io::Result<Self> {
        let Some(path) = path else {
            return Ok(fallback);
        };

        let path = Path::new(path);
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::File(Mutex::new(file)))
    }

    fn line(&self, message: &str) {
        match self {
            Self::Stdout => println!("{message}"),
            Self::Stderr => eprintln!("{message}"),
            Self::File(file) => {
                // A poisoned lock or full disk drops the line rather than the request
                if let Ok(mut f) = file.lock() {
                    let _ = writeln!(f, "{message}");
                }
            }
        }
    }
}

pub struct LogWriter {
    access: Sink,
    error: Sink,
    level: LogLevel,
}

impl LogWriter {
    fn new(
        access_log_file: Option<&str>,
        error_log_file: Option<&str>,
        level: LogLevel,
    ) -> io::Result<Self> {
        Ok(Self {
            access: Sink::open(access_log_file, Sink::Stdout)?,
            error: Sink::open(error_log_file, Sink::Stderr)?,
            level,
        })
    }

    /// Info lines share the access sink
    pub fn write_info(&self, message: &str) {
        self.access.line(message);
    }

    pub fn write_access(&self, message: &str) {
        self.access.line(message);
    }

    pub fn write_error(&self, message: &str) {
        self.error.line(message);
    }

    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

/// Install the process-wide writer; fails if a log file cannot be opened
/// or a writer is already installed
pub fn init(
    access_log_file: Option<&str>,
    error_log_file: Option<&str>,
    level: LogLevel,
) -> io::Result<()> {
    let writer = LogWriter::new(access_log_file, error_log_file, level)?;
    LOG_WRITER
        .set(writer)
        .map_err(|_| io::Error::new(io::ErrorKind::AlreadyExists, "log writer already initialized"))
}

/// The installed writer; `None` before `init`, in which case callers print to the console
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_sink_appends_and_creates_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs/access.log");

        let writer = LogWriter::new(path.to_str(), None, LogLevel::Info).unwrap();
        writer.write_access("GET /blockchain 200");
        writer.write_info("started");

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, "GET /blockchain 200\nstarted\n");
    }

    #[test]
    fn test_console_fallback() {
        let writer = LogWriter::new(None, None, LogLevel::Warn).unwrap();
        assert!(matches!(writer.access, Sink::Stdout));
        assert!(matches!(writer.error, Sink::Stderr));
        assert_eq!(writer.level(), LogLevel::Warn);
    }
}
