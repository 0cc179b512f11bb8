//! Log subscriber setup
//!
//! While serving MCP, stdout carries the protocol, so logs go to
//! `~/.meraki-mcp/mcp.log` (or stderr if the file cannot be opened). Other
//! commands log to stderr. `RUST_LOG` overrides the level picked from the
//! command-line flags.

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Directory under the home directory holding the log file
pub const LOG_DIR_NAME: &str = ".meraki-mcp";

/// Default log file name
pub const DEFAULT_LOG_FILE: &str = "mcp.log";

/// Environment variable overriding the log file name
pub const LOG_FILE_ENV: &str = "MERAKI_MCP_LOG_FILE";

/// A thread-safe writer that flushes and syncs after every write.
///
/// Log lines are on disk as soon as they are written, so the log can be
/// tailed while an MCP client drives the server.
pub struct FileWriterGuard {
    file: Arc<Mutex<File>>,
}

impl FileWriterGuard {
    /// Creates a new `FileWriterGuard` wrapping the given file.
    pub fn new(file: Arc<Mutex<File>>) -> Self {
        Self { file }
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, File>> {
        self.file
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log file lock poisoned"))
    }
}

impl Write for FileWriterGuard {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file = self.lock()?;
        let result = file.write(buf)?;
        file.flush()?;
        file.sync_all()?;
        Ok(result)
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file = self.lock()?;
        file.flush()?;
        file.sync_all()?;
        Ok(())
    }
}

/// Default filter directive for the verbosity flags
pub fn default_directive(verbose: bool, debug: bool, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else if debug {
        "debug"
    } else if verbose {
        "trace"
    } else {
        "info"
    }
}

/// Where the serve command writes its log
pub fn log_file_path() -> PathBuf {
    let log_dir = dirs::home_dir()
        .map(|home| home.join(LOG_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(LOG_DIR_NAME));

    let file_name = std::env::var(LOG_FILE_ENV)
        .ok()
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_LOG_FILE.to_string());

    log_dir.join(file_name)
}

fn open_log_file(path: &PathBuf) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
}

/// Install the global subscriber
///
/// With `to_file` set, logs go to [`log_file_path`], falling back to stderr.
pub fn init_logging(directive: &str, to_file: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

    if to_file {
        let path = log_file_path();
        match open_log_file(&path) {
            Ok(file) => {
                let shared_file = Arc::new(Mutex::new(file));
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_writer(move || FileWriterGuard::new(shared_file.clone()))
                    .with_ansi(false)
                    .init();
                return;
            }
            Err(e) => {
                eprintln!("Failed to open log file {}, using stderr: {e}", path.display());
            }
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Read;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false, false, false), "info");
        assert_eq!(default_directive(true, false, false), "trace");
        assert_eq!(default_directive(false, true, false), "debug");
        assert_eq!(default_directive(true, true, true), "error");
    }

    #[test]
    #[serial]
    fn test_log_file_path_override() {
        std::env::set_var(LOG_FILE_ENV, "serve-debug.log");
        let path = log_file_path();
        std::env::remove_var(LOG_FILE_ENV);

        assert!(path.ends_with(format!("{LOG_DIR_NAME}/serve-debug.log")));
        assert!(log_file_path().ends_with(format!("{LOG_DIR_NAME}/{DEFAULT_LOG_FILE}")));
    }

    #[test]
    fn test_file_writer_guard_writes_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("mcp.log");
        let file = open_log_file(&path).unwrap();

        let mut guard = FileWriterGuard::new(Arc::new(Mutex::new(file)));
        guard.write_all(b"first line\n").unwrap();
        guard.flush().unwrap();

        let mut contents = String::new();
        File::open(&path)
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "first line\n");
    }
}
