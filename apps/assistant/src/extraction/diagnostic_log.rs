use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::Mutex;

/// Append-only sink for model output that could not be parsed.
pub trait DiagnosticLog: Send + Sync {
    /// Appends one line. `line` never contains a newline.
    fn append(&self, line: &str) -> io::Result<()>;
}

/// Appends to a plain-text file, opening and closing it on every write.
#[derive(Debug, Clone)]
pub struct FileDiagnosticLog {
    path: PathBuf,
}

impl FileDiagnosticLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DiagnosticLog for FileDiagnosticLog {
    fn append(&self, line: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{line}")
    }
}

/// In-memory sink used by tests in place of the log file.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryDiagnosticLog {
    lines: Mutex<Vec<String>>,
}

#[cfg(test)]
impl MemoryDiagnosticLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[cfg(test)]
impl DiagnosticLog for MemoryDiagnosticLog {
    fn append(&self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(line.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_log_appends_newline_terminated_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = FileDiagnosticLog::new(dir.path().join("logs").join("log_llm.txt"));

        log.append("first failure").unwrap();
        log.append("second failure").unwrap();

        let contents = fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents, "first failure\nsecond failure\n");
    }

    #[test]
    fn test_file_log_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("log_llm.txt");
        fs::write(&path, "earlier run\n").unwrap();

        FileDiagnosticLog::new(&path).append("this run").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "earlier run\nthis run\n");
    }

    #[test]
    fn test_file_log_write_failure_surfaces() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be opened for appending.
        let log = FileDiagnosticLog::new(dir.path());
        assert!(log.append("lost").is_err());
    }

    #[test]
    fn test_memory_log_records_in_order() {
        let log = MemoryDiagnosticLog::new();
        log.append("a").unwrap();
        log.append("b").unwrap();
        assert_eq!(log.lines(), vec!["a".to_string(), "b".to_string()]);
    }
}
