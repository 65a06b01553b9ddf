//! Test utilities for creating, growing and rotating temporary log files.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

pub struct TempLogFile {
    pub path: PathBuf,
    _temp_dir: tempfile::TempDir,
}

impl TempLogFile {
    /// Create a new temporary log file for testing
    pub fn new() -> std::io::Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("test.log");

        File::create(&path)?;

        Ok(Self {
            path,
            _temp_dir: temp_dir,
        })
    }

    /// Create a temporary log file with initial content
    pub fn with_content(content: &str) -> std::io::Result<Self> {
        let temp_file = Self::new()?;
        temp_file.append_content(content)?;
        Ok(temp_file)
    }

    /// Append a line to the temporary log file
    pub fn append_content(&self, content: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().append(true).open(&self.path)?;

        writeln!(file, "{}", content)?;
        file.flush()?;
        Ok(())
    }

    /// Append bytes exactly as given, without a trailing newline
    pub fn append_raw(&self, content: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        file.write_all(content.as_bytes())?;
        file.flush()?;
        Ok(())
    }

    /// Truncate the file in place (copy-truncate rotation)
    pub fn truncate(&self) -> std::io::Result<()> {
        File::create(&self.path)?;
        Ok(())
    }

    /// Move the file away without creating a replacement
    pub fn rotate_away(&self) -> std::io::Result<PathBuf> {
        let rotated = self.path.with_extension("log.1");
        fs::rename(&self.path, &rotated)?;
        Ok(rotated)
    }

    /// Rename the file to `test.log.1` and create an empty replacement
    pub fn rotate(&self) -> std::io::Result<PathBuf> {
        let rotated = self.rotate_away()?;
        File::create(&self.path)?;
        Ok(rotated)
    }

    /// Remove the file and create an empty replacement at the same path
    pub fn replace(&self) -> std::io::Result<()> {
        fs::remove_file(&self.path)?;
        File::create(&self.path)?;
        Ok(())
    }

    /// Get the path to the temporary file
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_log_file_creation() {
        let temp_file = TempLogFile::new().unwrap();
        assert!(temp_file.path().exists());
    }

    #[test]
    fn test_temp_log_file_with_content() {
        let content = "test line";
        let temp_file = TempLogFile::with_content(content).unwrap();

        let file_content = fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(file_content, "test line\n");
    }

    #[test]
    fn test_append_raw() {
        let temp_file = TempLogFile::new().unwrap();
        temp_file.append_raw("hello, ").unwrap();
        temp_file.append_raw("world!").unwrap();

        let content = fs::read_to_string(temp_file.path()).unwrap();
        assert_eq!(content, "hello, world!");
    }

    #[test]
    fn test_truncate() {
        let temp_file = TempLogFile::with_content("initial content").unwrap();
        temp_file.truncate().unwrap();

        let content = fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.is_empty());
    }

    #[test]
    fn test_rotate_keeps_old_content_aside() {
        let temp_file = TempLogFile::with_content("old line").unwrap();
        let rotated = temp_file.rotate().unwrap();

        assert_eq!(rotated.file_name().unwrap(), "test.log.1");
        assert_eq!(fs::read_to_string(&rotated).unwrap(), "old line\n");
        assert!(fs::read_to_string(temp_file.path()).unwrap().is_empty());
    }

    #[test]
    fn test_rotate_away_leaves_path_empty() {
        let temp_file = TempLogFile::with_content("old line").unwrap();
        temp_file.rotate_away().unwrap();

        assert!(!temp_file.path().exists());
    }
}
