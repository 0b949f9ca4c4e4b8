//! File persistence for formatted messages
//!
//! Appending reads the whole existing file and rewrites the whole file with
//! the new messages attached. That costs O(file size) per call and the rewrite
//! is not atomic, but external readers observe full-content overwrites rather
//! than OS-level appends, and that behavior is kept as-is.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::FileError;
use crate::message::{messages_as_string, Message};

/// Create `path` as an empty file if it does not exist yet
///
/// Idempotent: existing content is never touched.
pub fn ensure_file(path: &Path) -> Result<(), FileError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .open(path)
        .map(|_| ())
        .map_err(|source| FileError::Create {
            path: path.to_path_buf(),
            source,
        })
}

/// Resolve a named file inside `dir`, creating it if absent
///
/// An empty name is rejected before any I/O happens.
pub fn file_in_dir(name: &str, dir: &Path) -> Result<PathBuf, FileError> {
    if name.is_empty() {
        return Err(FileError::EmptyFileName);
    }

    let path = dir.join(name);
    ensure_file(&path)?;
    Ok(path)
}

/// Write `messages` to `path`, keeping existing content when `append` is set
///
/// The file is created if absent. With `append`, the existing content is read
/// back line by line and reconstructed with one newline per line; the colorless
/// rendering of `messages` is attached after it; the file is then overwritten
/// with the combined content in a single write.
pub fn write_messages(messages: &[Message], path: &Path, append: bool) -> Result<(), FileError> {
    ensure_file(path)?;

    let mut content = String::new();

    if append {
        let file = File::open(path).map_err(|source| FileError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|source| FileError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            content.push_str(&line);
            content.push('\n');
        }
    }

    // The new fragment carries no trailing newline of its own, so the
    // previously-read content (newline-terminated above) is never trimmed.
    content.push_str(&messages_as_string(messages, false));

    fs::write(path, content).map_err(|source| FileError::Write {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::Severity;
    use tempfile::TempDir;

    fn info(payload: &str) -> Message {
        Message::new(payload, Severity::Info, false)
    }

    #[test]
    fn test_ensure_file_creates_empty_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.txt");

        ensure_file(&path).unwrap();

        assert!(path.exists());
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
    }

    #[test]
    fn test_ensure_file_never_truncates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, "existing content\n").unwrap();

        ensure_file(&path).unwrap();
        ensure_file(&path).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "existing content\n");
    }

    #[test]
    fn test_ensure_file_reports_missing_parent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("log.txt");

        let err = ensure_file(&path).unwrap_err();
        assert!(matches!(err, FileError::Create { .. }));
    }

    #[test]
    fn test_file_in_dir_rejects_empty_name() {
        let dir = TempDir::new().unwrap();

        let err = file_in_dir("", dir.path()).unwrap_err();
        assert!(matches!(err, FileError::EmptyFileName));
    }

    #[test]
    fn test_file_in_dir_creates_named_file() {
        let dir = TempDir::new().unwrap();

        let path = file_in_dir("events.log", dir.path()).unwrap();

        assert_eq!(path, dir.path().join("events.log"));
        assert!(path.exists());
    }

    #[test]
    fn test_append_keeps_existing_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, "A\n").unwrap();

        let message = info("B");
        write_messages(std::slice::from_ref(&message), &path, true).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("A\n{}", message.format(false))
        );
    }

    #[test]
    fn test_append_twice_keeps_one_message_per_line() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.txt");

        let first = info("first");
        let second = info("second");
        write_messages(std::slice::from_ref(&first), &path, true).unwrap();
        write_messages(std::slice::from_ref(&second), &path, true).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            format!("{}\n{}", first.format(false), second.format(false))
        );
    }

    #[test]
    fn test_empty_append_leaves_content_unchanged() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, "A\nB\n").unwrap();

        write_messages(&[], &path, true).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "A\nB\n");
    }

    #[test]
    fn test_overwrite_replaces_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.txt");
        fs::write(&path, "old content\n").unwrap();

        let message = info("fresh start");
        write_messages(std::slice::from_ref(&message), &path, false).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), message.format(false));
    }

    #[test]
    fn test_written_lines_are_colorless() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("log.txt");

        let message = Message::new("no color on disk", Severity::Error, false);
        write_messages(std::slice::from_ref(&message), &path, true).unwrap();

        assert!(!fs::read_to_string(&path).unwrap().contains('\u{1b}'));
    }
}
