//! Named message dispatchers
//!
//! A [`Logger`] fans each added message out to up to three destinations:
//! stdout (colored), its in-memory buffer, and its target file. Each
//! destination is gated by an explicit per-call boolean or by the logger's
//! stored default flags.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};

use crate::config::DEFAULT_FILE_NAME;
use crate::error::FileError;
use crate::message::{messages_as_string, Message, Severity};
use crate::persist;

/// Default behavior flags consulted when a call site passes no explicit
/// per-call booleans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchDefaults {
    /// Print new messages to stdout.
    pub print: bool,
    /// Retain new messages in the buffer.
    pub store: bool,
    /// Append new messages to the target file.
    pub write_to_file: bool,
    /// Pass new messages to the registered handler.
    pub notify_handler: bool,
}

/// Callback invoked with a dispatched message when notification is requested.
pub type MessageHandler = Box<dyn FnMut(&Message) + Send>;

/// A named log dispatcher
///
/// Every operation is synchronous and blocking, and the struct performs no
/// internal locking: sharing one `Logger` across threads requires external
/// serialization (one logger per worker, or a mutex wrapper like the one
/// [`Logger::shared`] returns). A slow file system stalls the calling thread.
pub struct Logger {
    name: String,
    buffer: Vec<Message>,
    directory: Option<PathBuf>,
    file: Option<PathBuf>,
    defaults: DispatchDefaults,
    handler: Option<MessageHandler>,
}

static SHARED: OnceLock<Mutex<Logger>> = OnceLock::new();

impl Logger {
    /// Create a new logger with the given name
    ///
    /// Names are labels, not identities: instances are unconnected and names
    /// need not be unique.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            buffer: Vec::new(),
            directory: None,
            file: None,
            defaults: DispatchDefaults::default(),
            handler: None,
        }
    }

    /// Get the process-wide shared logger, created on first access
    ///
    /// The mutex is the external serialization wrapper the concurrency
    /// contract requires; every other logger is privately owned by its
    /// creator.
    pub fn shared() -> &'static Mutex<Logger> {
        SHARED.get_or_init(|| Mutex::new(Logger::new("root")))
    }

    /// The name of this logger
    pub fn name(&self) -> &str {
        &self.name
    }

    // === Target directory ===

    /// Set the directory used when resolving a default target file
    pub fn set_directory(&mut self, directory: impl Into<PathBuf>) {
        self.directory = Some(directory.into());
    }

    /// Point the target directory at the process working directory
    pub fn set_directory_to_current(&mut self) {
        self.directory = Some(current_directory());
    }

    /// The target directory, if one has been resolved or set
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    /// The target directory, falling back to the process working directory on
    /// first use
    pub fn resolve_directory(&mut self) -> PathBuf {
        match &self.directory {
            Some(directory) => directory.clone(),
            None => {
                let directory = current_directory();
                self.directory = Some(directory.clone());
                directory
            }
        }
    }

    // === Target file ===

    /// Set the target file, creating it if it does not exist yet
    pub fn set_file(&mut self, path: impl Into<PathBuf>) -> Result<(), FileError> {
        let path = path.into();
        persist::ensure_file(&path)?;
        self.file = Some(path);
        Ok(())
    }

    /// Set the target file by name
    ///
    /// With `in_directory` the name is resolved inside the logger's target
    /// directory (falling back to the working directory); otherwise it is
    /// used as a path as given. An empty name is a configuration error.
    pub fn set_file_name(&mut self, name: &str, in_directory: bool) -> Result<(), FileError> {
        if name.is_empty() {
            return Err(FileError::EmptyFileName);
        }

        let path = if in_directory {
            self.resolve_directory().join(name)
        } else {
            PathBuf::from(name)
        };
        self.set_file(path)
    }

    /// The target file, if one has been resolved or set
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// The target file, resolved on first use
    ///
    /// When no file was set explicitly, the default file name inside the
    /// target directory is used and the file is created once.
    pub fn resolve_file(&mut self) -> Result<PathBuf, FileError> {
        match &self.file {
            Some(path) => Ok(path.clone()),
            None => {
                let directory = self.resolve_directory();
                let path = persist::file_in_dir(DEFAULT_FILE_NAME, &directory)?;
                self.file = Some(path.clone());
                Ok(path)
            }
        }
    }

    // === Defaults and handler ===

    /// The stored default flags
    pub fn defaults(&self) -> DispatchDefaults {
        self.defaults
    }

    /// Replace the stored default flags
    pub fn set_defaults(&mut self, defaults: DispatchDefaults) {
        self.defaults = defaults;
    }

    /// Register the handler invoked on notify dispatches
    ///
    /// Failures inside the handler are the handler's responsibility; the
    /// logger does not catch them.
    pub fn set_handler(&mut self, handler: impl FnMut(&Message) + Send + 'static) {
        self.handler = Some(Box::new(handler));
    }

    /// Remove the registered handler
    pub fn clear_handler(&mut self) {
        self.handler = None;
    }

    // === Dispatch ===

    /// Add a message, running each side effect its flag requests
    ///
    /// Effects run in a fixed order: print the colored rendering to stdout,
    /// append to the buffer, append to the target file, notify the handler.
    /// A failure on the file path never reaches the caller: it is converted
    /// into a new error message dispatched with print and store only, so the
    /// recovery cannot recurse into the file again.
    pub fn dispatch(
        &mut self,
        message: Message,
        print: bool,
        store: bool,
        write_to_file: bool,
        notify: bool,
    ) {
        if print {
            println!("{}", message.format(true));
        }

        if store {
            self.buffer.push(message.clone());
        }

        if write_to_file {
            if let Err(err) = self.append_message_to_file(&message) {
                tracing::warn!("log file write failed: {err}");
                let report = Message::new(
                    format!("could not write message to log file: {err}"),
                    Severity::Error,
                    true,
                );
                self.dispatch(report, true, true, false, false);
            }
        }

        if notify {
            if let Some(handler) = self.handler.as_mut() {
                handler(&message);
            }
        }
    }

    /// Add a message with explicit print/store/write flags
    ///
    /// The registered handler is not notified; use [`Logger::dispatch`] or the
    /// default flags for that.
    pub fn add_message(&mut self, message: Message, print: bool, store: bool, write_to_file: bool) {
        self.dispatch(message, print, store, write_to_file, false);
    }

    /// Add a message using the stored default flags
    pub fn log(&mut self, message: Message) {
        let defaults = self.defaults;
        self.dispatch(
            message,
            defaults.print,
            defaults.store,
            defaults.write_to_file,
            defaults.notify_handler,
        );
    }

    fn append_message_to_file(&mut self, message: &Message) -> Result<(), FileError> {
        let path = self.resolve_file()?;
        persist::write_messages(std::slice::from_ref(message), &path, true)
    }

    // === Buffer queries ===

    /// All retained messages, in insertion order
    pub fn stored_messages(&self) -> &[Message] {
        &self.buffer
    }

    /// Retained messages of one severity, preserving insertion order
    pub fn messages_of_severity(&self, severity: Severity) -> Vec<&Message> {
        self.buffer
            .iter()
            .filter(|m| m.severity() == severity)
            .collect()
    }

    /// Retained messages whose severity is any of `severities`, preserving
    /// insertion order
    pub fn messages_of_severities(&self, severities: &[Severity]) -> Vec<&Message> {
        self.buffer
            .iter()
            .filter(|m| severities.contains(&m.severity()))
            .collect()
    }

    /// Render all retained messages joined by newlines
    pub fn stored_messages_as_string(&self, include_color: bool) -> String {
        messages_as_string(&self.buffer, include_color)
    }

    /// Print every retained message (colored) to stdout, in order
    pub fn print_stored_messages(&mut self, clear_after: bool) {
        for message in &self.buffer {
            println!("{}", message.format(true));
        }
        if clear_after {
            self.clear_messages();
        }
    }

    /// Drop all retained messages
    pub fn clear_messages(&mut self) {
        self.buffer.clear();
    }

    // === File output ===

    /// Write the retained messages to the target file
    ///
    /// The target is resolved lazily like on dispatch. With `append`, existing
    /// file content is kept in front of the new messages. The buffer is
    /// cleared only after a fully successful write.
    pub fn write_stored_messages(
        &mut self,
        append: bool,
        clear_after_write: bool,
    ) -> Result<(), FileError> {
        let path = self.resolve_file()?;
        persist::write_messages(&self.buffer, &path, append)?;

        if clear_after_write {
            self.clear_messages();
        }
        Ok(())
    }

    /// Write the retained messages to `path`, making it the target file
    pub fn write_stored_messages_to(
        &mut self,
        path: impl Into<PathBuf>,
        append: bool,
        clear_after_write: bool,
    ) -> Result<(), FileError> {
        self.set_file(path)?;
        self.write_stored_messages(append, clear_after_write)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("buffered", &self.buffer.len())
            .field("directory", &self.directory)
            .field("file", &self.file)
            .field("defaults", &self.defaults)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// The process working directory, or `.` if it cannot be determined.
fn current_directory() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|err| {
        tracing::warn!("could not determine the working directory, using '.': {err}");
        PathBuf::from(".")
    })
}
