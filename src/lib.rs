//! Logbook - per-instance buffered logging with console color and file output
//!
//! Each [`Logger`] is a named dispatcher: adding a [`Message`] fans out to a
//! colored line on stdout, to the logger's in-memory buffer, and to an append
//! on its target file. Each destination is gated by an explicit per-call
//! boolean or by the logger's stored default flags.
//!
//! ```no_run
//! use logbook::{Logger, Message, Severity};
//!
//! let mut logger = Logger::new("app");
//! logger.add_message(Message::new("ready", Severity::Info, false), true, true, false);
//! assert_eq!(logger.stored_messages().len(), 1);
//! ```
//!
//! Loggers are not internally synchronized; share one across threads only
//! behind an external mutex, or use [`Logger::shared`].

pub mod config;
pub mod error;
pub mod logger;
pub mod message;
pub mod persist;

pub use config::{Settings, DEFAULT_FILE_NAME};
pub use error::FileError;
pub use logger::{DispatchDefaults, Logger, MessageHandler};
pub use message::{messages_as_string, Message, Severity};
