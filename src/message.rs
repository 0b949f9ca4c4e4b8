//! Immutable log message records and their console formatting
//!
//! A [`Message`] captures one log event: its text payload, a fixed severity,
//! and optionally a description of the call site that produced it.

/// Terminal escape sequence that resets the console color.
pub const ANSI_RESET: &str = "\u{1b}[0m";

/// Severity of a log message
///
/// The set is closed; each variant carries a fixed display label and the ANSI
/// color its console rendering starts with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
    Info,
    Debug,
    Trace,
    Unknown,
}

/// Fixed display metadata for one severity.
struct SeverityStyle {
    label: &'static str,
    color: &'static str,
}

impl Severity {
    const fn style(self) -> SeverityStyle {
        match self {
            Severity::Error => SeverityStyle {
                label: "ERROR!!",
                color: "\u{1b}[31m",
            },
            Severity::Warning => SeverityStyle {
                label: "WARNING!",
                color: "\u{1b}[33m",
            },
            Severity::Info => SeverityStyle {
                label: "Info",
                color: "\u{1b}[32m",
            },
            Severity::Debug => SeverityStyle {
                label: "Debug",
                color: "\u{1b}[34m",
            },
            Severity::Trace => SeverityStyle {
                label: "Trace",
                color: "\u{1b}[35m",
            },
            Severity::Unknown => SeverityStyle {
                label: "Unknown",
                color: "\u{1b}[36m",
            },
        }
    }

    /// Get the display label for this severity
    pub const fn label(self) -> &'static str {
        self.style().label
    }

    /// Get the ANSI escape that starts this severity's console color
    pub const fn color(self) -> &'static str {
        self.style().color
    }
}

/// A single log message
///
/// Immutable once constructed: the payload, severity and optional source are
/// fixed at creation time.
#[derive(Debug, Clone)]
pub struct Message {
    payload: String,
    severity: Severity,
    source: Option<String>,
}

impl Message {
    /// Create a new message
    ///
    /// With `capture_source`, a description of the current call stack's
    /// root-most frame is captured eagerly. Note that this is the frame
    /// closest to the *root* of the stack, not the immediate caller.
    pub fn new(payload: impl Into<String>, severity: Severity, capture_source: bool) -> Self {
        Self {
            payload: payload.into(),
            severity,
            source: capture_source.then(outermost_call_site),
        }
    }

    /// The text content of this message
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// The severity of this message
    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// The call-site description, if one was captured at construction
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Render this message as a single line
    ///
    /// Output is `label[ from source] - payload`, wrapped in the severity's
    /// color escape pair when `include_color` is set. The payload is emitted
    /// verbatim, including any embedded newlines or control characters.
    pub fn format(&self, include_color: bool) -> String {
        let mut out = String::new();

        if include_color {
            out.push_str(self.severity.color());
        }

        out.push_str(self.severity.label());

        if let Some(source) = &self.source {
            out.push_str(" from ");
            out.push_str(source);
        }

        out.push_str(" - ");
        out.push_str(&self.payload);

        if include_color {
            out.push_str(ANSI_RESET);
        }

        out
    }
}

/// Render `messages` joined by newlines, without a trailing newline
///
/// An empty slice produces an empty string.
pub fn messages_as_string(messages: &[Message], include_color: bool) -> String {
    messages
        .iter()
        .map(|m| m.format(include_color))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Describe the frame closest to the root of the current call stack.
///
/// Walks the captured stack outermost-first and returns the first frame with a
/// resolvable symbol. The result is never empty: if no frame symbolizes (e.g.
/// stripped builds), the outermost frame's address is described instead.
fn outermost_call_site() -> String {
    let trace = backtrace::Backtrace::new();

    for frame in trace.frames().iter().rev() {
        for symbol in frame.symbols() {
            if let Some(name) = symbol.name() {
                let mut description = name.to_string();
                if let (Some(file), Some(line)) = (symbol.filename(), symbol.lineno()) {
                    description.push_str(&format!(" ({}:{})", file.display(), line));
                }
                return description;
            }
        }
    }

    match trace.frames().last() {
        Some(frame) => format!("unresolved frame at {:p}", frame.ip()),
        None => "unresolved call stack".to_string(),
    }
}
