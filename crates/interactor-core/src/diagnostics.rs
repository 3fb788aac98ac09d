//! Textual diagnostics for invocations.
//!
//! Every invocation writes one line before its body and one or two lines
//! after it to a [`DiagnosticSink`]:
//!
//! ```text
//! Executing interaction UpdateUser (id#1f2e3d4c) inputs: {email: "a@b.c", user: <User>}
//!  ↳ outcome: failed (id#1f2e3d4c)
//!  ↳ errors: {"email":[{"error":"taken"}]} (id#1f2e3d4c)
//! ```
//!
//! Nested invocations are indented by their depth and name their caller.
//! Sink failures are swallowed; diagnostics never change an outcome.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use interactor_errors::ErrorCollection;
use interactor_filters::InputSet;

use crate::frame::Frame;

pub const TRUNCATION_MARKER: &str = "\n... [inputs truncated] ...\n";

/// Receives diagnostic lines.
pub trait DiagnosticSink: Send + Sync {
    fn write_line(&self, line: &str) -> io::Result<()>;
}

/// Discards every line. The default sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn write_line(&self, _line: &str) -> io::Result<()> {
        Ok(())
    }
}

/// Forwards lines to `tracing` at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        tracing::debug!(target: "interactor::diagnostics", "{line}");
        Ok(())
    }
}

/// Writes lines to any writer, e.g. stderr or a log file.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl WriterSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> DiagnosticSink for WriterSink<W> {
    fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "diagnostic writer poisoned"))?;
        writeln!(writer, "{line}")?;
        writer.flush()
    }
}

/// Keeps lines in memory. Clones share the same buffer.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().map(|lines| lines.clone()).unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn write_line(&self, line: &str) -> io::Result<()> {
        self.lines
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "memory sink poisoned"))?
            .push(line.to_string());
        Ok(())
    }
}

/// Formats lifecycle lines and hands them to a sink.
#[derive(Clone)]
pub struct Diagnostics {
    sink: Arc<dyn DiagnosticSink>,
    indent_width: usize,
    max_inputs_len: Option<usize>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new(Arc::new(NoopSink))
    }
}

impl Diagnostics {
    pub fn new(sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            sink,
            indent_width: 2,
            max_inputs_len: None,
        }
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Truncate rendered inputs longer than `max` characters in the middle.
    pub fn with_max_inputs_len(mut self, max: Option<usize>) -> Self {
        self.max_inputs_len = max;
        self
    }

    pub(crate) fn before(&self, frame: &Frame, inputs: &InputSet<'_>) {
        let mut line = format!("Executing interaction {} {}", frame.name(), frame.id_marker());
        if !frame.chain().is_empty() {
            line.push_str(&format!(" ↳ called from {}", frame.chain().join(" > ")));
        }
        let rendered = inputs.to_string();
        let rendered = match self.max_inputs_len {
            Some(max) => truncate_middle(&rendered, max),
            None => rendered,
        };
        line.push_str(&format!(" ↳ inputs: {rendered}"));
        self.emit(frame, &line);
    }

    pub(crate) fn after(&self, frame: &Frame, errors: &ErrorCollection) {
        let marker = frame.id_marker();
        if errors.is_empty() {
            self.emit(frame, &format!(" ↳ outcome: succeeded {marker}"));
        } else {
            self.emit(frame, &format!(" ↳ outcome: failed {marker}"));
            self.emit(frame, &format!(" ↳ errors: {} {marker}", errors.details_json()));
        }
    }

    fn emit(&self, frame: &Frame, text: &str) {
        let indent = " ".repeat(self.indent_width * frame.depth());
        if let Err(err) = self.sink.write_line(&format!("{indent}{text}")) {
            tracing::trace!(error = %err, "diagnostic sink rejected a line");
        }
    }
}

/// Keep the head and tail of `text`, replacing the middle with
/// [`TRUNCATION_MARKER`] so that the result has at most `max` characters
/// plus the marker.
pub fn truncate_middle(text: &str, max: usize) -> String {
    let len = text.chars().count();
    if len <= max {
        return text.to_string();
    }
    let head = max / 2;
    let tail = max - head;
    let start: String = text.chars().take(head).collect();
    let end: String = text.chars().skip(len - tail).collect();
    format!("{start}{TRUNCATION_MARKER}{end}")
}
