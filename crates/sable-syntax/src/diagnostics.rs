//! Error collection and rendering.
//!
//! A [`Diagnostics`] context belongs to one source file. The lexer and parser
//! report into it as they go; records are rendered when [`Diagnostics::finalize`]
//! runs, as soon as a fatal record is submitted, or when the context is
//! dropped, whichever comes first. Each record is rendered exactly once.
//!
//! Rendered output looks like this (colors omitted):
//!
//! ```text
//! ERROR: main.sbl at line 2, column 9
//!  1 | var x : int = 1;
//!  2 | return (x + ;
//!    |             ^ expected another expression term
//!  3 | end
//! ```

use std::cell::{Cell, RefCell};
use std::fmt::{self, Write as _};
use std::io::{self, Write as _};

use tracing::debug;

use crate::error::{Error, Result};
use crate::source::SourceFile;
use crate::span::Span;
use crate::token::TokenKind;
use crate::vector::Vector;

const HEADER: &str = "\x1b[1;31m";
const HEADER_TEXT: &str = "\x1b[37m";
const GUTTER: &str = "\x1b[1;36m";
const UNDERLINE: &str = "\x1b[1;35m";
const RESET: &str = "\x1b[0m";

/// How diagnostics are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiagnosticsConfig {
    /// Lines of context printed above and below the offending line.
    pub context_lines: usize,
    /// Emit ANSI color escapes.
    pub color: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            context_lines: 1,
            color: false,
        }
    }
}

impl DiagnosticsConfig {
    #[must_use]
    pub fn with_context_lines(mut self, lines: usize) -> Self {
        self.context_lines = lines;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }
}

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Message {
    #[default]
    InvalidSymbol,
    /// A specific token was required.
    ExpectedToken(TokenKind),
    /// A construct was required, e.g. "a valid type".
    Expected(&'static str),
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSymbol => f.write_str("invalid symbol"),
            Self::ExpectedToken(kind) => write!(f, "expected {}", kind.describe()),
            Self::Expected(what) => write!(f, "expected {what}"),
        }
    }
}

/// One located error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Diagnostic {
    /// 1-indexed line.
    pub row: usize,
    /// 1-indexed byte column.
    pub column: usize,
    /// Length of the offending text in bytes.
    pub length: usize,
    pub span: Span,
    pub message: Message,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at line {}, column {}", self.message, self.row, self.column)
    }
}

enum Sink {
    Stdout,
    Buffer(Vec<u8>),
}

/// Per-file diagnostics context.
pub struct Diagnostics<'src> {
    file: SourceFile<'src>,
    config: DiagnosticsConfig,
    records: RefCell<Vector<'static, Diagnostic>>,
    /// Records before this index have been rendered.
    rendered: Cell<usize>,
    sink: RefCell<Sink>,
}

impl<'src> Diagnostics<'src> {
    /// Context that renders to stdout.
    pub fn new(file: SourceFile<'src>, config: DiagnosticsConfig) -> Self {
        Self::with_sink(file, config, Sink::Stdout)
    }

    /// Context that renders into memory; see [`Diagnostics::take_output`].
    pub fn buffered(file: SourceFile<'src>, config: DiagnosticsConfig) -> Self {
        Self::with_sink(file, config, Sink::Buffer(Vec::new()))
    }

    fn with_sink(file: SourceFile<'src>, config: DiagnosticsConfig, sink: Sink) -> Self {
        Self {
            file,
            config,
            records: RefCell::new(Vector::new(8)),
            rendered: Cell::new(0),
            sink: RefCell::new(sink),
        }
    }

    pub fn file(&self) -> SourceFile<'src> {
        self.file
    }

    pub fn config(&self) -> DiagnosticsConfig {
        self.config
    }

    /// Locate `span` in the file and build a record for it.
    ///
    /// Rows and columns are found by scanning the file from the start.
    pub fn new_error(&self, span: Span, message: Message) -> Diagnostic {
        let content = self.file.content().as_bytes();
        let spot = (span.start as usize).min(content.len());
        let before = &content[..spot];

        let row = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = before.iter().rposition(|&b| b == b'\n').map_or(0, |nl| nl + 1);

        Diagnostic {
            row,
            column: spot - line_start + 1,
            length: span.len() as usize,
            span,
            message,
        }
    }

    /// Queue a record. A fatal record renders everything pending and
    /// comes back as [`Error::Fatal`].
    pub fn submit(&self, diagnostic: Diagnostic, fatal: bool) -> Result<()> {
        self.records.borrow_mut().push(diagnostic)?;
        debug!(
            file = self.file.name(),
            row = diagnostic.row,
            column = diagnostic.column,
            fatal,
            "diagnostic: {}",
            diagnostic.message
        );

        if fatal {
            self.finalize()?;
            return Err(Error::Fatal {
                file: self.file.name().to_string(),
                diagnostic,
            });
        }
        Ok(())
    }

    /// `new_error` followed by `submit`.
    pub fn report(&self, span: Span, message: Message, fatal: bool) -> Result<()> {
        self.submit(self.new_error(span, message), fatal)
    }

    /// Render every record not rendered yet.
    pub fn finalize(&self) -> Result<()> {
        let records = self.records.borrow();
        let start = self.rendered.get();
        if start == records.len() {
            return Ok(());
        }

        let mut out = String::new();
        for diagnostic in records.iter().skip(start) {
            self.render(&diagnostic, &mut out)
                .map_err(|_| io::Error::other("failed to format diagnostic"))?;
        }
        self.rendered.set(records.len());

        match &mut *self.sink.borrow_mut() {
            Sink::Stdout => {
                let mut stdout = io::stdout().lock();
                stdout.write_all(out.as_bytes())?;
                stdout.flush()?;
            }
            Sink::Buffer(buffer) => buffer.extend_from_slice(out.as_bytes()),
        }
        Ok(())
    }

    fn render(&self, diagnostic: &Diagnostic, out: &mut String) -> fmt::Result {
        let color = self.config.color;
        let row = diagnostic.row;

        if color {
            writeln!(
                out,
                "{HEADER}ERROR:{HEADER_TEXT} {} at line {row}, column {}{RESET}",
                self.file.name(),
                diagnostic.column
            )?;
        } else {
            writeln!(
                out,
                "ERROR: {} at line {row}, column {}",
                self.file.name(),
                diagnostic.column
            )?;
        }

        let context = self.config.context_lines;
        let last = self.file.line_count().max(row);
        let first = row.saturating_sub(context).max(1);
        let end = row.saturating_add(context).min(last).max(row);
        let width = digits(end);

        for line in first..=end {
            let text = self.file.line(line).unwrap_or("");
            if color {
                writeln!(out, " {GUTTER}{line:>width$} |{RESET} {text}")?;
            } else {
                writeln!(out, " {line:>width$} | {text}")?;
            }

            if line == row {
                let pad = " ".repeat(diagnostic.column);
                let tildes = "~".repeat(diagnostic.length.saturating_sub(1));
                let message = diagnostic.message;
                if color {
                    writeln!(
                        out,
                        " {:width$} {GUTTER}|{RESET}{pad}{UNDERLINE}^{tildes} {message}{RESET}",
                        ""
                    )?;
                } else {
                    writeln!(out, " {:width$} |{pad}^{tildes} {message}", "")?;
                }
            }
        }
        Ok(())
    }

    /// Drain the buffered output. Always empty for a stdout context.
    pub fn take_output(&self) -> String {
        match &mut *self.sink.borrow_mut() {
            Sink::Stdout => String::new(),
            Sink::Buffer(buffer) => String::from_utf8_lossy(&std::mem::take(buffer)).into_owned(),
        }
    }

    /// Every record queued so far, in submission order.
    pub fn records(&self) -> Vec<Diagnostic> {
        self.records.borrow().iter().collect()
    }

    pub fn error_count(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

impl Drop for Diagnostics<'_> {
    fn drop(&mut self) {
        // Nothing sensible to do with a write error this late.
        let _ = self.finalize();
    }
}

fn digits(mut n: usize) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}
