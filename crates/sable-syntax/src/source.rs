//! Source files handed to the front end.

/// A named source buffer with a precomputed line count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceFile<'src> {
    name: &'src str,
    content: &'src str,
    lines: usize,
}

impl<'src> SourceFile<'src> {
    pub fn new(name: &'src str, content: &'src str) -> Self {
        let lines = if content.is_empty() {
            0
        } else {
            content.bytes().filter(|&b| b == b'\n').count() + 1
        };
        Self { name, content, lines }
    }

    /// Display name used in diagnostics.
    pub fn name(&self) -> &'src str {
        self.name
    }

    pub fn content(&self) -> &'src str {
        self.content
    }

    /// Number of lines: newlines plus one, or zero for an empty file.
    pub fn line_count(&self) -> usize {
        self.lines
    }

    /// Text of the 1-indexed line `row`, without its line terminator.
    pub fn line(&self, row: usize) -> Option<&'src str> {
        let line = self.content.split('\n').nth(row.checked_sub(1)?)?;
        Some(line.strip_suffix('\r').unwrap_or(line))
    }
}
