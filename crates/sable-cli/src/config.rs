use sable_syntax::DiagnosticsConfig;

/// Runtime configuration for the sable CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,

    /// Emit JSON reports on stdout and JSON logs on stderr.
    pub json: bool,

    /// Lines of context around each diagnostic.
    pub context_lines: usize,

    /// Color diagnostics with ANSI escapes.
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbosity: 0,
            json: false,
            context_lines: DiagnosticsConfig::default().context_lines,
            color: false,
        }
    }
}

impl Config {
    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON output.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

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

    /// Rendering settings for a diagnostics context.
    ///
    /// JSON reports embed the rendered text, so they never carry color.
    #[must_use]
    pub fn diagnostics(&self) -> DiagnosticsConfig {
        DiagnosticsConfig::default()
            .with_context_lines(self.context_lines)
            .with_color(self.color && !self.json)
    }
}
