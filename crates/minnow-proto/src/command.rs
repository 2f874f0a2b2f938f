//! Splitting one protocol line into a command token and parameter text.

/// A borrowed view over one framed protocol line.
///
/// The line is split at the first space: the command token before it, the
/// parameter text after it. Nothing further is interpreted here; handlers
/// re-parse the parameter text for the fields they need.
#[derive(Debug, Clone, Copy)]
pub struct CommandLine<'a> {
    raw: &'a str,
}

impl<'a> CommandLine<'a> {
    /// Wrap a framed line. Any trailing `\r`/`\n` is trimmed.
    pub fn new(line: &'a str) -> Self {
        Self {
            raw: line.trim_end_matches(&['\r', '\n'][..]),
        }
    }

    /// The full line, terminator stripped.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// The command token: everything up to the first space, or the whole
    /// line when it contains none.
    pub fn command(&self) -> &'a str {
        match self.raw.split_once(' ') {
            Some((command, _)) => command,
            None => self.raw,
        }
    }

    /// The parameter text after the first space.
    ///
    /// Returns `None` when the line has no space; callers that need
    /// parameters treat that as a protocol error.
    pub fn params(&self) -> Option<&'a str> {
        self.raw.split_once(' ').map(|(_, rest)| rest)
    }
}
