// Licensed under the Apache-2.0 license

//! Indentation-aware text sink used by the renderers.

use crate::config::GeneratorConfig;
use std::fmt::{self, Write};

/// Accumulates generated text line by line at a current indentation level.
pub(crate) struct CodeWriter {
    output: String,
    indent_width: usize,
    level: usize,
}

impl CodeWriter {
    pub fn new(config: &GeneratorConfig) -> Self {
        Self {
            output: String::new(),
            indent_width: config.indent_width,
            level: 0,
        }
    }

    /// Writes one line at the current indentation.
    pub fn line(&mut self, args: fmt::Arguments<'_>) -> fmt::Result {
        let text = args.to_string();
        if text.is_empty() {
            return self.blank();
        }
        let pad = self.indent_width * self.level;
        writeln!(self.output, "{:pad$}{text}", "")
    }

    pub fn blank(&mut self) -> fmt::Result {
        writeln!(self.output)
    }

    /// Writes every line of `lines` prefixed with `marker`.
    pub fn comment_block(&mut self, marker: &str, lines: &[String]) -> fmt::Result {
        for line in lines {
            if line.is_empty() {
                self.line(format_args!("{marker}"))?;
            } else {
                self.line(format_args!("{marker} {line}"))?;
            }
        }
        Ok(())
    }

    pub fn indent(&mut self) {
        self.level += 1;
    }

    pub fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    pub fn finish(self) -> String {
        self.output
    }
}

/// Writes a formatted line through a [`CodeWriter`].
macro_rules! emit {
    ($w:expr) => {
        $w.blank()
    };
    ($w:expr, $($arg:tt)*) => {
        $w.line(format_args!($($arg)*))
    };
}

pub(crate) use emit;
