//! # Console Adapter
//!
//! The rendering seam. The engine talks to a [`Console`] and never touches
//! stdout/stdin directly, so tests can drive it with a scripted double.
//!
//! [`TerminalConsole`] is the real implementation: markdown goes through
//! the ANSI renderer, plain text is wrapped to the terminal width, and
//! structured values are pretty-dumped with color.

pub mod markdown;

use std::fmt::{self, Write as _};
use std::io::{self, Write as _};

use crossterm::style::{Color, Stylize};
use serde_json::Value;

/// The current page's options could not be rendered. Treated as fatal for
/// the render attempt, never silently swallowed.
#[derive(Debug)]
pub enum DisplayError {
    /// Options did not match the shape the page promised.
    Shape(String),
    /// Writing the structured dump failed.
    Format(String),
}

impl fmt::Display for DisplayError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayError::Shape(msg) => write!(f, "unrenderable options: {msg}"),
            DisplayError::Format(msg) => write!(f, "display formatting failed: {msg}"),
        }
    }
}

impl std::error::Error for DisplayError {}

/// Everything the navigation engine needs from a terminal.
pub trait Console {
    /// Render markdown source as styled output.
    fn markdown(&mut self, source: &str);

    /// Print a plain line of text.
    fn plain(&mut self, text: &str);

    /// Pretty-print a structured value (country records).
    fn structured(&mut self, value: &Value) -> Result<(), DisplayError>;

    /// Block for one line of user input, prompt included.
    fn read_line(&mut self, prompt: &str) -> io::Result<String>;
}

// ── Structured dump ─────────────────────────────────────────────────────────

/// Pretty-print a JSON value with two-space indentation and color: keys
/// cyan, strings green, numbers yellow, booleans magenta, null dimmed.
pub fn dump(value: &Value) -> Result<String, DisplayError> {
    let mut out = String::new();
    write_value(&mut out, value, 0).map_err(|e| DisplayError::Format(e.to_string()))?;
    Ok(out)
}

fn write_value(out: &mut String, value: &Value, indent: usize) -> fmt::Result {
    let pad = "  ".repeat(indent);
    match value {
        Value::Object(map) if map.is_empty() => write!(out, "{{}}"),
        Value::Object(map) => {
            writeln!(out, "{{")?;
            let mut first = true;
            for (key, entry) in map {
                if !first {
                    writeln!(out, ",")?;
                }
                first = false;
                write!(out, "{pad}  {}: ", format!("{key:?}").with(Color::Cyan))?;
                write_value(out, entry, indent + 1)?;
            }
            write!(out, "\n{pad}}}")
        }
        Value::Array(items) if items.is_empty() => write!(out, "[]"),
        Value::Array(items) => {
            writeln!(out, "[")?;
            let mut first = true;
            for item in items {
                if !first {
                    writeln!(out, ",")?;
                }
                first = false;
                write!(out, "{pad}  ")?;
                write_value(out, item, indent + 1)?;
            }
            write!(out, "\n{pad}]")
        }
        Value::String(s) => write!(out, "{}", format!("{s:?}").with(Color::Green)),
        Value::Number(n) => write!(out, "{}", n.to_string().with(Color::Yellow)),
        Value::Bool(b) => write!(out, "{}", b.to_string().with(Color::Magenta)),
        Value::Null => write!(out, "{}", "null".dim()),
    }
}

// ── Terminal implementation ─────────────────────────────────────────────────

pub struct TerminalConsole {
    width: usize,
}

impl TerminalConsole {
    pub fn new() -> Self {
        let width = crossterm::terminal::size()
            .map(|(cols, _)| cols as usize)
            .unwrap_or(80);
        TerminalConsole { width }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for TerminalConsole {
    fn markdown(&mut self, source: &str) {
        println!("{}", markdown::render(source));
    }

    fn plain(&mut self, text: &str) {
        if text.is_empty() {
            println!();
        } else {
            println!("{}", textwrap::fill(text, self.width));
        }
    }

    fn structured(&mut self, value: &Value) -> Result<(), DisplayError> {
        println!("{}", dump(value)?);
        Ok(())
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<String> {
        print!("{prompt}");
        io::stdout().flush()?;
        let mut line = String::new();
        let read = io::stdin().read_line(&mut line)?;
        if read == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "stdin closed"));
        }
        Ok(line)
    }
}
