//! Line-oriented drawing scripts.
//!
//! One command per line: the operation name followed by `key=value`
//! arguments. Values containing spaces are wrapped in double quotes. Blank
//! lines and lines starting with `#` are skipped.
//!
//! ```text
//! # wipe and greet
//! clear display=0
//! rect display=0 left=10 top=10 right=50 bottom=50 color="[0, 255, 255]" filled=yes
//! drawtext display=0 x=10 y=60 font=0 text="Hello!"
//! ```

use std::collections::HashMap;

use crate::command::{Command, Operation};
use crate::error::FormatError;

/// A script line that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {source}")]
pub struct ScriptError {
    /// 1-based line number.
    pub line: usize,
    pub source: FormatError,
}

/// Parse one script line. Blank and comment lines give `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, FormatError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let tokens = tokenize(trimmed)?;
    let Some((name, rest)) = tokens.split_first() else {
        return Ok(None);
    };
    let op: Operation = name.parse()?;

    let mut args: HashMap<String, String> = HashMap::new();
    for token in rest {
        let (key, value) = token
            .split_once('=')
            .ok_or_else(|| FormatError::Syntax(format!("expected key=value, got {token:?}")))?;
        if !op.fields().contains(&key) {
            return Err(FormatError::UnexpectedField {
                field: key.to_string(),
            });
        }
        args.insert(key.to_string(), value.to_string());
    }

    Command::from_fields(op, |field| args.get(field).map(String::as_str)).map(Some)
}

/// Parse a whole script, stopping at the first bad line.
pub fn parse_script(text: &str) -> Result<Vec<Command>, ScriptError> {
    let mut commands = Vec::new();
    for (index, line) in text.lines().enumerate() {
        match parse_line(line) {
            Ok(Some(command)) => commands.push(command),
            Ok(None) => {}
            Err(source) => {
                return Err(ScriptError {
                    line: index + 1,
                    source,
                })
            }
        }
    }
    Ok(commands)
}

// Whitespace-separated tokens; double quotes group, and are removed.
fn tokenize(line: &str) -> Result<Vec<String>, FormatError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut pending = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                pending = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if pending {
                    tokens.push(std::mem::take(&mut current));
                    pending = false;
                }
            }
            c => {
                current.push(c);
                pending = true;
            }
        }
    }

    if in_quotes {
        return Err(FormatError::Syntax("unterminated quote".to_string()));
    }
    if pending {
        tokens.push(current);
    }
    Ok(tokens)
}
