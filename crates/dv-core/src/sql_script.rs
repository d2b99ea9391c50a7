//! Annotated SQL migration scripts
//!
//! A script is split into sections by annotation comments:
//!
//! ```sql
//! -- +migrate Up
//! CREATE TABLE users (id INTEGER);
//!
//! -- +migrate StatementBegin
//! CREATE MACRO add_one(x) AS x + 1;
//! -- +migrate StatementEnd
//!
//! -- +migrate Down
//! DROP TABLE users;
//! ```
//!
//! Only the Up section is executed. Outside a `StatementBegin` block a
//! statement ends on the line whose SQL ends with `;`, ignoring any trailing
//! `--` comment.

use thiserror::Error;

const ANNOTATION_PREFIX: &str = "-- +migrate ";

/// Errors raised while splitting a migration script
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ScriptError {
    /// The script has no `-- +migrate Up` annotation
    #[error("no '-- +migrate Up' annotation found")]
    MissingUpSection,

    /// A `StatementBegin` was never closed
    #[error("'-- +migrate StatementBegin' without a matching StatementEnd")]
    UnterminatedStatementBlock,

    /// Trailing SQL without a terminating semicolon
    #[error("unfinished statement, missing semicolon? near: {snippet}")]
    MissingSemicolon { snippet: String },

    /// An annotation this parser does not know
    #[error("unknown annotation '-- +migrate {0}'")]
    UnknownAnnotation(String),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Up,
    Down,
}

/// Split the Up section of `script` into individual statements.
pub fn parse_up_statements(script: &str) -> Result<Vec<String>, ScriptError> {
    let mut statements = Vec::new();
    let mut buf = String::new();
    let mut section = Section::None;
    let mut saw_up = false;
    let mut in_block = false;

    for line in script.lines() {
        let trimmed = line.trim();

        if let Some(cmd) = trimmed.strip_prefix(ANNOTATION_PREFIX) {
            match cmd.trim() {
                "Up" => {
                    section = Section::Up;
                    saw_up = true;
                }
                "Down" => section = Section::Down,
                "StatementBegin" => {
                    if section == Section::Up {
                        in_block = true;
                    }
                }
                "StatementEnd" => {
                    if section == Section::Up && in_block {
                        in_block = false;
                        push_statement(&mut statements, &mut buf);
                    }
                }
                other => return Err(ScriptError::UnknownAnnotation(other.to_string())),
            }
            continue;
        }

        if section != Section::Up {
            continue;
        }

        // Blank lines and comments between statements carry nothing to run.
        if buf.is_empty() && (trimmed.is_empty() || trimmed.starts_with("--")) {
            continue;
        }

        buf.push_str(line);
        buf.push('\n');

        if !in_block && ends_statement(trimmed) {
            push_statement(&mut statements, &mut buf);
        }
    }

    if !saw_up {
        return Err(ScriptError::MissingUpSection);
    }
    if in_block {
        return Err(ScriptError::UnterminatedStatementBlock);
    }
    let rest = buf.trim();
    if !rest.is_empty() {
        return Err(ScriptError::MissingSemicolon {
            snippet: rest.lines().next().unwrap_or(rest).to_string(),
        });
    }

    Ok(statements)
}

/// Whether `line` ends with `;` once a `--` comment tail outside a string
/// literal is dropped.
fn ends_statement(line: &str) -> bool {
    let mut in_string = false;
    let mut prev_dash = false;
    for (idx, ch) in line.char_indices() {
        match ch {
            '\'' => {
                in_string = !in_string;
                prev_dash = false;
            }
            '-' if !in_string => {
                if prev_dash {
                    return line[..idx - 1].trim_end().ends_with(';');
                }
                prev_dash = true;
            }
            _ => prev_dash = false,
        }
    }
    line.trim_end().ends_with(';')
}

fn push_statement(statements: &mut Vec<String>, buf: &mut String) {
    let stmt = buf.trim();
    if !stmt.is_empty() {
        statements.push(stmt.to_string());
    }
    buf.clear();
}

#[cfg(test)]
#[path = "sql_script_test.rs"]
mod tests;
