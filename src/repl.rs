//! Interactive console input for the REPL.
//!
//! The reader pulls lines on demand, so a multi-line expression simply keeps
//! prompting until its parentheses close.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::error;

use crate::error::{LispError, Result};
use crate::parser::LineSource;

pub const PROMPT: &str = "> ";

/// A rustyline editor as a line source.
pub struct Console {
    editor: DefaultEditor,
}

impl Console {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().map_err(|e| LispError::Console(e.to_string()))?;
        Ok(Console { editor })
    }
}

impl LineSource for Console {
    fn next_line(&mut self) -> Option<String> {
        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        let _ = self.editor.add_history_entry(line.as_str());
                    }
                    return Some(line);
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => return None,
                Err(err) => {
                    error!(%err, "console read failed");
                    return None;
                }
            }
        }
    }
}
