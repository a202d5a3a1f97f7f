//! Line input for the chat loop using rustyline

use crate::errors::{AdvisorError, Result};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;

/// Typed at the chat prompt to leave
pub const EXIT_COMMAND: &str = "/exit";

/// Typed at the chat prompt to start over
pub const RESET_COMMAND: &str = "/reset";

/// What the user typed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Message(String),
    Reset,
    Exit,
    Blank,
}

impl ChatInput {
    pub fn parse(line: &str) -> Self {
        match line.trim() {
            "" => ChatInput::Blank,
            EXIT_COMMAND | "/quit" => ChatInput::Exit,
            RESET_COMMAND => ChatInput::Reset,
            text => ChatInput::Message(text.to_string()),
        }
    }
}

/// Readline wrapper with optional persistent history
pub struct InputHandler {
    editor: DefaultEditor,
    history_path: Option<PathBuf>,
    prompt: String,
}

impl InputHandler {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new()
            .map_err(|e| AdvisorError::Generic(format!("Failed to start line editor: {}", e)))?;

        Ok(InputHandler {
            editor,
            history_path: None,
            prompt: "you> ".to_string(),
        })
    }

    /// Load history from `history_file` if it exists; it is written back by
    /// [`save_history`](Self::save_history)
    pub fn with_history(history_file: PathBuf) -> Result<Self> {
        let mut handler = Self::new()?;
        if history_file.exists() {
            let _ = handler.editor.load_history(&history_file);
        }
        handler.history_path = Some(history_file);
        Ok(handler)
    }

    /// Read one line. Ctrl-C and Ctrl-D both end the chat.
    pub fn read(&mut self) -> Result<ChatInput> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                let input = ChatInput::parse(&line);
                if let ChatInput::Message(text) = &input {
                    let _ = self.editor.add_history_entry(text.as_str());
                }
                Ok(input)
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(ChatInput::Exit),
            Err(err) => Err(AdvisorError::Generic(format!("Readline error: {}", err))),
        }
    }

    pub fn save_history(&mut self) -> Result<()> {
        if let Some(ref path) = self.history_path {
            self.editor
                .save_history(path)
                .map_err(|e| AdvisorError::Generic(format!("Failed to save history: {}", e)))?;
        }
        Ok(())
    }
}
