use std::io::{self, Write};

use anyhow::Result;
use crossterm::{
    execute,
    style::{Color, Print, ResetColor, SetForegroundColor},
};

use docsage_core::Turn;

/// Palette for REPL output.
struct Colors;

impl Colors {
    const PROMPT: Color = Color::Green;
    const ANSWER: Color = Color::Cyan;
    const ERROR: Color = Color::Red;
    const MUTED: Color = Color::DarkGrey;
    const TITLE: Color = Color::Magenta;
}

/// Terminal I/O for the interactive REPL.
pub struct Terminal;

impl Terminal {
    pub fn new() -> Self {
        Self
    }

    /// Write one colored span and restore the default color after it.
    fn paint(&self, color: Color, text: &str) -> Result<()> {
        let mut stdout = io::stdout();
        execute!(stdout, SetForegroundColor(color), Print(text), ResetColor)?;
        stdout.flush()?;
        Ok(())
    }

    /// Banner printed once at startup.
    pub fn print_banner(&self, provider: &str, model: &str) -> Result<()> {
        self.paint(Colors::TITLE, "docsage")?;
        self.paint(Color::Reset, " - chat with your documents\n")?;
        self.paint(
            Colors::MUTED,
            &format!(
                "Provider: {} | Model: {}\n\
                 Type 'exit' or 'quit' to end, '/history' to review the conversation,\n\
                 '/load <path-or-url>' to index new sources.\n\
                 ---\n",
                provider, model
            ),
        )
    }

    /// Prompt for the next line of input. None means the session is over,
    /// either EOF or an exit command.
    pub fn read_input(&self) -> Result<Option<String>> {
        self.paint(Colors::PROMPT, "\nyou> ")?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            return Ok(None);
        }

        let text = line.trim().to_string();
        match text.as_str() {
            "exit" | "quit" | "/exit" | "/quit" => Ok(None),
            _ => Ok(Some(text)),
        }
    }

    /// Print an answer from the model.
    pub fn print_answer(&self, text: &str) -> Result<()> {
        self.paint(Colors::ANSWER, &format!("{}\n", text))
    }

    /// Print the conversation so far, oldest first.
    pub fn print_history(&self, turns: &[Turn]) -> Result<()> {
        if turns.is_empty() {
            return self.print_info("No conversation yet.");
        }

        for turn in turns {
            let (color, who) = if turn.is_user() {
                (Colors::PROMPT, "you")
            } else {
                (Colors::ANSWER, "sage")
            };
            self.paint(
                Colors::MUTED,
                &format!("[{}] ", turn.timestamp.format("%H:%M")),
            )?;
            self.paint(color, &format!("{}> ", who))?;
            self.paint(Color::Reset, &format!("{}\n", turn.text))?;
        }

        Ok(())
    }

    /// Error line, always prefixed with `Error:`.
    pub fn print_error(&self, msg: &str) -> Result<()> {
        self.paint(Colors::ERROR, &format!("Error: {}\n", msg))
    }

    /// Low-emphasis status line.
    pub fn print_info(&self, msg: &str) -> Result<()> {
        self.paint(Colors::MUTED, &format!("{}\n", msg))
    }
}
