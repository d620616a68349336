//! Interactive input helpers
//!
//! Line input goes through stdin as usual; passwords are read key by
//! key in raw mode so they never echo.

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, Write};

use crate::error::Result;

/// Prompt for a line of input, trimmed. A closed stdin surfaces as
/// `UnexpectedEof` so the prompt loop can wind down instead of
/// spinning on empty reads.
pub fn read_line(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Err(io::Error::from(io::ErrorKind::UnexpectedEof).into());
    }
    Ok(line.trim().to_string())
}

/// Prompt for an optional line of input; empty means "none".
pub fn read_optional(prompt: &str) -> Result<Option<String>> {
    let line = read_line(prompt)?;
    if line.is_empty() { Ok(None) } else { Ok(Some(line)) }
}

/// Prompt for a password without echoing it.
pub fn read_password(prompt: &str) -> Result<String> {
    print!("{prompt}");
    io::stdout().flush()?;

    terminal::enable_raw_mode()?;
    let password = collect_password();
    terminal::disable_raw_mode()?;
    println!();

    password
}

fn collect_password() -> Result<String> {
    let mut password = String::new();
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match key.code {
                KeyCode::Enter => return Ok(password),
                KeyCode::Backspace => {
                    password.pop();
                }
                KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    return Err(io::Error::new(io::ErrorKind::Interrupted, "input cancelled").into());
                }
                KeyCode::Char(c) => password.push(c),
                _ => {}
            }
        }
    }
}
