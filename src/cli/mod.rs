mod commands;
mod session;

pub use commands::{parse_command, Command, HELP};
pub use session::{DebugSession, Outcome};

use crate::config::Settings;
use crate::error::{Error, Result};
use std::io::{self, BufRead, Write};
use std::path::Path;

/// Reads commands from stdin against the shader at `path` until `quit` or EOF.
pub fn run_interactive_mode(path: &Path, settings: &Settings) -> Result<()> {
    let mut session = DebugSession::open(path, settings)?;
    log::info!(
        "loaded {} ({} lines)",
        path.display(),
        session.line_count()
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write!(out, "> ")?;
    out.flush()?;

    for line in stdin.lock().lines() {
        let line = line?;
        match parse_command(&line).and_then(|cmd| match cmd {
            Some(cmd) => session.execute(cmd).map(Some),
            None => Ok(None),
        }) {
            Ok(Some(Outcome::Quit)) => break,
            Ok(Some(Outcome::Print(text))) => writeln!(out, "{}", text)?,
            Ok(None) => {}
            Err(Error::Usage(message)) => writeln!(out, "{}", message)?,
            Err(e) => return Err(e),
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    Ok(())
}
