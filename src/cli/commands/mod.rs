//! Command implementations.

pub mod completions;
pub mod jira;
pub mod task;

use std::future::Future;
use std::io::{self, BufRead, Write};

use crate::error::{Error, Result};

/// Run `future` to completion on a runtime created for this command.
///
/// # Errors
///
/// Returns `Error::Other` if the runtime cannot be created, otherwise the future's result.
pub fn block_on<F, T>(future: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| Error::Other(format!("Failed to create async runtime: {e}")))?;
    rt.block_on(future)
}

/// Ask a yes/no question on stderr and read the answer from stdin.
///
/// Anything other than `y`/`yes` (case-insensitive) is a no, including end of input.
///
/// # Errors
///
/// Returns `Error::Io` if stdin cannot be read.
pub fn confirm(question: &str) -> Result<bool> {
    eprint!("{question} [y/N] ");
    io::stderr().flush()?;
    let answer = read_line(&mut io::stdin().lock())?;
    Ok(is_yes(answer.as_deref().unwrap_or_default()))
}

/// Read one line from `reader`, without its line ending. `None` at end of input.
pub(crate) fn read_line(reader: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if reader.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
