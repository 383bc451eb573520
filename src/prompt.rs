//! Interactive confirmation gate for destructive operations
//!
//! One blocking line read from stdin; this is the only suspension point in
//! the whole run. A declined prompt is not an error; callers terminate the
//! run cleanly with a success status.

use std::io::{self, BufRead, Write};

/// Asks the operator a yes/no question on stdin.
///
/// Returns `true` immediately without prompting when `force_yes` is set.
/// Otherwise only a case-insensitive `y` answer proceeds; anything else,
/// including empty input or EOF, declines.
///
/// # Errors
///
/// Returns `Err` only on a stdin/stdout I/O failure.
pub fn confirm(message: &str, force_yes: bool) -> io::Result<bool> {
    confirm_from(io::stdin().lock(), message, force_yes)
}

/// [`confirm`] with an explicit answer source, so callers (and tests) can
/// supply something other than stdin.
pub fn confirm_from(mut input: impl BufRead, message: &str, force_yes: bool) -> io::Result<bool> {
    if force_yes {
        return Ok(true);
    }

    print!("{message} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    input.read_line(&mut answer)?;

    Ok(is_affirmative(&answer))
}

fn is_affirmative(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case("y")
}
