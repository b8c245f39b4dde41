//! Operator prompt for the target URL

use std::io::{self, BufRead, Write};

/// Text shown before reading the target URL
pub const PROMPT: &str = "Enter the website URL (e.g., https://example.com): ";

/// Prompts on `output` and reads one line from `input`, trimmed
///
/// End of input yields an empty string; the pipeline rejects it when
/// deriving the target name.
pub fn read_target_url<R: BufRead, W: Write>(mut input: R, mut output: W) -> io::Result<String> {
    output.write_all(PROMPT.as_bytes())?;
    output.flush()?;

    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}
