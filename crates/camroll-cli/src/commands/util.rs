//! Shared helpers for interactive prompts.

use std::io::{BufRead, Write};

use anyhow::Result;

/// Asks a question and reads one line, falling back to `default` when the
/// answer is empty or stdin is closed.
pub fn prompt_line<W: Write, R: BufRead>(
    writer: &mut W,
    input: &mut R,
    question: &str,
    default: &str,
) -> Result<String> {
    write!(writer, "{question} [{default}]: ")?;
    writer.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(default.to_string());
    }

    let answer = line.trim();
    if answer.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(answer.to_string())
    }
}

/// Interprets an answer as a yes/no value. Anything other than an
/// affirmative is treated as no.
pub fn parse_yes(text: &str) -> bool {
    matches!(
        text.trim().to_lowercase().as_str(),
        "yes" | "y" | "true" | "t" | "1"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    #[test]
    fn prompt_line_returns_answer() {
        let mut output = Vec::new();
        let mut input = Cursor::new("2 min\n");
        let answer = prompt_line(&mut output, &mut input, "Time window", "1 min").unwrap();
        assert_eq!(answer, "2 min");
        assert_eq!(String::from_utf8(output).unwrap(), "Time window [1 min]: ");
    }

    #[test]
    fn prompt_line_empty_answer_keeps_default() {
        let mut output = Vec::new();
        let mut input = Cursor::new("\n");
        let answer = prompt_line(&mut output, &mut input, "Album name", "Photo Clusters").unwrap();
        assert_eq!(answer, "Photo Clusters");
    }

    #[test]
    fn prompt_line_whitespace_answer_keeps_default() {
        let mut output = Vec::new();
        let mut input = Cursor::new("   \n");
        let answer = prompt_line(&mut output, &mut input, "Album name", "Photo Clusters").unwrap();
        assert_eq!(answer, "Photo Clusters");
    }

    #[test]
    fn prompt_line_closed_stdin_keeps_default() {
        let mut output = Vec::new();
        let mut input = Cursor::new("");
        let answer = prompt_line(&mut output, &mut input, "Minimum size", "10").unwrap();
        assert_eq!(answer, "10");
    }

    #[test]
    fn parse_yes_accepts_affirmatives() {
        for answer in ["yes", "y", "true", "t", "1", "YES", " Y "] {
            assert!(parse_yes(answer), "{answer:?} should be yes");
        }
    }

    #[test]
    fn parse_yes_rejects_everything_else() {
        for answer in ["no", "n", "false", "0", "", "maybe"] {
            assert!(!parse_yes(answer), "{answer:?} should be no");
        }
    }
}
