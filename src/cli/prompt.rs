//! Question answering for `init`.
//!
//! Every question carries a default derived from project detection. The
//! [`Prompter`] decides whether a person gets to override it.

use anyhow::{Context, Result};
use colored::Colorize;
use std::io::{BufRead, Write};

/// Source of answers to `init`'s questions.
pub trait Prompter {
    /// Yes/no question.
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool>;

    /// Free-form answer; empty input keeps `default`.
    fn input(&mut self, question: &str, default: &str) -> Result<String>;

    /// Pick one of `options`, returning its index.
    fn select(&mut self, question: &str, options: &[String], default: usize) -> Result<usize>;
}

/// Accepts every default without asking. Used in CI and when stdin is not a
/// terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultsPrompter;

impl Prompter for DefaultsPrompter {
    fn confirm(&mut self, _question: &str, default: bool) -> Result<bool> {
        Ok(default)
    }

    fn input(&mut self, _question: &str, default: &str) -> Result<String> {
        Ok(default.to_string())
    }

    fn select(&mut self, _question: &str, _options: &[String], default: usize) -> Result<usize> {
        Ok(default)
    }
}

/// Line-based prompts over any reader and writer.
pub struct TerminalPrompter<R, W> {
    reader: R,
    writer: W,
}

impl TerminalPrompter<std::io::StdinLock<'static>, std::io::Stderr> {
    /// Prompt on stderr, read answers from stdin.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stderr())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub const fn new(reader: R, writer: W) -> Self {
        Self {
            reader,
            writer,
        }
    }

    /// Print `prompt` and read one trimmed line. End of input reads as empty.
    fn ask(&mut self, prompt: &str) -> Result<String> {
        write!(self.writer, "{prompt} ").context("Failed to write prompt")?;
        self.writer.flush().context("Failed to flush prompt")?;

        let mut line = String::new();
        self.reader.read_line(&mut line).context("Failed to read answer")?;
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn confirm(&mut self, question: &str, default: bool) -> Result<bool> {
        let hint = if default { "[Y/n]" } else { "[y/N]" };
        loop {
            let answer = self.ask(&format!("{} {}", question.bold(), hint.dimmed()))?;
            match answer.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.writer, "Please answer y or n.")?,
            }
        }
    }

    fn input(&mut self, question: &str, default: &str) -> Result<String> {
        let answer = self.ask(&format!("{} {}", question.bold(), format!("({default})").dimmed()))?;
        Ok(if answer.is_empty() { default.to_string() } else { answer })
    }

    fn select(&mut self, question: &str, options: &[String], default: usize) -> Result<usize> {
        writeln!(self.writer, "{}", question.bold())?;
        for (i, option) in options.iter().enumerate() {
            let marker = if i == default { ">" } else { " " };
            writeln!(self.writer, " {marker} {}) {option}", i + 1)?;
        }
        loop {
            let answer = self.ask(&format!("Choice {}", format!("({})", default + 1).dimmed()))?;
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<usize>() {
                Ok(n) if (1..=options.len()).contains(&n) => return Ok(n - 1),
                _ => {
                    if let Some(i) = options.iter().position(|o| o.eq_ignore_ascii_case(&answer)) {
                        return Ok(i);
                    }
                    writeln!(self.writer, "Enter a number between 1 and {}.", options.len())?;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompter(input: &str) -> TerminalPrompter<Cursor<Vec<u8>>, Vec<u8>> {
        TerminalPrompter::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
    }

    #[test]
    fn test_defaults_prompter() {
        let mut p = DefaultsPrompter;
        assert!(p.confirm("Storybook?", true).unwrap());
        assert_eq!(p.input("Dir", "src/ui").unwrap(), "src/ui");
        assert_eq!(p.select("Format", &["a".to_string()], 0).unwrap(), 0);
    }

    #[test]
    fn test_confirm_reprompts() {
        let mut p = prompter("maybe\nn\n");
        assert!(!p.confirm("Storybook?", true).unwrap());
        let out = String::from_utf8(p.writer).unwrap();
        assert!(out.contains("Please answer y or n."));
    }

    #[test]
    fn test_empty_and_eof_keep_defaults() {
        let mut p = prompter("\n");
        assert_eq!(p.input("Dir", "src/components/ui").unwrap(), "src/components/ui");
        // Input exhausted.
        assert!(p.confirm("Storybook?", true).unwrap());
    }

    #[test]
    fn test_select_by_number_or_name() {
        let options = vec!["tailwind".to_string(), "css".to_string(), "json".to_string()];
        let mut p = prompter("7\n3\nCSS\n");
        assert_eq!(p.select("Format", &options, 0).unwrap(), 2);
        assert_eq!(p.select("Format", &options, 0).unwrap(), 1);
    }
}
