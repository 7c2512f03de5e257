//! Operator confirmation before destructive work.

use std::io::{BufRead, Write};

/// Decides whether the listed words may be deleted.
pub trait Confirm {
    fn confirm(&mut self, words: &[String]) -> bool;
}

impl<F> Confirm for F
where
    F: FnMut(&[String]) -> bool,
{
    fn confirm(&mut self, words: &[String]) -> bool {
        self(words)
    }
}

/// Approves without asking (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&mut self, _words: &[String]) -> bool {
        true
    }
}

/// Prints the words and asks for a literal `yes`.
///
/// Anything other than `yes` (case-insensitive, surrounding whitespace
/// ignored), including end of input or a read error, declines.
pub struct PromptConfirm<R, W> {
    input: R,
    output: W,
}

impl PromptConfirm<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn terminal() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> PromptConfirm<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, words: &[String]) -> std::io::Result<bool> {
        writeln!(self.output, "\nWords to be deleted from the database:")?;
        for word in words {
            writeln!(self.output, "- {}", word)?;
        }
        write!(
            self.output,
            "\nAre you sure you want to proceed with deleting these {} words? (yes/no): ",
            words.len()
        )?;
        self.output.flush()?;

        let mut answer = String::new();
        self.input.read_line(&mut answer)?;
        Ok(answer.trim().eq_ignore_ascii_case("yes"))
    }
}

impl<R: BufRead, W: Write> Confirm for PromptConfirm<R, W> {
    fn confirm(&mut self, words: &[String]) -> bool {
        self.ask(words).unwrap_or_else(|e| {
            tracing::error!(error = %e, "could not read confirmation");
            false
        })
    }
}
