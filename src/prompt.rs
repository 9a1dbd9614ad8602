//! Yes/no confirmation gates.

use crate::constants::AFFIRMATIVE;
use anyhow::Context;
use dialoguer::Input;
use std::io::{BufRead, IsTerminal};

/// Source of yes/no decisions at the run's confirmation points.
pub trait Prompter {
    /// Blocks until an answer is read. `Ok(true)` only for an affirmative answer.
    fn confirm(&mut self, question: &str) -> anyhow::Result<bool>;
}

/// True only for the literal affirmative token, ignoring surrounding whitespace.
pub fn is_affirmative(answer: &str) -> bool {
    answer.trim() == AFFIRMATIVE
}

/// Reads a single answer line. End of input declines.
pub fn read_answer<R: BufRead>(mut reader: R) -> anyhow::Result<bool> {
    let mut answer = String::new();
    reader
        .read_line(&mut answer)
        .context("Failed to read confirmation")?;
    Ok(is_affirmative(&answer))
}

/// Reads one line from stdin per question. Anything other than `y` declines;
/// invalid input is not re-asked.
///
/// Interactive terminals get a `dialoguer` prompt. Piped or redirected stdin is
/// read line by line with the question echoed to stderr.
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&mut self, question: &str) -> anyhow::Result<bool> {
        let prompt = format!("{} [{}/N]", question, AFFIRMATIVE);
        let stdin = std::io::stdin();

        if !stdin.is_terminal() {
            eprint!("{}: ", prompt);
            return read_answer(stdin.lock());
        }

        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .report(false)
            .interact_text()
            .context("Failed to read confirmation")?;
        Ok(is_affirmative(&answer))
    }
}
