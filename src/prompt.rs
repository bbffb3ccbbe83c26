//! Interactive terminal I/O: the confirmation gate and numbered selections.
//!
//! Workflows talk to the operator only through [`Prompter`], so the same code
//! runs against stdin/stdout or a scripted transcript in tests.
use crate::error::Cancelled;
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

/// Line-oriented operator I/O.
pub trait Prompter {
    /// Print `prompt` and read one line. `None` means end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;

    /// Read a secret without echoing it.
    fn read_secret(&mut self, prompt: &str) -> Result<String>;

    /// Print one line of operator-facing output.
    fn say(&mut self, line: &str) -> Result<()>;
}

/// [`Prompter`] over any reader/writer pair.
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.output, "{prompt}").context("write prompt")?;
        self.output.flush().context("flush prompt")?;
        let mut line = String::new();
        let read = self.input.read_line(&mut line).context("read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    fn read_secret(&mut self, prompt: &str) -> Result<String> {
        rpassword::prompt_password(prompt).context("read secret from terminal")
    }

    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}").context("write output")
    }
}

/// Ask `Do you want to continue? (y/n)` until the answer is `y` or `n`.
///
/// `n` (or end of input) yields [`Cancelled`], which callers propagate so the
/// whole run stops before anything else is touched.
pub fn confirm_continue(prompter: &mut dyn Prompter) -> Result<()> {
    loop {
        let Some(answer) = prompter.read_line("Do you want to continue? (y/n): ")? else {
            return Err(Cancelled.into());
        };
        match answer.trim().to_lowercase().as_str() {
            "y" => return Ok(()),
            "n" => return Err(Cancelled.into()),
            _ => prompter.say("Invalid input. Please enter 'y' or 'n'.")?,
        }
    }
}

/// Read a 1-based choice in `1..=count`, re-prompting on bad input.
///
/// Returns the zero-based index. End of input yields [`Cancelled`].
pub fn select_number(prompter: &mut dyn Prompter, prompt: &str, count: usize) -> Result<usize> {
    loop {
        let Some(answer) = prompter.read_line(prompt)? else {
            return Err(Cancelled.into());
        };
        match answer.trim().parse::<usize>() {
            Ok(choice) if (1..=count).contains(&choice) => return Ok(choice - 1),
            Ok(_) => prompter.say("Invalid selection. Please enter a valid number.")?,
            Err(_) => prompter.say("Invalid input. Please enter a number.")?,
        }
    }
}
