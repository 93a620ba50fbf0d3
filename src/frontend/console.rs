use std::fmt;
use std::io::{self, BufRead, Write};
use std::str::FromStr;

use colored::Colorize;
use log::{debug, warn};
use thiserror::Error;

use crate::core::Amount;

pub const EXIT_KEYWORD: &str = "exit";

/// Which grammar governs the next line of input.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PromptKind {
    Menu,
    Deposit,
    Withdraw
}

/// A top-level menu command.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Deposit,
    Withdraw,
    Balance
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown command '{0}'")]
pub struct UnknownCommand(pub String);

impl FromStr for Command {
    type Err = UnknownCommand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deposit" => Ok(Command::Deposit),
            "withdraw" => Ok(Command::Withdraw),
            "balance" => Ok(Command::Balance),
            _ => Err(UnknownCommand(s.to_owned()))
        }
    }
}

/// A line that passed the grammar of its prompt.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Entry {
    Command(Command),
    Amount(Amount)
}

impl PromptKind {
    pub fn message(&self) -> &'static str {
        match self {
            PromptKind::Menu => "\nPlease enter in a command (Deposit, Withdraw, Balance, Exit): ",
            PromptKind::Deposit => "Please enter an amount to deposit: ",
            PromptKind::Withdraw => "Please enter an amount to withdraw: "
        }
    }

    /// Checks an already trimmed and lower-cased line against this prompt.
    pub fn parse(&self, input: &str) -> Option<Entry> {
        match self {
            PromptKind::Menu => input.parse().ok().map(Entry::Command),
            PromptKind::Deposit | PromptKind::Withdraw => Amount::parse(input).ok().map(Entry::Amount)
        }
    }

    pub fn accepts(&self, input: &str) -> bool {
        self.parse(input).is_some()
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Response<T> {
    Input(T),
    Exit
}

fn grammar_mismatch(kind: PromptKind, entry: Entry) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{:?} prompt produced {:?}", kind, entry))
}

/// Owns the line source and the output sink for the whole session.
/// Dropping it releases the input on every path out of the program.
pub struct Console<R, W> {
    input: R,
    output: W
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Console<R, W> {
        Console { input, output }
    }

    /// Prints the prompt for `kind` and reads lines until one is valid
    /// for it or the user leaves. Invalid lines are reported and the
    /// prompt is shown again, with no limit on retries. End of input
    /// counts as leaving.
    pub fn prompt(&mut self, kind: PromptKind) -> io::Result<Response<Entry>> {
        loop {
            self.write_line(kind.message())?;

            let Some(input) = self.read_line()? else {
                debug!("end of input at {:?} prompt", kind);
                return Ok(Response::Exit);
            };
            if input == EXIT_KEYWORD {
                return Ok(Response::Exit);
            }

            match kind.parse(&input) {
                Some(entry) => return Ok(Response::Input(entry)),
                None => {
                    debug!("rejected {:?} input '{}'", kind, input);
                    let message = format!("Invalid Input '{}'", input);
                    self.write_line(message.red())?;
                }
            }
        }
    }

    pub fn read_command(&mut self) -> io::Result<Response<Command>> {
        match self.prompt(PromptKind::Menu)? {
            Response::Input(Entry::Command(command)) => Ok(Response::Input(command)),
            Response::Input(entry) => Err(grammar_mismatch(PromptKind::Menu, entry)),
            Response::Exit => Ok(Response::Exit)
        }
    }

    /// Reads an amount for a deposit or withdrawal prompt. Asking the menu
    /// prompt for an amount is a programming error and fails the session.
    pub fn read_amount(&mut self, kind: PromptKind) -> io::Result<Response<Amount>> {
        match self.prompt(kind)? {
            Response::Input(Entry::Amount(amount)) => Ok(Response::Input(amount)),
            Response::Input(entry) => Err(grammar_mismatch(kind, entry)),
            Response::Exit => Ok(Response::Exit)
        }
    }

    /// Next non-blank line, trimmed and lower-cased; `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.input.read_line(&mut line) {
                Ok(0) => return Ok(None),
                Ok(_) => {
                    let trimmed = line.trim();
                    if !trimmed.is_empty() {
                        return Ok(Some(trimmed.to_lowercase()));
                    }
                },
                Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                    warn!("unreadable input line: {}", err);
                    self.write_line("Unexpected error occurred while reading user input")?;
                },
                Err(err) => return Err(err)
            }
        }
    }

    pub fn write_line(&mut self, line: impl fmt::Display) -> io::Result<()> {
        writeln!(self.output, "{}", line)?;
        self.output.flush()
    }

    /// Says goodbye and hands back the output sink; the input is released.
    pub fn close(mut self) -> io::Result<W> {
        self.write_line("Program shutting down. Thank you")?;
        return Ok(self.output);
    }
}
