#![forbid(unsafe_code)]

//! Line-based interactive front end over [`Calculator`].
//!
//! Each line is either a calculation (`<operand1> <operator> <operand2>`) or
//! one of the commands listed in [`HELP_TEXT`]. Input and output are generic
//! so the loop can be driven from tests with in-memory buffers.

use std::io::{self, BufRead, Write};

use chrono::Local;
use thiserror::Error;

use crate::calculator::Calculator;
use crate::config::{DEFAULT_PROMPT, ReckonConfig};
use crate::history::CalculationHistory;

pub const HELP_TEXT: &str = "\
Enter a calculation as: <number> <operator> <number>   (operators: + - * /)
Commands:
  history   show previous calculations
  clear     clear the history
  help      show this message
  exit      leave (also: quit, end of input)";

/// Local time shown next to each history entry.
pub const HISTORY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, PartialEq)]
pub enum ReplCommand {
    Calculate {
        operand1: f64,
        operator: String,
        operand2: f64,
    },
    History,
    Clear,
    Help,
    Exit,
    Empty,
}

/// Rejected user input, before anything reaches the calculator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("Invalid input '{0}'. Please enter a valid number.")]
    InvalidNumber(String),

    #[error("Expected '<number> <operator> <number>', got {0} token(s). Type 'help' for usage.")]
    WrongArity(usize),

    #[error("Input is not valid UTF-8.")]
    InvalidEncoding,
}

/// Parse a finite number. `inf` and `NaN` are rejected.
pub fn parse_operand(text: &str) -> Result<f64, InputError> {
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputError::InvalidNumber(text.to_string()))
}

pub fn parse_line(line: &str) -> Result<ReplCommand, InputError> {
    let trimmed = line.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "" => return Ok(ReplCommand::Empty),
        "history" => return Ok(ReplCommand::History),
        "clear" => return Ok(ReplCommand::Clear),
        "help" | "?" => return Ok(ReplCommand::Help),
        "exit" | "quit" => return Ok(ReplCommand::Exit),
        _ => {}
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();
    let [lhs, operator, rhs] = tokens.as_slice() else {
        return Err(InputError::WrongArity(tokens.len()));
    };

    Ok(ReplCommand::Calculate {
        operand1: parse_operand(lhs)?,
        operator: (*operator).to_string(),
        operand2: parse_operand(rhs)?,
    })
}

pub fn write_history<W: Write>(out: &mut W, history: &CalculationHistory) -> io::Result<()> {
    if history.is_empty() {
        return writeln!(out, "History is empty.");
    }
    for (index, entry) in history.iter().enumerate() {
        writeln!(
            out,
            "{}. [{}] {}",
            index + 1,
            entry
                .recorded_at()
                .with_timezone(&Local)
                .format(HISTORY_TIME_FORMAT),
            entry
                .calculation()
                .formatted_result()
                .unwrap_or("<not computed>")
        )?;
    }
    Ok(())
}

pub struct Repl {
    calculator: Calculator,
    prompt: String,
    show_history_on_exit: bool,
}

impl Default for Repl {
    fn default() -> Self {
        Self {
            calculator: Calculator::new(),
            prompt: DEFAULT_PROMPT.to_string(),
            show_history_on_exit: false,
        }
    }
}

impl Repl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ReckonConfig) -> Self {
        Self {
            calculator: Calculator::new(),
            prompt: config.prompt.clone(),
            show_history_on_exit: config.show_history_on_exit,
        }
    }

    pub const fn calculator(&self) -> &Calculator {
        &self.calculator
    }

    /// Run until `exit` or end of input. Only I/O failures end the loop
    /// early; bad input and calculation errors are reported and skipped.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> io::Result<()> {
        let mut buf = Vec::new();

        loop {
            write!(output, "{}", self.prompt)?;
            output.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                writeln!(output)?;
                break;
            }

            let Ok(line) = std::str::from_utf8(&buf) else {
                writeln!(output, "Error: {}", InputError::InvalidEncoding)?;
                continue;
            };

            if !self.handle_line(line, &mut output)? {
                break;
            }
        }

        if self.show_history_on_exit {
            write_history(&mut output, self.calculator.history())?;
        }
        writeln!(output, "Goodbye.")?;
        output.flush()
    }

    /// Returns `false` when the loop should stop.
    fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<bool> {
        let command = match parse_line(line) {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "Error: {err}")?;
                return Ok(true);
            }
        };

        match command {
            ReplCommand::Empty => {}
            ReplCommand::Calculate {
                operand1,
                operator,
                operand2,
            } => match self.calculator.calculate(operand1, operand2, &operator) {
                Ok(calc) => writeln!(out, "{}", calc.formatted_result().unwrap_or_default())?,
                Err(err) => writeln!(out, "Error: {err}")?,
            },
            ReplCommand::History => write_history(out, self.calculator.history())?,
            ReplCommand::Clear => {
                self.calculator.clear_history();
                writeln!(out, "History cleared.")?;
            }
            ReplCommand::Help => writeln!(out, "{HELP_TEXT}")?,
            ReplCommand::Exit => return Ok(false),
        }

        Ok(true)
    }
}
