//! # Register Shell
//!
//! Line-oriented command interpreter over a [`Register`].
//!
//! ## Command Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  stdin line                                                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse_command ──► blank / # comment ──► skipped                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Shell::execute ──► Register (till-core)                                │
//! │       │                                                                 │
//! │       ├── Ok(Outcome) ──► render (text or JSON) ──► stdout              │
//! │       └── Err(e) ───────► "error: <message>" ─────► stderr, continue    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Commands
//! ```text
//! add <denomination> [count]        add coins (count defaults to 1)
//! remove <denomination> [count]     remove coins
//! bundle add <c0> <c1> ...          add one count per denomination
//! bundle remove <c0> <c1> ...       remove up to one count per denomination
//! sale <cost> <tendered>            make change for a sale
//! total                             total value and coin count
//! show                              full inventory
//! clear                             empty the register
//! help                              this list
//! quit | exit                       leave the shell
//! ```
//!
//! All amounts are whole base units (cents for usd).

use std::io::{self, BufRead, Write};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use till_core::{BundleSummary, Money, Register, TillError};

const HELP: &[&str] = &[
    "add <denomination> [count]     add coins (count defaults to 1)",
    "remove <denomination> [count]  remove coins",
    "bundle add <c0> <c1> ...       add one count per denomination",
    "bundle remove <c0> <c1> ...    remove up to one count per denomination",
    "sale <cost> <tendered>         make change for a sale",
    "total                          total value and coin count",
    "show                           full inventory",
    "clear                          empty the register",
    "help                           this list",
    "quit | exit                    leave the shell",
];

// =============================================================================
// Shell Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("Unknown command: '{0}' (try 'help')")]
    UnknownCommand(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Not a whole number: '{0}'")]
    InvalidNumber(String),

    #[error(transparent)]
    Till(#[from] TillError),

    #[error("Failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}

impl ShellError {
    /// True when the input line was at fault rather than the register state.
    pub fn is_input_error(&self) -> bool {
        match self {
            ShellError::Till(e) => e.is_caller_error(),
            ShellError::Json(_) => false,
            _ => true,
        }
    }
}

// =============================================================================
// Commands
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { denomination: i64, count: i64 },
    Remove { denomination: i64, count: i64 },
    BundleAdd(Vec<i64>),
    BundleRemove(Vec<i64>),
    Sale { cost: i64, tendered: i64 },
    Total,
    Show,
    Clear,
    Help,
    Quit,
}

/// Parses one input line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, ShellError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let name = words.next().unwrap_or_default().to_lowercase();
    let args: Vec<&str> = words.collect();

    let command = match name.as_str() {
        "add" | "remove" => {
            const USAGE: &str = "add|remove <denomination> [count]";
            let (denomination, count) = match args.as_slice() {
                [d] => (parse_number(d)?, 1),
                [d, n] => (parse_number(d)?, parse_number(n)?),
                _ => return Err(ShellError::Usage(USAGE)),
            };
            if name == "add" {
                Command::Add {
                    denomination,
                    count,
                }
            } else {
                Command::Remove {
                    denomination,
                    count,
                }
            }
        }
        "bundle" => {
            const USAGE: &str = "bundle add|remove <c0> <c1> ...";
            let (action, counts) = args.split_first().ok_or(ShellError::Usage(USAGE))?;
            let counts = counts
                .iter()
                .map(|c| parse_number(c))
                .collect::<Result<Vec<_>, _>>()?;
            match action.to_lowercase().as_str() {
                "add" => Command::BundleAdd(counts),
                "remove" => Command::BundleRemove(counts),
                _ => return Err(ShellError::Usage(USAGE)),
            }
        }
        "sale" => match args.as_slice() {
            [cost, tendered] => Command::Sale {
                cost: parse_number(cost)?,
                tendered: parse_number(tendered)?,
            },
            _ => return Err(ShellError::Usage("sale <cost> <tendered>")),
        },
        "total" => Command::Total,
        "show" => Command::Show,
        "clear" => Command::Clear,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(ShellError::UnknownCommand(other.to_string())),
    };

    Ok(Some(command))
}

fn parse_number(token: &str) -> Result<i64, ShellError> {
    token
        .parse()
        .map_err(|_| ShellError::InvalidNumber(token.to_string()))
}

// =============================================================================
// Outcomes
// =============================================================================

/// Result of one successful command, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// Register totals after an inventory command.
    Totals { total_cents: i64, coin_count: i64 },
    /// Change handed back by a sale.
    Change {
        cost: i64,
        tendered: i64,
        change: BundleSummary,
        register_total_cents: i64,
    },
    /// Full inventory.
    Inventory {
        name: String,
        denominations: Vec<i64>,
        inventory: BundleSummary,
        #[serde(skip)]
        display: String,
    },
    Help { commands: Vec<String> },
}

impl Outcome {
    fn to_text(&self) -> String {
        match self {
            Outcome::Totals {
                total_cents,
                coin_count,
            } => format!(
                "Total: {} ({} coins)",
                Money::from_cents(*total_cents),
                coin_count
            ),
            Outcome::Change { change, .. } => {
                let mut text = format!("Change {} ({} coins)", change.total(), change.coin_count);
                let lines: Vec<String> = change
                    .coins
                    .iter()
                    .rev()
                    .map(|line| format!("{} x {}", line.count, line.denomination))
                    .collect();
                if !lines.is_empty() {
                    text.push_str(": ");
                    text.push_str(&lines.join(", "));
                }
                text
            }
            Outcome::Inventory { name, display, .. } => format!("{}: {}", name, display),
            Outcome::Help { commands } => commands.join("\n"),
        }
    }
}

// =============================================================================
// Shell
// =============================================================================

pub struct Shell {
    register: Register,
    name: String,
    json: bool,
}

impl Shell {
    pub fn new(register: Register, name: impl Into<String>, json: bool) -> Self {
        Shell {
            register,
            name: name.into(),
            json,
        }
    }

    pub fn register(&self) -> &Register {
        &self.register
    }

    /// Runs one command against the register.
    ///
    /// `Quit` is handled by [`Shell::run`]; executing it directly is a no-op
    /// that reports the totals.
    pub fn execute(&mut self, command: Command) -> Result<Outcome, ShellError> {
        match command {
            Command::Add {
                denomination,
                count,
            } => self.register.add_coins(denomination, count)?,
            Command::Remove {
                denomination,
                count,
            } => self.register.remove_coins(denomination, count)?,
            Command::BundleAdd(counts) => {
                let bundle = self.register.bundle_from_counts(&counts)?;
                self.register.add_bundle(&bundle)?;
            }
            Command::BundleRemove(counts) => {
                let bundle = self.register.bundle_from_counts(&counts)?;
                self.register.remove_bundle(&bundle)?;
            }
            Command::Sale { cost, tendered } => {
                let change = self.register.sale(cost, tendered)?;
                return Ok(Outcome::Change {
                    cost,
                    tendered,
                    change: change.summary(),
                    register_total_cents: self.register.total(),
                });
            }
            Command::Clear => self.register.clear(),
            Command::Show => {
                return Ok(Outcome::Inventory {
                    name: self.name.clone(),
                    denominations: self.register.table().values().to_vec(),
                    inventory: self.register.inventory().summary(),
                    display: self.register.to_string(),
                });
            }
            Command::Help => {
                return Ok(Outcome::Help {
                    commands: HELP.iter().map(|line| line.to_string()).collect(),
                });
            }
            Command::Total | Command::Quit => {}
        }

        Ok(Outcome::Totals {
            total_cents: self.register.total(),
            coin_count: self.register.coin_count(),
        })
    }

    /// Renders an outcome as text or a JSON line.
    pub fn render(&self, outcome: &Outcome) -> Result<String, ShellError> {
        if self.json {
            Ok(serde_json::to_string(outcome)?)
        } else {
            Ok(outcome.to_text())
        }
    }

    /// Reads commands until end of input or `quit`.
    ///
    /// Command failures are reported on `err` and do not stop the loop; only
    /// I/O errors on the streams themselves are returned.
    pub fn run<R, W, E>(&mut self, input: R, out: &mut W, err: &mut E) -> io::Result<()>
    where
        R: BufRead,
        W: Write,
        E: Write,
    {
        for (number, line) in input.lines().enumerate() {
            let line = line?;

            let result = match parse_command(&line) {
                Ok(None) => continue,
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => self
                    .execute(command)
                    .and_then(|outcome| self.render(&outcome)),
                Err(e) => Err(e),
            };

            match result {
                Ok(text) => writeln!(out, "{}", text)?,
                Err(e) => {
                    debug!(line = number + 1, input_error = e.is_input_error(), error = %e, "Command failed");
                    writeln!(err, "error: {}", e)?;
                }
            }
        }

        out.flush()
    }
}
