//! Shell command parsing

use crate::error::{ShellError, ShellResult};

pub const HELP: &str = "\
Commands:
  show            show the selector, the transactions and the view-more control
  employees       list the employee selector options
  select <id>     show one employee's transactions
  select all      show all transactions, unless an employee has the id `all`
  all             show all transactions
  more            load the next page of all transactions
  help            show this help
  quit, exit      leave";

/// Selector value standing for "all employees"
pub const ALL_KEYWORD: &str = "all";

/// One line of shell input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Show,
    Employees,
    /// `None` selects all employees; `Some` is resolved against the selector
    Select(Option<String>),
    More,
    Quit,
}

impl Command {
    /// Parse a line; blank lines and `#` comments yield `None`
    pub fn parse(line: &str) -> ShellResult<Option<Command>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        let (name, rest) = match line.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (line, ""),
        };

        let command = match name.to_ascii_lowercase().as_str() {
            "help" | "?" => no_argument(Command::Help, name, rest)?,
            "show" | "ls" => no_argument(Command::Show, name, rest)?,
            "employees" => no_argument(Command::Employees, name, rest)?,
            "all" => no_argument(Command::Select(None), name, rest)?,
            "more" => no_argument(Command::More, name, rest)?,
            "quit" | "exit" => no_argument(Command::Quit, name, rest)?,
            "select" => {
                if rest.is_empty() {
                    Command::Select(None)
                } else {
                    Command::Select(Some(rest.to_string()))
                }
            }
            _ => {
                return Err(ShellError::UnknownCommand {
                    input: line.to_string(),
                })
            }
        };
        Ok(Some(command))
    }
}

fn no_argument(command: Command, name: &str, rest: &str) -> ShellResult<Command> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(ShellError::UnexpectedArgument {
            command: name.to_string(),
            argument: rest.to_string(),
        })
    }
}
