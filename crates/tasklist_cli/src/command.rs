//! Line command parsing for the interactive shell.

use std::str::FromStr;
use tasklist_core::TaskId;

pub const HELP: &str = "\
commands:
  add <text>     add a task
  input <text>   set the pending input
  submit         add the pending input
  toggle <id>    flip completion
  delete <id>    remove a task
  edit <id>      start editing a task
  type <text>    replace the edit text
  save           save the edit and stop editing
  list           show the list
  help           show this help
  quit           exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Input(String),
    Submit,
    Toggle(TaskId),
    Delete(TaskId),
    Edit(TaskId),
    Type(String),
    Save,
    List,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        let (word, rest) = match line.trim_start().split_once(' ') {
            Some((word, rest)) => (word, rest),
            None => (line.trim(), ""),
        };

        match word {
            "add" => Ok(Self::Add(rest.to_string())),
            "input" => Ok(Self::Input(rest.to_string())),
            "submit" => Ok(Self::Submit),
            "toggle" => parse_id(rest).map(Self::Toggle),
            "delete" | "rm" => parse_id(rest).map(Self::Delete),
            "edit" => parse_id(rest).map(Self::Edit),
            // Edit text is kept verbatim, including surrounding spaces.
            "type" => Ok(Self::Type(rest.to_string())),
            "save" => Ok(Self::Save),
            "list" | "ls" | "" => Ok(Self::List),
            "help" | "?" => Ok(Self::Help),
            "quit" | "exit" | "q" => Ok(Self::Quit),
            other => Err(format!("unknown command `{other}`; try `help`")),
        }
    }
}

fn parse_id(raw: &str) -> Result<TaskId, String> {
    raw.trim()
        .parse::<TaskId>()
        .map_err(|_| format!("expected a numeric task id, got `{}`", raw.trim()))
}

#[cfg(test)]
mod tests {
    use super::Command;

    #[test]
    fn parses_text_commands_verbatim() {
        assert_eq!(
            "add buy milk".parse::<Command>().unwrap(),
            Command::Add("buy milk".to_string())
        );
        assert_eq!(
            "type  padded ".parse::<Command>().unwrap(),
            Command::Type(" padded ".to_string())
        );
    }

    #[test]
    fn parses_id_commands() {
        assert_eq!("toggle 42".parse::<Command>().unwrap(), Command::Toggle(42));
        assert_eq!("rm 7".parse::<Command>().unwrap(), Command::Delete(7));
        assert!("edit abc".parse::<Command>().is_err());
    }

    #[test]
    fn bare_words_and_blank_lines() {
        assert_eq!("save\n".parse::<Command>().unwrap(), Command::Save);
        assert_eq!("".parse::<Command>().unwrap(), Command::List);
        assert_eq!("q".parse::<Command>().unwrap(), Command::Quit);
        assert!("frobnicate".parse::<Command>().is_err());
    }
}
