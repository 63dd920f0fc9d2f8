//! Operator commands read from stdin, one per line

use thiserror::Error;

use bidboard_app::Message;
use bidboard_core::{BoardNumber, ParseBoardNumberError};

/// A parsed operator command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Select(BoardNumber),
    Clear,
    /// Open the confirmation prompt for the selected number
    Declare,
    Confirm,
    Cancel,
    Dismiss,
    /// Re-emit the current board projection
    Board,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("usage: select <0-99>")]
    MissingNumber,

    #[error("invalid number: {0}")]
    InvalidNumber(#[from] ParseBoardNumberError),

    #[error("unexpected argument for {command}: {argument}")]
    UnexpectedArgument { command: String, argument: String },
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandError> {
    let mut parts = line.split_whitespace();
    let Some(word) = parts.next() else {
        return Ok(None);
    };
    let argument = parts.next();

    let command = match word.to_ascii_lowercase().as_str() {
        "select" | "s" => {
            let number = argument.ok_or(CommandError::MissingNumber)?.parse()?;
            return Ok(Some(Command::Select(number)));
        }
        "clear" | "c" => Command::Clear,
        "declare" | "d" => Command::Declare,
        "confirm" | "y" => Command::Confirm,
        "cancel" | "n" => Command::Cancel,
        "dismiss" => Command::Dismiss,
        "board" | "b" => Command::Board,
        "quit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    if let Some(argument) = argument {
        return Err(CommandError::UnexpectedArgument {
            command: word.to_string(),
            argument: argument.to_string(),
        });
    }
    Ok(Some(command))
}

impl Command {
    /// Engine message for this command; `None` for runner-local commands.
    pub fn into_message(self) -> Option<Message> {
        match self {
            Command::Select(number) => Some(Message::SelectNumber { number }),
            Command::Clear => Some(Message::ClearSelection),
            Command::Declare => Some(Message::OpenConfirm),
            Command::Confirm => Some(Message::ConfirmDeclare),
            Command::Cancel => Some(Message::CancelConfirm),
            Command::Dismiss => Some(Message::DismissNotification),
            Command::Quit => Some(Message::Quit),
            Command::Board => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_select() {
        assert_eq!(
            parse_command("select 45"),
            Ok(Some(Command::Select(BoardNumber::new(45).unwrap())))
        );
        assert_eq!(
            parse_command("  s 07 "),
            Ok(Some(Command::Select(BoardNumber::new(7).unwrap())))
        );
    }

    #[test]
    fn test_parse_select_errors() {
        assert_eq!(parse_command("select"), Err(CommandError::MissingNumber));
        assert!(matches!(
            parse_command("select 100"),
            Err(CommandError::InvalidNumber(ParseBoardNumberError::OutOfRange(100)))
        ));
        assert!(matches!(
            parse_command("select x"),
            Err(CommandError::InvalidNumber(_))
        ));
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("declare"), Ok(Some(Command::Declare)));
        assert_eq!(parse_command("CONFIRM"), Ok(Some(Command::Confirm)));
        assert_eq!(parse_command("q"), Ok(Some(Command::Quit)));
        assert_eq!(parse_command("   "), Ok(None));
    }

    #[test]
    fn test_parse_rejects_unknown_and_extra_arguments() {
        assert_eq!(
            parse_command("payout"),
            Err(CommandError::Unknown("payout".to_string()))
        );
        assert!(matches!(
            parse_command("confirm now"),
            Err(CommandError::UnexpectedArgument { .. })
        ));
    }

    #[test]
    fn test_board_is_runner_local() {
        assert!(Command::Board.into_message().is_none());
        assert!(matches!(
            Command::Declare.into_message(),
            Some(Message::OpenConfirm)
        ));
    }
}
