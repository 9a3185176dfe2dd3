use core::fmt::{self, Display};
use std::str::FromStr;
use view::Action;

/// A line of user input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Forced refresh of the whole quiz.
    Refresh,
    Pause,
    Resume,
    /// An action bound to a rendered control, together with the values of the
    /// answer inputs when submitting.
    Dispatch(Action, Vec<String>),
}

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    UnknownCommand,
    MissingId,
    InvalidId,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => "Empty command.",
            Self::UnknownCommand => "Unknown command.",
            Self::MissingId => "Missing entity ID.",
            Self::InvalidId => "Invalid entity ID.",
        })
    }
}

impl std::error::Error for ParseError {}

/// Separates multiple answers given on a single line.
const ANSWER_SEPARATOR: char = '|';

impl FromStr for Command {
    type Err = ParseError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        match name {
            "" => return Err(ParseError::Empty),
            "refresh" => return Ok(Self::Refresh),
            "pause" => return Ok(Self::Pause),
            "resume" => return Ok(Self::Resume),
            "toggle" => return Ok(Self::Dispatch(Action::ToggleAutoRefresh, Vec::new())),
            _ => {}
        }

        let rest = rest.trim_start();
        let (id, values) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        if id.is_empty() {
            return Err(ParseError::MissingId);
        }
        let id = id.parse().map_err(|_| ParseError::InvalidId)?;
        let action = Action::from_parts(name, Some(id)).ok_or(ParseError::UnknownCommand)?;

        let values = match action {
            Action::SetAnswer(_) => values.trim().split(ANSWER_SEPARATOR).map(|v| v.trim().to_owned()).collect(),
            _ => Vec::new(),
        };
        Ok(Self::Dispatch(action, values))
    }
}

#[cfg(test)]
mod tests {
    use super::{Command, ParseError};
    use view::Action;

    #[test]
    fn parses_loop_controls() {
        assert_eq!("refresh".parse::<Command>(), Ok(Command::Refresh));
        assert_eq!("  pause ".parse::<Command>(), Ok(Command::Pause));
        assert_eq!("resume".parse::<Command>(), Ok(Command::Resume));
        assert_eq!("toggle".parse::<Command>(), Ok(Command::Dispatch(Action::ToggleAutoRefresh, Vec::new())));
    }

    #[test]
    fn parses_entity_actions() {
        assert_eq!("like 4".parse::<Command>(), Ok(Command::Dispatch(Action::Like(4), Vec::new())));
        assert_eq!("open 4".parse::<Command>(), Ok(Command::Dispatch(Action::OpenQuestion(4), Vec::new())));
        assert_eq!("close-section 9".parse::<Command>(), Ok(Command::Dispatch(Action::CloseSection(9), Vec::new())));
        assert_eq!("refresh-question 2".parse::<Command>(), Ok(Command::Dispatch(Action::RefreshQuestion(2), Vec::new())));
    }

    #[test]
    fn parses_answers() {
        let expected = Command::Dispatch(Action::SetAnswer(3), vec!["red panda".into(), "".into(), "owl".into()]);
        assert_eq!("answer 3 red panda | | owl".parse::<Command>(), Ok(expected));
        assert_eq!("answer 3".parse::<Command>(), Ok(Command::Dispatch(Action::SetAnswer(3), vec![String::new()])));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!("".parse::<Command>(), Err(ParseError::Empty));
        assert_eq!("dance 3".parse::<Command>(), Err(ParseError::UnknownCommand));
        assert_eq!("like".parse::<Command>(), Err(ParseError::MissingId));
        assert_eq!("like three".parse::<Command>(), Err(ParseError::InvalidId));
    }
}
