//! Trace script parser using nom
//!
//! One command per line, verbs are case-insensitive:
//! ```text
//! # comment
//! PUT user:1 alice smith
//! GET user:1
//! DEL user:1
//! EXISTS user:1
//! SIZE
//! CAPACITY
//! KEYS
//! CLEAR
//! STATS
//! ```
//!
//! A `PUT` value is the rest of the line with trailing whitespace removed.
//! The literal `""` stores an empty string.

use nom::{
    bytes::complete::take_till1,
    character::complete::{space0, space1},
    combinator::{all_consuming, opt, rest},
    sequence::{pair, preceded, separated_pair},
    IResult,
};

/// Value literal that stands for the empty string
const EMPTY_VALUE: &str = "\"\"";

/// A single trace command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Insert or overwrite a key
    Put { key: String, value: String },
    /// Read a key (promotes it)
    Get { key: String },
    /// Remove a key
    Del { key: String },
    /// Check a key without promoting it
    Exists { key: String },
    /// Number of live entries
    Size,
    /// Configured capacity
    Capacity,
    /// Keys in recency order
    Keys,
    /// Drop all entries
    Clear,
    /// Counter snapshot
    Stats,
}

impl Command {
    /// Upper-case verb, used in output records
    pub fn name(&self) -> &'static str {
        match self {
            Command::Put { .. } => "PUT",
            Command::Get { .. } => "GET",
            Command::Del { .. } => "DEL",
            Command::Exists { .. } => "EXISTS",
            Command::Size => "SIZE",
            Command::Capacity => "CAPACITY",
            Command::Keys => "KEYS",
            Command::Clear => "CLEAR",
            Command::Stats => "STATS",
        }
    }
}

/// Malformed script line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Verb not recognised
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    /// Verb recognised but arguments do not fit
    #[error("wrong number of arguments for '{0}' command")]
    WrongArity(&'static str),

    /// Line bytes are not valid UTF-8
    #[error("line is not valid UTF-8")]
    InvalidUtf8,
}

fn word(input: &str) -> IResult<&str, &str> {
    take_till1(char::is_whitespace)(input)
}

/// Split a line into its verb and the remaining argument text
fn verb_and_args(input: &str) -> IResult<&str, (&str, Option<&str>)> {
    all_consuming(preceded(
        space0,
        pair(word, opt(preceded(space1, rest))),
    ))(input)
}

fn single_key(args: &str) -> Option<String> {
    all_consuming(word)(args).ok().map(|(_, key)| key.to_string())
}

fn key_and_value(args: &str) -> Option<(String, String)> {
    let (_, (key, value)) = separated_pair(word, space1, rest)(args).ok()?;
    let value = if value == EMPTY_VALUE { "" } else { value };
    Some((key.to_string(), value.to_string()))
}

/// Parse one script line
///
/// Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line: &str) -> Result<Option<Command>, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let (verb, args) = match verb_and_args(trimmed) {
        Ok((_, (verb, args))) => (verb, args.unwrap_or("")),
        Err(_) => return Err(ParseError::UnknownCommand(trimmed.to_string())),
    };

    let verb = verb.to_ascii_uppercase();
    let command = match verb.as_str() {
        "PUT" | "SET" => {
            let (key, value) = key_and_value(args).ok_or(ParseError::WrongArity("put"))?;
            Command::Put { key, value }
        }
        "GET" => Command::Get {
            key: single_key(args).ok_or(ParseError::WrongArity("get"))?,
        },
        "DEL" | "REMOVE" => Command::Del {
            key: single_key(args).ok_or(ParseError::WrongArity("del"))?,
        },
        "EXISTS" => Command::Exists {
            key: single_key(args).ok_or(ParseError::WrongArity("exists"))?,
        },
        "SIZE" => no_args(args, "size", Command::Size)?,
        "CAPACITY" => no_args(args, "capacity", Command::Capacity)?,
        "KEYS" => no_args(args, "keys", Command::Keys)?,
        "CLEAR" => no_args(args, "clear", Command::Clear)?,
        "STATS" => no_args(args, "stats", Command::Stats)?,
        _ => return Err(ParseError::UnknownCommand(verb)),
    };

    Ok(Some(command))
}

fn no_args(args: &str, name: &'static str, command: Command) -> Result<Command, ParseError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(ParseError::WrongArity(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put(key: &str, value: &str) -> Command {
        Command::Put {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_parse_put() {
        assert_eq!(parse_line("PUT 1 A").unwrap(), Some(put("1", "A")));
        assert_eq!(
            parse_line("  put user:1   alice smith  ").unwrap(),
            Some(put("user:1", "alice smith"))
        );
    }

    #[test]
    fn test_parse_put_empty_value() {
        assert_eq!(parse_line("PUT k \"\"").unwrap(), Some(put("k", "")));
    }

    #[test]
    fn test_parse_put_missing_value() {
        assert_eq!(parse_line("PUT k"), Err(ParseError::WrongArity("put")));
    }

    #[test]
    fn test_parse_single_key_commands() {
        assert_eq!(
            parse_line("get 1").unwrap(),
            Some(Command::Get { key: "1".to_string() })
        );
        assert_eq!(
            parse_line("DEL 1").unwrap(),
            Some(Command::Del { key: "1".to_string() })
        );
        assert_eq!(
            parse_line("Exists\t1").unwrap(),
            Some(Command::Exists { key: "1".to_string() })
        );
        assert_eq!(parse_line("GET 1 2"), Err(ParseError::WrongArity("get")));
        assert_eq!(parse_line("GET"), Err(ParseError::WrongArity("get")));
    }

    #[test]
    fn test_parse_no_arg_commands() {
        assert_eq!(parse_line("SIZE").unwrap(), Some(Command::Size));
        assert_eq!(parse_line("capacity").unwrap(), Some(Command::Capacity));
        assert_eq!(parse_line("KEYS").unwrap(), Some(Command::Keys));
        assert_eq!(parse_line("clear ").unwrap(), Some(Command::Clear));
        assert_eq!(parse_line("STATS").unwrap(), Some(Command::Stats));
        assert_eq!(parse_line("CLEAR now"), Err(ParseError::WrongArity("clear")));
    }

    #[test]
    fn test_parse_skips_blank_and_comments() {
        assert_eq!(parse_line("").unwrap(), None);
        assert_eq!(parse_line("   ").unwrap(), None);
        assert_eq!(parse_line("# PUT 1 A").unwrap(), None);
        assert_eq!(parse_line("   # indented").unwrap(), None);
    }

    #[test]
    fn test_parse_unicode_leading_whitespace() {
        assert_eq!(parse_line("\u{a0}PUT 1 A").unwrap(), Some(put("1", "A")));
        assert_eq!(
            parse_line("\u{0b}GET 1").unwrap(),
            Some(Command::Get { key: "1".to_string() })
        );
        assert_eq!(parse_line("\u{a0}\u{0b}").unwrap(), None);
    }

    #[test]
    fn test_parse_non_ascii_separator_is_reported() {
        // Only spaces and tabs separate the verb from its arguments
        assert_eq!(
            parse_line("GET\u{a0}1"),
            Err(ParseError::UnknownCommand("GET\u{a0}1".to_string()))
        );
        assert_eq!(
            parse_line("SIZE\u{0b}x"),
            Err(ParseError::UnknownCommand("SIZE\u{0b}x".to_string()))
        );
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse_line("FLUSHALL"),
            Err(ParseError::UnknownCommand("FLUSHALL".to_string()))
        );
    }

    #[test]
    fn test_command_name() {
        assert_eq!(put("a", "b").name(), "PUT");
        assert_eq!(Command::Stats.name(), "STATS");
    }
}
