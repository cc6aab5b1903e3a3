//! A line-oriented driver for a [`Tree`]. Each line is one command:
//!
//! | command         | effect                                              |
//! |-----------------|-----------------------------------------------------|
//! | `insert <v>`    | inserts `v`                                         |
//! | `search <v>`    | reports whether `v` is in the tree                  |
//! | `delete <v>`    | removes one `v`, doing nothing if there is none     |
//! | `list`          | reports the values in ascending order               |
//! | `export [path]` | writes the values one per line to `path`            |
//!
//! Keywords are case-insensitive. The value is everything after the keyword with surrounding
//! whitespace trimmed, so text values may contain spaces. Blank lines and lines starting with `#`
//! are ignored.
//!
//! # Examples
//!
//! ```
//! use search_tree::session::{Outcome, Session};
//!
//! let mut session: Session<i64> = Session::new();
//! session.run_line("insert 50").unwrap();
//! session.run_line("insert 30").unwrap();
//!
//! let outcome = session.run_line("search 30").unwrap().unwrap();
//! assert_eq!(outcome.to_string(), "The value 30 is on the tree.");
//!
//! let outcome = session.run_line("list").unwrap().unwrap();
//! assert_eq!(outcome, Outcome::Listed(vec!["30".into(), "50".into()]));
//! ```

use std::fmt::{self, Display};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::export::{self, ExportError, DEFAULT_EXPORT_PATH};
use crate::ordered::Tree;

/// Everything that can go wrong while running commands.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The first word of the line isn't a known command.
    #[error("Unknown command: {0:?}")]
    UnknownCommand(String),

    /// A command that works on a value was given none.
    #[error("Command `{0}` needs a value")]
    MissingValue(&'static str),

    /// `list` was given something to work on.
    #[error("Command `{command}` takes no argument, got {argument:?}")]
    UnexpectedArgument {
        /// The command keyword.
        command: &'static str,
        /// What followed it.
        argument: String,
    },

    /// The value could not be parsed into the session's value type.
    #[error("Invalid value {text:?}: {reason}")]
    InvalidValue {
        /// The text given.
        text: String,
        /// What the parser said about it.
        reason: String,
    },

    /// Writing the dump failed.
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Reading the command stream failed.
    #[error("Failed to read commands: {0}")]
    Input(#[source] io::Error),

    /// Writing a result failed.
    #[error("Failed to write output: {0}")]
    Output(#[source] io::Error),

    /// A command in a script failed.
    #[error("line {line}: {source}")]
    AtLine {
        /// 1-based line number in the command stream.
        line: usize,
        /// Why the command failed.
        source: Box<SessionError>,
    },
}

/// Result alias for this module.
pub type SessionResult<T> = Result<T, SessionError>;

/// One parsed command line. Values are kept as text until the [`Session`] parses them into its
/// value type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// `insert <value>`
    Insert(String),
    /// `search <value>`
    Search(String),
    /// `delete <value>`
    Delete(String),
    /// `list`
    List,
    /// `export [path]`, `None` meaning the session's default path.
    Export(Option<PathBuf>),
}

impl FromStr for Command {
    type Err = SessionError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (keyword, argument) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(keyword, rest)| (keyword, rest.trim()));

        let value = |command| {
            if argument.is_empty() {
                Err(SessionError::MissingValue(command))
            } else {
                Ok(argument.to_string())
            }
        };

        match keyword.to_ascii_lowercase().as_str() {
            "insert" => value("insert").map(Self::Insert),
            "search" => value("search").map(Self::Search),
            "delete" => value("delete").map(Self::Delete),
            "list" if argument.is_empty() => Ok(Self::List),
            "list" => Err(SessionError::UnexpectedArgument {
                command: "list",
                argument: argument.to_string(),
            }),
            "export" if argument.is_empty() => Ok(Self::Export(None)),
            "export" => Ok(Self::Export(Some(PathBuf::from(argument)))),
            _ => Err(SessionError::UnknownCommand(keyword.to_string())),
        }
    }
}

/// What a command did, worded for the person who typed it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The value was added.
    Inserted(String),
    /// The result of a search.
    Searched {
        /// The value looked for.
        value: String,
        /// Whether it was there.
        found: bool,
    },
    /// The result of a delete.
    Deleted {
        /// The value to delete.
        value: String,
        /// Whether a copy of it was removed.
        deleted: bool,
    },
    /// The values in ascending order.
    Listed(Vec<String>),
    /// The dump was written.
    Exported {
        /// Where it went.
        path: PathBuf,
        /// How many values were written.
        count: usize,
    },
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inserted(value) => write!(f, "Inserted {value}."),
            Self::Searched { value, found: true } => write!(f, "The value {value} is on the tree."),
            Self::Searched {
                value,
                found: false,
            } => write!(f, "The value {value} is not on the tree."),
            Self::Deleted {
                value,
                deleted: true,
            } => write!(f, "Deleted {value}."),
            Self::Deleted {
                value,
                deleted: false,
            } => write!(f, "The value {value} is not on the tree, nothing deleted."),
            Self::Listed(values) => write!(
                f,
                "The elements in ascending order are: [{}]",
                values.join(", ")
            ),
            Self::Exported { path, .. } => {
                write!(f, "Data exported to {} successfully.", path.display())
            }
        }
    }
}

/// A tree plus the settings commands run with.
#[derive(Debug)]
pub struct Session<T> {
    tree: Tree<T>,
    export_path: PathBuf,
}

impl<T> Default for Session<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Session<T> {
    /// A session over an empty tree, exporting to [`DEFAULT_EXPORT_PATH`].
    pub fn new() -> Self {
        Self::with_tree(Tree::new())
    }

    /// A session over an existing tree.
    pub fn with_tree(tree: Tree<T>) -> Self {
        Self {
            tree,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
        }
    }

    /// Sets where `export` without a path writes to.
    pub fn export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = path.into();
        self
    }

    /// The tree commands have been applied to.
    pub fn tree(&self) -> &Tree<T> {
        &self.tree
    }

    /// Ends the session, handing back the tree.
    pub fn into_tree(self) -> Tree<T> {
        self.tree
    }
}

impl<T> Session<T>
where
    T: Ord + FromStr + Display,
    T::Err: Display,
{
    /// Applies one command to the tree.
    pub fn apply(&mut self, command: Command) -> SessionResult<Outcome> {
        debug!(?command, "applying command");

        let outcome = match command {
            Command::Insert(text) => {
                let value = parse_value::<T>(&text)?;
                let shown = value.to_string();
                self.tree.insert(value);
                Outcome::Inserted(shown)
            }
            Command::Search(text) => {
                let value = parse_value::<T>(&text)?;
                Outcome::Searched {
                    found: self.tree.contains(&value),
                    value: value.to_string(),
                }
            }
            Command::Delete(text) => {
                let value = parse_value::<T>(&text)?;
                Outcome::Deleted {
                    deleted: self.tree.remove(&value).is_some(),
                    value: value.to_string(),
                }
            }
            Command::List => Outcome::Listed(self.tree.iter().map(T::to_string).collect()),
            Command::Export(path) => {
                let path = path.unwrap_or_else(|| self.export_path.clone());
                let count = export::export_to_file(&self.tree, &path)?;
                Outcome::Exported { path, count }
            }
        };

        info!(%outcome, size = self.tree.len(), "command applied");
        Ok(outcome)
    }

    /// Parses and applies one line. Blank lines and `#` comments give `Ok(None)`.
    pub fn run_line(&mut self, line: &str) -> SessionResult<Option<Outcome>> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        self.apply(line.parse()?).map(Some)
    }

    /// Runs every line of `input`, writing each outcome to `output`, and returns how many
    /// commands succeeded.
    ///
    /// A failing command stops the run unless `keep_going` is set, in which case the error is
    /// written to `output` and the run moves on to the next line.
    pub fn run<R, W>(&mut self, input: R, mut output: W, keep_going: bool) -> SessionResult<usize>
    where
        R: BufRead,
        W: Write,
    {
        let mut applied = 0;
        for (index, line) in input.lines().enumerate() {
            let line = line.map_err(SessionError::Input)?;
            match self.run_line(&line) {
                Ok(Some(outcome)) => {
                    writeln!(output, "{outcome}").map_err(SessionError::Output)?;
                    applied += 1;
                }
                Ok(None) => {}
                Err(e) => {
                    let e = SessionError::AtLine {
                        line: index + 1,
                        source: Box::new(e),
                    };
                    if !keep_going {
                        return Err(e);
                    }
                    warn!(error = %e, "command failed");
                    writeln!(output, "Error: {e}").map_err(SessionError::Output)?;
                }
            }
        }
        output.flush().map_err(SessionError::Output)?;

        Ok(applied)
    }
}

fn parse_value<T>(text: &str) -> SessionResult<T>
where
    T: FromStr,
    T::Err: Display,
{
    text.parse::<T>().map_err(|e| SessionError::InvalidValue {
        text: text.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_commands() {
        assert_eq!("insert 5".parse::<Command>().unwrap(), Command::Insert("5".into()));
        assert_eq!(
            "  SEARCH   new york  ".parse::<Command>().unwrap(),
            Command::Search("new york".into())
        );
        assert_eq!("Delete x".parse::<Command>().unwrap(), Command::Delete("x".into()));
        assert_eq!("list".parse::<Command>().unwrap(), Command::List);
        assert_eq!("export".parse::<Command>().unwrap(), Command::Export(None));
        assert_eq!(
            "export out.txt".parse::<Command>().unwrap(),
            Command::Export(Some(PathBuf::from("out.txt")))
        );
    }

    #[test]
    fn parse_errors() {
        assert!(matches!(
            "insert".parse::<Command>(),
            Err(SessionError::MissingValue("insert"))
        ));
        assert!(matches!(
            "list everything".parse::<Command>(),
            Err(SessionError::UnexpectedArgument { command: "list", .. })
        ));
        assert!(matches!(
            "rotate 5".parse::<Command>(),
            Err(SessionError::UnknownCommand(keyword)) if keyword == "rotate"
        ));
    }

    #[test]
    fn commands_drive_the_tree() {
        let mut session: Session<i64> = Session::new();
        for value in [50, 30, 70, 20, 40] {
            session.apply(Command::Insert(value.to_string())).unwrap();
        }

        let found = session.apply(Command::Search("40".into())).unwrap();
        assert_eq!(found.to_string(), "The value 40 is on the tree.");
        let missing = session.apply(Command::Search("60".into())).unwrap();
        assert_eq!(missing.to_string(), "The value 60 is not on the tree.");

        let deleted = session.apply(Command::Delete("30".into())).unwrap();
        assert_eq!(
            deleted,
            Outcome::Deleted {
                value: "30".into(),
                deleted: true
            }
        );
        let absent = session.apply(Command::Delete("999".into())).unwrap();
        assert_eq!(
            absent,
            Outcome::Deleted {
                value: "999".into(),
                deleted: false
            }
        );

        let listed = session.apply(Command::List).unwrap();
        assert_eq!(
            listed.to_string(),
            "The elements in ascending order are: [20, 40, 50, 70]"
        );
    }

    #[test]
    fn text_values_compare_as_text() {
        let mut session: Session<String> = Session::new();
        for line in ["insert 9", "insert 10", "insert 100"] {
            session.run_line(line).unwrap();
        }
        assert_eq!(session.tree().to_vec(), [&"10", &"100", &"9"]);
    }

    #[test]
    fn invalid_numeric_value() {
        let mut session: Session<i64> = Session::new();
        let err = session.run_line("insert ten").unwrap_err();
        assert!(matches!(err, SessionError::InvalidValue { text, .. } if text == "ten"));
        assert!(session.tree().is_empty());
    }

    #[test]
    fn blank_lines_and_comments_are_skipped() {
        let mut session: Session<i64> = Session::new();
        assert_eq!(session.run_line("   ").unwrap(), None);
        assert_eq!(session.run_line("# insert 5").unwrap(), None);
        assert!(session.tree().is_empty());
    }

    #[test]
    fn run_stops_at_the_first_error() {
        let mut session: Session<i64> = Session::new();
        let script = "insert 1\nfrobnicate\ninsert 2\n";
        let mut out = Vec::new();

        let err = session.run(script.as_bytes(), &mut out, false).unwrap_err();
        assert!(matches!(err, SessionError::AtLine { line: 2, .. }));
        assert_eq!(session.tree().to_vec(), [&1]);
        assert_eq!(String::from_utf8(out).unwrap(), "Inserted 1.\n");
    }

    #[test]
    fn run_keeps_going_when_asked() {
        let mut session: Session<i64> = Session::new();
        let script = "insert 1\nfrobnicate\n\ninsert 2\nlist\n";
        let mut out = Vec::new();

        let applied = session.run(script.as_bytes(), &mut out, true).unwrap();
        assert_eq!(applied, 3);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Inserted 1.\n\
             Error: line 2: Unknown command: \"frobnicate\"\n\
             Inserted 2.\n\
             The elements in ascending order are: [1, 2]\n"
        );
    }
}
