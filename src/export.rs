//! The text dump of a tree. Each value is written with its `Display` form on its own line, in
//! ascending order, with no header and no escaping. Reading a dump back parses each non-empty
//! line with `FromStr` and inserts the values in file order.
//!
//! # Examples
//!
//! ```
//! use search_tree::{export, Tree};
//!
//! let tree: Tree<_> = [50, 30, 70].into_iter().collect();
//!
//! let mut out = Vec::new();
//! export::write_lines(&tree, &mut out).unwrap();
//! assert_eq!(out, b"30\n50\n70\n");
//!
//! let read: Tree<i32> = export::read_lines(&out[..]).unwrap();
//! assert_eq!(read.to_vec(), tree.to_vec());
//! ```

use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, info};

use crate::ordered::Tree;

/// Where the front end writes the dump when it isn't told otherwise.
pub const DEFAULT_EXPORT_PATH: &str = "ordered_data.txt";

/// Failures at the file boundary. The tree itself never fails.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Opening, reading, or writing a named file failed.
    #[error("I/O error on {}: {source}", path.display())]
    File {
        /// The file being read or written.
        path: PathBuf,
        /// The underlying failure.
        source: io::Error,
    },

    /// Reading from or writing to an unnamed stream failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A line of a dump could not be parsed back into a value.
    #[error("Invalid value on line {line}: {text:?} ({reason})")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// The offending line.
        text: String,
        /// What the parser said about it.
        reason: String,
    },
}

/// Result alias for this module.
pub type ExportResult<T> = Result<T, ExportError>;

/// Writes the in-order sequence of `tree` to `writer`, one value per line, and returns how many
/// values were written.
pub fn write_lines<T, W>(tree: &Tree<T>, mut writer: W) -> io::Result<usize>
where
    T: Display,
    W: Write,
{
    let mut count = 0;
    for value in tree {
        writeln!(writer, "{value}")?;
        count += 1;
    }
    writer.flush()?;

    Ok(count)
}

/// Creates (or truncates) the file at `path` and writes the dump of `tree` into it.
pub fn export_to_file<T>(tree: &Tree<T>, path: impl AsRef<Path>) -> ExportResult<usize>
where
    T: Display,
{
    let path = path.as_ref();
    let file_error = |source| ExportError::File {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(file_error)?;
    let count = write_lines(tree, BufWriter::new(file)).map_err(file_error)?;
    info!(path = %path.display(), count, "exported tree");

    Ok(count)
}

/// Builds a tree out of a dump. Empty lines are skipped and a trailing `\r` is dropped, so files
/// edited on Windows read back the same.
pub fn read_lines<T, R>(reader: R) -> ExportResult<Tree<T>>
where
    T: FromStr + Ord,
    T::Err: Display,
    R: BufRead,
{
    let mut tree = Tree::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.strip_suffix('\r').unwrap_or(line.as_str());
        if text.is_empty() {
            continue;
        }

        let value = text.parse::<T>().map_err(|e| ExportError::Parse {
            line: index + 1,
            text: text.to_string(),
            reason: e.to_string(),
        })?;
        tree.insert(value);
    }
    debug!(count = tree.len(), "read dump");

    Ok(tree)
}

/// Reads the dump stored at `path`.
pub fn import_from_file<T>(path: impl AsRef<Path>) -> ExportResult<Tree<T>>
where
    T: FromStr + Ord,
    T::Err: Display,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ExportError::File {
        path: path.to_path_buf(),
        source,
    })?;

    let tree = read_lines(BufReader::new(file)).map_err(|e| match e {
        ExportError::Io(source) => ExportError::File {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    info!(path = %path.display(), count = tree.len(), "imported tree");

    Ok(tree)
}
