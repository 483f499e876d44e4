//! Input source abstraction for file and stdin.
//!
//! # Example
//!
//! ```rust
//! use knucleotide::input::Input;
//! use std::path::Path;
//!
//! // From a file path
//! let input = Input::from_path(Path::new("sequences.fa"));
//! assert!(matches!(input, Input::File(_)));
//!
//! // From stdin marker
//! let input = Input::from_path(Path::new("-"));
//! assert!(matches!(input, Input::Stdin));
//! ```

use std::{
    fs::File,
    io::{self, BufReader, Read},
    path::{Path, PathBuf},
};

use flate2::read::MultiGzDecoder;

use crate::error::KnucError;

/// Input source for a run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Input {
    /// Read from a file at the specified path.
    File(PathBuf),
    /// Read from standard input.
    #[default]
    Stdin,
}

impl Input {
    /// Creates an `Input` from a path; "-" means stdin.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        if path.as_os_str() == "-" {
            Self::Stdin
        } else {
            Self::File(path.to_path_buf())
        }
    }

    /// Creates an `Input` from an optional path.
    ///
    /// If `None` or "-", returns [`Self::Stdin`].
    #[must_use]
    pub fn from_option(path: Option<&Path>) -> Self {
        path.map_or(Self::Stdin, Self::from_path)
    }

    /// Returns `true` if this input reads from stdin.
    #[must_use]
    pub const fn is_stdin(&self) -> bool {
        matches!(self, Self::Stdin)
    }

    /// Returns the file path if this is a file input.
    #[must_use]
    pub fn as_path(&self) -> Option<&Path> {
        match self {
            Self::File(path) => Some(path),
            Self::Stdin => None,
        }
    }

    /// Returns `true` for file paths ending in `.gz`.
    #[must_use]
    pub fn is_gzip(&self) -> bool {
        self.as_path()
            .and_then(Path::extension)
            .is_some_and(|ext| ext == "gz")
    }

    /// Opens the input as a byte stream.
    ///
    /// Gzip-compressed files are decompressed transparently.
    ///
    /// # Errors
    ///
    /// Returns [`KnucError::InputOpen`] if the file cannot be opened.
    pub fn open(&self) -> Result<Box<dyn Read>, KnucError> {
        match self {
            Self::Stdin => Ok(Box::new(io::stdin().lock())),
            Self::File(path) => {
                let file = File::open(path).map_err(|source| KnucError::InputOpen {
                    source,
                    path: path.clone(),
                })?;
                if self.is_gzip() {
                    Ok(Box::new(MultiGzDecoder::new(BufReader::new(file))))
                } else {
                    Ok(Box::new(file))
                }
            }
        }
    }
}

impl std::fmt::Display for Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Stdin => write!(f, "<stdin>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn from_path_stdin() {
        let input = Input::from_path(Path::new("-"));
        assert!(input.is_stdin());
        assert!(input.as_path().is_none());
    }

    #[test]
    fn from_option_none() {
        assert!(Input::from_option(None).is_stdin());
    }

    #[test]
    fn from_option_some_file() {
        let input = Input::from_option(Some(Path::new("test.fa")));
        assert_eq!(input.as_path(), Some(Path::new("test.fa")));
    }

    #[test]
    fn detects_gzip_extension() {
        assert!(Input::from_path(Path::new("genome.fa.gz")).is_gzip());
        assert!(!Input::from_path(Path::new("genome.fa")).is_gzip());
        assert!(!Input::Stdin.is_gzip());
    }

    #[test]
    fn display() {
        assert_eq!(Input::Stdin.to_string(), "<stdin>");
        assert_eq!(Input::File(PathBuf::from("genome.fa")).to_string(), "genome.fa");
    }

    #[test]
    fn open_missing_file_fails() {
        let err = Input::from_path(Path::new("/nonexistent/genome.fa"))
            .open()
            .err()
            .unwrap();
        assert!(matches!(err, KnucError::InputOpen { .. }));
    }

    #[test]
    fn open_plain_file() {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, ">a\nACGT\n").unwrap();
        temp.flush().unwrap();

        let mut content = String::new();
        Input::from_path(temp.path())
            .open()
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, ">a\nACGT\n");
    }
}
