use std::io;

use thiserror::Error;

use crate::types::Layer;

/// An error from resolving user supplied color configuration.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// A color name that neither name table knows.
    #[error("invalid {layer} color name '{name}'")]
    UnknownColorName {
        /// The table that was consulted.
        layer: Layer,
        /// The offending name, exactly as given.
        name: String,
    },
    /// A color choice other than `always`, `auto` or `never`.
    #[error(
        "unrecognized color choice '{0}': valid choices are: always, auto, never"
    )]
    UnknownColorChoice(String),
}

impl Error {
    /// Return the string that couldn't be parsed.
    pub fn invalid(&self) -> &str {
        match *self {
            Error::UnknownColorName { ref name, .. } => name,
            Error::UnknownColorChoice(ref choice) => choice,
        }
    }
}

/// An I/O error from writing styled output to a destination.
///
/// The underlying error is kept as is. Alongside it, this records how many
/// bytes the destination accepted before the failure.
#[derive(Debug, Error)]
#[error("styled write failed after {written} bytes: {source}")]
pub struct WriteError {
    written: u64,
    #[source]
    source: io::Error,
}

impl WriteError {
    pub(crate) fn new(written: u64, source: io::Error) -> WriteError {
        WriteError { written, source }
    }

    /// Returns the number of bytes written before the failure.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Returns the kind of the underlying I/O error.
    pub fn kind(&self) -> io::ErrorKind {
        self.source.kind()
    }

    /// Returns a reference to the underlying I/O error.
    pub fn get_ref(&self) -> &io::Error {
        &self.source
    }

    /// Consumes this error and returns the underlying I/O error.
    pub fn into_inner(self) -> io::Error {
        self.source
    }
}

impl From<WriteError> for io::Error {
    fn from(err: WriteError) -> io::Error {
        err.source
    }
}
