//! Error handling for building, reading, and writing ROAs.
//!
//! All operations of this crate report failure through a single error type,
//! [`RoaError`]. None of them attempts partial recovery: the first error
//! encountered ends the operation and is handed back to the caller.

use std::{error, fmt, io};


//------------ RoaError ------------------------------------------------------

/// An error happened while building, decoding, or encoding a ROA.
#[derive(Debug)]
pub enum RoaError {
    /// A call was malformed or directives arrived in an illegal order.
    InvalidArgument(&'static str),

    /// A buffer could not be grown.
    OutOfMemory,

    /// A DER value could not be decoded.
    ///
    /// The offset is the position in the input where decoding diverged.
    InvalidEncoding {
        offset: usize,
        reason: String,
    },

    /// The version is not the one supported.
    InvalidVersion,

    /// The AS identifier is not acceptable.
    InvalidAsId,

    /// A prefix length or maximum length is out of range.
    InvalidPrefixLength,

    /// The address part of a prefix is malformed.
    InvalidPrefixBytes,

    /// Signing failed.
    InvalidSignature(String),

    /// Opening, reading, or writing a file failed.
    Io(io::Error),

    /// An error happened at a certain line of a configuration file.
    Config {
        line: usize,
        error: Box<RoaError>,
    },

    /// The semantic validator rejected an object.
    Validation(String),
}

impl RoaError {
    pub(crate) fn encoding(offset: usize, reason: impl Into<String>) -> Self {
        RoaError::InvalidEncoding { offset, reason: reason.into() }
    }

    pub(crate) fn at_line(self, line: usize) -> Self {
        match self {
            RoaError::Config { .. } => self,
            error => RoaError::Config { line, error: Box::new(error) }
        }
    }

    /// Returns the underlying error without any line context.
    pub fn root(&self) -> &RoaError {
        match *self {
            RoaError::Config { ref error, .. } => error.root(),
            _ => self
        }
    }

    /// Returns the configuration line the error happened at, if any.
    pub fn line(&self) -> Option<usize> {
        match *self {
            RoaError::Config { line, .. } => Some(line),
            _ => None
        }
    }
}

impl From<io::Error> for RoaError {
    fn from(err: io::Error) -> Self {
        RoaError::Io(err)
    }
}

impl fmt::Display for RoaError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use self::RoaError::*;

        match *self {
            InvalidArgument(msg) => write!(f, "invalid argument: {}", msg),
            OutOfMemory => f.write_str("out of memory"),
            InvalidEncoding { offset, ref reason } => {
                write!(f, "invalid encoding at offset {}: {}", offset, reason)
            }
            InvalidVersion => f.write_str("invalid version"),
            InvalidAsId => f.write_str("invalid AS identifier"),
            InvalidPrefixLength => f.write_str("invalid prefix length"),
            InvalidPrefixBytes => f.write_str("invalid prefix address"),
            InvalidSignature(ref msg) => write!(f, "signing failed: {}", msg),
            Io(ref err) => write!(f, "I/O error: {}", err),
            Config { line, ref error } => {
                write!(f, "line {}: {}", line, error)
            }
            Validation(ref msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl error::Error for RoaError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match *self {
            RoaError::Io(ref err) => Some(err),
            RoaError::Config { ref error, .. } => Some(error.as_ref()),
            _ => None
        }
    }
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn line_context() {
        let err = RoaError::InvalidVersion.at_line(4);
        assert_eq!(err.line(), Some(4));
        assert!(matches!(err.root(), RoaError::InvalidVersion));
        assert_eq!(err.to_string(), "line 4: invalid version");

        // Context is only attached once.
        let err = err.at_line(7);
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn encoding_display() {
        assert_eq!(
            RoaError::encoding(12, "trailing data").to_string(),
            "invalid encoding at offset 12: trailing data"
        );
    }
}
