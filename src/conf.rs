//! The textual configuration format for ROAs.
//!
//! A configuration file is a sequence of lines each carrying one directive
//! made of a key and a value:
//!
//! ```txt
//! # A ROA for AS 64496
//! [roa]
//! keyversion = 3
//! as_id = 64496
//! ipfam = IPv4
//! ipaddr = 192.0.2.0/24^28
//! keyfile = ee-key.der
//! ```
//!
//! Key and value are separated by white space, optionally with equals
//! signs in between. Empty lines, lines starting with `#`, and lines
//! starting with `[` are ignored. This module only splits the file into
//! directives. What they mean is up to the [builder](crate::builder).

use std::str;
use crate::error::RoaError;


/// The maximum length of a line, not including the line break.
pub const MAX_LINE_LEN: usize = 512;


//------------ Directive -----------------------------------------------------

/// A single key and value pair.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Directive<'a> {
    /// The 1-based number of the line the directive was found on.
    pub line: usize,

    pub key: &'a str,
    pub value: &'a str,
}

impl<'a> Directive<'a> {
    /// Parses a line.
    ///
    /// Returns `Ok(None)` if the line is to be ignored.
    fn from_line(
        line: &'a [u8], line_no: usize
    ) -> Result<Option<Self>, RoaError> {
        if line.len() > MAX_LINE_LEN {
            return Err(RoaError::InvalidArgument("line too long"))
        }
        match line.first() {
            None | Some(b'#') | Some(b'[') => return Ok(None),
            _ => { }
        }
        let line = str::from_utf8(line).map_err(|_| {
            RoaError::InvalidArgument("line is not valid UTF-8")
        })?;
        if line.trim().is_empty() {
            return Ok(None)
        }

        let line = line.trim_start();
        let key_end = line.find(is_space).unwrap_or(line.len());
        let (key, rest) = line.split_at(key_end);
        let rest = rest.trim_start_matches(|ch| is_space(ch) || ch == '=');
        let value_end = rest.find(is_space).unwrap_or(rest.len());
        let (value, rest) = rest.split_at(value_end);
        if key.is_empty() || value.is_empty() || key_end == line.len() {
            return Err(RoaError::InvalidArgument("expected key and value"))
        }
        if !rest.trim().is_empty() {
            return Err(RoaError::InvalidArgument("trailing data after value"))
        }
        Ok(Some(Directive { line: line_no, key, value }))
    }
}


//------------ Directives ----------------------------------------------------

/// An iterator over the directives of a configuration file.
///
/// Errors are reported with the line they happened at. After an error the
/// iterator is exhausted.
#[derive(Clone, Debug)]
pub struct Directives<'a> {
    data: &'a [u8],
    line: usize,
    failed: bool,
}

impl<'a> Directives<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Directives { data, line: 0, failed: false }
    }

    /// Splits off the next line, dropping the line break.
    fn next_line(&mut self) -> Option<&'a [u8]> {
        if self.data.is_empty() {
            return None
        }
        self.line += 1;
        let mut split = self.data.splitn(2, |&ch| ch == b'\n');
        let mut line = split.next()?;
        self.data = split.next().unwrap_or(b"");
        if let Some((b'\r', head)) = line.split_last() {
            line = head;
        }
        Some(line)
    }
}

impl<'a> Iterator for Directives<'a> {
    type Item = Result<Directive<'a>, RoaError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None
        }
        loop {
            let line = self.next_line()?;
            match Directive::from_line(line, self.line) {
                Ok(Some(res)) => return Some(Ok(res)),
                Ok(None) => { }
                Err(err) => {
                    self.failed = true;
                    return Some(Err(err.at_line(self.line)))
                }
            }
        }
    }
}


fn is_space(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}


//============ Tests =========================================================

#[cfg(test)]
mod test {
    use super::*;

    fn collect(data: &str) -> Result<Vec<(usize, &str, &str)>, RoaError> {
        Directives::new(data.as_bytes()).map(|res| {
            res.map(|item| (item.line, item.key, item.value))
        }).collect()
    }

    #[test]
    fn separators() {
        assert_eq!(
            collect(
                "keyversion = 3\n\
                 as_id 64496\r\n\
                 ipfam\t==\tIPv4\n\
                 \x20 ipaddr =10.0/8\n"
            ).unwrap(),
            [
                (1, "keyversion", "3"),
                (2, "as_id", "64496"),
                (3, "ipfam", "IPv4"),
                (4, "ipaddr", "10.0/8"),
            ]
        );
    }

    #[test]
    fn skipped_lines() {
        assert_eq!(
            collect(
                "# comment\n\
                 [section]\n\
                 \n\
                 \x20  \n\
                 as_id = 1"
            ).unwrap(),
            [(5, "as_id", "1")]
        );
    }

    #[test]
    fn bad_lines() {
        for line in &["as_id", "as_id =", "as_id = 1 2", "as_id=1"] {
            let err = collect(line).unwrap_err();
            assert_eq!(err.line(), Some(1), "{}", line);
            assert!(
                matches!(err.root(), RoaError::InvalidArgument(_)),
                "{}", line
            );
        }
    }

    #[test]
    fn long_line() {
        let mut data = String::from("# fine\nkeyfile = ");
        data.push_str(&"a".repeat(MAX_LINE_LEN - "keyfile = ".len()));
        assert!(collect(&data).is_ok());
        data.push('a');
        let err = collect(&data).unwrap_err();
        assert_eq!(err.line(), Some(2));
        assert!(matches!(err.root(), RoaError::InvalidArgument(_)));
    }

    #[test]
    fn stops_after_error() {
        let mut iter = Directives::new(b"bad\nas_id = 1\n");
        assert!(iter.next().unwrap().is_err());
        assert!(iter.next().is_none());
    }
}
