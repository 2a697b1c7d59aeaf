use std::collections::HashMap;
use std::collections::hash_map;

use thiserror::Error;

const CRLF: &[u8] = b"\r\n";

/// Characters allowed in a header field name (RFC 7230 `tchar`).
const TOKEN_SPECIALS: &[u8] = b"!#$%&'*+-.^_`|~";

/// Errors raised while parsing a single header line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("invalid spacing in header name")]
    InvalidSpacing,
    #[error("invalid header key")]
    InvalidKey,
    #[error("invalid character {0:?} in header key")]
    InvalidCharacter(char),
    #[error("header line has no colon")]
    MissingColon,
    #[error("header line is not valid utf-8")]
    InvalidEncoding,
}

/// Case-insensitive header collection.
///
/// Names are stored lowercased. Adding a name that is already present
/// appends the new value to the existing one, separated by `", "`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    inner: HashMap<String, String>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, merging with any existing value for the same name.
    pub fn add(&mut self, name: &str, value: &str) {
        match self.inner.entry(name.to_ascii_lowercase()) {
            hash_map::Entry::Occupied(mut entry) => {
                let existing = entry.get_mut();
                existing.push_str(", ");
                existing.push_str(value);
            }
            hash_map::Entry::Vacant(entry) => {
                entry.insert(value.to_string());
            }
        }
    }

    /// Replaces whatever value is stored under `name`.
    pub fn override_value(&mut self, name: &str, value: &str) {
        self.inner
            .insert(name.to_ascii_lowercase(), value.to_string());
    }

    pub fn remove(&mut self, name: &str) {
        self.inner.remove(&name.to_ascii_lowercase());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .get(&name.to_ascii_lowercase())
            .map(|v| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.inner.contains_key(&name.to_ascii_lowercase())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Parses at most one header line from the front of `data`.
    ///
    /// Returns `(consumed, done)`:
    /// - `(0, false)` when `data` holds no complete line yet,
    /// - `(2, true)` when `data` starts with the blank line ending the block,
    /// - `(line_len + 2, false)` after a header line was added.
    pub fn parse_one(&mut self, data: &[u8]) -> Result<(usize, bool), HeaderError> {
        let Some(line_end) = find_crlf(data) else {
            return Ok((0, false));
        };

        if line_end == 0 {
            return Ok((CRLF.len(), true));
        }

        let line = std::str::from_utf8(&data[..line_end])
            .map_err(|_| HeaderError::InvalidEncoding)?
            .trim();

        let Some((raw_name, raw_value)) = line.split_once(':') else {
            return Err(if line.is_empty() {
                HeaderError::InvalidKey
            } else {
                HeaderError::MissingColon
            });
        };

        let name = raw_name.trim();
        if name.len() != raw_name.len() {
            return Err(HeaderError::InvalidSpacing);
        }
        if name.is_empty() {
            return Err(HeaderError::InvalidKey);
        }
        if let Some(bad) = name.chars().find(|c| !is_token_char(*c)) {
            return Err(HeaderError::InvalidCharacter(bad));
        }

        self.add(name, raw_value.trim());

        Ok((line_end + CRLF.len(), false))
    }
}

pub(crate) fn find_crlf(data: &[u8]) -> Option<usize> {
    data.windows(CRLF.len()).position(|w| w == CRLF)
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || (c.is_ascii() && TOKEN_SPECIALS.contains(&(c as u8)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_single_header() {
        let mut headers = Headers::new();
        let data = b"Host: localhost:42069\r\n\r\n";

        let (n, done) = headers.parse_one(data).unwrap();

        assert_eq!(headers.get("host"), Some("localhost:42069"));
        assert_eq!(n, 23);
        assert!(!done);
    }

    #[test]
    fn rejects_space_before_colon() {
        let mut headers = Headers::new();
        let data = b"       Host : localhost:42069       \r\n\r\n";

        assert_eq!(headers.parse_one(data), Err(HeaderError::InvalidSpacing));
    }

    #[test]
    fn token_chars() {
        for c in "aZ09!#$%&'*+-.^_`|~".chars() {
            assert!(is_token_char(c), "{c:?}");
        }
        for c in "(),/:;<=>?@[\\]{}\" é".chars() {
            assert!(!is_token_char(c), "{c:?}");
        }
    }
}
