//! Key validation shared by every key-accepting operation.
//!
//! Validation runs before any traversal or mutation, so a rejected key
//! leaves the trie untouched.

use alloc::vec::Vec;
use core::{fmt, str::Utf8Error};

/// The key contained zero code points.
///
/// Keys must be at least one Unicode code point long; the empty string
/// cannot name a node in the trie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyKeyError;

impl fmt::Display for EmptyKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key must contain at least one Unicode code point")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EmptyKeyError {}

/// Bytes were supplied where a Unicode string key was required, and they
/// are not valid UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidKeyError {
    /// The underlying decode failure.
    pub source: Utf8Error,
}

impl fmt::Display for InvalidKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key bytes are not valid UTF-8: {}", self.source)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidKeyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Union of the key validation failures, so callers can tell a malformed
/// key apart from an empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// The key bytes were not valid Unicode text.
    Invalid(InvalidKeyError),
    /// The key contained zero code points.
    Empty(EmptyKeyError),
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyError::Invalid(err) => err.fmt(f),
            KeyError::Empty(err) => err.fmt(f),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for KeyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            KeyError::Invalid(err) => Some(err),
            KeyError::Empty(err) => Some(err),
        }
    }
}

impl From<InvalidKeyError> for KeyError {
    fn from(err: InvalidKeyError) -> Self {
        KeyError::Invalid(err)
    }
}

impl From<EmptyKeyError> for KeyError {
    fn from(err: EmptyKeyError) -> Self {
        KeyError::Empty(err)
    }
}

/// Decode a key into its code points, rejecting the empty key.
pub(crate) fn validated_points(key: &str) -> Result<Vec<char>, EmptyKeyError> {
    if key.is_empty() {
        return Err(EmptyKeyError);
    }
    Ok(key.chars().collect())
}

/// Decode raw bytes into key code points, rejecting non-UTF-8 input and the
/// empty key.
pub(crate) fn validated_points_from_bytes(key: &[u8]) -> Result<Vec<char>, KeyError> {
    let key = core::str::from_utf8(key).map_err(|source| InvalidKeyError { source })?;
    validated_points(key).map_err(KeyError::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_is_rejected() {
        assert_eq!(validated_points(""), Err(EmptyKeyError));
        assert_eq!(validated_points_from_bytes(b""), Err(KeyError::Empty(EmptyKeyError)));
    }

    #[test]
    fn surrogate_pair_code_point_is_one_symbol() {
        assert_eq!(validated_points("😀").unwrap(), ['😀']);
        assert_eq!(validated_points("a😀b").unwrap(), ['a', '😀', 'b']);
    }

    #[test]
    fn invalid_utf8_is_distinguishable_from_empty() {
        let err = validated_points_from_bytes(&[0xff, 0xfe]).unwrap_err();
        assert!(matches!(err, KeyError::Invalid(_)));

        let decoded = validated_points_from_bytes("😀".as_bytes()).map(|points| points.len());
        assert_eq!(decoded, Ok(1));
    }
}
