//! Reversible mapping between storage keys and face-index image ids.
//!
//! Rekognition only accepts `[a-zA-Z0-9_.\-:]+` as an `ExternalImageId`, so the
//! `/` separators of a storage key are swapped for `:`. Keys that already
//! contain `:` would not survive the trip back and are rejected up front.

use std::fmt;

pub const DELIMITER: char = ':';
const MAX_LEN: usize = 255;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ExternalIdError {
    #[error("storage key is empty")]
    Empty,
    #[error("storage key `{0}` contains the reserved delimiter ':'")]
    ContainsDelimiter(String),
    #[error("storage key `{key}` contains unsupported character {ch:?}")]
    UnsupportedCharacter { key: String, ch: char },
    #[error("storage key `{0}` exceeds 255 characters")]
    TooLong(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExternalImageId(String);

impl ExternalImageId {
    /// Encode a storage key, e.g. `prewed/landscape/a.jpg` -> `prewed:landscape:a.jpg`.
    pub fn encode(key: &str) -> Result<Self, ExternalIdError> {
        if key.is_empty() {
            return Err(ExternalIdError::Empty);
        }
        if key.len() > MAX_LEN {
            return Err(ExternalIdError::TooLong(key.to_string()));
        }
        for ch in key.chars() {
            if ch == DELIMITER {
                return Err(ExternalIdError::ContainsDelimiter(key.to_string()));
            }
            if !(ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-' | '/')) {
                return Err(ExternalIdError::UnsupportedCharacter {
                    key: key.to_string(),
                    ch,
                });
            }
        }
        Ok(Self(key.replace('/', ":")))
    }

    /// Wrap an id as returned by the face index.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// Recover the storage key.
    pub fn decode(&self) -> String {
        self.0.replace(DELIMITER, "/")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExternalImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_round_trip() {
        let keys = [
            "prewed/landscape/IMG_0001.jpg",
            "prewed/portrait/dsc-42.JPEG",
            "a",
            "/leading/slash.png",
            "trailing/",
            "double//slash.webp",
        ];
        for key in keys {
            let id = ExternalImageId::encode(key).unwrap();
            assert!(!id.as_str().contains('/'));
            assert_eq!(id.decode(), key);
        }
    }

    #[test]
    fn test_encode_replaces_separators() {
        let id = ExternalImageId::encode("prewed/landscape/a.jpg").unwrap();
        assert_eq!(id.as_str(), "prewed:landscape:a.jpg");
        assert_eq!(id.to_string(), "prewed:landscape:a.jpg");
    }

    #[test]
    fn test_rejects_delimiter() {
        assert_eq!(
            ExternalImageId::encode("prewed/12:30.jpg"),
            Err(ExternalIdError::ContainsDelimiter("prewed/12:30.jpg".into()))
        );
    }

    #[test]
    fn test_rejects_unsupported_keys() {
        assert_eq!(ExternalImageId::encode(""), Err(ExternalIdError::Empty));
        assert!(matches!(
            ExternalImageId::encode("prewed/my photo.jpg"),
            Err(ExternalIdError::UnsupportedCharacter { ch: ' ', .. })
        ));
        let long = format!("prewed/{}.jpg", "a".repeat(300));
        assert!(matches!(
            ExternalImageId::encode(&long),
            Err(ExternalIdError::TooLong(_))
        ));
    }

    #[test]
    fn test_decode_raw_id() {
        let id = ExternalImageId::from_raw("prewed:portrait:b.png");
        assert_eq!(id.decode(), "prewed/portrait/b.png");
    }

    proptest! {
        /// Every key over the accepted alphabet survives encode then decode.
        #[test]
        fn encode_decode_round_trips(key in "[A-Za-z0-9_./-]{1,255}") {
            let id = ExternalImageId::encode(&key).unwrap();
            prop_assert!(!id.as_str().contains('/'));
            prop_assert_eq!(id.decode(), key);
        }

        #[test]
        fn keys_with_delimiter_are_rejected(
            head in "[A-Za-z0-9_./-]{0,100}",
            tail in "[A-Za-z0-9_./-]{0,100}",
        ) {
            let key = format!("{}:{}", head, tail);
            prop_assert_eq!(
                ExternalImageId::encode(&key),
                Err(ExternalIdError::ContainsDelimiter(key.clone()))
            );
        }
    }
}
