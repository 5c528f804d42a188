use std::fmt;

use thiserror::Error;
use uuid::Uuid;

/// Byte offsets of the hyphens in the canonical 8-4-4-4-12 layout.
const HYPHEN_POSITIONS: [usize; 4] = [8, 13, 18, 23];
const VERSION_POSITION: usize = 14;
const VARIANT_POSITION: usize = 19;
const IDENTIFIER_LEN: usize = 36;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    #[error("identifier must be {IDENTIFIER_LEN} characters, got {0}")]
    Length(usize),
    #[error("identifier has a malformed character at position {0}")]
    Malformed(usize),
    #[error("identifier version nibble must be 4, got {0:?}")]
    Version(char),
    #[error("identifier variant nibble must be one of 8, 9, a, b; got {0:?}")]
    Variant(char),
}

/// Anonymous UUID-v4 shaped token used for both the durable user id and the
/// per-session id.
///
/// Invariant: lowercase, 8-4-4-4-12 hex grouping, version nibble `4`,
/// variant nibble in `{8, 9, a, b}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier(String);

impl Identifier {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().hyphenated().to_string())
    }

    pub fn parse(raw: &str) -> Result<Self, IdentifierError> {
        let raw = raw.trim();
        if raw.len() != IDENTIFIER_LEN {
            return Err(IdentifierError::Length(raw.chars().count()));
        }

        for (idx, ch) in raw.char_indices() {
            let valid = if HYPHEN_POSITIONS.contains(&idx) {
                ch == '-'
            } else {
                ch.is_ascii_hexdigit()
            };
            if !valid {
                return Err(IdentifierError::Malformed(idx));
            }
        }

        let normalized = raw.to_ascii_lowercase();
        let bytes = normalized.as_bytes();
        let version = char::from(bytes[VERSION_POSITION]);
        if version != '4' {
            return Err(IdentifierError::Version(version));
        }
        let variant = char::from(bytes[VARIANT_POSITION]);
        if !matches!(variant, '8' | '9' | 'a' | 'b') {
            return Err(IdentifierError::Variant(variant));
        }

        Ok(Self(normalized))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identifier {
    type Error = IdentifierError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identifier> for String {
    fn from(value: Identifier) -> Self {
        value.0
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-assigned id of a created mood record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    #[must_use]
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
