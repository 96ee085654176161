//! User identifier as seen by the shop core.
//!
//! The authentication subsystem owns users; the core only stores and compares
//! their identifiers. Identifiers arrive either as integers or as text, and
//! both forms are compared by their canonical text (`7` equals `"7"`).

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Int(i64),
    Text(String),
}

impl UserId {
    /// Returns whether this identifier can select a user.
    ///
    /// `0` and the empty string are treated as missing input.
    pub fn is_present(&self) -> bool {
        match self {
            Self::Int(value) => *value != 0,
            Self::Text(value) => !value.is_empty(),
        }
    }

    /// Canonical storage form.
    pub fn to_db_text(&self) -> String {
        match self {
            Self::Int(value) => value.to_string(),
            Self::Text(value) => value.clone(),
        }
    }

    /// Storage tag recorded next to the canonical text.
    pub fn db_kind(&self) -> &'static str {
        match self {
            Self::Int(_) => "int",
            Self::Text(_) => "text",
        }
    }

    /// Restores an identifier from its storage text and kind tag.
    ///
    /// Returns `None` for an unknown tag or an `int` tag on non-numeric text.
    /// Untagged rows fall back to [`UserId::from_db_text`].
    pub fn from_db_parts(value: String, kind: Option<&str>) -> Option<Self> {
        match kind {
            Some("int") => value.parse::<i64>().ok().map(Self::Int),
            Some("text") => Some(Self::Text(value)),
            Some(_) => None,
            None => Some(Self::from_db_text(value)),
        }
    }

    /// Guesses an identifier from untagged text.
    ///
    /// Text that is exactly the decimal rendering of an `i64` comes back as
    /// `Int`, everything else stays `Text`.
    pub fn from_db_text(value: String) -> Self {
        match value.parse::<i64>() {
            Ok(number) if number.to_string() == value => Self::Int(number),
            _ => Self::Text(value),
        }
    }
}

impl PartialEq for UserId {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a == b,
            _ => self.to_db_text() == other.to_db_text(),
        }
    }
}

impl Eq for UserId {}

impl Hash for UserId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.to_db_text().hash(state);
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for UserId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for UserId {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}
