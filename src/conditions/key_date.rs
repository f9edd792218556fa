//! relative date tokens used by DATE values
//!
//! the backend owns the meaning of each token; this side only needs to
//! carry them through unchanged, so unknown tokens are kept as-is.

use std::fmt;

use serde::{Deserialize, Serialize};

/// a relative date token such as `TODAY` or `NEXT_QUARTER`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyDate(String);

impl KeyDate {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn today() -> Self {
        Self::new("TODAY")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for KeyDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
