use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The sentinel owner key of the tenant-wide default template.
pub const DEFAULT_OWNER: &str = "default";

const MAX_RECIPE_ID_LEN: usize = 128;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OwnerKeyError {
    #[error("owner key must not be empty")]
    Empty,

    #[error("owner key is longer than 128 characters")]
    TooLong,

    #[error("owner key '{0}' may only contain letters, digits, '-' and '_'")]
    InvalidCharacters(String),
}

/// Identifies who a stored template belongs to: one recipe, or the default.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OwnerKey {
    Default,
    Recipe(String),
}

impl OwnerKey {
    pub fn recipe(id: &str) -> Result<Self, OwnerKeyError> {
        match id.parse()? {
            OwnerKey::Default => Err(OwnerKeyError::InvalidCharacters(id.to_string())),
            key => Ok(key),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OwnerKey::Default => DEFAULT_OWNER,
            OwnerKey::Recipe(id) => id,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, OwnerKey::Default)
    }
}

impl FromStr for OwnerKey {
    type Err = OwnerKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(OwnerKeyError::Empty);
        }
        if s == DEFAULT_OWNER {
            return Ok(OwnerKey::Default);
        }
        if s.len() > MAX_RECIPE_ID_LEN {
            return Err(OwnerKeyError::TooLong);
        }
        // Keys double as file names in the filesystem store
        if !s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(OwnerKeyError::InvalidCharacters(s.to_string()));
        }
        Ok(OwnerKey::Recipe(s.to_string()))
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
