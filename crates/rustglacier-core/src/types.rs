//! Common identifier types shared across the emulator.

use std::fmt;

/// AWS Account ID as it appears in Glacier request paths.
///
/// Either a 12-digit numeric string or the `-` placeholder that Glacier
/// clients use to mean "the account that signed the request".
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Placeholder account ID accepted in request paths.
    pub const ANONYMOUS: &str = "-";

    /// Create a new account ID from a string.
    ///
    /// # Errors
    /// Returns an error if the value is neither a 12-digit numeric string
    /// nor the `-` placeholder.
    pub fn new(id: impl Into<String>) -> Result<Self, crate::GlacierCoreError> {
        let id = id.into();
        if id == Self::ANONYMOUS {
            return Ok(Self(id));
        }
        if id.len() != 12 || !id.chars().all(|c| c.is_ascii_digit()) {
            return Err(crate::GlacierCoreError::InvalidAccountId(id));
        }
        Ok(Self(id))
    }

    /// Get the account ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self(Self::ANONYMOUS.to_owned())
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
