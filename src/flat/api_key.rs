use std::fmt;

use once_cell::sync::OnceCell;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{RoleGridError, RoleGridResult};

static SEPARATOR_PATTERN: OnceCell<Regex> = OnceCell::new();

fn separator_pattern() -> RoleGridResult<&'static Regex> {
    SEPARATOR_PATTERN.get_or_try_init(|| {
        Regex::new(r"[^a-z0-9]+").map_err(|e| {
            RoleGridError::config_error(format!("API key pattern failed to compile: {}", e))
        })
    })
}

/// The normalized snake_case identifier derived from a function's display
/// name, used as the JSON object key in the legacy flat payload.
///
/// Derivation: lowercase the display name, collapse every run of characters
/// outside `a-z0-9` (whitespace and special characters alike) into a single
/// underscore, then trim leading and trailing underscores. Names that
/// normalize to nothing are rejected, so a malformed display name surfaces as
/// a typed error instead of an empty wire key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ApiKey(String);

impl ApiKey {
    /// Derive the API key for a display name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidApiKey` when the name contains no usable characters.
    pub fn derive(name: &str) -> RoleGridResult<Self> {
        let lowered = name.to_lowercase();
        let separated = separator_pattern()?.replace_all(&lowered, "_");
        let key = separated.trim_matches('_').to_string();
        if key.is_empty() {
            return Err(RoleGridError::InvalidApiKey(name.to_string()));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_snake_case_from_plain_words() {
        let key = ApiKey::derive("Seat Booking List").unwrap();
        assert_eq!(key.as_str(), "seat_booking_list");
    }

    #[test]
    fn strips_specials_and_collapses_underscores() {
        let key = ApiKey::derive("  A/B -- C  ").unwrap();
        assert_eq!(key.as_str(), "a_b_c");
    }

    #[test]
    fn keeps_existing_underscores_and_digits() {
        let key = ApiKey::derive("Level_2 Parking").unwrap();
        assert_eq!(key.as_str(), "level_2_parking");
    }

    #[test]
    fn rejects_names_without_usable_characters() {
        assert!(matches!(
            ApiKey::derive("  -- // "),
            Err(RoleGridError::InvalidApiKey(_))
        ));
        assert!(matches!(
            ApiKey::derive(""),
            Err(RoleGridError::InvalidApiKey(_))
        ));
    }

    #[test]
    fn serializes_as_a_bare_string() {
        let key = ApiKey::derive("Mail Room").unwrap();
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"mail_room\"");
    }
}
