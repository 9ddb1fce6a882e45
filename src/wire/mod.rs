//! Request payloads for the role endpoints.
//!
//! The backend's create endpoint predates the hierarchical overlay and
//! expects a quirky shape: action flags are the strings `"true"` / `"false"`
//! rather than JSON booleans, the flag names follow REST verbs (`create`,
//! `show`, `update`, `destroy`) instead of the UI's labels, and a literal
//! `lock_modules: 1` marker must be present. This module owns that shape so
//! nothing else in the crate has to know about it.
//!
//! Updates take no special payload: the edited overlay `Role` is serialized
//! as-is.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RoleGridError, RoleGridResult};
use crate::flat::{ApiKey, PermissionRow};

mod bool_string {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(if *value { "true" } else { "false" })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        match raw.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected \"true\" or \"false\", got '{}'",
                other
            ))),
        }
    }
}

/// Action flags for one function, in the backend's REST-verb vocabulary.
///
/// Every flag serializes as a string, matching what the endpoint accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionFlagSet {
    #[serde(with = "bool_string")]
    pub all: bool,
    #[serde(with = "bool_string")]
    pub create: bool,
    #[serde(with = "bool_string")]
    pub show: bool,
    #[serde(with = "bool_string")]
    pub update: bool,
    #[serde(with = "bool_string")]
    pub destroy: bool,
}

impl From<&PermissionRow> for ActionFlagSet {
    fn from(row: &PermissionRow) -> Self {
        Self {
            all: row.all,
            create: row.add,
            show: row.view,
            update: row.edit,
            destroy: row.disable,
        }
    }
}

/// Role name wrapper, nested under `lock_role` in the create payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockRole {
    pub name: String,
}

/// Body for `POST /roles`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCreateRequest {
    pub lock_role: LockRole,
    pub permissions_hash: BTreeMap<ApiKey, ActionFlagSet>,
    pub lock_modules: u8,
}

impl RoleCreateRequest {
    /// Fold flat permission rows into a create payload.
    ///
    /// Rows with no action checked are left out of `permissions_hash`
    /// entirely; the backend treats missing keys as fully denied.
    ///
    /// # Errors
    ///
    /// Returns a validation error when the role name is empty after
    /// trimming.
    pub fn from_rows(name: &str, rows: &[PermissionRow]) -> RoleGridResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RoleGridError::validation("Role name must not be empty"));
        }

        let mut permissions_hash = BTreeMap::new();
        for row in rows.iter().filter(|r| r.has_any_action()) {
            permissions_hash.insert(row.key.clone(), ActionFlagSet::from(row));
        }

        Ok(Self {
            lock_role: LockRole {
                name: name.to_string(),
            },
            permissions_hash,
            lock_modules: 1,
        })
    }
}
