use std::fmt;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{RoleGridError, RoleGridResult};
use crate::flat::api_key::ApiKey;
use crate::matrix::catalog::Catalog;

/// One of the four per-function action toggles of the flat builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionField {
    Add,
    View,
    Edit,
    Disable,
}

impl fmt::Display for ActionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ActionField::Add => "add",
            ActionField::View => "view",
            ActionField::Edit => "edit",
            ActionField::Disable => "disable",
        };
        f.write_str(name)
    }
}

impl FromStr for ActionField {
    type Err = RoleGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "add" => Ok(ActionField::Add),
            "view" => Ok(ActionField::View),
            "edit" => Ok(ActionField::Edit),
            "disable" => Ok(ActionField::Disable),
            other => Err(RoleGridError::validation(format!(
                "Unknown action '{}', expected add, view, edit or disable",
                other
            ))),
        }
    }
}

/// One row of the flat permission list used by the role creation flow.
///
/// Unlike the hierarchical overlay, a row carries five independent booleans;
/// `all` is derived state, kept synchronized with the four action fields by
/// the builder. The wire key for the row is the `ApiKey` derived from the
/// function's display name, not the display name itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionRow {
    /// Function display name (e.g. "Seat Booking List")
    pub function: String,
    /// Owning module display name
    pub module: String,
    /// Derived wire key for `permissions_hash`
    pub key: ApiKey,
    pub all: bool,
    pub add: bool,
    pub view: bool,
    pub edit: bool,
    pub disable: bool,
}

impl PermissionRow {
    /// Create a cleared row for a function, deriving its wire key.
    pub fn new(function: &str, module: &str) -> RoleGridResult<Self> {
        Ok(Self {
            function: function.to_string(),
            module: module.to_string(),
            key: ApiKey::derive(function)?,
            all: false,
            add: false,
            view: false,
            edit: false,
            disable: false,
        })
    }

    /// Whether any of the four action fields is set
    pub fn has_any_action(&self) -> bool {
        self.add || self.view || self.edit || self.disable
    }

    fn set_field(&mut self, field: ActionField, checked: bool) {
        match field {
            ActionField::Add => self.add = checked,
            ActionField::View => self.view = checked,
            ActionField::Edit => self.edit = checked,
            ActionField::Disable => self.disable = checked,
        }
    }

    fn recompute_all(&mut self) {
        self.all = self.add && self.view && self.edit && self.disable;
    }
}

/// Keeps a flat list of permission rows consistent while they are edited.
///
/// The two rules mirror the creation screen's checkbox behavior: changing an
/// individual action recomputes `all` as the AND of the four actions, and
/// changing `all` forces all four actions to the same value. Note the
/// contrast with the hierarchical reconciler: here the aggregate flag IS
/// re-derived after every leaf change.
#[derive(Debug, Clone, Default)]
pub struct FlatPermissionBuilder {
    rows: Vec<PermissionRow>,
}

impl FlatPermissionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed one cleared row per catalog function, in catalog order.
    pub fn from_catalog(catalog: &Catalog) -> RoleGridResult<Self> {
        let mut builder = Self::new();
        for module in catalog.modules() {
            for function in &module.functions {
                builder.add_row(&function.name, &module.name)?;
            }
        }
        Ok(builder)
    }

    /// Append a cleared row for a function.
    ///
    /// # Errors
    ///
    /// Returns `InvalidApiKey` for unusable names and `Validation` when the
    /// derived key collides with an existing row, so two display names that
    /// normalize to the same wire key cannot silently overwrite each other.
    pub fn add_row(&mut self, function: &str, module: &str) -> RoleGridResult<()> {
        let row = PermissionRow::new(function, module)?;
        if self.rows.iter().any(|r| r.key == row.key) {
            return Err(RoleGridError::validation(format!(
                "Duplicate permission key '{}' derived from '{}'",
                row.key, function
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn rows(&self) -> &[PermissionRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Look up a row by its function display name, ignoring case
    pub fn row(&self, function_name: &str) -> Option<&PermissionRow> {
        self.rows
            .iter()
            .find(|r| r.function.eq_ignore_ascii_case(function_name))
    }

    fn row_mut(&mut self, function_name: &str) -> RoleGridResult<&mut PermissionRow> {
        self.rows
            .iter_mut()
            .find(|r| r.function.eq_ignore_ascii_case(function_name))
            .ok_or_else(|| RoleGridError::UnknownRow(function_name.to_string()))
    }

    /// Set one action field, then recompute the row's `all` flag.
    pub fn set_action(
        &mut self,
        function_name: &str,
        field: ActionField,
        checked: bool,
    ) -> RoleGridResult<()> {
        let row = self.row_mut(function_name)?;
        row.set_field(field, checked);
        row.recompute_all();
        debug!(
            "SET ACTION: row='{}' {}={} all={}",
            row.function, field, checked, row.all
        );
        Ok(())
    }

    /// Set the `all` flag and force the four action fields to match.
    pub fn set_all(&mut self, function_name: &str, checked: bool) -> RoleGridResult<()> {
        let row = self.row_mut(function_name)?;
        row.all = checked;
        row.add = checked;
        row.view = checked;
        row.edit = checked;
        row.disable = checked;
        debug!("SET ALL: row='{}' all={}", row.function, checked);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder_with(function: &str) -> FlatPermissionBuilder {
        let mut builder = FlatPermissionBuilder::new();
        builder.add_row(function, "Setup").unwrap();
        builder
    }

    #[test]
    fn all_is_the_and_of_the_four_actions() {
        let mut builder = builder_with("Country");
        for field in [
            ActionField::Add,
            ActionField::View,
            ActionField::Edit,
            ActionField::Disable,
        ] {
            assert!(!builder.row("Country").unwrap().all);
            builder.set_action("Country", field, true).unwrap();
        }
        assert!(builder.row("Country").unwrap().all);

        builder
            .set_action("Country", ActionField::View, false)
            .unwrap();
        let row = builder.row("Country").unwrap();
        assert!(!row.all);
        assert!(row.add && row.edit && row.disable);
        assert!(!row.view);
    }

    #[test]
    fn set_all_forces_every_action() {
        let mut builder = builder_with("Country");
        builder
            .set_action("Country", ActionField::Add, true)
            .unwrap();

        builder.set_all("Country", true).unwrap();
        let row = builder.row("Country").unwrap();
        assert!(row.all && row.add && row.view && row.edit && row.disable);

        builder.set_all("Country", false).unwrap();
        let row = builder.row("Country").unwrap();
        assert!(!row.all && !row.add && !row.view && !row.edit && !row.disable);
    }

    #[test]
    fn unknown_row_is_a_typed_error() {
        let mut builder = builder_with("Country");
        assert!(matches!(
            builder.set_action("Missing", ActionField::Add, true),
            Err(RoleGridError::UnknownRow(_))
        ));
    }

    #[test]
    fn colliding_derived_keys_are_rejected() {
        let mut builder = builder_with("Seat Booking");
        let err = builder.add_row("Seat  Booking", "Setup").unwrap_err();
        assert!(matches!(err, RoleGridError::Validation(_)));
    }

    #[test]
    fn action_field_parses_case_insensitively() {
        assert_eq!("Add".parse::<ActionField>().unwrap(), ActionField::Add);
        assert_eq!(
            " DISABLE ".parse::<ActionField>().unwrap(),
            ActionField::Disable
        );
        assert!("delete".parse::<ActionField>().is_err());
    }
}
