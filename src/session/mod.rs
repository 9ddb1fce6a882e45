//! Editing session for the permission matrix screen.
//!
//! [`EditSession`] owns everything the matrix editor needs between two
//! server calls: the fixed catalog, the overlay of the role being edited,
//! the selected module tab, and the phase of the save lifecycle. Selecting
//! a role replaces the working overlay wholesale; nothing edited for the
//! previous role survives.
//!
//! ## Save lifecycle
//!
//! ```text
//! NoRoleSelected -> RoleLoaded -> Dirty -> Submitting -> RoleLoaded
//!                        ^                     |
//!                        +---- (failure) ------+--> Dirty
//! ```
//!
//! A failed submit keeps the edited overlay intact so the operator can retry
//! or keep editing; a successful submit reloads the role from the server so
//! the session reflects what was actually persisted.

use log::{info, warn};

use crate::client::RoleService;
use crate::error::{RoleGridError, RoleGridResult};
use crate::matrix::catalog::Catalog;
use crate::matrix::overlay::Role;
use crate::matrix::reconciler::ToggleReconciler;

/// Where the session stands in the edit/save lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Catalog is loaded, no role picked yet
    NoRoleSelected,
    /// A role's overlay is loaded and matches what the server returned
    RoleLoaded,
    /// The overlay has unsaved edits
    Dirty,
    /// A save is in flight; edits are rejected until it settles
    Submitting,
}

/// Stateful editor for one role's permission overlay.
#[derive(Debug, Clone)]
pub struct EditSession {
    catalog: Catalog,
    reconciler: ToggleReconciler,
    active: Option<Role>,
    active_module: Option<u64>,
    phase: SessionPhase,
}

impl EditSession {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            reconciler: ToggleReconciler::new(),
            active: None,
            active_module: None,
            phase: SessionPhase::NoRoleSelected,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Overlay currently being edited, if a role is selected
    pub fn active_role(&self) -> Option<&Role> {
        self.active.as_ref()
    }

    /// Module tab the editor is showing
    pub fn active_module_id(&self) -> Option<u64> {
        self.active_module
    }

    /// Load a role into the session, discarding any unsaved edits.
    ///
    /// The module tab falls back to the catalog's first module so the editor
    /// always has something to show.
    pub fn select_role(&mut self, role: &Role) {
        info!("Selecting role '{}' ({})", role.role_name, role.role_id);
        self.active = Some(role.clone());
        if self.active_module.is_none() {
            self.active_module = self.catalog.first_module().map(|m| m.id);
        }
        self.phase = SessionPhase::RoleLoaded;
    }

    /// Switch the visible module tab. Purely presentational; the phase and
    /// overlay are untouched.
    pub fn select_module_tab(&mut self, module_id: u64) -> RoleGridResult<()> {
        if self.catalog.module(module_id).is_none() {
            return Err(RoleGridError::UnknownModule(module_id));
        }
        self.active_module = Some(module_id);
        Ok(())
    }

    /// Toggle a module flag, cascading across its functions and sub-functions.
    pub fn toggle_module(&mut self, module_id: u64, enabled: bool) -> RoleGridResult<()> {
        let reconciler = self.reconciler.clone();
        let role = self.editable_role()?;
        reconciler.toggle_module(role, module_id, enabled)?;
        self.phase = SessionPhase::Dirty;
        Ok(())
    }

    /// Toggle a function flag, cascading across its sub-functions.
    pub fn toggle_function(
        &mut self,
        module_id: u64,
        function_id: u64,
        enabled: bool,
    ) -> RoleGridResult<()> {
        let reconciler = self.reconciler.clone();
        let role = self.editable_role()?;
        reconciler.toggle_function(role, module_id, function_id, enabled)?;
        self.phase = SessionPhase::Dirty;
        Ok(())
    }

    /// Toggle a single sub-function flag.
    pub fn toggle_sub_function(
        &mut self,
        module_id: u64,
        function_id: u64,
        sub_function_id: u64,
        enabled: bool,
    ) -> RoleGridResult<()> {
        let reconciler = self.reconciler.clone();
        let role = self.editable_role()?;
        reconciler.toggle_sub_function(role, module_id, function_id, sub_function_id, enabled)?;
        self.phase = SessionPhase::Dirty;
        Ok(())
    }

    /// Mark the session as submitting.
    ///
    /// # Errors
    ///
    /// Returns `NoActiveRole` when nothing is selected and a validation
    /// error when a submit is already in flight.
    pub fn begin_submit(&mut self) -> RoleGridResult<()> {
        if self.active.is_none() {
            return Err(RoleGridError::NoActiveRole);
        }
        if self.phase == SessionPhase::Submitting {
            return Err(RoleGridError::validation("A save is already in progress"));
        }
        self.phase = SessionPhase::Submitting;
        Ok(())
    }

    /// Record a successful save.
    ///
    /// When the follow-up reload produced a fresh copy of the role it
    /// becomes the new baseline; otherwise the submitted overlay stands in
    /// for it.
    pub fn complete_submit(&mut self, refreshed: Option<Role>) {
        if let Some(role) = refreshed {
            self.active = Some(role);
        }
        self.phase = SessionPhase::RoleLoaded;
    }

    /// Record a failed save, keeping the edited overlay for another attempt.
    pub fn fail_submit(&mut self) {
        self.phase = SessionPhase::Dirty;
    }

    /// Persist the active overlay and refresh it from the server.
    ///
    /// On success the role list is reloaded and the saved role replaces the
    /// working overlay; if the reload fails or no longer contains the role,
    /// the submitted overlay is kept and a warning is logged. On failure the
    /// session drops back to `Dirty` with every edit intact and the error is
    /// returned to the caller.
    pub async fn submit(&mut self, service: &dyn RoleService) -> RoleGridResult<()> {
        self.begin_submit()?;
        let role = self.active.clone().ok_or(RoleGridError::NoActiveRole)?;

        match service.update_role(&role).await {
            Ok(()) => {
                let refreshed = match service.load_roles().await {
                    Ok(roles) => roles.into_iter().find(|r| r.role_id == role.role_id),
                    Err(e) => {
                        warn!("Reload after saving role {} failed: {}", role.role_id, e);
                        None
                    }
                };
                if refreshed.is_none() {
                    warn!(
                        "Keeping submitted overlay for role {}; no refreshed copy available",
                        role.role_id
                    );
                }
                self.complete_submit(refreshed);
                Ok(())
            }
            Err(e) => {
                self.fail_submit();
                Err(e)
            }
        }
    }

    fn editable_role(&mut self) -> RoleGridResult<&mut Role> {
        if self.phase == SessionPhase::Submitting {
            return Err(RoleGridError::validation(
                "Cannot edit permissions while a save is in progress",
            ));
        }
        self.active.as_mut().ok_or(RoleGridError::NoActiveRole)
    }
}
