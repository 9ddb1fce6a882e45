use log::{debug, info};

use crate::error::{RoleGridError, RoleGridResult};
use crate::matrix::overlay::Role;

/// Applies toggle events to a role overlay, keeping parent/child enablement
/// consistent.
///
/// The reconciler implements the cascade rules of the permission matrix:
///
/// - A module toggle overwrites every function and sub-function beneath it
///   with the new value (two-level downward cascade).
/// - A function toggle overwrites every sub-function beneath it (one-level
///   downward cascade). Prior individual leaf states are not preserved.
/// - A sub-function toggle sets exactly that leaf.
///
/// Propagation is downward only. Toggling a child never re-derives an
/// ancestor's flag, so a module can remain disabled while functions beneath
/// it are individually enabled; effective capability is resolved separately
/// as the AND of ancestors (see [`Role::effective_sub_function`]).
///
/// Every operation is a deterministic function of the current overlay, the
/// target ids, and the new boolean. On an unknown id the overlay is left
/// untouched and a typed error is returned.
#[derive(Debug, Default, Clone)]
pub struct ToggleReconciler {}

impl ToggleReconciler {
    /// Creates a new ToggleReconciler instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle a module and cascade the new value across everything beneath it.
    ///
    /// Sets the module's `enabled` flag, then overwrites the flag of every
    /// function under the module and every sub-function under each of those
    /// functions with the same value.
    ///
    /// # Arguments
    ///
    /// * `role` - Overlay being edited
    /// * `module_id` - Target module
    /// * `enabled` - New value for the module and all its descendants
    ///
    /// # Errors
    ///
    /// Returns `UnknownModule` if the overlay holds no grant for `module_id`.
    pub fn toggle_module(
        &self,
        role: &mut Role,
        module_id: u64,
        enabled: bool,
    ) -> RoleGridResult<()> {
        let module = role
            .module_mut(module_id)
            .ok_or(RoleGridError::UnknownModule(module_id))?;

        module.enabled = enabled;
        for function in &mut module.functions {
            function.enabled = enabled;
            for sub_function in &mut function.sub_functions {
                sub_function.enabled = enabled;
            }
        }

        info!(
            "TOGGLE MODULE: role={} module={} enabled={} (cascaded to {} functions)",
            role.role_name,
            module_id,
            enabled,
            role.module(module_id).map_or(0, |m| m.functions.len())
        );
        Ok(())
    }

    /// Toggle a function and cascade the new value to its sub-functions.
    ///
    /// Sets the function's `enabled` flag and overwrites every sub-function
    /// beneath it with the same value. Sibling functions, other modules, and
    /// the parent module flag are not altered.
    ///
    /// # Arguments
    ///
    /// * `role` - Overlay being edited
    /// * `module_id` - Module owning the function
    /// * `function_id` - Target function
    /// * `enabled` - New value for the function and its sub-functions
    ///
    /// # Errors
    ///
    /// Returns `UnknownModule` or `UnknownFunction` when the path does not
    /// exist in the overlay.
    pub fn toggle_function(
        &self,
        role: &mut Role,
        module_id: u64,
        function_id: u64,
        enabled: bool,
    ) -> RoleGridResult<()> {
        let module = role
            .module_mut(module_id)
            .ok_or(RoleGridError::UnknownModule(module_id))?;
        let function = module
            .function_mut(function_id)
            .ok_or(RoleGridError::UnknownFunction {
                module_id,
                function_id,
            })?;

        function.enabled = enabled;
        for sub_function in &mut function.sub_functions {
            sub_function.enabled = enabled;
        }

        info!(
            "TOGGLE FUNCTION: role={} module={} function={} enabled={}",
            role.role_name, module_id, function_id, enabled
        );
        Ok(())
    }

    /// Toggle exactly one sub-function.
    ///
    /// Sets that leaf's `enabled` flag and nothing else. The parent function
    /// and module flags are never re-derived from leaf state.
    ///
    /// # Arguments
    ///
    /// * `role` - Overlay being edited
    /// * `module_id` - Module owning the path
    /// * `function_id` - Function owning the leaf
    /// * `sub_function_id` - Target leaf
    /// * `enabled` - New value for the leaf only
    ///
    /// # Errors
    ///
    /// Returns the typed unknown-id error for the first missing path segment.
    pub fn toggle_sub_function(
        &self,
        role: &mut Role,
        module_id: u64,
        function_id: u64,
        sub_function_id: u64,
        enabled: bool,
    ) -> RoleGridResult<()> {
        let module = role
            .module_mut(module_id)
            .ok_or(RoleGridError::UnknownModule(module_id))?;
        let function = module
            .function_mut(function_id)
            .ok_or(RoleGridError::UnknownFunction {
                module_id,
                function_id,
            })?;
        let sub_function = function.sub_function_mut(sub_function_id).ok_or(
            RoleGridError::UnknownSubFunction {
                module_id,
                function_id,
                sub_function_id,
            },
        )?;

        sub_function.enabled = enabled;
        debug!(
            "TOGGLE SUB-FUNCTION: role={} module={} function={} sub_function={} enabled={}",
            role.role_name, module_id, function_id, sub_function_id, enabled
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::overlay::{FunctionGrant, ModuleGrant, Role, SubFunctionGrant};

    fn sample_role() -> Role {
        Role {
            role_id: 1,
            role_name: "Admin".to_string(),
            modules: vec![
                ModuleGrant {
                    module_id: 1,
                    enabled: true,
                    functions: vec![
                        FunctionGrant {
                            function_id: 10,
                            enabled: true,
                            sub_functions: vec![
                                SubFunctionGrant {
                                    sub_function_id: 100,
                                    enabled: true,
                                },
                                SubFunctionGrant {
                                    sub_function_id: 101,
                                    enabled: false,
                                },
                            ],
                        },
                        FunctionGrant {
                            function_id: 11,
                            enabled: false,
                            sub_functions: vec![SubFunctionGrant {
                                sub_function_id: 110,
                                enabled: false,
                            }],
                        },
                    ],
                },
                ModuleGrant {
                    module_id: 2,
                    enabled: true,
                    functions: vec![FunctionGrant {
                        function_id: 20,
                        enabled: true,
                        sub_functions: vec![],
                    }],
                },
            ],
        }
    }

    #[test]
    fn module_toggle_cascades_two_levels() {
        let reconciler = ToggleReconciler::new();
        let mut role = sample_role();

        reconciler.toggle_module(&mut role, 1, false).unwrap();

        let module = role.module(1).unwrap();
        assert!(!module.enabled);
        for function in &module.functions {
            assert!(!function.enabled);
            for sub in &function.sub_functions {
                assert!(!sub.enabled);
            }
        }
        // untouched sibling module
        assert!(role.module(2).unwrap().enabled);
    }

    #[test]
    fn module_toggle_on_enables_everything_beneath() {
        let reconciler = ToggleReconciler::new();
        let mut role = sample_role();

        reconciler.toggle_module(&mut role, 1, true).unwrap();

        let module = role.module(1).unwrap();
        assert!(module.enabled);
        assert!(module.functions.iter().all(|f| f.enabled));
        assert!(module
            .functions
            .iter()
            .flat_map(|f| &f.sub_functions)
            .all(|s| s.enabled));
    }

    #[test]
    fn function_toggle_overwrites_leaves_and_spares_siblings() {
        let reconciler = ToggleReconciler::new();
        let mut role = sample_role();

        reconciler.toggle_function(&mut role, 1, 11, true).unwrap();

        let module = role.module(1).unwrap();
        let toggled = module.function(11).unwrap();
        assert!(toggled.enabled);
        assert!(toggled.sub_functions.iter().all(|s| s.enabled));

        // sibling function keeps its mixed leaf states
        let sibling = module.function(10).unwrap();
        assert!(sibling.enabled);
        assert!(sibling.sub_function(100).unwrap().enabled);
        assert!(!sibling.sub_function(101).unwrap().enabled);

        // module flag untouched by a function-level toggle
        assert!(module.enabled);
        assert!(role.module(2).unwrap().enabled);
    }

    #[test]
    fn function_toggle_off_does_not_preserve_leaf_states() {
        let reconciler = ToggleReconciler::new();
        let mut role = sample_role();

        reconciler.toggle_function(&mut role, 1, 10, false).unwrap();
        let function = role.module(1).unwrap().function(10).unwrap();
        assert!(!function.enabled);
        assert!(function.sub_functions.iter().all(|s| !s.enabled));

        // toggling back on overwrites again rather than restoring
        reconciler.toggle_function(&mut role, 1, 10, true).unwrap();
        let function = role.module(1).unwrap().function(10).unwrap();
        assert!(function.sub_functions.iter().all(|s| s.enabled));
    }

    #[test]
    fn sub_function_toggle_touches_only_that_leaf() {
        let reconciler = ToggleReconciler::new();
        let mut role = sample_role();

        reconciler
            .toggle_sub_function(&mut role, 1, 10, 101, true)
            .unwrap();

        let module = role.module(1).unwrap();
        let function = module.function(10).unwrap();
        assert!(function.sub_function(101).unwrap().enabled);
        assert!(function.sub_function(100).unwrap().enabled);
        // no upward re-derivation
        assert!(function.enabled);
        assert!(module.enabled);

        reconciler
            .toggle_sub_function(&mut role, 1, 10, 100, false)
            .unwrap();
        let function = role.module(1).unwrap().function(10).unwrap();
        assert!(!function.sub_function(100).unwrap().enabled);
        assert!(function.enabled);
    }

    #[test]
    fn unknown_ids_leave_overlay_untouched() {
        let reconciler = ToggleReconciler::new();
        let mut role = sample_role();
        let before = serde_json::to_value(&role).unwrap();

        assert!(matches!(
            reconciler.toggle_module(&mut role, 99, false),
            Err(RoleGridError::UnknownModule(99))
        ));
        assert!(matches!(
            reconciler.toggle_function(&mut role, 1, 99, false),
            Err(RoleGridError::UnknownFunction {
                module_id: 1,
                function_id: 99
            })
        ));
        assert!(matches!(
            reconciler.toggle_sub_function(&mut role, 1, 10, 999, true),
            Err(RoleGridError::UnknownSubFunction {
                sub_function_id: 999,
                ..
            })
        ));

        assert_eq!(before, serde_json::to_value(&role).unwrap());
    }
}
