use serde::{Deserialize, Serialize};

use crate::error::{RoleGridError, RoleGridResult};
use crate::matrix::catalog::{Catalog, Function, Module, SubFunction};

/// Enablement state for one sub-function within a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubFunctionGrant {
    pub sub_function_id: u64,
    pub enabled: bool,
}

impl SubFunctionGrant {
    /// Derive a grant for a catalog sub-function with the given initial state
    pub fn seed_from(sub_function: &SubFunction, enabled: bool) -> Self {
        Self {
            sub_function_id: sub_function.id,
            enabled,
        }
    }
}

/// Enablement state for one function within a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionGrant {
    pub function_id: u64,
    pub enabled: bool,
    #[serde(default)]
    pub sub_functions: Vec<SubFunctionGrant>,
}

impl FunctionGrant {
    /// Derive a grant subtree for a catalog function with a uniform state
    pub fn seed_from(function: &Function, enabled: bool) -> Self {
        Self {
            function_id: function.id,
            enabled,
            sub_functions: function
                .sub_functions
                .iter()
                .map(|s| SubFunctionGrant::seed_from(s, enabled))
                .collect(),
        }
    }

    pub fn sub_function(&self, sub_function_id: u64) -> Option<&SubFunctionGrant> {
        self.sub_functions
            .iter()
            .find(|s| s.sub_function_id == sub_function_id)
    }

    pub(crate) fn sub_function_mut(
        &mut self,
        sub_function_id: u64,
    ) -> Option<&mut SubFunctionGrant> {
        self.sub_functions
            .iter_mut()
            .find(|s| s.sub_function_id == sub_function_id)
    }
}

/// Enablement state for one module within a role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleGrant {
    pub module_id: u64,
    pub enabled: bool,
    #[serde(default)]
    pub functions: Vec<FunctionGrant>,
}

impl ModuleGrant {
    /// Derive a grant subtree for a catalog module with a uniform state
    pub fn seed_from(module: &Module, enabled: bool) -> Self {
        Self {
            module_id: module.id,
            enabled,
            functions: module
                .functions
                .iter()
                .map(|f| FunctionGrant::seed_from(f, enabled))
                .collect(),
        }
    }

    pub fn function(&self, function_id: u64) -> Option<&FunctionGrant> {
        self.functions.iter().find(|f| f.function_id == function_id)
    }

    pub(crate) fn function_mut(&mut self, function_id: u64) -> Option<&mut FunctionGrant> {
        self.functions
            .iter_mut()
            .find(|f| f.function_id == function_id)
    }
}

/// A named permission profile: the per-role overlay over the master catalog.
///
/// The overlay is served fully resolved by the role service and is submitted
/// back whole on update. It is mutated in memory only, through the toggle
/// reconciler, while a role is being edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub role_id: u64,
    pub role_name: String,
    #[serde(default)]
    pub modules: Vec<ModuleGrant>,
}

impl Role {
    pub fn module(&self, module_id: u64) -> Option<&ModuleGrant> {
        self.modules.iter().find(|m| m.module_id == module_id)
    }

    pub(crate) fn module_mut(&mut self, module_id: u64) -> Option<&mut ModuleGrant> {
        self.modules.iter_mut().find(|m| m.module_id == module_id)
    }

    /// Effective capability of a module: its own flag.
    pub fn effective_module(&self, module_id: u64) -> RoleGridResult<bool> {
        Ok(self
            .module(module_id)
            .ok_or(RoleGridError::UnknownModule(module_id))?
            .enabled)
    }

    /// Effective capability of a function: the AND of the module flag and the
    /// function flag.
    pub fn effective_function(&self, module_id: u64, function_id: u64) -> RoleGridResult<bool> {
        let module = self
            .module(module_id)
            .ok_or(RoleGridError::UnknownModule(module_id))?;
        let function = module.function(function_id).ok_or(
            RoleGridError::UnknownFunction {
                module_id,
                function_id,
            },
        )?;
        Ok(module.enabled && function.enabled)
    }

    /// Effective capability of a sub-function: the AND of all ancestor flags
    /// along the path, module and function included.
    pub fn effective_sub_function(
        &self,
        module_id: u64,
        function_id: u64,
        sub_function_id: u64,
    ) -> RoleGridResult<bool> {
        let module = self
            .module(module_id)
            .ok_or(RoleGridError::UnknownModule(module_id))?;
        let function = module.function(function_id).ok_or(
            RoleGridError::UnknownFunction {
                module_id,
                function_id,
            },
        )?;
        let sub_function = function.sub_function(sub_function_id).ok_or(
            RoleGridError::UnknownSubFunction {
                module_id,
                function_id,
                sub_function_id,
            },
        )?;
        Ok(module.enabled && function.enabled && sub_function.enabled)
    }

    /// Check that every overlay node corresponds to a catalog node.
    ///
    /// The overlay must stay structurally congruent with (a subset of) the
    /// master tree; the first orphaned node is reported. The converse is not
    /// required: a role may carry grants for only part of the catalog.
    pub fn validate_against(&self, catalog: &Catalog) -> RoleGridResult<()> {
        for module_grant in &self.modules {
            let module = catalog
                .module(module_grant.module_id)
                .ok_or(RoleGridError::UnknownModule(module_grant.module_id))?;
            for function_grant in &module_grant.functions {
                let function = module.function(function_grant.function_id).ok_or(
                    RoleGridError::UnknownFunction {
                        module_id: module_grant.module_id,
                        function_id: function_grant.function_id,
                    },
                )?;
                for sub_grant in &function_grant.sub_functions {
                    if function.sub_functions.iter().all(|s| s.id != sub_grant.sub_function_id) {
                        return Err(RoleGridError::UnknownSubFunction {
                            module_id: module_grant.module_id,
                            function_id: function_grant.function_id,
                            sub_function_id: sub_grant.sub_function_id,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
