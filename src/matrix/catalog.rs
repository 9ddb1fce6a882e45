use serde::{Deserialize, Serialize};

/// A leaf toggle unit beneath a function (e.g. "Edit" under "Country").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubFunction {
    /// Catalog id; the service emits this as `id` or `sub_function_id`
    #[serde(alias = "sub_function_id")]
    pub id: u64,
    pub name: String,
}

/// A named capability within a module (e.g. "Country", "Asset Groups").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Function {
    #[serde(alias = "function_id")]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub sub_functions: Vec<SubFunction>,
}

/// A top-level feature group in the permission catalog (e.g. "Setup").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Module {
    #[serde(alias = "module_id")]
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub functions: Vec<Function>,
}

impl Module {
    /// Find a function under this module by id
    pub fn function(&self, function_id: u64) -> Option<&Function> {
        self.functions.iter().find(|f| f.id == function_id)
    }
}

/// The read-only master module catalog, fetched once per session.
///
/// Catalog order is the order served by the role service; lookups by name are
/// case-insensitive because the CLI resolves human-entered display names.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    modules: Vec<Module>,
}

impl Catalog {
    pub fn new(modules: Vec<Module>) -> Self {
        Self { modules }
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// The first module in catalog order, used as the default tab
    pub fn first_module(&self) -> Option<&Module> {
        self.modules.first()
    }

    /// Find a module by id
    pub fn module(&self, module_id: u64) -> Option<&Module> {
        self.modules.iter().find(|m| m.id == module_id)
    }

    /// Find a module by display name, ignoring case
    pub fn module_by_name(&self, name: &str) -> Option<&Module> {
        self.modules
            .iter()
            .find(|m| m.name.eq_ignore_ascii_case(name))
    }

    /// Find a function by display name within a module, ignoring case
    pub fn function_by_name(&self, module_id: u64, name: &str) -> Option<&Function> {
        self.module(module_id)?
            .functions
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(name))
    }
}

impl From<Vec<Module>> for Catalog {
    fn from(modules: Vec<Module>) -> Self {
        Self::new(modules)
    }
}
