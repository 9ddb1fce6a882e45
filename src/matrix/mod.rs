//! # Permission Matrix
//!
//! The matrix module holds the hierarchical permission model and its
//! reconciliation rules.
//!
//! ## Components
//!
//! * `catalog` - The read-only master Module→Function→SubFunction tree
//! * `overlay` - The per-role enablement state layered over the catalog
//! * `reconciler` - The toggle rules that keep parent/child state consistent
//!
//! ## Architecture
//!
//! The master catalog describes the application's full feature surface and is
//! fetched once per session from the role service. Each role carries an
//! overlay: a structurally congruent tree of `enabled` flags. Editing happens
//! only through the reconciler, whose cascades are downward-only; effective
//! capability along a path is the AND of the ancestor flags and is exposed as
//! a read-side query on the overlay.

pub mod catalog;
pub mod overlay;
pub mod reconciler;

pub use catalog::{Catalog, Function, Module, SubFunction};
pub use overlay::{FunctionGrant, ModuleGrant, Role, SubFunctionGrant};
pub use reconciler::ToggleReconciler;
