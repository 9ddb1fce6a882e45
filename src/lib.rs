//! # RoleGrid Library
//!
//! This library implements the client side of a role permission matrix: a
//! fixed three-level catalog of modules, functions and sub-functions, and a
//! per-role overlay of enabled flags kept structurally congruent with that
//! catalog. It provides the toggle cascade rules, the flat row builder used
//! when creating roles, the wire payloads the role service expects, and an
//! edit session that tracks the save lifecycle.
//!
//! ## Core Components
//!
//! * `matrix` - Catalog and overlay types plus the toggle reconciler that
//!   cascades flag changes downward
//! * `flat` - Flat permission rows and wire-key derivation for the role
//!   creation flow
//! * `wire` - Request payloads in the backend's string-flag vocabulary
//! * `client` - `RoleService` trait, HTTP implementation and configuration
//! * `session` - Stateful editor tracking role selection, edits and saves
//! * `error` - Error types and handling
//!
//! ## Architecture
//!
//! Everything hangs off two data shapes. The catalog is immutable reference
//! data fetched once per session; overlays are per-role copies of its
//! structure carrying booleans. Editing logic is synchronous and pure so it
//! can be tested without a server, while the `client` module isolates every
//! HTTP concern behind a trait. An effective permission is the AND of a
//! node's flag and its ancestors' flags; cascades only ever flow downward.

pub mod client;
pub mod error;
pub mod flat;
pub mod matrix;
pub mod session;
pub mod wire;

// Re-export main types for convenience
pub use client::{
    load_service_config, RoleService, RoleServiceClient, RoleServiceConfig, SessionContext,
};
pub use error::{RoleGridError, RoleGridResult};
pub use flat::{ActionField, ApiKey, FlatPermissionBuilder, PermissionRow};
pub use matrix::catalog::{Catalog, Function, Module, SubFunction};
pub use matrix::overlay::{FunctionGrant, ModuleGrant, Role, SubFunctionGrant};
pub use matrix::reconciler::ToggleReconciler;
pub use session::{EditSession, SessionPhase};
pub use wire::{ActionFlagSet, LockRole, RoleCreateRequest};
