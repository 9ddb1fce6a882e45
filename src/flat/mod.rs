//! Flat permission rows for the role creation flow.
//!
//! Role creation does not edit a hierarchical overlay. It works on a flat
//! list of rows, one per catalog function, each carrying the four action
//! flags plus a derived `all` aggregate. This module owns that list and the
//! wire-key derivation used when the rows are folded into a create payload.
//!
//! ## Components
//!
//! * `ApiKey` - Value type for the normalized wire key derived from a
//!   function's display name
//! * `PermissionRow` - One function's action flags plus its derived key
//! * `FlatPermissionBuilder` - Keeps `all` and the action flags consistent
//!   while rows are edited

pub mod api_key;
pub mod builder;

pub use api_key::ApiKey;
pub use builder::{ActionField, FlatPermissionBuilder, PermissionRow};
