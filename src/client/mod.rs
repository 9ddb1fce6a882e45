//! Access to the role service over HTTP.
//!
//! All calls go through the [`RoleService`] trait so editing logic can be
//! exercised against fakes; [`RoleServiceClient`] is the real implementation
//! backed by `reqwest`. Connection settings come from
//! [`RoleServiceConfig`] and the caller's identity travels in a
//! [`SessionContext`] rather than being read from ambient state.
//!
//! ## Error mapping
//!
//! Read failures of any kind (transport, non-2xx status, undecodable body)
//! surface as `CatalogUnavailable`; write rejections surface as
//! `SubmitFailed` with the status and response text folded into the message.
//! Callers branch on which phase failed, not on transport detail.

pub mod config;
pub mod http;

use async_trait::async_trait;

use crate::error::RoleGridResult;
use crate::matrix::catalog::Module;
use crate::matrix::overlay::Role;
use crate::wire::RoleCreateRequest;

pub use config::{load_service_config, RoleServiceConfig, SessionContext};
pub use http::RoleServiceClient;

/// Operations the role service exposes.
#[async_trait]
pub trait RoleService: Send + Sync {
    /// Fetch the fixed module/function/sub-function catalog
    async fn load_catalog(&self) -> RoleGridResult<Vec<Module>>;

    /// Fetch every role together with its permission overlay
    async fn load_roles(&self) -> RoleGridResult<Vec<Role>>;

    /// Create a role from a flat permission payload
    async fn create_role(&self, request: &RoleCreateRequest) -> RoleGridResult<()>;

    /// Persist an edited role overlay
    async fn update_role(&self, role: &Role) -> RoleGridResult<()>;
}
