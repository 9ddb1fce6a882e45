use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::client::config::{RoleServiceConfig, SessionContext};
use crate::client::RoleService;
use crate::error::{RoleGridError, RoleGridResult};
use crate::matrix::catalog::Module;
use crate::matrix::overlay::Role;
use crate::wire::RoleCreateRequest;

const CATALOG_PATH: &str = "lock_modules";
const ROLES_PATH: &str = "roles_with_modules";
const ROLE_WRITE_PATH: &str = "roles";

/// HTTP implementation of [`RoleService`].
///
/// Cheap to clone; the inner `reqwest::Client` shares its connection pool
/// across clones.
#[derive(Debug, Clone)]
pub struct RoleServiceClient {
    client: Client,
    base_url: String,
    session: SessionContext,
}

impl RoleServiceClient {
    /// Build a client for the configured service.
    ///
    /// # Errors
    ///
    /// Fails when the configuration does not validate or the underlying
    /// HTTP client cannot be constructed.
    pub fn new(config: &RoleServiceConfig, session: SessionContext) -> RoleGridResult<Self> {
        config.validate()?;
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("rolegrid/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.bearer_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> RoleGridResult<T> {
        let url = self.endpoint(path);
        debug!("GET {}", url);

        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| {
                RoleGridError::catalog_unavailable(format!("Request to {} failed: {}", url, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RoleGridError::catalog_unavailable(format!(
                "{} returned status {}",
                url, status
            )));
        }

        response.json::<T>().await.map_err(|e| {
            RoleGridError::catalog_unavailable(format!(
                "Failed to decode response from {}: {}",
                url, e
            ))
        })
    }

    /// Send a write and discard the response body; only the status matters.
    async fn submit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> RoleGridResult<()> {
        let url = self.endpoint(path);
        debug!("{} {}", method, url);

        let response = self
            .authorized(self.client.request(method.clone(), &url))
            .json(body)
            .send()
            .await
            .map_err(|e| {
                RoleGridError::submit_failed(format!("Request to {} failed: {}", url, e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(RoleGridError::submit_failed(format!(
                "{} {} returned status {}: {}",
                method, url, status, detail
            )));
        }

        info!("{} {} succeeded with status {}", method, url, status);
        Ok(())
    }
}

#[async_trait]
impl RoleService for RoleServiceClient {
    async fn load_catalog(&self) -> RoleGridResult<Vec<Module>> {
        let modules: Vec<Module> = self.fetch(CATALOG_PATH).await?;
        info!("Loaded catalog with {} modules", modules.len());
        Ok(modules)
    }

    async fn load_roles(&self) -> RoleGridResult<Vec<Role>> {
        let roles: Vec<Role> = self.fetch(ROLES_PATH).await?;
        info!("Loaded {} roles", roles.len());
        Ok(roles)
    }

    async fn create_role(&self, request: &RoleCreateRequest) -> RoleGridResult<()> {
        info!("Creating role '{}'", request.lock_role.name);
        self.submit(Method::POST, ROLE_WRITE_PATH, request).await
    }

    async fn update_role(&self, role: &Role) -> RoleGridResult<()> {
        info!("Updating role '{}' ({})", role.role_name, role.role_id);
        let path = format!("{}/{}", ROLE_WRITE_PATH, role.role_id);
        self.submit(Method::PUT, &path, role).await
    }
}
