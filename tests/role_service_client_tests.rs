use mockito::{Matcher, Server, ServerGuard};
use rolegrid::{
    ActionField, FlatPermissionBuilder, Function, Module, ModuleGrant, Role, RoleCreateRequest,
    RoleGridError, RoleService, RoleServiceClient, RoleServiceConfig, SessionContext, SubFunction,
};
use serde_json::json;

fn client_for(server: &ServerGuard, session: SessionContext) -> RoleServiceClient {
    let config = RoleServiceConfig {
        base_url: server.url(),
        timeout_secs: 5,
    };
    RoleServiceClient::new(&config, session).unwrap()
}

#[tokio::test]
async fn catalog_loads_and_tolerates_id_aliases() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/lock_modules")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "module_id": 1,
                "name": "Setup",
                "functions": [{
                    "function_id": 11,
                    "name": "Country",
                    "sub_functions": [{ "sub_function_id": 111, "name": "Edit" }]
                }]
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, SessionContext::anonymous());
    let modules = client.load_catalog().await.unwrap();

    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0].id, 1);
    assert_eq!(modules[0].functions[0].id, 11);
    assert_eq!(modules[0].functions[0].sub_functions[0].id, 111);
    mock.assert_async().await;
}

#[tokio::test]
async fn roles_load_with_their_overlays() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/roles_with_modules")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!([{
                "role_id": 7,
                "role_name": "Admin",
                "modules": [{ "module_id": 1, "enabled": true }]
            }])
            .to_string(),
        )
        .create_async()
        .await;

    let client = client_for(&server, SessionContext::anonymous());
    let roles = client.load_roles().await.unwrap();

    assert_eq!(roles.len(), 1);
    assert_eq!(roles[0].role_name, "Admin");
    assert!(roles[0].module(1).unwrap().enabled);
    mock.assert_async().await;
}

#[tokio::test]
async fn bearer_token_is_attached_when_present() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/roles_with_modules")
        .match_header("authorization", "Bearer token-123")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let client = client_for(&server, SessionContext::with_token("token-123"));
    client.load_roles().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn anonymous_requests_omit_the_auth_header() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/roles_with_modules")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[]")
        .create_async()
        .await;

    let client = client_for(&server, SessionContext::anonymous());
    client.load_roles().await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn read_failures_surface_as_catalog_unavailable() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/lock_modules")
        .with_status(500)
        .create_async()
        .await;
    server
        .mock("GET", "/roles_with_modules")
        .with_status(200)
        .with_body("not json")
        .create_async()
        .await;

    let client = client_for(&server, SessionContext::anonymous());
    assert!(matches!(
        client.load_catalog().await,
        Err(RoleGridError::CatalogUnavailable(_))
    ));
    assert!(matches!(
        client.load_roles().await,
        Err(RoleGridError::CatalogUnavailable(_))
    ));
}

#[tokio::test]
async fn role_update_puts_the_overlay_to_its_endpoint() {
    let role = Role {
        role_id: 7,
        role_name: "Admin".to_string(),
        modules: vec![ModuleGrant::seed_from(
            &Module {
                id: 1,
                name: "Setup".to_string(),
                functions: vec![Function {
                    id: 11,
                    name: "Country".to_string(),
                    sub_functions: vec![SubFunction {
                        id: 111,
                        name: "Edit".to_string(),
                    }],
                }],
            },
            true,
        )],
    };

    let mut server = Server::new_async().await;
    let mock = server
        .mock("PUT", "/roles/7")
        .match_body(Matcher::Json(serde_json::to_value(&role).unwrap()))
        .with_status(204)
        .create_async()
        .await;

    let client = client_for(&server, SessionContext::anonymous());
    client.update_role(&role).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn role_create_posts_string_flag_payload() {
    let catalog = rolegrid::Catalog::new(vec![Module {
        id: 1,
        name: "Setup".to_string(),
        functions: vec![Function {
            id: 11,
            name: "Seat Booking".to_string(),
            sub_functions: vec![],
        }],
    }]);
    let mut builder = FlatPermissionBuilder::from_catalog(&catalog).unwrap();
    builder
        .set_action("Seat Booking", ActionField::Add, true)
        .unwrap();
    let request = RoleCreateRequest::from_rows("Front Desk", builder.rows()).unwrap();

    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/roles")
        .match_body(Matcher::Json(json!({
            "lock_role": { "name": "Front Desk" },
            "permissions_hash": {
                "seat_booking": {
                    "all": "false",
                    "create": "true",
                    "show": "false",
                    "update": "false",
                    "destroy": "false"
                }
            },
            "lock_modules": 1
        })))
        .with_status(201)
        .create_async()
        .await;

    let client = client_for(&server, SessionContext::anonymous());
    client.create_role(&request).await.unwrap();
    mock.assert_async().await;
}

#[tokio::test]
async fn rejected_writes_surface_as_submit_failed() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/roles")
        .with_status(422)
        .with_body("name has already been taken")
        .create_async()
        .await;

    let client = client_for(&server, SessionContext::anonymous());
    let request = RoleCreateRequest::from_rows("Admin", &[]).unwrap();
    let err = client.create_role(&request).await.unwrap_err();

    assert!(matches!(err, RoleGridError::SubmitFailed(_)));
    let message = err.to_string();
    assert!(message.contains("422"));
    assert!(message.contains("name has already been taken"));
}
