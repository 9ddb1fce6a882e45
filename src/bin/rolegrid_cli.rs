use clap::{Parser, Subcommand};
use log::info;
use rolegrid::{
    load_service_config, ActionField, Catalog, EditSession, FlatPermissionBuilder, Role,
    RoleCreateRequest, RoleGridError, RoleGridResult, RoleService, RoleServiceClient,
    SessionContext,
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to the role service configuration file
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the module/function/sub-function catalog
    Catalog {},
    /// List roles known to the service
    Roles {},
    /// Show a role's permission matrix with effective values
    Show {
        /// Role id or name
        #[arg(short, long, required = true)]
        role: String,
    },
    /// Toggle a permission flag on a role and save it
    Toggle {
        /// Role id or name
        #[arg(short, long, required = true)]
        role: String,

        /// Module display name
        #[arg(short, long, required = true)]
        module: String,

        /// Function display name within the module
        #[arg(short, long)]
        function: Option<String>,

        /// Sub-function display name within the function
        #[arg(short = 'u', long)]
        sub_function: Option<String>,

        /// New state (on or off)
        #[arg(short, long, required = true)]
        state: String,
    },
    /// Create a role from function grants
    CreateRole {
        /// Name for the new role
        #[arg(short, long, required = true)]
        name: String,

        /// Grant of the form "Function Name=add,view" or "Function Name=all";
        /// repeat for multiple functions
        #[arg(short, long)]
        grant: Vec<String>,
    },
}

/// Main entry point for the RoleGrid CLI.
///
/// Parses command-line arguments, connects to the configured role service,
/// and executes the requested command against it.
///
/// # Command-Line Arguments
///
/// * `-c, --config <PATH>` - Path to the service configuration file
/// * Subcommands:
///   * `catalog` - Print the permission catalog
///   * `roles` - List roles
///   * `show` - Show a role's matrix with effective values
///   * `toggle` - Flip a flag on a role and save it
///   * `create-role` - Create a role from function grants
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded, the service
/// cannot be reached, or the requested names do not exist in the catalog.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let config = load_service_config(cli.config.as_deref())?;
    info!("Using role service at {}", config.base_url);
    let client = RoleServiceClient::new(&config, SessionContext::from_env())?;

    match cli.command {
        Commands::Catalog {} => {
            let catalog = Catalog::from(client.load_catalog().await?);
            print_catalog(&catalog);
        }
        Commands::Roles {} => {
            let roles = client.load_roles().await?;
            for role in &roles {
                println!("{:>6}  {}", role.role_id, role.role_name);
            }
            println!("{} roles", roles.len());
        }
        Commands::Show { role } => {
            let catalog = Catalog::from(client.load_catalog().await?);
            let roles = client.load_roles().await?;
            let role = find_role(&roles, &role)?;
            print_matrix(&catalog, role);
        }
        Commands::Toggle {
            role,
            module,
            function,
            sub_function,
            state,
        } => {
            let enabled = parse_state(&state)?;
            let catalog = Catalog::from(client.load_catalog().await?);
            let roles = client.load_roles().await?;
            let role = find_role(&roles, &role)?;

            let mut session = EditSession::new(catalog);
            session.select_role(role);
            apply_toggle(
                &mut session,
                &module,
                function.as_deref(),
                sub_function.as_deref(),
                enabled,
            )?;
            session.submit(&client).await?;

            println!(
                "Saved role '{}' with {} set to {}",
                role.role_name,
                toggle_target(&module, function.as_deref(), sub_function.as_deref()),
                if enabled { "on" } else { "off" }
            );
        }
        Commands::CreateRole { name, grant } => {
            let catalog = Catalog::from(client.load_catalog().await?);
            let mut builder = FlatPermissionBuilder::from_catalog(&catalog)?;
            for entry in &grant {
                apply_grant(&mut builder, entry)?;
            }

            let request = RoleCreateRequest::from_rows(&name, builder.rows())?;
            let granted = request.permissions_hash.len();
            client.create_role(&request).await?;
            println!(
                "Created role '{}' with permissions on {} functions",
                name, granted
            );
        }
    }

    Ok(())
}

fn print_catalog(catalog: &Catalog) {
    for module in catalog.modules() {
        println!("{} ({})", module.name, module.id);
        for function in &module.functions {
            println!("  {} ({})", function.name, function.id);
            for sub_function in &function.sub_functions {
                println!("    {} ({})", sub_function.name, sub_function.id);
            }
        }
    }
}

fn print_matrix(catalog: &Catalog, role: &Role) {
    println!("Role '{}' ({})", role.role_name, role.role_id);
    for module in catalog.modules() {
        let enabled = role.module(module.id).map(|m| m.enabled).unwrap_or(false);
        println!("{} {} ({})", mark(enabled), module.name, module.id);
        for function in &module.functions {
            let enabled = role
                .module(module.id)
                .and_then(|m| m.function(function.id))
                .map(|f| f.enabled)
                .unwrap_or(false);
            let effective = role
                .effective_function(module.id, function.id)
                .unwrap_or(false);
            println!(
                "  {} {} ({})  effective: {}",
                mark(enabled),
                function.name,
                function.id,
                on_off(effective)
            );
            for sub_function in &function.sub_functions {
                let enabled = role
                    .module(module.id)
                    .and_then(|m| m.function(function.id))
                    .and_then(|f| f.sub_function(sub_function.id))
                    .map(|s| s.enabled)
                    .unwrap_or(false);
                let effective = role
                    .effective_sub_function(module.id, function.id, sub_function.id)
                    .unwrap_or(false);
                println!(
                    "    {} {} ({})  effective: {}",
                    mark(enabled),
                    sub_function.name,
                    sub_function.id,
                    on_off(effective)
                );
            }
        }
    }
}

fn mark(enabled: bool) -> &'static str {
    if enabled {
        "[x]"
    } else {
        "[ ]"
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

fn toggle_target(module: &str, function: Option<&str>, sub_function: Option<&str>) -> String {
    match (function, sub_function) {
        (Some(f), Some(s)) => format!("{} / {} / {}", module, f, s),
        (Some(f), None) => format!("{} / {}", module, f),
        _ => module.to_string(),
    }
}

fn find_role<'a>(roles: &'a [Role], selector: &str) -> RoleGridResult<&'a Role> {
    if let Ok(id) = selector.parse::<u64>() {
        if let Some(role) = roles.iter().find(|r| r.role_id == id) {
            return Ok(role);
        }
    }
    roles
        .iter()
        .find(|r| r.role_name.eq_ignore_ascii_case(selector))
        .ok_or_else(|| RoleGridError::validation(format!("No role matches '{}'", selector)))
}

fn parse_state(state: &str) -> RoleGridResult<bool> {
    match state.to_ascii_lowercase().as_str() {
        "on" | "true" | "enabled" => Ok(true),
        "off" | "false" | "disabled" => Ok(false),
        other => Err(RoleGridError::validation(format!(
            "State must be 'on' or 'off', got '{}'",
            other
        ))),
    }
}

enum ToggleTarget {
    Module(u64),
    Function(u64, u64),
    SubFunction(u64, u64, u64),
}

/// Resolve display names to catalog ids and apply the matching toggle.
fn apply_toggle(
    session: &mut EditSession,
    module_name: &str,
    function_name: Option<&str>,
    sub_function_name: Option<&str>,
    enabled: bool,
) -> RoleGridResult<()> {
    let target = resolve_target(
        session.catalog(),
        module_name,
        function_name,
        sub_function_name,
    )?;
    match target {
        ToggleTarget::Module(module_id) => session.toggle_module(module_id, enabled),
        ToggleTarget::Function(module_id, function_id) => {
            session.toggle_function(module_id, function_id, enabled)
        }
        ToggleTarget::SubFunction(module_id, function_id, sub_function_id) => {
            session.toggle_sub_function(module_id, function_id, sub_function_id, enabled)
        }
    }
}

fn resolve_target(
    catalog: &Catalog,
    module_name: &str,
    function_name: Option<&str>,
    sub_function_name: Option<&str>,
) -> RoleGridResult<ToggleTarget> {
    let module = catalog.module_by_name(module_name).ok_or_else(|| {
        RoleGridError::validation(format!("No module named '{}' in the catalog", module_name))
    })?;

    let function = match function_name {
        Some(name) => Some(catalog.function_by_name(module.id, name).ok_or_else(|| {
            RoleGridError::validation(format!(
                "No function named '{}' under module '{}'",
                name, module.name
            ))
        })?),
        None => {
            if sub_function_name.is_some() {
                return Err(RoleGridError::validation(
                    "--sub-function requires --function",
                ));
            }
            None
        }
    };

    match (function, sub_function_name) {
        (None, _) => Ok(ToggleTarget::Module(module.id)),
        (Some(function), None) => Ok(ToggleTarget::Function(module.id, function.id)),
        (Some(function), Some(name)) => {
            let sub_function = function
                .sub_functions
                .iter()
                .find(|s| s.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| {
                    RoleGridError::validation(format!(
                        "No sub-function named '{}' under function '{}'",
                        name, function.name
                    ))
                })?;
            Ok(ToggleTarget::SubFunction(
                module.id,
                function.id,
                sub_function.id,
            ))
        }
    }
}

/// Parse "Function Name=add,view" and mark those actions on the builder.
fn apply_grant(builder: &mut FlatPermissionBuilder, grant: &str) -> RoleGridResult<()> {
    let (name, actions) = grant.split_once('=').ok_or_else(|| {
        RoleGridError::validation(format!(
            "Grant '{}' must look like 'Function Name=add,view'",
            grant
        ))
    })?;
    let name = name.trim();

    for action in actions.split(',').map(str::trim).filter(|a| !a.is_empty()) {
        if action.eq_ignore_ascii_case("all") {
            builder.set_all(name, true)?;
        } else {
            let field: ActionField = action.parse()?;
            builder.set_action(name, field, true)?;
        }
    }
    Ok(())
}
