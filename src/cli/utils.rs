use std::sync::Arc;

use anyhow::Context;
use serde_json::{json, Value};

use crate::cli::OutputFormat;
use crate::config;
use crate::database::{DatabaseManager, PgAccountStore, PgStorage};
use crate::error::RpcError;
use crate::game_config::BundledConfig;
use crate::runtime::{init_module, ModuleDeps, ModuleRegistry};

/// Output a success message in the appropriate format
pub fn output_success(
    output_format: &OutputFormat,
    message: &str,
    data: Option<Value>,
) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });

            if let Some(data_value) = data {
                response["data"] = data_value;
            }

            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
            match data {
                Some(Value::String(body)) if !body.is_empty() => println!("{}", body),
                Some(Value::String(_)) | Some(Value::Null) | None => {}
                Some(other) => println!("{}", serde_json::to_string_pretty(&other)?),
            }
        }
    }
    Ok(())
}

/// Output an RPC failure in the appropriate format
pub fn output_rpc_error(output_format: &OutputFormat, err: &RpcError) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut body = err.to_json();
            body["kind"] = json!(err.kind());
            let response = json!({
                "success": false,
                "error": body,
            });
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            eprintln!(
                "Error: {} [{}] ({} {})",
                err,
                err.kind(),
                err.code().as_i32(),
                err.code().name()
            );
        }
    }
    Ok(())
}

/// Load the module into a fresh registry backed by the configured database.
///
/// With `lazy` set no connection is opened until a handler needs one.
pub async fn load_module(lazy: bool) -> anyhow::Result<ModuleRegistry> {
    let db_config = &config::config().database;
    let pool = if lazy {
        DatabaseManager::connect_lazy(db_config)
    } else {
        DatabaseManager::connect(db_config).await
    };
    let pool = pool.context("failed to open database pool")?;

    let deps = ModuleDeps {
        config: Arc::new(BundledConfig::new()),
        storage: Arc::new(PgStorage::new(pool.clone())),
        accounts: Arc::new(PgAccountStore::new(pool)),
    };

    let mut registry = ModuleRegistry::new();
    init_module(&deps, &mut registry).context("module failed to load")?;
    Ok(registry)
}
