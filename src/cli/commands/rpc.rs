use clap::Subcommand;
use serde_json::{json, Value};

use crate::auth::CallContext;
use crate::cli::utils::{load_module, output_rpc_error, output_success};
use crate::cli::OutputFormat;
use crate::runtime::DispatchError;

#[derive(Subcommand)]
pub enum RpcCommands {
    #[command(about = "List the RPC ids registered by the module")]
    List,

    #[command(about = "Invoke one RPC in-process")]
    Call {
        #[arg(help = "RPC id, e.g. read_game_config_from_storage")]
        id: String,
        #[arg(long, help = "Call as this user (omit for a server to server call)")]
        user_id: Option<String>,
        #[arg(long, default_value = "", help = "Request payload (JSON or empty)")]
        payload: String,
    },
}

pub async fn handle(cmd: RpcCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        RpcCommands::List => {
            let registry = load_module(true).await?;
            let ids = registry.rpc_ids();
            match output_format {
                OutputFormat::Json => output_success(&output_format, "Registered RPCs", Some(json!(ids))),
                OutputFormat::Text => {
                    for id in ids {
                        println!("{}", id);
                    }
                    Ok(())
                }
            }
        }
        RpcCommands::Call { id, user_id, payload } => {
            let registry = load_module(false).await?;
            let ctx = match user_id {
                Some(user_id) => CallContext::for_user(user_id),
                None => CallContext::new(),
            };

            match registry.call(&id, ctx, payload).await {
                Ok(body) => {
                    // Bodies are JSON documents or empty; show documents structurally in JSON mode
                    let data = serde_json::from_str::<Value>(&body).unwrap_or(Value::String(body));
                    output_success(&output_format, &format!("{} succeeded", id), Some(data))
                }
                Err(DispatchError::Rpc(e)) => {
                    output_rpc_error(&output_format, &e)?;
                    anyhow::bail!("{} failed: {}", id, e)
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}
