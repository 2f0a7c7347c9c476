use clap::Subcommand;
use serde_json::json;

use crate::auth::CallContext;
use crate::cli::utils::{load_module, output_rpc_error, output_success};
use crate::cli::OutputFormat;
use crate::runtime::DispatchError;
use crate::types::Session;

#[derive(Subcommand)]
pub enum HookCommands {
    #[command(about = "Run the after-authenticate hook as if the account was just created")]
    FirstLogin {
        #[arg(long, help = "User id of the new account")]
        user_id: String,
        #[arg(long, help = "Report the session as an existing account instead")]
        existing: bool,
    },
}

pub async fn handle(cmd: HookCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        HookCommands::FirstLogin { user_id, existing } => {
            let registry = load_module(false).await?;
            let session = if existing { Session::existing() } else { Session::created() };

            match registry
                .after_authenticate(CallContext::for_user(user_id.clone()), session)
                .await
            {
                Ok(()) => output_success(
                    &output_format,
                    &format!("After-authenticate hook completed for {}", user_id),
                    Some(json!({ "user_id": user_id, "created": !existing })),
                ),
                Err(DispatchError::Rpc(e)) => {
                    output_rpc_error(&output_format, &e)?;
                    anyhow::bail!("hook failed for {}: {}", user_id, e)
                }
                Err(e) => Err(e.into()),
            }
        }
    }
}
