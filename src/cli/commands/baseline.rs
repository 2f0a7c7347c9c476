use serde_json::Value;

use crate::cli::utils::{output_rpc_error, output_success};
use crate::cli::OutputFormat;
use crate::game_config::{BundledConfig, ConfigSource};

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    match BundledConfig::new().load_baseline() {
        Ok(json) => match output_format {
            OutputFormat::Json => {
                let document: Value = serde_json::from_str(&json)?;
                output_success(&output_format, "Baseline game configuration", Some(document))
            }
            OutputFormat::Text => {
                println!("{}", json);
                Ok(())
            }
        },
        Err(e) => {
            output_rpc_error(&output_format, &e)?;
            anyhow::bail!("baseline configuration could not be loaded: {}", e)
        }
    }
}
