use clap::Parser;
use oak_module::cli::Cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so DATABASE_URL and APP_ENV are picked up
    let _ = dotenvy::dotenv();

    let config = oak_module::config::config();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    tracing::debug!("Starting oak in {:?} mode", config.environment);

    let cli = Cli::parse();

    if let Err(e) = oak_module::cli::run(cli).await {
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
