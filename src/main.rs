use clap::Parser;
use swaproute::cli::{commands, Cli, Commands};
use swaproute::core::{Config, SwapError};

#[tokio::main]
async fn main() -> Result<(), SwapError> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Load configuration
    dotenv::dotenv().ok();
    let config = Config::from_env()?;
    config.validate()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Execute command
    match cli.command {
        Commands::Quote(args) => commands::quote::execute(args, &config).await?,
        Commands::Routes(args) => commands::routes::execute(args, &config).await?,
        Commands::Pools(args) => commands::pools::execute(args, &config).await?,
    }

    Ok(())
}
