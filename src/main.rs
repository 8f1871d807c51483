use anyhow::Result;
use clap::Parser;
use meshctl::cli::{Cli, Commands};
use meshctl::version::LocalVersion;
use meshctl::{commands, logs};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logs::init(cli.effective_log_level())?;

    match cli.command {
        Commands::Version => {
            let config = cli.load_config()?;
            commands::version::run(&config, &LocalVersion::current()).await;
            Ok(())
        }
    }
}
