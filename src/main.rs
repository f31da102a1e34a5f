use anyhow::Result;
use clap::Parser;

mod cli;

use tcg_repricer::{config, server};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    match args.get_command() {
        cli::Commands::Start => {
            let cfg = config::load_config(&args.config)?;
            server::start_server(cfg).await?;
        }
        cli::Commands::Check => match config::load_config(&args.config) {
            Ok(_) => println!("Configuration OK"),
            Err(err) => {
                eprintln!("Configuration invalid: {}", err);
                std::process::exit(1);
            }
        },
        cli::Commands::Version => {
            println!("tcg-repricer v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
