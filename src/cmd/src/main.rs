use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use tracing_subscriber::FmtSubscriber;

mod config;
mod error;
mod server;

use crate::error::Result;

#[derive(Parser)]
#[command(propagate_version = true)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the issue tracker server
    Server {
        #[arg(long)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Server { config: path } => {
            let cfg: config::Config = ::config::Config::builder()
                .add_source(::config::File::from(path))
                .build()?
                .try_deserialize()?;
            let cfg: common::config::Config = cfg.into();

            let subscriber = FmtSubscriber::builder()
                .with_max_level(cfg.log.level)
                .finish();
            tracing::subscriber::set_global_default(subscriber)
                .expect("setting default subscriber failed");

            server::start(cfg).await?;
        }
    }

    Ok(())
}
