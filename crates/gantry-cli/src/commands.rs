use gantry_server::{GantryServer, ServerConfig};

use crate::cli::{Cli, Command, ServeArgs};

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Command::Serve(args) => cmd_serve(args).await,
    }
}

async fn cmd_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = ServerConfig::from_env()?;
    if let Some(port) = args.port {
        config.bind_addr.set_port(port);
    }
    if let Some(mongo_url) = args.mongo_url {
        config.mongo_url = mongo_url;
    }
    if let Some(database) = args.database {
        config.database = database;
    }
    GantryServer::new(config).serve().await?;
    Ok(())
}
