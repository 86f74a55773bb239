use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "gantry",
    about = "Schema-less REST gateway over a document store",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP gateway
    Serve(ServeArgs),
}

/// Flags override the corresponding `GANTRY_*` environment variables.
#[derive(Args)]
pub struct ServeArgs {
    /// Listening port
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Store connection string
    #[arg(long)]
    pub mongo_url: Option<String>,

    /// Database name
    #[arg(long)]
    pub database: Option<String>,
}
