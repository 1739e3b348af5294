use clap::{Args, Parser, Subcommand};

use crate::demo::{run_demo, run_generate, DemoArgs, GenerateArgs};
use crate::error::ApiError;
use crate::server;

#[derive(Parser, Debug)]
#[command(
    name = "refund-router",
    about = "Route marketplace refunds through the cheapest eligible processor",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Route a synthetic batch and print the savings summary
    Demo(DemoArgs),
    /// Write a synthetic transactions document for load tests
    Generate(GenerateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), ApiError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Generate(args) => run_generate(args),
    }
}
