use crate::demo::{run_demo, run_listing, DemoArgs, ListingArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use storefront::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "storefront-api",
    about = "Serve or exercise the food-delivery storefront from the command line",
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
    /// List catalog restaurants with optional search, filters and sorting
    Restaurants(ListingArgs),
    /// Run a scripted session: login, browse, fill a cart and check out
    Demo(DemoArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured restaurant CSV
    #[arg(long)]
    pub(crate) catalog: Option<std::path::PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Restaurants(args) => run_listing(args),
        Command::Demo(args) => run_demo(args).await,
    }
}
