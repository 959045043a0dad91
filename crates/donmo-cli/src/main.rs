use anyhow::Result;
use clap::{Parser, Subcommand};
use donmo_schemas::Amount;

mod commands;

#[derive(Parser)]
#[command(name = "donmo")]
#[command(about = "Donmo round-up widget harness", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute layered config hash + print canonical JSON
    ConfigHash {
        /// Paths in merge order (base -> shop -> local...)
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Ask the donation API for a quote
    Quote {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Order amount to quote, e.g. 98.77
        #[arg(long, value_parser = parse_amount)]
        order_amount: Amount,
    },

    /// Print the backend's donation record for the configured order
    Check {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,
    },

    /// Build and refresh a widget against a JSON-file cart, optionally click
    /// once, and print the final state
    Session {
        /// Layered config paths in merge order
        #[arg(long = "config", required = true)]
        config_paths: Vec<String>,

        /// Cart file; created empty if missing, rewritten on every change
        #[arg(long)]
        cart: String,

        /// Set the cart's goods total before the session starts
        #[arg(long, value_parser = parse_amount)]
        goods_total: Option<Amount>,

        /// Press the round-up button once after the refresh
        #[arg(long, default_value_t = false)]
        click: bool,
    },
}

fn parse_amount(s: &str) -> Result<Amount, String> {
    Amount::parse(s).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env.local if present (dev convenience).
    // Silent if the file does not exist; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::ConfigHash { paths } => commands::config_hash(&paths)?,

        Commands::Quote {
            config_paths,
            order_amount,
        } => commands::api::quote(&config_paths, order_amount).await?,

        Commands::Check { config_paths } => commands::api::check(&config_paths).await?,

        Commands::Session {
            config_paths,
            cart,
            goods_total,
            click,
        } => {
            commands::session::run(commands::session::SessionArgs {
                config_paths,
                cart_path: cart,
                goods_total,
                click,
            })
            .await?
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays parseable.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}
