//! Main entry point for the `PayDash` CLI.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use paydash_shared::config::ClientConfig;
use url::Url;

mod commands;
mod logging;
mod navigator;

/// `PayDash` CLI
#[derive(Parser, Debug)]
#[command(name = "paydash")]
#[command(about = "Command-line interface for the PayDash merchant dashboard", long_about = None)]
struct Cli {
    /// Path to the configuration file (optional)
    #[arg(
        long,
        short,
        global = true,
        help = "Path to the configuration file (e.g., paydash.yaml or paydash.json). If not provided, defaults will be used."
    )]
    config: Option<PathBuf>,

    /// Override of the backend API base URL
    #[arg(
        long,
        global = true,
        help = "Base URL of the PayDash API (e.g., https://api.paydash.example/api/). Overrides the configuration file."
    )]
    api_url: Option<Url>,

    #[command(subcommand)]
    command: Commands,
}

/// Subcommands for the `PayDash` CLI
#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign in with email and password
    Login(commands::session::LoginArgs),

    /// Create a merchant account and sign in
    Register(commands::session::RegisterArgs),

    /// Sign out and remove the stored session
    Logout,

    /// Show the signed-in user, revalidating the stored session
    Me,

    /// List the businesses the signed-in user belongs to
    Businesses,

    /// Make another business the active one
    SwitchBusiness {
        /// Identifier of the business to activate
        business_id: i64,
    },

    /// Show the dashboard navigation visible to the signed-in user
    Menu,

    /// Generate a configuration file
    Config {
        /// Format of the configuration file to generate (yaml or json). Defaults to yaml.
        #[arg(
            long,
            short,
            help = "Format of the configuration file to generate (yaml or json). Defaults to yaml."
        )]
        format: Option<String>,

        /// Where to write the file
        #[arg(long, short, help = "Output path (defaults to paydash.yaml or paydash.json)")]
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts for the CLI
    Completion {
        /// The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)
        #[arg(
            long,
            short,
            help = "The shell type for which to generate the completion script (e.g., bash, zsh, fish, powershell)"
        )]
        shell: clap_complete::Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cli = Cli::parse();

    let command = match cli.command {
        Commands::Completion { shell } => {
            commands::completion::generate_completion(shell);
            return Ok(());
        }
        Commands::Config { format, output } => {
            let format = format.unwrap_or_else(|| "yaml".to_string());
            return commands::config::generate_config(&format, output);
        }
        command => command,
    };

    let config = ClientConfig::load_config(cli.config, cli.api_url)
        .context("failed to load configuration")?;
    logging::initialize_tracing(&config.logging);
    let app = commands::App::new(&config)?;

    match command {
        Commands::Login(args) => commands::session::login(&app, args).await,
        Commands::Register(args) => commands::session::register(&app, args).await,
        Commands::Logout => commands::session::logout(&app).await,
        Commands::Me => commands::session::me(&app).await,
        Commands::Businesses => commands::business::list(&app).await,
        Commands::SwitchBusiness { business_id } => {
            commands::business::switch(&app, business_id).await
        }
        Commands::Menu => commands::menu::show(&app),
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}
