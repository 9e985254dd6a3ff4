pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::{self, ClientConfig};
use crate::shell::App;

#[derive(Parser)]
#[command(name = "catcon")]
#[command(about = "Category console - manage categories behind a login session")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[arg(long, global = true, help = "API base URL (overrides CATEGORY_API_URL)")]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Start an interactive session")]
    Shell,

    #[command(about = "Log in once and print the category list")]
    Login {
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Register a new account")]
    Signup(commands::signup::SignupArgs),
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Effective configuration: environment first, then command-line overrides
pub fn resolve_config(cli: &Cli) -> ClientConfig {
    let base = config::config().clone();
    match &cli.server {
        Some(url) => base.with_base_url(url.clone()),
        None => base,
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let config = resolve_config(&cli);
    let app = App::from_config(&config)?;
    tracing::debug!("using API at {}", config.api.base_url);

    match cli.command {
        Commands::Shell => commands::shell::handle(app, output_format).await,
        Commands::Login { email, password } => {
            commands::login::handle(app, email, password, output_format).await
        }
        Commands::Signup(args) => commands::signup::handle(app, args, output_format).await,
    }
}
