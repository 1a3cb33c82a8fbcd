pub mod commands;
pub mod config;
pub mod context;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

pub use context::AdminContext;

#[derive(Parser)]
#[command(name = "fu-admin")]
#[command(about = "Friends United admin - edit site content and manage access from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in, sign out and password recovery")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Administrator accounts")]
    Users {
        #[command(subcommand)]
        cmd: commands::users::UserCommands,
    },

    #[command(about = "Show and edit single-document site sections")]
    Content {
        #[command(subcommand)]
        cmd: commands::content::ContentCommands,
    },

    #[command(about = "Manage service pages")]
    Services {
        #[command(subcommand)]
        cmd: commands::services::ServiceCommands,
    },

    #[command(about = "Review contact form submissions")]
    Contacts {
        #[command(subcommand)]
        cmd: commands::contacts::ContactCommands,
    },

    #[command(about = "Content overview")]
    Dashboard,

    #[command(about = "Open a dashboard path, e.g. /content/faqs")]
    Open {
        #[arg(help = "Dashboard path")]
        path: String,
    },
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

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let ctx = AdminContext::from_config(crate::config::config(), output_format)?;

    match cli.command {
        Commands::Auth { cmd } => commands::auth::handle(cmd, &ctx).await,
        Commands::Users { cmd } => commands::users::handle(cmd, &ctx).await,
        Commands::Content { cmd } => commands::content::handle(cmd, &ctx).await,
        Commands::Services { cmd } => commands::services::handle(cmd, &ctx).await,
        Commands::Contacts { cmd } => commands::contacts::handle(cmd, &ctx).await,
        Commands::Dashboard => commands::dashboard::handle(&ctx).await,
        Commands::Open { path } => commands::open::handle(&path, &ctx).await,
    }
}
