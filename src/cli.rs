use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "staffwise")]
#[command(author, version, about = "Staffing backend for clients, projects and collaborators")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run migrations and start the HTTP API
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file (overrides config)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Apply pending migrations and list the applied versions
    Migrate {
        /// SQLite database file (overrides config)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Manage users (administrative stand-in for the identity service)
    User {
        #[command(subcommand)]
        command: UserCommands,
    },

    /// Load the configuration and print any warnings
    CheckConfig,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create a user
    Add {
        /// Unique username
        username: String,
    },

    /// List all users
    List,

    /// Remove a user; refused while the user has assignments
    Remove {
        /// Username to remove
        username: String,
    },
}
