mod cli;

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use cli::{Cli, Commands, UserCommands};
use staffwise_core::config::Config;
use staffwise_db::pool::{init_pool, DbPool};

/// Open (and migrate) the database named by the config, creating its parent
/// directory if needed.
fn open_db(config: &Config) -> Result<DbPool> {
    let path = &config.database.path;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    let pool = init_pool(&path.to_string_lossy(), config.database.pool_size)
        .with_context(|| format!("opening database {}", path.display()))?;
    Ok(pool)
}

fn load_config(path: Option<&Path>, db: Option<PathBuf>) -> Result<Config> {
    let mut config = Config::load(path).context("loading configuration")?;
    if let Some(db) = db {
        config.database.path = db;
    }
    Ok(config)
}

fn run_migrate(config: &Config) -> Result<()> {
    let pool = open_db(config)?;
    let conn = staffwise_db::pool::get_conn(&pool)?;
    let versions = staffwise_db::migrations::applied_versions(&conn)?;

    println!("Database: {}", config.database.path.display());
    for v in &versions {
        println!("  applied migration v{v}");
    }
    println!(
        "Schema is at version {} (latest {})",
        versions.last().copied().unwrap_or(0),
        staffwise_db::migrations::latest_version()
    );
    Ok(())
}

fn run_user(config: &Config, command: UserCommands) -> Result<()> {
    let pool = open_db(config)?;
    let conn = staffwise_db::pool::get_conn(&pool)?;

    match command {
        UserCommands::Add { username } => {
            let username = username.trim();
            if username.is_empty() {
                bail!("username must not be empty");
            }
            let user = staffwise_db::queries::users::create_user(&conn, username)?;
            println!("Created user {} (id {})", user.username, user.id);
        }
        UserCommands::List => {
            let users = staffwise_db::queries::users::list_users(&conn)?;
            if users.is_empty() {
                println!("No users");
            }
            for user in users {
                println!("{:>6}  {}  (created {})", user.id, user.username, user.created_at);
            }
        }
        UserCommands::Remove { username } => {
            let Some(user) = staffwise_db::queries::users::get_user_by_username(&conn, &username)?
            else {
                bail!("no user named '{username}'");
            };
            staffwise_db::queries::users::delete_user(&conn, user.id)
                .with_context(|| format!("removing user '{username}'"))?;
            println!("Removed user {username}");
        }
    }
    Ok(())
}

fn run_check_config(path: Option<&Path>) -> Result<()> {
    let config = Config::load(path).context("loading configuration")?;
    println!("server:   {}:{}", config.server.host, config.server.port);
    println!(
        "database: {} (pool size {})",
        config.database.path.display(),
        config.database.pool_size
    );

    let warnings = config.validate();
    if warnings.is_empty() {
        println!("Configuration OK");
    } else {
        for w in &warnings {
            println!("warning: {w}");
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins; otherwise info, or debug with --verbose.
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "staffwise=debug,staffwise_server=debug,staffwise_db=debug,staffwise_core=debug,tower_http=debug".to_string()
        } else {
            "staffwise=info,staffwise_server=info,staffwise_db=info,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .init();

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Serve { host, port, db } => {
            let mut config = load_config(config_path, db)?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            tracing::info!("Starting staffwise");
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(staffwise_server::start(config))?;
            Ok(())
        }
        Commands::Migrate { db } => run_migrate(&load_config(config_path, db)?),
        Commands::User { command } => run_user(&load_config(config_path, None)?, command),
        Commands::CheckConfig => run_check_config(config_path),
    }
}
