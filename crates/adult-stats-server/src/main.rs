//! Adult stats HTTP API, entry point.

use std::sync::Arc;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use adult_stats::{AdultTable, DatabaseConfig, MySqlConnector};
use adult_stats_server::routes::ServerState;
use adult_stats_server::server::{ApiServer, ServerConfig, DEFAULT_ADDR};

#[derive(Parser)]
#[command(
    name = "adult-stats-server",
    about = "HTTP API serving aggregate statistics over the Adult census table",
    version
)]
struct Cli {
    #[command(flatten)]
    db: DbArgs,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// MySQL connection options.
#[derive(Args)]
struct DbArgs {
    /// Database host.
    #[arg(long, global = true, env = "ADULT_DB_HOST", default_value = adult_stats::config::DEFAULT_HOST)]
    db_host: String,

    /// Database port.
    #[arg(long, global = true, env = "ADULT_DB_PORT", default_value_t = adult_stats::config::DEFAULT_PORT)]
    db_port: u16,

    /// Database user.
    #[arg(long, global = true, env = "ADULT_DB_USER", default_value = adult_stats::config::DEFAULT_USER)]
    db_user: String,

    /// Database password.
    #[arg(
        long,
        global = true,
        env = "ADULT_DB_PASSWORD",
        hide_env_values = true,
        default_value = adult_stats::config::DEFAULT_PASSWORD
    )]
    db_password: String,

    /// Database (schema) holding the Adult table.
    #[arg(long, global = true, env = "ADULT_DB_NAME", default_value = adult_stats::config::DEFAULT_DATABASE)]
    db_name: String,
}

impl DbArgs {
    fn into_config(self) -> DatabaseConfig {
        DatabaseConfig {
            host: self.db_host,
            port: self.db_port,
            user: self.db_user,
            password: self.db_password,
            database: self.db_name,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API (default).
    Serve {
        /// Listen address (host:port).
        #[arg(long, default_value = DEFAULT_ADDR)]
        addr: String,

        /// Allow cross-origin requests from any origin.
        #[arg(long)]
        cors: bool,
    },

    /// Connect once and print the Adult table's columns.
    Columns,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   adult-stats-server completions bash > ~/.local/share/bash-completion/completions/adult-stats-server
    ///   adult-stats-server completions zsh > ~/.zfunc/_adult-stats-server
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let db = cli.db.into_config();

    match cli.command.unwrap_or(Commands::Serve {
        addr: DEFAULT_ADDR.to_string(),
        cors: false,
    }) {
        Commands::Serve { addr, cors } => {
            tracing::info!("Adult stats API");
            tracing::info!("Database: {}", db.display_target());
            if cors {
                tracing::info!("CORS: permissive");
            }

            let table = AdultTable::new(Arc::new(MySqlConnector::new(&db)));
            let server = ApiServer::new(ServerState::new(table), ServerConfig { addr, cors });
            server.run().await?;
        }

        Commands::Columns => {
            let table = AdultTable::new(Arc::new(MySqlConnector::new(&db)));
            match table.columns().await {
                Ok(columns) if columns.is_empty() => {
                    eprintln!("No table {} in {}", adult_stats::ADULT_TABLE, db.display_target());
                    std::process::exit(1);
                }
                Ok(columns) => {
                    println!("{} columns in {}:", columns.len(), db.display_target());
                    for column in columns {
                        println!("  {column}");
                    }
                }
                Err(e) => {
                    eprintln!("Cannot read columns: {e}");
                    std::process::exit(1);
                }
            }
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(
                shell,
                &mut cmd,
                "adult-stats-server",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}
