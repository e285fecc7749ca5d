//! Formstore CLI
//!
//! ```bash
//! formstore serve --port 8080 --database ./data/formstore.db
//! formstore init-db
//! formstore schema todo10
//! ```
//!
//! See `formstore --help` for all available commands and options.

mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "formstore", about = "Schema-driven todo records over SQLite", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve every configured variant under /api/<variant>
    Serve {
        /// Configuration file (default: formstore.toml)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// Listening address
        #[arg(long)]
        host: Option<String>,

        /// Listening port
        #[arg(long, short)]
        port: Option<u16>,

        /// SQLite database file
        #[arg(long)]
        database: Option<String>,
    },

    /// Create the tables of every configured variant and exit
    InitDb {
        /// Configuration file (default: formstore.toml)
        #[arg(long, short)]
        config: Option<PathBuf>,

        /// SQLite database file
        #[arg(long)]
        database: Option<String>,
    },

    /// Print a variant's field table as JSON
    Schema {
        /// Variant name (todo8, todo9, todo10)
        variant: String,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve { config, host, port, database } => {
            commands::serve::run(commands::serve::ServeArgs { config, host, port, database })
        }
        Commands::InitDb { config, database } => commands::init_db::run(config.as_deref(), database),
        Commands::Schema { variant } => commands::schema::run(&variant),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
