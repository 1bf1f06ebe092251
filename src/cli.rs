use std::ffi::OsString;
use std::path::Path;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

pub mod commands;

use commands::{create_admin, init_database, seed_cars, serve};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "carrental")]
#[command(about = "Car rental web application with CLI tools")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Database selection shared by every command
#[derive(Args, Debug, Clone)]
pub struct DatabaseArgs {
    /// Database URL, overrides `database_url` from the settings
    ///
    /// Examples:
    ///   sqlite://carrental.db?mode=rwc
    ///   sqlite:///absolute/path/to/database.sqlite?mode=rwc
    #[arg(short, long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the tables if needed and start the web server
    Serve {
        #[command(flatten)]
        database: DatabaseArgs,

        /// Bind address for the web server
        ///
        /// Format: IP:PORT (e.g., 0.0.0.0:3000, 127.0.0.1:8080)
        #[arg(short, long, env = "BIND_ADDRESS")]
        bind_address: Option<String>,
    },
    /// Create the cars, users and reservations tables
    InitDb {
        #[command(flatten)]
        database: DatabaseArgs,
    },
    /// Insert the default showroom cars that are missing
    SeedCars {
        #[command(flatten)]
        database: DatabaseArgs,
    },
    /// Provision an administrator account
    CreateAdmin {
        #[command(flatten)]
        database: DatabaseArgs,

        #[arg(short, long)]
        username: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, env = "ADMIN_PASSWORD")]
        password: String,
    },
}

impl Cli {
    /// Parse `args` after loading the dotenv file into the process environment,
    /// so its variables feed the `env` fallbacks of the flags.
    ///
    /// Without `env_file`, `.env` is searched from the working directory upwards.
    pub fn parse_with_env_file<I, T>(env_file: Option<&Path>, args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        // A missing file is not an error
        let _ = match env_file {
            Some(path) => dotenvy::from_path(path),
            None => dotenvy::dotenv().map(drop),
        };
        Self::parse_from(args)
    }

    pub async fn run(self) -> Result<()> {
        let settings = Settings::load()?;
        match self.command {
            Commands::Serve { database, bind_address } => {
                let settings = settings
                    .with_database_url(database.database_url)
                    .with_bind_address(bind_address);
                serve(settings).await?;
            }
            Commands::InitDb { database } => {
                init_database(&settings.with_database_url(database.database_url)).await?;
            }
            Commands::SeedCars { database } => {
                seed_cars(&settings.with_database_url(database.database_url)).await?;
            }
            Commands::CreateAdmin { database, username, email, password } => {
                let settings = settings.with_database_url(database.database_url);
                create_admin(&settings, username, email, password).await?;
            }
        }
        Ok(())
    }
}
