// Copyright 2023 Remi Bernotavicius

use clap::Parser;
use clap::Subcommand;
use recipe_store::repository::search;
use recipe_store::{database, presentation, seed};
use std::path::PathBuf;

type Error = Box<dyn std::error::Error + Send + Sync + 'static>;
type Result<T> = std::result::Result<T, Error>;

#[derive(Parser, Debug)]
struct Args {
    /// Database file to use instead of the one in the user data directory.
    #[arg(long)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    commands: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Populate an empty database with starter data.
    Seed,
    /// Print matching entities as JSON.
    Search { query: String },
}

/// This is where the database lives on-disk when no override is given. On
/// Linux it should be like: `~/.local/share/recipe_store/`
fn data_path() -> Result<PathBuf> {
    let dirs = directories::BaseDirs::new().ok_or("failed to get user home directory")?;
    let path = dirs.data_dir().join("recipe_store");
    std::fs::create_dir_all(&path)?;
    Ok(path)
}

fn main() -> Result<()> {
    simple_logger::init_with_level(log::Level::Info)?;

    let args = Args::parse();
    let database_path = match args.database {
        Some(path) => path,
        None => data_path()?.join("data.sqlite"),
    };
    let database_url = database_path
        .to_str()
        .ok_or("database path is not valid UTF-8")?;
    let mut conn = database::establish_connection(database_url)?;

    match args.commands {
        Commands::Seed => seed::seed(&mut conn)?,
        Commands::Search { query } => {
            let results = search::everything(&mut conn, &query)?;
            let json = presentation::SearchResultsJson::from(&results);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}
