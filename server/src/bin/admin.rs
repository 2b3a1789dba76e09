use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use recipebox_server::config::Config;
use recipebox_server::fixtures::{self, Parsed};
use recipebox_server::{api, db, telemetry};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "recipebox-admin")]
#[command(about = "Recipebox administration", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load ingredients from a CSV (`name,unit` per line) or JSON file
    LoadIngredients {
        /// Path to the .csv or .json file
        file: PathBuf,
    },
    /// Load tags from a JSON file (`[{"name", "color", "slug"}]`)
    LoadTags {
        /// Path to the .json file
        file: PathBuf,
    },
    /// Print the OpenAPI document as JSON
    Openapi,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::LoadIngredients { file } => load_ingredients(&file),
        Commands::LoadTags { file } => load_tags(&file),
        Commands::Openapi => {
            let spec = api::openapi()
                .to_pretty_json()
                .context("Failed to serialize OpenAPI spec")?;
            println!("{}", spec);
            Ok(())
        }
    }
}

fn connect() -> Result<db::DbConn> {
    telemetry::init_console();
    let config = Config::from_env().context("Invalid configuration")?;
    let pool = db::create_pool(&config.database_url).context("Failed to open database")?;
    pool.get().context("Failed to get database connection")
}

fn report_rejected<T>(parsed: &Parsed<T>) {
    for rejected in &parsed.rejected {
        eprintln!("skipping row {}: {}", rejected.row, rejected.reason);
    }
}

fn load_ingredients(file: &Path) -> Result<()> {
    let input =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let parsed = match file.extension().and_then(|e| e.to_str()) {
        Some("csv") => fixtures::parse_ingredients_csv(&input),
        Some("json") => fixtures::parse_ingredients_json(&input)
            .with_context(|| format!("Failed to parse {}", file.display()))?,
        _ => bail!("Unsupported file type: {} (expected .csv or .json)", file.display()),
    };
    report_rejected(&parsed);

    let mut conn = connect()?;
    let inserted = fixtures::load_ingredients(&mut conn, &parsed.rows)
        .context("Failed to load ingredients")?;

    println!(
        "Loaded {} ingredients ({} already present, {} rejected)",
        inserted,
        parsed.rows.len() - inserted,
        parsed.rejected.len()
    );
    Ok(())
}

fn load_tags(file: &Path) -> Result<()> {
    let input =
        fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let parsed = fixtures::parse_tags_json(&input)
        .with_context(|| format!("Failed to parse {}", file.display()))?;
    report_rejected(&parsed);

    let mut conn = connect()?;
    let inserted = fixtures::load_tags(&mut conn, &parsed.rows).context("Failed to load tags")?;

    println!(
        "Loaded {} tags ({} already present, {} rejected)",
        inserted,
        parsed.rows.len() - inserted,
        parsed.rejected.len()
    );
    Ok(())
}
