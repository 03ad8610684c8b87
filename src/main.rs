//! Football feature engine CLI
//!
//! Imports season results, derives leak-free pre-match features and looks up
//! features for upcoming fixtures.

use clap::{Parser, Subcommand};
use football::{Config, Result};

#[derive(Parser)]
#[command(name = "football")]
#[command(about = "Pre-match feature engineering for football outcome prediction", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Data management commands
    Data {
        #[command(subcommand)]
        action: DataCommands,
    },
    /// Derive features for every stored match and save a snapshot
    Features {
        /// Output CSV path (defaults to data.features_path)
        #[arg(short, long)]
        output: Option<String>,
        /// Only use matches before this date (YYYY-MM-DD)
        #[arg(long)]
        before: Option<String>,
    },
    /// Pre-match features for a fixture, from the saved snapshot
    Lookup {
        /// Home team name
        home: String,
        /// Away team name
        away: String,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Initialize a new project with default config
    Init,
}

#[derive(Subcommand)]
enum DataCommands {
    /// Import season CSV files into the match store
    Import {
        /// Season files; each file's stem becomes its season tag
        #[arg(required = true)]
        files: Vec<String>,
    },
    /// Show database status
    Status,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let result = match cli.command {
        Commands::Data { action } => match action {
            DataCommands::Import { files } => commands::data_import(&config, &files),
            DataCommands::Status => commands::data_status(&config),
        },
        Commands::Features { output, before } => commands::features(&config, output, before),
        Commands::Lookup { home, away, format } => commands::lookup(&config, &home, &away, format),
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use football::data::{read_season_files, write_features_file, Database};
    use football::features::{derive_features, PreMatchFeatures, FEATURE_NAMES};
    use football::predict::Snapshot;
    use football::{FootballError, TeamId};

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all("data")?;
        println!("Created data/ directory");

        println!("\nNext steps:");
        println!("  1. Edit {} to customize settings", config_path);
        println!("  2. Run 'football data import <season.csv>...' to load results");
        println!("  3. Run 'football features' to derive features");
        println!("  4. Run 'football lookup \"Team A\" \"Team B\"' for fixture features");

        Ok(())
    }

    pub fn data_import(config: &Config, files: &[String]) -> Result<()> {
        if let Some(parent) = std::path::Path::new(&config.data.database_path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = Database::open(&config.data.database_path)?;

        let (records, report) = read_season_files(files)?;
        println!(
            "Read {} rows from {} files ({} kept, {} dropped)",
            report.rows,
            files.len(),
            report.kept,
            report.dropped()
        );
        if report.failed_files > 0 {
            println!("Skipped {} unreadable files (see log)", report.failed_files);
        }

        let count = db.upsert_matches(&records)?;
        println!("Stored {} matches in database", count);

        Ok(())
    }

    pub fn data_status(config: &Config) -> Result<()> {
        let db = Database::open(&config.data.database_path)?;
        let stats = db.get_stats()?;

        println!("Database Status");
        println!("───────────────────────────────");
        println!("  Path:     {}", config.data.database_path);
        println!("  Teams:    {}", stats.team_count);
        println!("  Seasons:  {}", stats.season_count);
        println!("  Matches:  {}", stats.match_count);
        if let (Some(earliest), Some(latest)) = (stats.earliest_match, stats.latest_match) {
            println!("  Range:    {} to {}", earliest, latest);
        }

        Ok(())
    }

    pub fn features(config: &Config, output: Option<String>, before: Option<String>) -> Result<()> {
        let db = Database::open(&config.data.database_path)?;

        let matches = match before.as_deref() {
            Some(raw) => {
                let date = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map_err(|e| FootballError::Parse(format!("--before {}: {}", raw, e)))?;
                db.get_matches_before(date)?
            }
            None => db.get_all_matches()?,
        };
        if matches.is_empty() {
            println!("No matches in database. Run 'football data import' first.");
            return Ok(());
        }

        let (rows, state) = derive_features(matches, config)?;

        let output = output.unwrap_or_else(|| config.data.features_path.clone());
        write_features_file(&output, &rows)?;
        println!("Wrote {} feature rows to {}", rows.len(), output);

        let snapshot = Snapshot::new(config.features, state);
        snapshot.save(&config.data.snapshot_path)?;
        println!("Saved snapshot to {}", config.data.snapshot_path);

        println!("\nTop Elo ratings");
        println!("───────────────────────────────");
        for (team, rating) in snapshot.state.elo().leaderboard().into_iter().take(10) {
            println!("  {:<20} {:>7.1}", team, rating);
        }

        Ok(())
    }

    pub fn lookup(config: &Config, home: &str, away: &str, format: OutputFormat) -> Result<()> {
        let snapshot = Snapshot::load(&config.data.snapshot_path)?;
        let (home, away) = (TeamId::from(home), TeamId::from(away));

        for team in [&home, &away] {
            if !snapshot.knows(team) {
                log::warn!("{} has no recorded matches, using defaults", team);
            }
        }

        let features = snapshot.lookup(&home, &away);
        match format {
            OutputFormat::Table => print_table(&home, &away, &features),
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "home": home,
                    "away": away,
                    "features": features,
                });
                println!("{}", serde_json::to_string_pretty(&json)?);
            }
            OutputFormat::Csv => {
                let mut writer = csv::Writer::from_writer(std::io::stdout());
                let mut header = vec!["HomeTeam", "AwayTeam"];
                header.extend(FEATURE_NAMES);
                writer.write_record(&header)?;

                let mut fields = vec![home.to_string(), away.to_string()];
                fields.extend(features.values().iter().map(|v| v.to_string()));
                writer.write_record(&fields)?;
                writer.flush()?;
            }
        }

        Ok(())
    }

    fn print_table(home: &TeamId, away: &TeamId, features: &PreMatchFeatures) {
        println!("{} vs {}", home, away);
        println!("───────────────────────────────────────────────");
        for (name, value) in features.named_values() {
            println!("  {:<34} {:>9.3}", name, value);
        }
    }
}
