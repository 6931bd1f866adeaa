//! Tapkeep - command-line access to a player's saved data

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};

use tapkeep::data::{PlaySession, ScoreSubmission, SettingsUpdate};
use tapkeep::progression::exp_to_next_level;
use tapkeep::{FileStorage, PlayerDataStore, RecordGroup, StoreConfig};

#[derive(Debug, Parser)]
#[command(name = "tapkeep")]
#[command(about = "Inspect and edit saved rhythm game player data", long_about = None)]
struct Cli {
    /// Directory holding the saved records
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// RON config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one record group, or all of them
    Show { group: Option<String> },
    /// Write a JSON backup of all data
    Export {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Restore data from a JSON backup
    Import { input: PathBuf },
    /// Erase all saved data
    Reset,
    /// Grant experience points
    AddExp {
        #[arg(allow_negative_numbers = true)]
        amount: i64,
    },
    /// Add or subtract coins
    Coins {
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Add or subtract gems
    Gems {
        #[arg(allow_negative_numbers = true)]
        delta: i64,
    },
    /// Unlock a song
    Unlock { song: String },
    /// Change settings from a partial JSON object, e.g. '{"musicVolume":0.5}'
    Set { json: String },
    /// Submit a score for a song
    Submit {
        song: String,
        #[arg(long)]
        score: u64,
        #[arg(long, default_value_t = 0.0)]
        accuracy: f64,
        #[arg(long, default_value_t = 0)]
        max_combo: u32,
        #[arg(long, default_value_t = 0)]
        perfect: u32,
        #[arg(long, default_value_t = 0)]
        good: u32,
        #[arg(long, default_value_t = 0)]
        ok: u32,
        #[arg(long, default_value_t = 0)]
        miss: u32,
    },
    /// Record a finished play in the statistics
    RecordPlay {
        song: String,
        #[arg(long, default_value_t = 0.0)]
        time: f64,
        #[arg(long, default_value_t = 0.0)]
        accuracy: f64,
        #[arg(long, default_value_t = 0)]
        max_combo: u32,
        #[arg(long, default_value_t = 0)]
        perfect: u32,
        #[arg(long, default_value_t = 0)]
        good: u32,
        #[arg(long, default_value_t = 0)]
        ok: u32,
        #[arg(long, default_value_t = 0)]
        miss: u32,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let config = StoreConfig::load(cli.config.as_deref()).context("failed to load config")?;
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.resolved_data_dir());

    let mut store = PlayerDataStore::with_config(FileStorage::new(data_dir), &config);
    log::info!("Using data directory {:?}", store.storage().dir());
    store.load();

    run(cli.command, &mut store)
}

fn run(command: Command, store: &mut PlayerDataStore<FileStorage>) -> Result<()> {
    match command {
        Command::Show { group } => {
            let json = match group {
                Some(name) => show_group(store, name.parse::<RecordGroup>()?)?,
                None => serde_json::to_string_pretty(&store.snapshot())?,
            };
            println!("{}", json);
        }
        Command::Export { output } => {
            let json = store.export_data().context("failed to export data")?;
            match output {
                Some(path) => fs::write(&path, json)
                    .with_context(|| format!("failed to write: {}", path.display()))?,
                None => println!("{}", json),
            }
        }
        Command::Import { input } => {
            let json = fs::read_to_string(&input)
                .with_context(|| format!("failed to read: {}", input.display()))?;
            store
                .import_data(&json)
                .with_context(|| format!("failed to import: {}", input.display()))?;
            println!("Imported {}", input.display());
        }
        Command::Reset => {
            store.clear_all_data();
            println!("All player data cleared");
        }
        Command::AddExp { amount } => {
            let leveled_up = store.add_experience(amount);
            let progress = store.progress();
            if leveled_up {
                println!("Level up! Now level {}", progress.level);
            }
            println!(
                "Level {} ({} exp, {} to next level)",
                progress.level,
                progress.exp,
                exp_to_next_level(progress.exp)
            );
        }
        Command::Coins { delta } => println!("{}", store.update_coins(delta)),
        Command::Gems { delta } => println!("{}", store.update_gems(delta)),
        Command::Unlock { song } => {
            if store.unlock_song(&song) {
                println!("Unlocked {}", song);
            } else {
                println!("{} was already unlocked", song);
            }
        }
        Command::Set { json } => {
            let update: SettingsUpdate =
                serde_json::from_str(&json).context("invalid settings JSON")?;
            if update.is_empty() {
                bail!("no known settings in: {}", json);
            }
            store.update_settings(update);
            println!("{}", serde_json::to_string_pretty(&store.settings())?);
        }
        Command::Submit {
            song,
            score,
            accuracy,
            max_combo,
            perfect,
            good,
            ok,
            miss,
        } => {
            let submission = ScoreSubmission {
                score,
                accuracy,
                max_combo,
                perfect,
                good,
                ok,
                miss,
            };
            if store.submit_score(&song, submission) {
                println!("New high score on {}: {}", song, score);
            } else if let Some(best) = store.high_score(&song) {
                println!("High score on {} remains {}", song, best.score);
            }
        }
        Command::RecordPlay {
            song,
            time,
            accuracy,
            max_combo,
            perfect,
            good,
            ok,
            miss,
        } => {
            store.update_statistics(&PlaySession {
                song_id: song.clone(),
                play_time: time,
                perfect,
                good,
                ok,
                miss,
                max_combo,
                accuracy,
            });
            println!(
                "{} played {} time(s)",
                song,
                store.song_play_count(&song)
            );
        }
    }

    Ok(())
}

fn show_group(store: &PlayerDataStore<FileStorage>, group: RecordGroup) -> Result<String> {
    let json = match group {
        RecordGroup::Settings => serde_json::to_string_pretty(&store.settings())?,
        RecordGroup::Progress => serde_json::to_string_pretty(&store.progress())?,
        RecordGroup::Statistics => serde_json::to_string_pretty(&store.statistics())?,
        RecordGroup::HighScores => serde_json::to_string_pretty(&store.high_scores())?,
    };
    Ok(json)
}
