use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};
use moonstone::{DEFAULT_PREFIX, FileStore, MoonStoneConfig, ProgressStore, VersionValue};
use std::cmp::Ordering;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "moonstone")]
#[command(about = "Inspect and edit a MoonStone progress record")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the stored version
    Show {
        #[arg(long)]
        store: PathBuf,
        #[arg(long, default_value = DEFAULT_PREFIX)]
        prefix: String,
    },
    /// Overwrite the stored version
    Set {
        #[arg(long)]
        store: PathBuf,
        #[arg(long, default_value = DEFAULT_PREFIX)]
        prefix: String,
        version: String,
    },
    /// Remove the stored version; the next run is treated as a first run
    Reset {
        #[arg(long)]
        store: PathBuf,
        #[arg(long, default_value = DEFAULT_PREFIX)]
        prefix: String,
    },
    /// Compare two version strings
    Compare { left: String, right: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Show { store, prefix } => show(&store, &prefix),
        Command::Set {
            store,
            prefix,
            version,
        } => set(&store, &prefix, &version),
        Command::Reset { store, prefix } => reset(&store, &prefix),
        Command::Compare { left, right } => {
            println!("{}", compare(&left, &right)?);
            Ok(())
        }
    }
}

fn version_key(prefix: &str) -> Result<String> {
    let config = MoonStoneConfig::new().prefix(prefix);
    config
        .validate()
        .map_err(|err| anyhow!("Invalid prefix '{}': {}", prefix, err))?;
    Ok(config.version_key())
}

fn open_store(path: &Path) -> Result<FileStore> {
    FileStore::open(path).with_context(|| format!("Failed to open store '{}'", path.display()))
}

fn show(path: &Path, prefix: &str) -> Result<()> {
    let key = version_key(prefix)?;
    let store = open_store(path)?;
    match store.get_string(&key)? {
        Some(version) => println!("{} = {}", key, version),
        None => println!("{}: no record", key),
    }
    Ok(())
}

fn set(path: &Path, prefix: &str, version: &str) -> Result<()> {
    let key = version_key(prefix)?;
    let parsed = VersionValue::parse(version)?;
    let mut store = open_store(path)?;
    store
        .set_string(&key, &parsed.to_string())
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    println!("{} = {}", key, parsed);
    Ok(())
}

fn reset(path: &Path, prefix: &str) -> Result<()> {
    let key = version_key(prefix)?;
    let mut store = open_store(path)?;
    store
        .remove(&key)
        .with_context(|| format!("Failed to write '{}'", path.display()))?;
    println!("{}: removed", key);
    Ok(())
}

fn compare(left: &str, right: &str) -> Result<&'static str> {
    let left = VersionValue::parse(left)?;
    let right = VersionValue::parse(right)?;
    Ok(match left.cmp(&right) {
        Ordering::Less => "less",
        Ordering::Equal => "equal",
        Ordering::Greater => "greater",
    })
}
