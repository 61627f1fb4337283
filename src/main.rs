use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use encore::config::{self, Config};
use encore::lyrics::{self, FallbackPolicy, LyricsResolver, LyricsSource};
use encore::settings::{Pref, Settings};
use encore::storage::SqliteStore;

#[derive(Debug, Parser)]
#[command(name = "encore", version, about = "Lyrics and preferences for a local music player")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print lyrics for an audio file (embedded tag, then online).
    Lyrics {
        path: PathBuf,
        /// Track title (defaults to the file's tag).
        #[arg(long)]
        title: Option<String>,
        /// Artist, several joined with ';' (defaults to the file's tag).
        #[arg(long)]
        artist: Option<String>,
        /// Album (defaults to the file's tag).
        #[arg(long)]
        album: Option<String>,
        /// Only read the embedded tag.
        #[arg(long)]
        offline: bool,
        /// Send one online query instead of the fallback chain.
        #[arg(long)]
        single: bool,
        /// Strip LRC timestamps from the output.
        #[arg(long)]
        plain: bool,
    },
    /// Print the online queries that would be tried for a track.
    Queries {
        title: String,
        artist: String,
        #[arg(long)]
        album: Option<String>,
        #[arg(long)]
        single: bool,
    },
    /// Write lyrics into an audio file's tag ("-" reads stdin, empty clears).
    Embed { path: PathBuf, file: PathBuf },
    /// Inspect or change stored preferences.
    Settings {
        #[command(subcommand)]
        cmd: SettingsCommand,
    },
}

#[derive(Debug, Subcommand)]
enum SettingsCommand {
    /// Show every preference with its effective value.
    List,
    Get { key: String },
    Set { key: String, value: String },
    /// Forget the stored value so the default applies.
    Reset { key: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;

    match cli.command {
        Command::Lyrics {
            path,
            title,
            artist,
            album,
            offline,
            single,
            plain,
        } => {
            let mut song = match lyrics::embedded::read_song(&path) {
                Ok(song) => song,
                Err(e) => {
                    tracing::debug!("reading tags of {}: {e}", path.display());
                    lyrics::embedded::untagged_song(&path)
                }
            };
            if let Some(v) = title {
                song.title = v;
            }
            if let Some(v) = artist {
                song.artist = v;
            }
            if let Some(v) = album {
                song.album = v;
            }

            let mut lyrics_cfg = cfg.lyrics.clone();
            lyrics_cfg.online &= !offline;
            if single {
                lyrics_cfg.fallback = FallbackPolicy::Single;
            }
            let resolver = LyricsResolver::from_config(&lyrics_cfg)?;

            match resolver.resolve(&song).await {
                Some(found) => {
                    match &found.source {
                        LyricsSource::Embedded => eprintln!("(embedded lyrics)"),
                        LyricsSource::Online { query } => eprintln!("(online: {query})"),
                    }
                    if plain {
                        println!("{}", found.plain_text());
                    } else {
                        println!("{}", found.text);
                    }
                }
                None => println!("No lyrics found."),
            }
        }
        Command::Queries {
            title,
            artist,
            album,
            single,
        } => {
            let song = encore::models::Song {
                title,
                artist,
                album: album.unwrap_or_default(),
                ..Default::default()
            };
            let policy = if single {
                FallbackPolicy::Single
            } else {
                cfg.lyrics.fallback
            };
            for (i, q) in lyrics::query::queries(&song, policy).iter().enumerate() {
                println!("{}. {q}", i + 1);
            }
        }
        Command::Embed { path, file } => {
            let text = if file.as_os_str() == "-" {
                std::io::read_to_string(std::io::stdin()).context("read stdin")?
            } else {
                std::fs::read_to_string(&file)
                    .with_context(|| format!("read {}", file.display()))?
            };
            lyrics::embedded::write_lyrics(&path, &text)
                .with_context(|| format!("write lyrics to {}", path.display()))?;
            if text.trim().is_empty() {
                println!("Cleared lyrics of {}.", path.display());
            } else {
                println!("Updated lyrics of {}.", path.display());
            }
        }
        Command::Settings { cmd } => run_settings(&cfg, cmd)?,
    }

    Ok(())
}

fn run_settings(cfg: &Config, cmd: SettingsCommand) -> anyhow::Result<()> {
    let store = SqliteStore::open(&cfg.paths.preferences_db(), &cfg.preferences.namespace)
        .context("open preferences")?;
    let settings = Settings::new(store)?;

    match cmd {
        SettingsCommand::List => {
            for (pref, value) in settings.entries() {
                println!("{} = {}", pref.key(), display_value(value));
            }
            match settings.unknown_keys() {
                Ok(keys) if !keys.is_empty() => {
                    println!("Unrecognised stored keys: {}", keys.join(", "));
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("{e:#}"),
            }
        }
        SettingsCommand::Get { key } => {
            let pref = lookup_pref(&key)?;
            println!("{}", display_value(settings.get(pref)));
        }
        SettingsCommand::Set { key, value } => {
            let pref = lookup_pref(&key)?;
            settings.set_from_str(pref, &value)?;
            println!("{} = {}", pref.key(), display_value(settings.get(pref)));
        }
        SettingsCommand::Reset { key } => {
            let pref = lookup_pref(&key)?;
            settings.reset(pref)?;
            println!("{} = {}", pref.key(), display_value(settings.get(pref)));
        }
    }
    Ok(())
}

fn lookup_pref(key: &str) -> anyhow::Result<Pref> {
    Pref::from_key(key).with_context(|| {
        let known: Vec<&str> = Pref::ALL.iter().map(|p| p.key()).collect();
        format!("unknown preference {key:?} (known: {})", known.join(", "))
    })
}

fn display_value(value: Option<encore::storage::PrefValue>) -> String {
    value.map_or_else(|| "(unset)".to_string(), |v| v.to_string())
}
