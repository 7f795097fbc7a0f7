//! mimir: cache directive settings CLI
//!
//! Inspect and edit the persisted settings, and check which requests
//! would get a `cache_control` directive.

use std::collections::HashMap;

use clap::{Parser, Subcommand};
use mimir::config::Config;
use mimir::{ConnectionProfile, Decision, Mimir, SettingKey};

/// Mimir settings CLI
#[derive(Parser)]
#[command(name = "mimir")]
#[command(version = mimir::PKG_VERSION)]
#[command(about = "Prompt-cache directive settings")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "MIMIR_CONFIG")]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the current settings record
    Show,

    /// Set one settings field
    Set {
        /// Field name: enabled, ttl, onlyClaude, onlyWhenNanoGPT, urlSubstring
        key: String,
        /// New value (true/false for toggles)
        value: String,
    },

    /// Restore default settings
    Reset,

    /// Show whether a request would carry the cache directive
    Check {
        /// Configured profile id
        #[arg(short, long, conflicts_with_all = ["model", "api_url"])]
        profile: Option<String>,
        /// Model identifier (ad-hoc profile)
        #[arg(short, long)]
        model: Option<String>,
        /// API URL (ad-hoc profile)
        #[arg(short = 'u', long)]
        api_url: Option<String>,
    },

    /// List configured connection profiles
    Profiles,

    /// Print full version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialise tracing (default: warn for CLI; override with RUST_LOG).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::load(args.config.as_deref())?;

    match args.command {
        Command::Show => {
            let record = config.store().load();
            println!("{}", serde_json::to_string_pretty(&record)?);
        }

        Command::Set { key, value } => {
            let key: SettingKey = key.parse()?;
            let store = config.store();
            store.set(key, &value)?;
            let record = store.load();
            let stored = record.get(key.as_str()).cloned().unwrap_or_default();
            println!("{key} = {stored}");
        }

        Command::Reset => {
            let store = config.store();
            store.reset();
            println!("{}", serde_json::to_string_pretty(&store.load())?);
        }

        Command::Check {
            profile,
            model,
            api_url,
        } => {
            let decision = match profile {
                Some(id) => {
                    if !config.profiles.contains_key(&id) {
                        eprintln!("warning: unknown profile '{id}', using an empty profile");
                    }
                    config.layer().decision_for(&id)?
                }
                None => {
                    let adhoc = ConnectionProfile::new(
                        model.unwrap_or_default(),
                        api_url.unwrap_or_default(),
                    );
                    let mut profiles = HashMap::new();
                    profiles.insert(String::new(), adhoc);
                    Mimir::builder()
                        .settings(std::sync::Arc::new(config.store()))
                        .profiles(profiles)
                        .build()
                        .decision_for("")?
                }
            };
            print_decision(&decision)?;
        }

        Command::Profiles => {
            if config.profiles.is_empty() {
                println!("no profiles configured");
            }
            let mut ids: Vec<_> = config.profiles.keys().collect();
            ids.sort();
            for id in ids {
                let profile = &config.profiles[id];
                println!("{id}\t{}\t{}", profile.model, profile.api_url);
            }
        }

        Command::Version => {
            let info = mimir::BuildInfo::current();
            println!("mimir {info}");
            println!("version: {}", info.version);
            println!("branch:  {}", info.branch);
            println!("commit:  {}", info.sha);
            println!("dirty:   {}", info.dirty);
        }
    }

    Ok(())
}

fn print_decision(decision: &Decision) -> Result<(), Box<dyn std::error::Error>> {
    match decision {
        Decision::Attach(fragment) => {
            println!("attach");
            println!("{}", serde_json::to_string_pretty(fragment)?);
        }
        Decision::Skip(reason) => println!("skip ({reason})"),
    }
    Ok(())
}
