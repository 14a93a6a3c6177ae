use crate::logger;
use crate::GlobalOpts;
use anyhow::{bail, Context, Result};
use clap::Subcommand;
use colored::*;
use distpack_config::{build_config::KEYS, BuildConfig, ConfigError};

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the values set in distpack.toml
    Show,
    /// Print one value
    Get { key: String },
    /// Set a value (lists are comma separated)
    Set { key: String, value: String },
    /// Print the path of the config file in use
    Path,
}

pub fn handle_config(action: Option<ConfigAction>, opts: &GlobalOpts) -> Result<()> {
    let config_path = BuildConfig::path();
    logger::debug(&format!("Reading config from: {}", config_path.display()));

    match action.unwrap_or(ConfigAction::Show) {
        ConfigAction::Show => {
            let config = BuildConfig::load_from(&config_path)
                .with_context(|| format!("Failed to load {}", config_path.display()))?;
            println!("{}", "Configuration:".bold().green());
            if config.is_empty() {
                if opts.verbosity_level() > 0 {
                    println!("  {}", "(empty)".yellow());
                }
            } else {
                for (key, value) in config.values_iter() {
                    println!("  {}: {}", key.cyan(), value);
                }
            }
        }
        ConfigAction::Get { key } => {
            let config = BuildConfig::load_from(&config_path)
                .with_context(|| format!("Failed to load {}", config_path.display()))?;
            match config.get(&key) {
                Ok(Some(value)) => println!("{}", value),
                Ok(None) => logger::debug(&format!("{} is not set", key)),
                Err(_) => bail!(unknown_key_message(&key)),
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = BuildConfig::load_from(&config_path)
                .with_context(|| format!("Failed to load {}", config_path.display()))?;
            match config.set(&key, &value) {
                Ok(()) => {}
                Err(ConfigError::UnknownKey(_)) => bail!(unknown_key_message(&key)),
                Err(e) => return Err(e.into()),
            }
            config
                .save_to(&config_path)
                .with_context(|| format!("Failed to save {}", config_path.display()))?;
            logger::success(&format!("Set {} = {}", key, value));
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }
    Ok(())
}

fn unknown_key_message(key: &str) -> String {
    format!(
        "Unknown config key: {}. Supported keys: {}",
        key,
        KEYS.join(", ")
    )
}
