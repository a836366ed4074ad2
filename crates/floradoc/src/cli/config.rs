//! The `floradoc config` command for configuration management.

use clap::{Args, Subcommand};
use floradoc_core::llm::resolve_env_var;
use floradoc_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display current configuration
    Show,

    /// Show config file path
    Path,

    /// Validate the config file and check that an API key resolves
    Check,

    /// Initialize a new config file with defaults
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Check => {
            let path = Config::default_path();
            let config = if path.exists() {
                Config::load_from(&path)?
            } else {
                println!("No config file at {}, checking defaults", path.display());
                Config::default()
            };

            println!("Endpoint: {}", config.gemini.endpoint);
            println!("Model:    {}", config.gemini.model);
            println!("Timeout:  {}ms", config.gemini.timeout_ms);
            println!("API key:  {}", api_key_status(&config.gemini.api_key));
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();

            if path.exists() && !force {
                anyhow::bail!(
                    "Config file already exists at: {}\nUse --force to overwrite.",
                    path.display()
                );
            }

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            // The default api_key is the ${GEMINI_API_KEY} reference, never a secret
            let toml = Config::default().to_toml()?;
            std::fs::write(&path, toml)?;

            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }
    }

    Ok(())
}

/// Describe where the API key comes from without revealing it.
fn api_key_status(configured: &str) -> String {
    let is_reference = configured.starts_with("${") && configured.ends_with('}');
    match (resolve_env_var(configured), is_reference) {
        (Some(_), true) => format!("set (from {})", &configured[2..configured.len() - 1]),
        (Some(_), false) => "set (literal in config file)".to_string(),
        (None, true) => format!(
            "NOT SET ({} is empty or unset)",
            &configured[2..configured.len() - 1]
        ),
        (None, false) => "NOT SET".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_status_never_prints_key() {
        let status = api_key_status("sk-very-secret");
        assert_eq!(status, "set (literal in config file)");
        assert!(!status.contains("secret"));
    }

    #[test]
    fn test_api_key_status_unset_reference() {
        let status = api_key_status("${FLORADOC_TEST_UNSET_KEY_42}");
        assert!(status.starts_with("NOT SET"));
        assert!(status.contains("FLORADOC_TEST_UNSET_KEY_42"));
    }

    #[test]
    fn test_api_key_status_empty() {
        assert_eq!(api_key_status(""), "NOT SET");
    }
}
