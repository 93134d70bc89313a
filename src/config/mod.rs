use serde::{Deserialize, Serialize};

use std::{env, fs, path::Path};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

fn load_from_file(path: &Path) -> Result<Config, Box<dyn std::error::Error>> {
    let contents = fs::read_to_string(path)?;
    serde_yaml::from_str(&contents).map_err(Into::into)
}

/// Unset variables keep their defaults; a port that does not parse is an error.
fn load_from_env<F>(lookup: F) -> Result<Config, Box<dyn std::error::Error>>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = Config::default();

    if let Some(host) = lookup("NOTES_SERVER_HOST") {
        config.host = host;
    }

    if let Some(port) = lookup("NOTES_SERVER_PORT") {
        config.port = port
            .parse::<u16>()
            .map_err(|e| format!("Failed to parse NOTES_SERVER_PORT: {e}"))?;
    }

    Ok(config)
}

pub fn load_config() -> Result<Config, Box<dyn std::error::Error>> {
    load_config_from(Path::new("."), |key| env::var(key).ok())
}

/// Config file names are resolved against `dir`.
fn load_config_from<F>(dir: &Path, lookup: F) -> Result<Config, Box<dyn std::error::Error>>
where
    F: Fn(&str) -> Option<String>,
{
    // Retrieve env variable
    let config_path = lookup("NOTES_SERVER_CONFIG").unwrap_or_else(|| "config.yaml".to_string());

    // Try env path
    let env_path = dir.join(&config_path);
    if env_path.exists() {
        return load_from_file(&env_path);
    }

    // Fallback to config.yaml
    let default_path = dir.join("config.yaml");
    if default_path.exists() {
        tracing::warn!(
            "Config file '{}' not found, falling back to 'config.yaml'",
            config_path
        );
        return load_from_file(&default_path);
    }

    // Fallback to config.example.yaml
    let example_path = dir.join("config.example.yaml");
    if example_path.exists() {
        tracing::warn!(
            "Config file '{}' and 'config.yaml' not found, falling back to 'config.example.yaml'",
            config_path
        );
        return load_from_file(&example_path);
    }

    // Fallback to environment variables
    tracing::info!("No config file found, loading configuration from environment variables");
    load_from_env(lookup).map_err(|e| {
        format!(
            "Config file not found and environment variables are invalid. \
             Tried: '{config_path}', 'config.yaml', 'config.example.yaml', and environment variables. \
             Error: {e}"
        )
        .into()
    })
}
