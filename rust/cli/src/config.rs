use std::fs;

use clockpatience_engine::config::{AutoStrategy, SessionConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub auto_interval_ms: u64,
    pub strategy: AutoStrategy,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
}

#[derive(Debug, Clone, Copy)]
pub struct ConfigSources {
    pub seed: ValueSource,
    pub auto_interval_ms: ValueSource,
    pub strategy: ValueSource,
}

impl Default for ConfigSources {
    fn default() -> Self {
        Self {
            seed: ValueSource::Default,
            auto_interval_ms: ValueSource::Default,
            strategy: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigResolved {
    pub config: Config,
    pub sources: ConfigSources,
}

impl Default for Config {
    fn default() -> Self {
        let session = SessionConfig::default();
        Self {
            seed: None,
            auto_interval_ms: session.auto_interval_ms,
            strategy: session.auto_strategy,
        }
    }
}

impl Config {
    /// Seed for a command: the `--seed` flag, then the configured seed, then a
    /// fresh random one.
    pub fn resolve_seed(&self, flag: Option<u64>) -> u64 {
        flag.or(self.seed).unwrap_or_else(rand::random)
    }

    /// Engine settings for a session built from this configuration.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            auto_interval_ms: self.auto_interval_ms,
            auto_strategy: self.strategy,
            ..SessionConfig::default()
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Invalid(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}
impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "cannot read config file: {}", e),
            ConfigError::Parse(e) => write!(f, "cannot parse config file: {}", e),
            ConfigError::Invalid(msg) => write!(f, "{}", msg),
        }
    }
}

pub fn load() -> Result<Config, ConfigError> {
    load_with_sources().map(|resolved| resolved.config)
}

/// Resolves defaults, then the TOML file named by `CLOCKPATIENCE_CONFIG`, then
/// `CLOCKPATIENCE_*` environment variables, remembering where each value came from.
pub fn load_with_sources() -> Result<ConfigResolved, ConfigError> {
    let mut cfg = Config::default();
    let mut sources = ConfigSources::default();

    if let Ok(path) = std::env::var("CLOCKPATIENCE_CONFIG")
        && !path.is_empty()
    {
        let s = fs::read_to_string(path)?;
        let f: FileConfig = toml::from_str(&s)?;
        if let Some(v) = f.seed {
            cfg.seed = Some(v);
            sources.seed = ValueSource::File;
        }
        if let Some(v) = f.auto_interval_ms {
            cfg.auto_interval_ms = v;
            sources.auto_interval_ms = ValueSource::File;
        }
        if let Some(v) = f.strategy {
            cfg.strategy = v;
            sources.strategy = ValueSource::File;
        }
    }

    if let Ok(seed) = std::env::var("CLOCKPATIENCE_SEED")
        && !seed.is_empty()
    {
        cfg.seed = Some(
            seed.parse()
                .map_err(|_| ConfigError::Invalid("Invalid seed".into()))?,
        );
        sources.seed = ValueSource::Env;
    }
    if let Ok(interval) = std::env::var("CLOCKPATIENCE_AUTO_INTERVAL_MS")
        && !interval.is_empty()
    {
        cfg.auto_interval_ms = interval
            .parse()
            .map_err(|_| ConfigError::Invalid("Invalid auto interval".into()))?;
        sources.auto_interval_ms = ValueSource::Env;
    }
    if let Ok(strategy) = std::env::var("CLOCKPATIENCE_STRATEGY")
        && !strategy.is_empty()
    {
        cfg.strategy = strategy.parse().map_err(ConfigError::Invalid)?;
        sources.strategy = ValueSource::Env;
    }

    validate(&cfg)?;
    Ok(ConfigResolved {
        config: cfg,
        sources,
    })
}

#[derive(Debug, Deserialize)]
struct FileConfig {
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default)]
    auto_interval_ms: Option<u64>,
    #[serde(default)]
    strategy: Option<AutoStrategy>,
}

fn validate(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.auto_interval_ms == 0 {
        return Err(ConfigError::Invalid(
            "Invalid configuration: auto_interval_ms must be >0".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.seed, None);
        assert_eq!(cfg.auto_interval_ms, 2500);
        assert_eq!(cfg.strategy, AutoStrategy::Reveal);
        assert_eq!(cfg.session_config(), SessionConfig::default());
    }

    #[test]
    fn test_seed_flag_beats_configured_seed() {
        let cfg = Config {
            seed: Some(9),
            ..Config::default()
        };
        assert_eq!(cfg.resolve_seed(Some(3)), 3);
        assert_eq!(cfg.resolve_seed(None), 9);
    }

    #[test]
    fn test_file_config_parses_partial_toml() {
        let f: FileConfig = toml::from_str("strategy = \"move\"\n").unwrap();
        assert_eq!(f.strategy, Some(AutoStrategy::Move));
        assert!(f.seed.is_none());
        assert!(f.auto_interval_ms.is_none());
    }

    #[test]
    fn test_zero_interval_is_invalid() {
        let cfg = Config {
            auto_interval_ms: 0,
            ..Config::default()
        };
        assert!(matches!(validate(&cfg), Err(ConfigError::Invalid(_))));
    }
}
