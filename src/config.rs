use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::measurement::DEFAULT_SHOTS;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("shots must be at least 1")]
    NoShots,
}

/// Settings for a correction run
///
/// ```toml
/// shots = 1024
/// seed = 7
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Read-outs drawn for the histogram
    pub shots: usize,
    /// Fixed seed for sampling, OS entropy when absent
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            seed: None,
        }
    }
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Applies command line overrides on top of file values
    pub fn with_overrides(
        mut self,
        shots: Option<usize>,
        seed: Option<u64>,
    ) -> Result<Self, ConfigError> {
        if let Some(shots) = shots {
            self.shots = shots;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        self.validate()
    }

    fn validate(self) -> Result<Self, ConfigError> {
        if self.shots == 0 {
            return Err(ConfigError::NoShots);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.shots, 1024);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn parse_and_override() {
        let config = Config::from_toml_str("shots = 64\nseed = 9\n").unwrap();
        assert_eq!(config.shots, 64);
        assert_eq!(config.seed, Some(9));

        let config = config.with_overrides(Some(10), None).unwrap();
        assert_eq!(config.shots, 10);
        assert_eq!(config.seed, Some(9));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_toml_str("shots = 0"),
            Err(ConfigError::NoShots)
        ));
        assert!(matches!(
            Config::from_toml_str("qubits = 5"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            Config::default().with_overrides(Some(0), None),
            Err(ConfigError::NoShots)
        ));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "seed = 42").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.shots, 1024);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            Config::load(&missing),
            Err(ConfigError::Read { .. })
        ));
    }
}
