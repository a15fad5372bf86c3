use config::{Config, ConfigError, Environment, File};
use hashchase_algos::Algorithm;
use log::{debug, info};
use serde::Deserialize;

use crate::error::FinderError;
use crate::finder::{Finder, DEFAULT_ITERATIONS};

/// The `[search]` table of the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub tolerance: usize,
    pub iterations: usize,
    pub algorithms: Vec<String>,
    /// Hex-encoded target digests.
    pub targets: Vec<String>,
    /// Seconds between progress reports during a random sweep.
    pub report_interval: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        SearchSettings {
            tolerance: 0,
            iterations: DEFAULT_ITERATIONS,
            algorithms: hashchase_algos::all()
                .iter()
                .map(|alg| alg.name().to_string())
                .collect(),
            targets: Vec::new(),
            report_interval: 10,
        }
    }
}

impl SearchSettings {
    /// Reads `path` (extension optional, file optional) and layers
    /// `HASHCHASE_SEARCH__*` environment variables over it.
    pub fn load(path: &str) -> Result<Self, FinderError> {
        let settings = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix("HASHCHASE")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("search.algorithms")
                    .with_list_parse_key("search.targets"),
            )
            .build()?;
        Self::from_config(&settings)
    }

    pub fn from_config(settings: &Config) -> Result<Self, FinderError> {
        match settings.get::<SearchSettings>("search") {
            Ok(search) => Ok(search),
            Err(ConfigError::NotFound(_)) => {
                debug!("No [search] settings found, using defaults");
                Ok(SearchSettings::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Resolves the algorithm names and decodes every target.
    pub fn build_finder(&self) -> Result<Finder, FinderError> {
        let algorithms = self
            .algorithms
            .iter()
            .map(|name| name.parse::<Algorithm>())
            .collect::<Result<Vec<_>, _>>()?;
        if algorithms.is_empty() {
            return Err(FinderError::NoAlgorithms);
        }

        let mut finder = Finder::new(self.tolerance, algorithms).with_iterations(self.iterations);
        for target in &self.targets {
            finder.add_target_hex(target)?;
        }
        info!(
            "Finder ready: {} targets, {} algorithms, tolerance {}, {} iterations",
            finder.targets().len(),
            finder.algorithms().len(),
            finder.tolerance(),
            finder.iterations()
        );
        Ok(finder)
    }
}
