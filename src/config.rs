//! Configuration management for the community analyzer

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::cluster::{check_p, Algorithm};
use crate::error::{Error, Result};
use crate::graph::store::{DEFAULT_CAPACITY, MAX_CAPACITY};
use crate::graph::Filters;

/// Default configuration for the community analyzer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Expected number of categories, used to size the store
    pub capacity: usize,

    /// Control parameter handed to the detection algorithm, 0..=100
    pub p: u8,

    /// Detection algorithm
    pub algorithm: Algorithm,

    /// Minimum community size
    pub min_community_size: usize,

    /// Similarity priorities used for the projection
    pub filters: Filters,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            p: 50,
            algorithm: Algorithm::Louvain,
            min_community_size: 1,
            filters: Filters::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with custom values
    pub fn new(
        capacity: usize,
        p: u8,
        algorithm: Algorithm,
        min_community_size: usize,
        filters: Filters,
    ) -> Self {
        Self {
            capacity,
            p,
            algorithm,
            min_community_size,
            filters,
        }
    }

    /// Read a JSON configuration; missing fields keep their defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_p(self.p)?;
        if self.capacity > MAX_CAPACITY {
            return Err(Error::invalid(
                "capacity",
                format!("{} exceeds the maximum of {}", self.capacity, MAX_CAPACITY),
            ));
        }
        Ok(())
    }
}
