//! Command-line arguments
//!
//! Copyright (c) 2025 Mohammad Atashi <mohammadaliatashi@icloud.com>

use std::path::PathBuf;

use clap::Parser;
use pagesim_core::{AlgorithmId, ClientConfig, ConfigError, FormState, Speed};

/// Step through FIFO, LRU and Optimal page replacement on a reference string.
#[derive(Parser, Debug)]
#[command(name = "pagesim")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON configuration file
    #[arg(short = 'c', long = "config", env = "PAGESIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Base URL of the computation service
    #[arg(short = 'u', long = "base-url")]
    pub base_url: Option<String>,

    /// Initial frame count
    #[arg(short = 'f', long = "frames")]
    pub frames: Option<u32>,

    /// Initial reference string
    #[arg(short = 'r', long = "reference")]
    pub reference: Option<String>,

    /// Algorithms to preselect, comma separated
    #[arg(short = 'a', long = "algorithms", value_delimiter = ',')]
    pub algorithms: Vec<String>,

    /// Playback speed: fast, medium or slow
    #[arg(short = 's', long = "speed")]
    pub speed: Option<Speed>,

    /// Length of generated random reference strings
    #[arg(long = "random-length")]
    pub random_length: Option<usize>,

    /// Disable colored output
    #[arg(long = "no-color")]
    pub no_color: bool,
}

impl Cli {
    /// Layer the configuration: file, then environment, then flags
    pub fn load_config(&self) -> Result<ClientConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => ClientConfig::default(),
        };
        let config = self.apply(base.with_env_overrides()?);
        config.validate()?;
        Ok(config)
    }

    /// Apply the flags that were given on top of `config`
    pub fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(speed) = self.speed {
            config.default_speed = speed;
        }
        if let Some(length) = self.random_length {
            config.random_length = length;
        }
        if self.no_color {
            config.color = false;
        }
        config
    }

    /// Prefill the form from the flags
    pub fn prefill(&self, form: &mut FormState) {
        if let Some(frames) = self.frames {
            form.frames = frames.to_string();
        }
        if let Some(reference) = &self.reference {
            form.reference_string = reference.clone();
        }
        for name in &self.algorithms {
            let id = AlgorithmId::new(name.as_str());
            if !form.algorithms.set_selected(&id, true) {
                log::warn!("unknown algorithm {id:?} ignored");
            }
        }
    }
}
