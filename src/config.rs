use std::path::PathBuf;

use color_eyre::eyre::Result;
use serde::Deserialize;
use tracing::info;

use crate::{
  cli::is_valid_rate,
  utils::{get_config_dir, get_data_dir},
};

const CONFIG: &str = include_str!("../.config/config.json5");

#[derive(Clone, Debug, Deserialize, Default)]
pub struct AppConfig {
  #[serde(default)]
  pub _data_dir: PathBuf,
  #[serde(default)]
  pub _config_dir: PathBuf,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
  #[serde(default, flatten)]
  pub config: AppConfig,
  pub tick_rate: f64,
  pub frame_rate: f64,
}

impl Config {
  /// Embedded defaults, overridden by any `config.*` file found in the config directory.
  pub fn new() -> Result<Self, config::ConfigError> {
    let data_dir = get_data_dir();
    let config_dir = get_config_dir();
    let mut builder = config::Config::builder()
      .add_source(config::File::from_str(CONFIG, config::FileFormat::Json5))
      .set_default("_data_dir", data_dir.to_string_lossy().to_string())?
      .set_default("_config_dir", config_dir.to_string_lossy().to_string())?;

    let config_files = [
      ("config.json5", config::FileFormat::Json5),
      ("config.json", config::FileFormat::Json),
      ("config.yaml", config::FileFormat::Yaml),
      ("config.toml", config::FileFormat::Toml),
      ("config.ini", config::FileFormat::Ini),
    ];
    for (file, format) in &config_files {
      let path = config_dir.join(file);
      if path.exists() {
        info!("Loading configuration from {}", path.display());
      }
      builder = builder.add_source(config::File::from(path).format(*format).required(false));
    }

    let config: Self = builder.build()?.try_deserialize()?;
    config.validate()
  }

  fn validate(self) -> Result<Self, config::ConfigError> {
    for (key, rate) in [("tick_rate", self.tick_rate), ("frame_rate", self.frame_rate)] {
      if !is_valid_rate(rate) {
        return Err(config::ConfigError::Message(format!("{key} must be a finite number above zero, got {rate}")));
      }
    }
    Ok(self)
  }

  /// Command line values win over configured ones.
  pub fn with_overrides(mut self, tick_rate: Option<f64>, frame_rate: Option<f64>) -> Self {
    if let Some(tick_rate) = tick_rate {
      self.tick_rate = tick_rate;
    }
    if let Some(frame_rate) = frame_rate {
      self.frame_rate = frame_rate;
    }
    self
  }
}
