use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BreathworkConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub presentation: PresentationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Wall-clock length of one tick in milliseconds
    pub tick_interval_ms: u64,
    /// Start counting down as soon as the session opens
    pub auto_start: bool,
    /// Tear the session down when it completes instead of waiting for close
    pub close_on_complete: bool,
}

/// Avatar scale per phase. Values must differ so each phase is visible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PresentationConfig {
    pub inhale_scale: f32,
    pub hold_scale: f32,
    pub exhale_scale: f32,
    pub pause_scale: f32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1_000,
            auto_start: false,
            close_on_complete: true,
        }
    }
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            inhale_scale: 1.25,
            hold_scale: 1.15,
            exhale_scale: 0.75,
            pause_scale: 0.9,
        }
    }
}

impl BreathworkConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: BreathworkConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides
    /// Environment variables should be prefixed with BREATHWORK_
    /// Example: BREATHWORK_SESSION_TICK_INTERVAL_MS=250
    pub fn from_file_with_env<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. User config file (if exists)
    /// 3. Default config file
    /// 4. Built-in defaults (lowest priority)
    pub fn load_layered(
        default_path: Option<&Path>,
        user_path: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        let mut config = BreathworkConfig::default();

        if let Some(path) = default_path {
            if path.exists() {
                config = Self::from_file(path)?;
            }
        }

        if let Some(path) = user_path {
            if path.exists() {
                log::debug!("Applying user config from {}", path.display());
                config = Self::from_file(path)?;
            }
        }

        config.apply_env_overrides()?;
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides
    pub(crate) fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        // Unset variables are skipped; a set but non-UTF-8 value is an error.
        fn read(name: &str) -> Result<Option<String>, ConfigError> {
            match std::env::var(name) {
                Ok(val) => Ok(Some(val)),
                Err(std::env::VarError::NotPresent) => Ok(None),
                Err(e) => Err(e.into()),
            }
        }

        fn parse<T: std::str::FromStr>(name: &str, target: &mut T) -> Result<(), ConfigError> {
            if let Some(val) = read(name)? {
                *target = val
                    .trim()
                    .parse()
                    .map_err(|_| ConfigError::Validation(format!("Invalid {}", name)))?;
            }
            Ok(())
        }

        // Session overrides
        parse("BREATHWORK_SESSION_TICK_INTERVAL_MS", &mut self.session.tick_interval_ms)?;
        parse("BREATHWORK_SESSION_AUTO_START", &mut self.session.auto_start)?;
        parse("BREATHWORK_SESSION_CLOSE_ON_COMPLETE", &mut self.session.close_on_complete)?;

        // Presentation overrides
        parse("BREATHWORK_PRESENTATION_INHALE_SCALE", &mut self.presentation.inhale_scale)?;
        parse("BREATHWORK_PRESENTATION_HOLD_SCALE", &mut self.presentation.hold_scale)?;
        parse("BREATHWORK_PRESENTATION_EXHALE_SCALE", &mut self.presentation.exhale_scale)?;
        parse("BREATHWORK_PRESENTATION_PAUSE_SCALE", &mut self.presentation.pause_scale)?;

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Session validation
        if self.session.tick_interval_ms == 0 || self.session.tick_interval_ms > 60_000 {
            return Err(ConfigError::Validation(
                "session.tick_interval_ms must be in [1, 60000]".to_string(),
            ));
        }

        // Presentation validation
        let p = &self.presentation;
        let scales = [
            ("inhale_scale", p.inhale_scale),
            ("hold_scale", p.hold_scale),
            ("exhale_scale", p.exhale_scale),
            ("pause_scale", p.pause_scale),
        ];
        for (name, value) in scales {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Validation(format!(
                    "presentation.{} must be positive",
                    name
                )));
            }
        }
        for (i, (a_name, a)) in scales.iter().enumerate() {
            for (b_name, b) in &scales[i + 1..] {
                if (a - b).abs() < f32::EPSILON {
                    return Err(ConfigError::Validation(format!(
                        "presentation.{} and presentation.{} must differ",
                        a_name, b_name
                    )));
                }
            }
        }

        Ok(())
    }

    /// Export configuration to TOML string
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = self
            .to_toml_string()
            .map_err(|e| ConfigError::Validation(format!("TOML serialization error: {}", e)))?;
        fs::write(path, content)?;
        Ok(())
    }
}
