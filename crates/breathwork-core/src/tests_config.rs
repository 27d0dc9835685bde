#[cfg(test)]
mod tests {
    use crate::config::*;
    use std::env;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Serializes tests that read or write BREATHWORK_* variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn test_default_config_valid() {
        let config = BreathworkConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.session.tick_interval_ms, 1_000);
        assert!(config.session.close_on_complete);
    }

    #[test]
    fn test_config_validation_session() {
        let mut config = BreathworkConfig::default();

        config.session.tick_interval_ms = 0;
        assert!(config.validate().is_err());

        config.session.tick_interval_ms = 120_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_presentation() {
        let mut config = BreathworkConfig::default();

        // Scales must be positive
        config.presentation.exhale_scale = 0.0;
        assert!(config.validate().is_err());

        // Scales must be distinct
        config.presentation.exhale_scale = config.presentation.pause_scale;
        assert!(config.validate().is_err());

        config.presentation.pause_scale = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_to_toml_string() {
        let config = BreathworkConfig::default();
        let toml_str = config.to_toml_string().unwrap();

        assert!(toml_str.contains("[session]"));
        assert!(toml_str.contains("[presentation]"));
        assert!(toml_str.contains("tick_interval_ms"));
        assert!(toml_str.contains("inhale_scale"));
    }

    #[test]
    fn test_config_from_toml_string() {
        let toml_str = r#"
            [session]
            tick_interval_ms = 500
            auto_start = true

            [presentation]
            inhale_scale = 1.5
        "#;

        let config = BreathworkConfig::from_toml_str(toml_str).unwrap();
        assert_eq!(config.session.tick_interval_ms, 500);
        assert!(config.session.auto_start);
        // Missing keys fall back to defaults
        assert!(config.session.close_on_complete);
        assert_eq!(config.presentation.inhale_scale, 1.5);
        assert_eq!(config.presentation.exhale_scale, 0.75);
    }

    #[test]
    fn test_config_invalid_toml_rejected() {
        let result = BreathworkConfig::from_toml_str("[session]\ntick_interval_ms = \"fast\"");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_config_file_roundtrip() {
        let mut config = BreathworkConfig::default();
        config.session.tick_interval_ms = 250;

        let temp_file = NamedTempFile::new().unwrap();
        config.save_to_file(temp_file.path()).unwrap();

        let loaded = BreathworkConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_layered_missing_files_use_defaults() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let config = BreathworkConfig::load_layered(
            Some(Path::new("/nonexistent/default.toml")),
            Some(Path::new("/nonexistent/user.toml")),
        )
        .unwrap();
        assert_eq!(config.session, SessionConfig::default());
    }

    #[test]
    fn test_layered_user_file_wins() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let default_file = NamedTempFile::new().unwrap();
        fs::write(default_file.path(), "[session]\ntick_interval_ms = 800\n").unwrap();
        let user_file = NamedTempFile::new().unwrap();
        fs::write(user_file.path(), "[session]\nclose_on_complete = false\n").unwrap();

        let config =
            BreathworkConfig::load_layered(Some(default_file.path()), Some(user_file.path()))
                .unwrap();
        assert!(!config.session.close_on_complete);
    }

    #[test]
    fn test_env_override() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let temp_file = NamedTempFile::new().unwrap();
        fs::write(temp_file.path(), "[session]\ntick_interval_ms = 1000\n").unwrap();

        env::set_var("BREATHWORK_PRESENTATION_HOLD_SCALE", "1.05");
        let result = BreathworkConfig::from_file_with_env(temp_file.path());
        env::set_var("BREATHWORK_PRESENTATION_HOLD_SCALE", "not-a-number");
        let bad = BreathworkConfig::from_file_with_env(temp_file.path());
        env::remove_var("BREATHWORK_PRESENTATION_HOLD_SCALE");

        let config = result.unwrap();
        assert!((config.presentation.hold_scale - 1.05).abs() < 1e-6);
        assert!(matches!(bad, Err(ConfigError::Validation(_))));
    }

    #[cfg(unix)]
    #[test]
    fn test_env_override_not_unicode() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::set_var(
            "BREATHWORK_SESSION_AUTO_START",
            OsStr::from_bytes(&[0x66, 0x80, 0xff]),
        );
        let result = BreathworkConfig::load_layered(None, None);
        env::remove_var("BREATHWORK_SESSION_AUTO_START");

        assert!(matches!(result, Err(ConfigError::EnvVar(_))));
    }
}
