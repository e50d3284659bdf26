//! Unit tests for configuration.

#[cfg(test)]
mod path_expansion_tests {
    use super::super::Config;
    use std::path::PathBuf;

    #[test]
    fn expand_path_handles_tilde() {
        let result = Config::expand_path("~/sessions");
        assert!(!result.to_string_lossy().starts_with('~'));
    }

    #[test]
    fn expand_path_handles_absolute_path() {
        let result = Config::expand_path("/absolute/path");
        assert_eq!(result, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn expand_path_handles_env_vars() {
        temp_env::with_var("NEXA_TEST_VAR", Some("/test/path"), || {
            let result = Config::expand_path("$NEXA_TEST_VAR/sessions");
            assert!(result.to_string_lossy().contains("/test/path"));
        });
    }
}

#[cfg(test)]
mod default_config_tests {
    use super::super::Config;

    #[test]
    fn default_has_store_dir() {
        let config = Config::default();
        assert!(config.store_dir.to_string_lossy().contains("nexa"));
        assert!(config.store_dir.ends_with("sessions"));
    }

    #[test]
    fn default_timeout_is_thirty_seconds() {
        let config = Config::default();
        assert_eq!(config.request_timeout().as_secs(), 30);
    }
}

#[cfg(test)]
mod load_save_tests {
    use super::super::Config;

    #[test]
    fn save_and_reload_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.text_endpoint = "https://example.test/generate".to_string();
        config.request_timeout_secs = 12;
        config.save_to_path(&path).expect("save");

        let loaded = Config::load_from_path(&path).expect("load");
        assert_eq!(loaded.text_endpoint, "https://example.test/generate");
        assert_eq!(loaded.request_timeout_secs, 12);
    }

    #[test]
    fn ensure_at_creates_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let config = Config::ensure_at(&path).expect("ensure");
        assert!(path.exists());
        assert_eq!(config.request_timeout_secs, 30);
    }

    #[test]
    fn malformed_config_is_a_config_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is not toml = =").expect("write");

        let err = Config::load_from_path(&path).expect_err("should fail");
        assert!(err.to_string().contains("Configuration error"));
    }
}
