//! Tests for configuration loading

use super::*;
use crate::assembler::GenerationStrategy;
use crate::error::CoreError;

mod parsing_tests {
    use super::*;

    #[test]
    fn test_load_config_from_toml() {
        let toml = r#"
[llm]
model = "gpt-4o"
temperature = 0.2

[retry]
max_attempts = 5
delay_ms = 10

[generation]
strategy = "sections"
school_level = "Elementary"
"#;

        let settings = Settings::from_toml_str(toml).unwrap();

        assert_eq!(settings.llm.model, "gpt-4o");
        assert_eq!(settings.llm.temperature, 0.2);
        assert_eq!(settings.llm.chat_max_tokens, 1000);
        assert_eq!(settings.retry.max_attempts, 5);
        assert_eq!(settings.retry.delay().as_millis(), 10);
        assert_eq!(settings.generation.strategy, GenerationStrategy::SectionWise);
        assert_eq!(settings.generation.school_level, "Elementary");
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.retry.max_attempts, 3);
        assert_eq!(settings.retry.delay_ms, 2000);
        assert_eq!(settings.llm.resource_max_tokens, 2000);
        assert_eq!(settings.generation.strategy, GenerationStrategy::WholeDocument);
        assert_eq!(settings.branding.primary().unwrap(), Rgb(0x3d, 0xa0, 0xad));
        assert_eq!(
            settings.branding.copyright,
            "© 2025 Nsightz Inc. All Rights Reserved"
        );
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let settings = Settings::from_toml_str("").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_unknown_strategy_is_rejected() {
        let toml = r#"
[generation]
strategy = "paragraphs"
"#;
        assert!(Settings::from_toml_str(toml).is_err());
    }
}

mod loading_tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[branding]\norganization = \"Acme\"").unwrap();

        let settings = Settings::load(Some(file.path())).unwrap();
        assert_eq!(settings.branding.organization, "Acme");
    }

    #[test]
    fn test_missing_explicit_path_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, CoreError::ConfigIo { .. }));
    }

    #[test]
    fn test_bad_color_is_rejected_on_load() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[branding]\nprimary_color = \"blue\"").unwrap();

        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, CoreError::InvalidColor(_)));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[retry\nmax_attempts = 2").unwrap();

        let err = Settings::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }
}
