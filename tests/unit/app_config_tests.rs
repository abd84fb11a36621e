/*!
 * Tests for application configuration
 */

use std::str::FromStr;
use std::time::Duration;

use napiprojekt::app_config::{Config, ConverterSettings, FailurePolicy, LogLevel, ProviderSettings};

use crate::common::create_temp_dir;

#[test]
fn test_defaultConfig_shouldValidate() {
    let config = Config::default();

    assert_eq!(config.languages, vec!["pl".to_string()]);
    assert_eq!(config.provider.endpoint, "http://napiprojekt.pl/unit_napisy/dl.php");
    assert_eq!(config.provider.timeout(), Duration::from_secs(10));
    assert_eq!(config.provider.concurrent_requests, 4);
    assert_eq!(config.provider.failure_policy, FailurePolicy::Abort);
    assert_eq!(config.converter.ffmpeg_path, "ffmpeg");
    assert_eq!(config.converter.timeout(), Duration::from_secs(60));
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.provider.user_agent.starts_with("napiprojekt-rs/"));

    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_withNoLanguages_shouldFail() {
    let config = Config {
        languages: Vec::new(),
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withUnknownLanguage_shouldFail() {
    let config = Config {
        languages: vec!["pl".to_string(), "xx".to_string()],
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withBadEndpoint_shouldFail() {
    let config = Config {
        provider: ProviderSettings {
            endpoint: "not a url".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_withZeroLimits_shouldFail() {
    let zero_timeout = Config {
        provider: ProviderSettings {
            timeout_secs: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(zero_timeout.validate().is_err());

    let zero_concurrency = Config {
        provider: ProviderSettings {
            concurrent_requests: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(zero_concurrency.validate().is_err());

    let zero_converter_timeout = Config {
        converter: ConverterSettings {
            timeout_secs: 0,
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(zero_converter_timeout.validate().is_err());
}

#[test]
fn test_validate_withEmptyFfmpegPath_shouldFail() {
    let config = Config {
        converter: ConverterSettings {
            ffmpeg_path: "  ".to_string(),
            ..Default::default()
        },
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_failurePolicy_fromStr_shouldBeCaseInsensitive() {
    assert_eq!(FailurePolicy::from_str("abort").unwrap(), FailurePolicy::Abort);
    assert_eq!(FailurePolicy::from_str("SKIP").unwrap(), FailurePolicy::Skip);
    assert!(FailurePolicy::from_str("retry").is_err());
    assert_eq!(FailurePolicy::Skip.to_string(), "skip");
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let temp_dir = create_temp_dir().unwrap();
    let path = temp_dir.path().join("nested").join("conf.json");

    let config = Config::load_or_create(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config, Config::default());
    assert_eq!(Config::load(&path).unwrap(), config);
}

#[test]
fn test_saveAndLoad_shouldKeepCustomValues() {
    let temp_dir = create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let mut config = Config::default();
    config.languages = vec!["pl".to_string(), "en".to_string()];
    config.provider.failure_policy = FailurePolicy::Skip;
    config.provider.concurrent_requests = 2;
    config.log_level = LogLevel::Debug;
    config.save(&path).unwrap();

    let saved = std::fs::read_to_string(&path).unwrap();
    assert!(saved.contains("\"failure_policy\": \"skip\""));
    assert_eq!(Config::load(&path).unwrap(), config);
}

#[test]
fn test_load_withPartialJson_shouldFillDefaults() {
    let temp_dir = create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");
    std::fs::write(&path, r#"{ "languages": ["en"], "provider": { "timeout_secs": 3 } }"#).unwrap();

    let config = Config::load(&path).unwrap();

    assert_eq!(config.languages, vec!["en".to_string()]);
    assert_eq!(config.provider.timeout_secs, 3);
    assert_eq!(config.provider.concurrent_requests, 4);
    assert_eq!(config.converter, ConverterSettings::default());
}

#[test]
fn test_load_withInvalidJson_shouldFail() {
    let temp_dir = create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");
    std::fs::write(&path, "{ not json").unwrap();

    assert!(Config::load(&path).is_err());
}
